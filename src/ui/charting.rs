use flick::results::ScorePoint;
use itertools::{Itertools, MinMaxResult};

/// Axis bounds for the score-over-time chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartParams {
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// X spans the whole session; Y always includes zero since scores can go
/// negative, and never collapses to an empty range
pub fn compute_chart_params(timeline: &[ScorePoint], duration_secs: f64) -> ChartParams {
    let last_t = timeline.last().map(|p| p.t).unwrap_or(0.0);
    let x_max = duration_secs.max(last_t).max(1.0);

    let (lo, hi) = match timeline.iter().map(|p| p.score).minmax() {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(s) => (s, s),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let y_min = lo.min(0.0).floor();
    let mut y_max = hi.max(0.0).ceil();
    if y_max - y_min < 1.0 {
        y_max = y_min + 1.0;
    }

    ChartParams {
        x_max,
        y_min,
        y_max,
    }
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
