pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Aggregate over a run of past scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub sessions: usize,
    pub best: i64,
    pub mean: f64,
    pub std_dev: f64,
}

pub fn summarize_scores(scores: &[i64]) -> Option<ScoreSummary> {
    let as_f64: Vec<f64> = scores.iter().map(|s| *s as f64).collect();
    Some(ScoreSummary {
        sessions: scores.len(),
        best: *scores.iter().max()?,
        mean: mean(&as_f64)?,
        std_dev: std_dev(&as_f64)?,
    })
}

/// Score with an explicit sign, e.g. "+3" / "-2" / "0"
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}
