use serde::{Deserialize, Serialize};

/// Live counters for the session in progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Unbounded below: misses keep subtracting
    pub score: i64,
    pub total_clicks: u32,
    pub successful_hits: u32,
    pub elapsed_secs: f64,
}

/// Frozen result handed to the score reporter when a session finishes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: i64,
    pub hits: u32,
    pub clicks: u32,
    pub accuracy: f64,
    pub duration_secs: f64,
}

/// Score after a click, for the results chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePoint {
    pub t: f64,
    pub score: f64,
}

impl ScorePoint {
    pub fn new(t: f64, score: f64) -> Self {
        Self { t, score }
    }
}

impl From<ScorePoint> for (f64, f64) {
    fn from(p: ScorePoint) -> Self {
        (p.t, p.score)
    }
}

/// Hit percentage; 0 when there were no clicks
pub fn accuracy(hits: u32, clicks: u32) -> f64 {
    if clicks == 0 {
        0.0
    } else {
        hits as f64 / clicks as f64 * 100.0
    }
}

#[derive(Debug, Default)]
pub struct ResultAggregator {
    stats: SessionStats,
    timeline: Vec<ScorePoint>,
    frozen: Option<SessionSnapshot>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
        self.timeline.clear();
        self.frozen = None;
    }

    /// Apply one click that hit `hits` targets. Ignored once frozen.
    pub fn record_click(&mut self, hits: u32, elapsed_secs: f64) {
        if self.frozen.is_some() {
            return;
        }

        self.stats.total_clicks += 1;
        if hits == 0 {
            self.stats.score -= 1;
        } else {
            self.stats.successful_hits += hits;
            self.stats.score += hits as i64;
        }
        self.stats.elapsed_secs = elapsed_secs;
        self.timeline
            .push(ScorePoint::new(elapsed_secs, self.stats.score as f64));
    }

    pub fn set_elapsed(&mut self, elapsed_secs: f64) {
        if self.frozen.is_none() {
            self.stats.elapsed_secs = elapsed_secs;
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(self.stats.successful_hits, self.stats.total_clicks)
    }

    pub fn timeline(&self) -> &[ScorePoint] {
        &self.timeline
    }

    /// Current values as a snapshot, without freezing
    pub fn snapshot(&self) -> SessionSnapshot {
        self.frozen.unwrap_or(SessionSnapshot {
            score: self.stats.score,
            hits: self.stats.successful_hits,
            clicks: self.stats.total_clicks,
            accuracy: self.accuracy(),
            duration_secs: self.stats.elapsed_secs,
        })
    }

    /// Lock the counters. Repeated calls return the first snapshot.
    pub fn freeze(&mut self, duration_secs: f64) -> SessionSnapshot {
        if let Some(snapshot) = self.frozen {
            return snapshot;
        }
        self.stats.elapsed_secs = duration_secs;
        let snapshot = self.snapshot();
        self.frozen = Some(snapshot);
        snapshot
    }

    pub fn frozen(&self) -> Option<&SessionSnapshot> {
        self.frozen.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_zero_clicks() {
        assert_eq!(accuracy(0, 0), 0.0);
    }

    #[test]
    fn test_accuracy_values() {
        assert_eq!(accuracy(1, 2), 50.0);
        assert_eq!(accuracy(3, 3), 100.0);
        assert_eq!(accuracy(0, 4), 0.0);
    }

    #[test]
    fn test_hit_then_miss() {
        let mut agg = ResultAggregator::new();

        agg.record_click(1, 1.0);
        assert_eq!(agg.stats().score, 1);

        agg.record_click(0, 2.0);
        let stats = agg.stats();
        assert_eq!(stats.score, 0);
        assert_eq!(stats.successful_hits, 1);
        assert_eq!(stats.total_clicks, 2);
        assert_eq!(agg.accuracy(), 50.0);
    }

    #[test]
    fn test_score_goes_negative() {
        let mut agg = ResultAggregator::new();
        for i in 0..4 {
            agg.record_click(0, i as f64);
        }

        assert_eq!(agg.stats().score, -4);
        assert_eq!(agg.accuracy(), 0.0);
    }

    #[test]
    fn test_multi_hit_click() {
        let mut agg = ResultAggregator::new();
        agg.record_click(2, 0.5);

        let stats = agg.stats();
        assert_eq!(stats.total_clicks, 1);
        assert_eq!(stats.successful_hits, 2);
        assert_eq!(stats.score, 2);
    }

    #[test]
    fn test_freeze_locks_counters() {
        let mut agg = ResultAggregator::new();
        agg.record_click(1, 3.0);

        let first = agg.freeze(30.0);
        agg.record_click(1, 31.0);
        agg.set_elapsed(40.0);
        let second = agg.freeze(45.0);

        assert_eq!(first, second);
        assert_eq!(first.score, 1);
        assert_eq!(first.duration_secs, 30.0);
        assert_eq!(agg.stats().total_clicks, 1);
        assert_eq!(agg.snapshot(), first);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut agg = ResultAggregator::new();
        agg.record_click(1, 1.0);
        agg.freeze(30.0);

        agg.reset();

        assert_eq!(agg.stats(), SessionStats::default());
        assert!(agg.timeline().is_empty());
        assert!(agg.frozen().is_none());
    }

    #[test]
    fn test_timeline_tracks_score() {
        let mut agg = ResultAggregator::new();
        agg.record_click(1, 1.0);
        agg.record_click(1, 2.0);
        agg.record_click(0, 3.5);

        let points: Vec<(f64, f64)> = agg.timeline().iter().map(|p| (*p).into()).collect();
        assert_eq!(points, vec![(1.0, 1.0), (2.0, 2.0), (3.5, 1.0)]);
    }
}
