use crate::results::SessionSnapshot;
use crate::score_store::ScoreDb;

/// Receives the frozen result of every completed session, exactly once
pub trait SessionReporter {
    fn on_session_finished(&mut self, snapshot: &SessionSnapshot, is_new_personal_best: bool);
}

/// Supplies the score a new session has to beat
pub trait PersonalBestSource {
    fn personal_best(&self) -> i64;
}

/// Keeps every emission in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub finished: Vec<(SessionSnapshot, bool)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(SessionSnapshot, bool)> {
        self.finished.last()
    }
}

impl SessionReporter for RecordingReporter {
    fn on_session_finished(&mut self, snapshot: &SessionSnapshot, is_new_personal_best: bool) {
        self.finished.push((*snapshot, is_new_personal_best));
    }
}

impl PersonalBestSource for RecordingReporter {
    fn personal_best(&self) -> i64 {
        self.finished
            .iter()
            .map(|(s, _)| s.score)
            .max()
            .unwrap_or(0)
            .max(0)
    }
}

/// Submits results to the local score history.
///
/// Submission is fire-and-forget: store failures are logged and dropped so
/// they never reach the session. Without a store it still remembers the
/// last result for display.
#[derive(Debug)]
pub struct StoreReporter {
    store: Option<ScoreDb>,
    player: String,
    last: Option<(SessionSnapshot, bool)>,
    best_this_run: i64,
}

impl StoreReporter {
    pub fn new(store: Option<ScoreDb>, player: impl Into<String>) -> Self {
        Self {
            store,
            player: player.into(),
            last: None,
            best_this_run: 0,
        }
    }

    pub fn store(&self) -> Option<&ScoreDb> {
        self.store.as_ref()
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn last(&self) -> Option<&(SessionSnapshot, bool)> {
        self.last.as_ref()
    }
}

impl SessionReporter for StoreReporter {
    fn on_session_finished(&mut self, snapshot: &SessionSnapshot, is_new_personal_best: bool) {
        self.last = Some((*snapshot, is_new_personal_best));
        self.best_this_run = self.best_this_run.max(snapshot.score);

        if let Some(ref store) = self.store {
            if let Err(e) = store.record_snapshot(&self.player, snapshot) {
                tracing::warn!(player = %self.player, error = %e, "failed to submit score");
            }
        }
    }
}

impl PersonalBestSource for StoreReporter {
    /// Mirrors the profile default: a player with no history has a best of 0
    fn personal_best(&self) -> i64 {
        let Some(ref store) = self.store else {
            return self.best_this_run;
        };
        match store.personal_best(&self.player) {
            Ok(best) => best.unwrap_or(0).max(0),
            Err(e) => {
                tracing::warn!(player = %self.player, error = %e, "failed to read personal best");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: i64) -> SessionSnapshot {
        SessionSnapshot {
            score,
            hits: score.max(0) as u32,
            clicks: score.max(0) as u32,
            accuracy: 100.0,
            duration_secs: 30.0,
        }
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let mut r = RecordingReporter::new();
        r.on_session_finished(&snapshot(3), true);
        r.on_session_finished(&snapshot(1), false);

        assert_eq!(r.finished.len(), 2);
        assert_eq!(r.last().unwrap().0.score, 1);
        assert_eq!(r.personal_best(), 3);
    }

    #[test]
    fn test_store_reporter_persists() {
        let store = ScoreDb::open_in_memory().unwrap();
        let mut r = StoreReporter::new(Some(store), "ace");
        assert_eq!(r.personal_best(), 0);

        r.on_session_finished(&snapshot(12), true);
        r.on_session_finished(&snapshot(7), false);

        assert_eq!(r.personal_best(), 12);
        assert_eq!(r.last().unwrap().0.score, 7);
        assert_eq!(r.store().unwrap().history("ace", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_store_reporter_without_store() {
        let mut r = StoreReporter::new(None, "ace");
        r.on_session_finished(&snapshot(4), true);
        r.on_session_finished(&snapshot(2), false);

        assert_eq!(r.last().unwrap().0.score, 2);
        assert_eq!(r.personal_best(), 4);
    }

    #[test]
    fn test_negative_history_best_is_zero() {
        let store = ScoreDb::open_in_memory().unwrap();
        let mut r = StoreReporter::new(Some(store), "ace");
        r.on_session_finished(&snapshot(-5), false);

        assert_eq!(r.personal_best(), 0);
    }
}
