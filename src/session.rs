use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::grid::{build_grid, Point, SpawnGrid};
use crate::hit::{resolve_click, ClickVerdict};
use crate::reporter::SessionReporter;
use crate::results::{ResultAggregator, ScorePoint, SessionSnapshot, SessionStats};
use crate::targets::{Target, TargetField};
use crate::timer::RepeatingTimer;

pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Ready,
    Countdown,
    Running,
    Finished,
}

/// One aim-training session controller.
///
/// Drives the lifecycle Ready -> Countdown -> Running -> Finished (and
/// Finished -> Countdown on restart). It owns the target field, the result
/// aggregator and the two recurring timers; the caller supplies the clock
/// on every event so the whole thing runs deterministically under test.
///
/// Every inbound event that arrives in the wrong state is a silent no-op.
#[derive(Debug)]
pub struct Session<R: SessionReporter> {
    config: SessionConfig,
    state: SessionState,
    countdown_remaining: u32,
    started_at: Option<Instant>,
    previous_best: i64,
    field: TargetField,
    results: ResultAggregator,
    reporter: R,
    countdown_timer: RepeatingTimer,
    frame_timer: RepeatingTimer,
}

impl<R: SessionReporter> Session<R> {
    pub fn new(config: SessionConfig, reporter: R) -> Self {
        let config = config.validate();
        let field = TargetField::new(Self::grid_for(&config), config.target_radius);
        Self::with_field(config, reporter, field)
    }

    /// Seeded target placement
    pub fn with_seed(config: SessionConfig, reporter: R, seed: u64) -> Self {
        let config = config.validate();
        let field = TargetField::with_seed(Self::grid_for(&config), config.target_radius, seed);
        Self::with_field(config, reporter, field)
    }

    fn with_field(config: SessionConfig, reporter: R, field: TargetField) -> Self {
        Self {
            config,
            state: SessionState::Ready,
            countdown_remaining: config.countdown_ticks,
            started_at: None,
            previous_best: 0,
            field,
            results: ResultAggregator::new(),
            reporter,
            countdown_timer: RepeatingTimer::new(COUNTDOWN_INTERVAL),
            frame_timer: RepeatingTimer::every_frame(),
        }
    }

    fn grid_for(config: &SessionConfig) -> SpawnGrid {
        build_grid(
            config.playfield_width,
            config.playfield_height,
            config.grid_cell_size,
        )
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn stats(&self) -> SessionStats {
        self.results.stats()
    }

    pub fn accuracy(&self) -> f64 {
        self.results.accuracy()
    }

    pub fn timeline(&self) -> &[ScorePoint] {
        self.results.timeline()
    }

    /// The frozen result, once Finished
    pub fn snapshot(&self) -> Option<&SessionSnapshot> {
        match self.state {
            SessionState::Finished => self.results.frozen(),
            _ => None,
        }
    }

    pub fn grid(&self) -> &SpawnGrid {
        self.field.grid()
    }

    pub fn targets(&self) -> impl Iterator<Item = (usize, &Target)> {
        self.field.active()
    }

    pub fn previous_best(&self) -> i64 {
        self.previous_best
    }

    /// Takes effect for the next session; ignored mid-session.
    pub fn set_previous_best(&mut self, best: i64) {
        if matches!(self.state, SessionState::Ready | SessionState::Finished) {
            self.previous_best = best;
        }
    }

    /// Rebuild the spawn grid for a new playfield size. Only between
    /// sessions; returns false while a session is counting down or running.
    pub fn resize_playfield(&mut self, width: f64, height: f64) -> bool {
        if !matches!(self.state, SessionState::Ready | SessionState::Finished) {
            return false;
        }

        self.config = SessionConfig {
            playfield_width: width,
            playfield_height: height,
            ..self.config
        }
        .validate();
        self.field.set_grid(Self::grid_for(&self.config));
        tracing::debug!(points = self.field.grid().len(), "spawn grid rebuilt");
        true
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// True while either recurring timer is scheduled
    pub fn timers_active(&self) -> bool {
        self.countdown_timer.is_armed() || self.frame_timer.is_armed()
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(start) => now.saturating_duration_since(start).as_secs_f64(),
            None => 0.0,
        }
    }

    /// Seconds left on the clock; full duration before the clock starts
    pub fn remaining_secs(&self, now: Instant) -> f64 {
        match self.state {
            SessionState::Ready | SessionState::Countdown => self.config.session_duration_secs,
            SessionState::Running => {
                (self.config.session_duration_secs - self.elapsed_secs(now)).max(0.0)
            }
            SessionState::Finished => 0.0,
        }
    }

    /// Begin the countdown. Valid from Ready or Finished; returns false (and
    /// changes nothing) otherwise.
    pub fn start_session(&mut self, now: Instant) -> bool {
        if !matches!(self.state, SessionState::Ready | SessionState::Finished) {
            return false;
        }

        self.results.reset();
        self.field.clear();
        self.started_at = None;
        self.countdown_remaining = self.config.countdown_ticks;
        self.state = SessionState::Countdown;
        self.frame_timer.cancel();
        self.countdown_timer.arm(now);

        tracing::debug!(
            countdown = self.countdown_remaining,
            previous_best = self.previous_best,
            "session countdown started"
        );
        true
    }

    /// One countdown step. The step that reaches zero starts the clock at
    /// `now` and places the initial targets.
    pub fn countdown_tick(&mut self, now: Instant) -> SessionState {
        if self.state != SessionState::Countdown {
            return self.state;
        }

        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining == 0 {
            self.begin_running(now);
        }
        self.state
    }

    fn begin_running(&mut self, now: Instant) {
        self.countdown_timer.cancel();
        self.state = SessionState::Running;
        self.started_at = Some(now);
        let placed = self.field.spawn_initial(self.config.active_target_count);
        self.frame_timer.arm(now);

        tracing::debug!(targets = placed, "session running");
    }

    /// Per-frame clock check, based on wall time rather than frame count.
    pub fn frame_tick(&mut self, now: Instant) -> SessionState {
        if self.state != SessionState::Running {
            return self.state;
        }

        let duration = self.config.session_duration_secs;
        let elapsed = self.elapsed_secs(now);
        self.results.set_elapsed(elapsed.min(duration));

        if duration - elapsed <= 0.0 {
            self.finish();
        }
        self.state
    }

    /// The only path into Finished; the state check makes the emission
    /// happen once per session no matter how many late frames arrive.
    fn finish(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.state = SessionState::Finished;
        self.frame_timer.cancel();
        self.countdown_timer.cancel();

        let snapshot = self.results.freeze(self.config.session_duration_secs);
        let is_new_personal_best = snapshot.score > self.previous_best;

        tracing::info!(
            score = snapshot.score,
            hits = snapshot.hits,
            clicks = snapshot.clicks,
            accuracy = snapshot.accuracy,
            is_new_personal_best,
            "session finished"
        );

        self.reporter
            .on_session_finished(&snapshot, is_new_personal_best);
    }

    /// Resolve a pointer press at playfield coordinates. Returns `None` when
    /// the press is outside the running window; such presses are dropped.
    pub fn pointer_down(&mut self, now: Instant, x: f64, y: f64) -> Option<ClickVerdict> {
        // a press that lands after the clock ran out closes the session
        // instead of scoring
        if self.frame_tick(now) != SessionState::Running {
            return None;
        }

        let verdict = resolve_click(Point::new(x, y), self.field.active());
        self.results
            .record_click(verdict.hits(), self.elapsed_secs(now));
        for slot in &verdict.hit_slots {
            self.field.respawn(*slot);
        }

        Some(verdict)
    }

    /// Run whatever the timers say is due at `now`
    pub fn pump(&mut self, now: Instant) -> SessionState {
        let due = self.countdown_timer.poll(now);
        for _ in 0..due {
            if self.countdown_tick(now) != SessionState::Countdown {
                break;
            }
        }

        if self.frame_timer.poll(now) > 0 {
            self.frame_tick(now);
        }
        self.state
    }

    /// Stop both timers. An unfinished session is abandoned without a
    /// result and the controller goes back to Ready.
    pub fn teardown(&mut self) {
        self.countdown_timer.cancel();
        self.frame_timer.cancel();

        if matches!(self.state, SessionState::Countdown | SessionState::Running) {
            tracing::debug!(state = %self.state, "abandoning unfinished session");
            self.state = SessionState::Ready;
            self.started_at = None;
            self.countdown_remaining = self.config.countdown_ticks;
            self.field.clear();
            self.results.reset();
        }
    }
}
