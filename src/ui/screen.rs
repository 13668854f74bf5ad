use ratatui::Frame;

use crate::{
    ui::{history::HistoryView, ArenaView, ResultsView},
    App, AppState,
};

/// A UI Screen boundary: owns rendering for one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Arena screen - HUD, playfield and countdown
pub struct ArenaScreen;

impl Screen for ArenaScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(ArenaView(app), f.area());
    }
}

/// Results screen - frozen snapshot, chart and celebration
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(ResultsView(app), f.area());
    }
}

/// History screen - leaderboard and recent sessions from the score store
pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(HistoryView(app), f.area());
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Arena => Box::new(ArenaScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}
