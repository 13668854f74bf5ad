use chrono::{DateTime, Local};
use flick::{
    reporter::StoreReporter,
    score_store::{LeaderboardEntry, ScoreRecord, LEADERBOARD_SIZE},
    util::summarize_scores,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::App;

const HISTORY_ROWS: usize = 15;

/// "3 minutes ago" style age of a stored session
pub fn when(created_at: DateTime<Local>, now: DateTime<Local>) -> String {
    let age = (now - created_at).to_std().unwrap_or_default();
    HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
}

fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 90.0 {
        Color::Green
    } else if accuracy >= 70.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn present_leaderboard_row(entry: &LeaderboardEntry, now: DateTime<Local>) -> Row<'static> {
    Row::new(vec![
        Cell::from(format!("#{}", entry.rank)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(entry.player.clone()),
        Cell::from(entry.score.to_string()),
        Cell::from(format!("{:.1}", entry.accuracy))
            .style(Style::default().fg(accuracy_color(entry.accuracy))),
        Cell::from(when(entry.created_at, now)),
    ])
}

pub fn present_history_row(record: &ScoreRecord, now: DateTime<Local>) -> Row<'static> {
    let score_style = if record.score < 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(record.score.to_string()).style(score_style),
        Cell::from(format!("{}/{}", record.hits, record.clicks)),
        Cell::from(format!("{:.1}", record.accuracy))
            .style(Style::default().fg(accuracy_color(record.accuracy))),
        Cell::from(format!("{}s", record.duration_secs)),
        Cell::from(when(record.created_at, now)),
    ])
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c)).collect::<Vec<_>>()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

/// Rows for the history screen, read from the store once per visit
#[derive(Debug, Default)]
pub struct HistoryData {
    pub available: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub recent: Vec<ScoreRecord>,
}

impl HistoryData {
    pub fn load(reporter: &StoreReporter) -> Self {
        let Some(store) = reporter.store() else {
            return Self::default();
        };

        let leaderboard = store.leaderboard(LEADERBOARD_SIZE).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read leaderboard");
            Vec::new()
        });
        let recent = store
            .history(reporter.player(), HISTORY_ROWS)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to read history");
                Vec::new()
            });

        Self {
            available: true,
            leaderboard,
            recent,
        }
    }
}

/// Leaderboard and the player's recent sessions
pub struct HistoryView<'a>(pub &'a App);

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let data = &app.history;
        let now = Local::now();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(LEADERBOARD_SIZE as u16 + 3),
                Constraint::Min(0),    // history
                Constraint::Length(1), // summary
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(format!("History for {}", app.session.reporter().player()))
            .block(Block::default().borders(Borders::ALL).title("Scores"))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let legend = Paragraph::new("(b) back / (space) play / (esc) quit")
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center);

        if !data.available {
            Paragraph::new("score store unavailable; nothing recorded")
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
            legend.render(chunks[4], buf);
            return;
        }

        Table::new(
            data.leaderboard.iter().map(|e| present_leaderboard_row(e, now)),
            [
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(18),
            ],
        )
        .header(header(&["rank", "player", "score", "acc %", "when"]))
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"))
        .render(chunks[1], buf);

        Table::new(
            data.recent.iter().map(|r| present_history_row(r, now)),
            [
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(8),
                Constraint::Min(18),
            ],
        )
        .header(header(&["score", "hits", "acc %", "length", "when"]))
        .block(Block::default().borders(Borders::ALL).title("Recent sessions"))
        .render(chunks[2], buf);

        let scores: Vec<i64> = data.recent.iter().map(|r| r.score).collect();
        let summary = match summarize_scores(&scores) {
            Some(s) => format!(
                "last {} sessions: best {} / mean {:.1} / std dev {:.1}",
                s.sessions, s.best, s.mean, s.std_dev
            ),
            None => "no sessions recorded yet".to_string(),
        };
        Paragraph::new(summary)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        legend.render(chunks[4], buf);
    }
}
