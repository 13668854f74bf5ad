pub mod charting;
pub mod history;
pub mod screen;

use std::time::Instant;

use flick::{
    config::SessionConfig,
    session::SessionState,
    util::signed,
    viewport::Viewport,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const PALETTE: [Color; 7] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::White,
];

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

/// Cells the playfield occupies: one HUD row on top, one help row below,
/// and a border around the field itself
pub fn playfield_area(area: Rect) -> Rect {
    Rect::new(
        area.x + 1,
        area.y + 2,
        area.width.saturating_sub(2),
        area.height.saturating_sub(4),
    )
}

pub fn playfield_viewport(area: Rect, config: &SessionConfig) -> Viewport {
    Viewport::new(
        playfield_area(area),
        config.playfield_width,
        config.playfield_height,
    )
}

fn centered_line(area: Rect, text: &str, style: Style, buf: &mut Buffer) {
    let width = text.width() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_string(x, area.y, text, style);
}

/// Arena: HUD, playfield, and whatever the session state calls for
pub struct ArenaView<'a>(pub &'a App);

impl Widget for ArenaView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let session = &app.session;
        let now = Instant::now();

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let stats = session.stats();
        let hud = Line::from(vec![
            Span::styled(format!("score {}", signed(stats.score)), bold),
            Span::styled("  |  ", dim),
            Span::styled(format!("{:.1}s", session.remaining_secs(now)), bold),
            Span::styled("  |  ", dim),
            Span::raw(format!("acc {:.0}%", session.accuracy())),
            Span::styled("  |  ", dim),
            Span::styled(format!("best {}", session.previous_best()), dim),
        ]);
        Paragraph::new(hud)
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, area.y, area.width, 1), buf);

        let field = playfield_area(area);
        if field.width == 0 || field.height == 0 {
            return;
        }
        Block::default()
            .borders(Borders::ALL)
            .border_style(dim)
            .render(
                Rect::new(
                    field.x.saturating_sub(1),
                    field.y.saturating_sub(1),
                    field.width + 2,
                    field.height + 2,
                ),
                buf,
            );

        let mid = Rect::new(field.x, field.y + field.height / 2, field.width, 1);
        match session.state() {
            SessionState::Ready => {
                centered_line(
                    mid,
                    "click the targets before the clock runs out",
                    bold,
                    buf,
                );
                if mid.y + 2 < field.bottom() {
                    centered_line(
                        Rect::new(mid.x, mid.y + 2, mid.width, 1),
                        "(space) start / (h) history / (esc) quit",
                        dim.add_modifier(Modifier::ITALIC),
                        buf,
                    );
                }
            }
            SessionState::Countdown => {
                centered_line(
                    mid,
                    &session.countdown_remaining().to_string(),
                    bold.fg(Color::Yellow),
                    buf,
                );
            }
            SessionState::Running | SessionState::Finished => {
                let viewport = playfield_viewport(area, session.config());
                let target_style = Style::default().fg(Color::Red);
                for (_, target) in session.targets() {
                    for (x, y) in viewport.cells_within(target.position, target.radius) {
                        buf.set_string(x, y, "█", target_style);
                    }
                    if let Some((x, y)) = viewport.to_cell(target.position) {
                        buf.set_string(x, y, "◎", target_style.bg(Color::White));
                    }
                }
            }
        }

        let help = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        centered_line(help, "(esc) quit", dim, buf);
    }
}

/// Results: totals, score-over-time chart, personal best message
pub struct ResultsView<'a>(pub &'a App);

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let session = &app.session;
        let Some(snapshot) = session.snapshot() else {
            return;
        };

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let italic = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(5)
            .vertical_margin(2)
            .constraints([
                Constraint::Min(1),    // chart
                Constraint::Length(1), // totals
                Constraint::Length(1), // personal best
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        let points: Vec<(f64, f64)> = session.timeline().iter().map(|p| (*p).into()).collect();
        let params = charting::compute_chart_params(session.timeline(), snapshot.duration_secs);
        let datasets = vec![Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&points)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, params.x_max])
                    .labels(vec![
                        Span::styled("0", bold),
                        Span::styled(charting::format_label(params.x_max), bold),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("score")
                    .bounds([params.y_min, params.y_max])
                    .labels(vec![
                        Span::styled(charting::format_label(params.y_min), bold),
                        Span::styled(charting::format_label(params.y_max), bold),
                    ]),
            );
        chart.render(chunks[0], buf);

        let totals = format!(
            "{} pts / {} hits / {} clicks / {:.1}% acc / {}s",
            snapshot.score,
            snapshot.hits,
            snapshot.clicks,
            snapshot.accuracy,
            charting::format_label(snapshot.duration_secs)
        );
        Paragraph::new(Span::styled(totals, bold))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let best_line = match session.reporter().last() {
            Some((_, true)) => Span::styled(
                format!("new personal best! (previous {})", session.previous_best()),
                bold.fg(Color::Green),
            ),
            _ => Span::styled(
                format!("personal best: {}", session.previous_best()),
                italic,
            ),
        };
        Paragraph::new(best_line)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(space) retry / (h) history / (s) share / (esc) quit",
            italic,
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        render_celebration(app, area, buf);
    }
}

fn render_celebration(app: &App, area: Rect, buf: &mut Buffer) {
    if !app.celebration.is_active {
        return;
    }
    for p in &app.celebration.particles {
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let (x, y) = (p.x as u16, p.y as u16);
        if x < area.right() && y < area.bottom() {
            let style = Style::default()
                .fg(PALETTE[p.color_index % PALETTE.len()])
                .add_modifier(Modifier::BOLD);
            buf.set_string(x, y, p.symbol.to_string(), style);
        }
    }
}
