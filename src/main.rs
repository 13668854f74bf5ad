mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flick::{
    app_dirs::AppDirs,
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    reporter::{PersonalBestSource, StoreReporter},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    score_store::{ScoreDb, LEADERBOARD_SIZE},
    session::{Session, SessionState},
    util::summarize_scores,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::EnvFilter;
use ui::history::HistoryData;
use webbrowser::Browser;

/// aim training in your terminal: click the targets before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal aim trainer. Targets spawn on a grid; click them with the mouse before the session clock runs out. Hits score +1, misses -1. Results are kept in a local score history."
)]
pub struct Cli {
    /// session length in seconds
    #[clap(short = 'd', long)]
    duration: Option<f64>,

    /// number of targets on the field at once
    #[clap(short = 't', long)]
    targets: Option<usize>,

    /// target radius in playfield units (the field is 1300x650 by default)
    #[clap(short = 'r', long)]
    radius: Option<f64>,

    /// spacing of the spawn grid in playfield units
    #[clap(short = 'c', long)]
    cell_size: Option<f64>,

    /// name scores are recorded under
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// persist the given options as the new defaults
    #[clap(long)]
    save_config: bool,

    /// print your recent sessions and exit
    #[clap(long)]
    history: bool,

    /// print the local top scores and exit
    #[clap(long)]
    leaderboard: bool,

    /// write the full score history to a CSV file and exit
    #[clap(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,

    /// delete your recorded scores and exit
    #[clap(long)]
    reset_scores: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(d) = self.duration {
            config.session.session_duration_secs = d;
        }
        if let Some(t) = self.targets {
            config.session.active_target_count = t;
        }
        if let Some(r) = self.radius {
            config.session.target_radius = r;
        }
        if let Some(c) = self.cell_size {
            config.session.grid_cell_size = c;
        }
        if let Some(ref p) = self.player {
            config.player = p.clone();
        }
        config.session = config.session.validate();
        config
    }

    fn is_report_mode(&self) -> bool {
        self.history || self.leaderboard || self.export_csv.is_some() || self.reset_scores
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Arena,
    Results,
    History,
}

pub struct App {
    pub config: Config,
    pub session: Session<StoreReporter>,
    pub state: AppState,
    pub celebration: Celebration,
    pub history: HistoryData,
}

impl App {
    pub fn new(config: Config, store: Option<ScoreDb>) -> Self {
        let reporter = StoreReporter::new(store, config.player.clone());
        let mut session = Session::new(config.session, reporter);
        let best = session.reporter().personal_best();
        session.set_previous_best(best);

        Self {
            config,
            session,
            state: AppState::Arena,
            celebration: Celebration::new(),
            history: HistoryData::default(),
        }
    }

    /// Read the current best, then begin a countdown
    pub fn start(&mut self, now: Instant) {
        let best = self.session.reporter().personal_best();
        self.session.set_previous_best(best);
        if self.session.start_session(now) {
            self.celebration.stop();
            self.state = AppState::Arena;
        }
    }

    /// Move to the results screen once the session has closed
    fn after_update(&mut self, size: Rect) {
        if self.state == AppState::Arena && self.session.state() == SessionState::Finished {
            self.state = AppState::Results;
            if matches!(self.session.reporter().last(), Some((_, true))) {
                self.celebration.start(size.width, size.height);
            }
        }
        self.celebration.update();
    }

    /// Switch to the history screen, reading the store once for the visit
    fn show_history(&mut self) {
        self.history = HistoryData::load(self.session.reporter());
        self.state = AppState::History;
    }

    fn share(&self) {
        if let Some(snapshot) = self.session.snapshot() {
            if Browser::is_available() {
                let url = format!(
                    "https://twitter.com/intent/tweet?text={}%20pts%20%2F%20{:.0}%25%20acc%20in%20{}s%20on%20flick",
                    snapshot.score, snapshot.accuracy, snapshot.duration_secs
                );
                if let Err(e) = webbrowser::open(&url) {
                    tracing::warn!(error = %e, "could not open browser");
                }
            }
        }
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    if cli.is_report_mode() {
        return run_report(&cli, &config);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let db = match ScoreDb::new() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!(error = %e, "score history unavailable");
            None
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, db);
    let result = start_tui(&mut terminal, &mut app);
    app.session.teardown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::frame_rate());

    loop {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {
                app.session.pump(Instant::now());
            }
            AppEvent::Pointer { column, row } => {
                if app.state == AppState::Arena {
                    let viewport = ui::playfield_viewport(area, app.session.config());
                    if let Some(p) = viewport.to_playfield(column, row) {
                        app.session.pointer_down(Instant::now(), p.x, p.y);
                    }
                }
            }
            AppEvent::Key(key) => {
                if is_quit(&key) {
                    break;
                }
                handle_key(app, key);
            }
        }

        app.after_update(area);
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match (app.state, key.code) {
        (_, KeyCode::Char(' ') | KeyCode::Enter) => {
            app.start(Instant::now());
        }
        (AppState::Results, KeyCode::Char('s')) => app.share(),
        (AppState::Results, KeyCode::Char('h')) => app.show_history(),
        (AppState::Arena, KeyCode::Char('h'))
            if app.session.state() == SessionState::Ready =>
        {
            app.show_history();
        }
        (AppState::History, KeyCode::Char('b') | KeyCode::Backspace) => {
            app.state = if app.session.state() == SessionState::Finished {
                AppState::Results
            } else {
                AppState::Arena
            };
        }
        _ => {}
    }
}

fn run_report(cli: &Cli, config: &Config) -> Result<(), Box<dyn Error>> {
    let db = ScoreDb::new()?;

    if cli.reset_scores {
        let removed = db.reset_scores(&config.player)?;
        println!("removed {removed} scores for {}", config.player);
    }

    if let Some(ref path) = cli.export_csv {
        let rows = db.export_csv(path)?;
        println!("exported {rows} scores to {}", path.display());
    }

    if cli.leaderboard {
        println!("{:>4}  {:<16} {:>6} {:>8}", "rank", "player", "score", "acc");
        for entry in db.leaderboard(LEADERBOARD_SIZE)? {
            println!(
                "{:>4}  {:<16} {:>6} {:>7.1}%",
                entry.rank, entry.player, entry.score, entry.accuracy
            );
        }
    }

    if cli.history {
        let history = db.history(&config.player, 20)?;
        println!(
            "{:<20} {:>6} {:>5} {:>6} {:>8}",
            "date", "score", "hits", "clicks", "acc"
        );
        for record in &history {
            println!(
                "{:<20} {:>6} {:>5} {:>6} {:>7.1}%",
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.score,
                record.hits,
                record.clicks,
                record.accuracy
            );
        }
        let scores: Vec<i64> = history.iter().map(|r| r.score).collect();
        if let Some(summary) = summarize_scores(&scores) {
            println!(
                "best {} / mean {:.1} / sd {:.1} over {} sessions",
                summary.best, summary.mean, summary.std_dev, summary.sessions
            );
        }
    }

    Ok(())
}
