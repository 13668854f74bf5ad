use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::results::SessionSnapshot;

/// Game type recorded for aim-training sessions
pub const AIM_GAME: &str = "aim";

/// Default number of rows on the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("bad timestamp in score history: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One submitted session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub player: String,
    pub game_type: String,
    pub score: i64,
    pub hits: u32,
    pub clicks: u32,
    pub accuracy: f64,
    pub duration_secs: f64,
    pub created_at: DateTime<Local>,
}

impl ScoreRecord {
    pub fn from_snapshot(player: &str, snapshot: &SessionSnapshot) -> Self {
        Self {
            player: player.to_string(),
            game_type: AIM_GAME.to_string(),
            score: snapshot.score,
            hits: snapshot.hits,
            clicks: snapshot.clicks,
            accuracy: snapshot.accuracy,
            duration_secs: snapshot.duration_secs,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player: String,
    pub score: i64,
    pub accuracy: f64,
    pub created_at: DateTime<Local>,
}

/// Local score history backed by SQLite
#[derive(Debug)]
pub struct ScoreDb {
    conn: Connection,
}

impl ScoreDb {
    /// Open the default database under the state directory
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("flick_scores.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player TEXT NOT NULL,
                game_type TEXT NOT NULL,
                score INTEGER NOT NULL,
                hits INTEGER NOT NULL,
                clicks INTEGER NOT NULL,
                accuracy REAL NOT NULL,
                duration_secs REAL NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        // leaderboard order: best score first, newest first on ties.
        // Insertion order (id) is the recency key; local-offset timestamps
        // don't sort as text across a DST change.
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_rank ON scores(game_type, score DESC, id DESC)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scores_player ON scores(player, game_type)",
            [],
        )?;

        Ok(ScoreDb { conn })
    }

    pub fn record_score(&self, record: &ScoreRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO scores
            (player, game_type, score, hits, clicks, accuracy, duration_secs, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.player,
                record.game_type,
                record.score,
                record.hits,
                record.clicks,
                record.accuracy,
                record.duration_secs,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    pub fn record_snapshot(&self, player: &str, snapshot: &SessionSnapshot) -> Result<ScoreRecord> {
        let record = ScoreRecord::from_snapshot(player, snapshot);
        self.record_score(&record)?;
        Ok(record)
    }

    /// Highest aim score this player has submitted, if any
    pub fn personal_best(&self, player: &str) -> Result<Option<i64>> {
        let best = self.conn.query_row(
            "SELECT MAX(score) FROM scores WHERE player = ?1 AND game_type = ?2",
            params![player, AIM_GAME],
            |row| row.get(0),
        )?;
        Ok(best)
    }

    /// Top scores across all players, ranked from 1
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, score, accuracy, created_at
            FROM scores
            WHERE game_type = ?1
            ORDER BY score DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![AIM_GAME, limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for (idx, row) in rows.enumerate() {
            let (player, score, accuracy, created_at) = row?;
            entries.push(LeaderboardEntry {
                rank: idx + 1,
                player,
                score,
                accuracy,
                created_at: parse_timestamp(&created_at)?,
            });
        }

        Ok(entries)
    }

    /// A player's sessions, newest first
    pub fn history(&self, player: &str, limit: usize) -> Result<Vec<ScoreRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, game_type, score, hits, clicks, accuracy, duration_secs, created_at
            FROM scores
            WHERE player = ?1 AND game_type = ?2
            ORDER BY id DESC
            LIMIT ?3
            "#,
        )?;

        let rows = stmt.query_map(params![player, AIM_GAME, limit as i64], raw_record)?;
        collect_records(rows)
    }

    /// Every stored session, oldest first
    pub fn all_scores(&self) -> Result<Vec<ScoreRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, game_type, score, hits, clicks, accuracy, duration_secs, created_at
            FROM scores
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map([], raw_record)?;
        collect_records(rows)
    }

    /// Drop a player's aim history. Returns the number of rows removed.
    pub fn reset_scores(&self, player: &str) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM scores WHERE player = ?1 AND game_type = ?2",
            params![player, AIM_GAME],
        )?;
        Ok(removed)
    }

    /// Write the full history as CSV. Returns the number of rows written.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let records = self.all_scores()?;
        let mut writer = csv::Writer::from_path(path)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(records.len())
    }

    /// Get the database file path being used by default
    pub fn database_path() -> Option<PathBuf> {
        AppDirs::db_path()
    }
}

type RawRecord = (String, String, i64, u32, u32, f64, f64, String);

fn raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn collect_records<I>(rows: I) -> Result<Vec<ScoreRecord>>
where
    I: Iterator<Item = rusqlite::Result<RawRecord>>,
{
    let mut records = Vec::new();
    for row in rows {
        let (player, game_type, score, hits, clicks, accuracy, duration_secs, created_at) = row?;
        records.push(ScoreRecord {
            player,
            game_type,
            score,
            hits,
            clicks,
            accuracy,
            duration_secs,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(records)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Local>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Local))
}
