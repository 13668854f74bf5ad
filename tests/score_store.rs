use chrono::{Duration, Local};
use tempfile::tempdir;

use flick::reporter::{PersonalBestSource, SessionReporter, StoreReporter};
use flick::results::SessionSnapshot;
use flick::score_store::{ScoreDb, ScoreRecord, AIM_GAME, LEADERBOARD_SIZE};

fn snapshot(score: i64, hits: u32, clicks: u32) -> SessionSnapshot {
    SessionSnapshot {
        score,
        hits,
        clicks,
        accuracy: flick::results::accuracy(hits, clicks),
        duration_secs: 30.0,
    }
}

#[test]
fn scores_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("scores.db");

    {
        let db = ScoreDb::open(&path).unwrap();
        db.record_snapshot("ace", &snapshot(12, 14, 16)).unwrap();
    }

    let db = ScoreDb::open(&path).unwrap();
    assert_eq!(db.personal_best("ace").unwrap(), Some(12));
    assert_eq!(db.history("ace", 10).unwrap().len(), 1);
}

#[test]
fn export_csv_writes_header_and_rows() {
    let dir = tempdir().unwrap();
    let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();
    db.record_snapshot("ace", &snapshot(3, 4, 5)).unwrap();
    db.record_snapshot("bob", &snapshot(-2, 0, 2)).unwrap();

    let out = dir.path().join("scores.csv");
    assert_eq!(db.export_csv(&out).unwrap(), 2);

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("player"));
    assert!(headers.iter().any(|h| h == "accuracy"));

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(0), Some("ace"));
    assert_eq!(rows[1].get(1), Some(AIM_GAME));
    assert_eq!(rows[1].get(2), Some("-2"));
}

#[test]
fn leaderboard_caps_at_ten_across_players() {
    let db = ScoreDb::open_in_memory().unwrap();
    let now = Local::now();
    for i in 0..12i64 {
        let player = if i % 2 == 0 { "ace" } else { "bob" };
        db.record_score(&ScoreRecord {
            player: player.to_string(),
            game_type: AIM_GAME.to_string(),
            score: i,
            hits: i as u32,
            clicks: i as u32,
            accuracy: 100.0,
            duration_secs: 30.0,
            created_at: now - Duration::minutes(i),
        })
        .unwrap();
    }

    let board = db.leaderboard(LEADERBOARD_SIZE).unwrap();
    assert_eq!(board.len(), LEADERBOARD_SIZE);
    assert_eq!(board.first().map(|e| (e.rank, e.score)), Some((1, 11)));
    assert_eq!(board.last().map(|e| (e.rank, e.score)), Some((10, 2)));
}

#[test]
fn store_reporter_submits_and_tracks_best() {
    let dir = tempdir().unwrap();
    let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();
    let mut reporter = StoreReporter::new(Some(db), "ace");

    assert_eq!(reporter.personal_best(), 0);

    reporter.on_session_finished(&snapshot(7, 8, 9), true);
    reporter.on_session_finished(&snapshot(-3, 0, 3), false);

    assert_eq!(reporter.personal_best(), 7);
    let store = reporter.store().unwrap();
    assert_eq!(store.history("ace", 10).unwrap().len(), 2);
}

#[test]
fn reset_scores_clears_personal_best() {
    let dir = tempdir().unwrap();
    let db = ScoreDb::open(dir.path().join("scores.db")).unwrap();
    db.record_snapshot("ace", &snapshot(20, 20, 20)).unwrap();

    assert_eq!(db.reset_scores("ace").unwrap(), 1);
    let reporter = StoreReporter::new(Some(db), "ace");
    assert_eq!(reporter.personal_best(), 0);
}
