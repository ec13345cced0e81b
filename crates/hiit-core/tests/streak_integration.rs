//! Integration tests for the streak ledger over SQLite.
//!
//! Walks the documented multi-day scenario end to end, including a reopen of
//! the database file between days.

use chrono::NaiveDate;
use hiit_core::storage::KvStore;
use hiit_core::streak::STREAK_KEY;
use hiit_core::{Database, StreakLedger, StreakRecord};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_multi_day_streak_scenario() {
    let db = Database::open_memory().unwrap();
    let ledger = StreakLedger::new(&db);

    let rec = ledger.record_workout_on(date("2024-01-01")).unwrap();
    assert_eq!((rec.current_streak, rec.best_streak, rec.total_workouts), (1, 1, 1));

    let rec = ledger.record_workout_on(date("2024-01-02")).unwrap();
    assert_eq!((rec.current_streak, rec.best_streak, rec.total_workouts), (2, 2, 2));

    // Same day again: streak unchanged, total incremented.
    let rec = ledger.record_workout_on(date("2024-01-02")).unwrap();
    assert_eq!((rec.current_streak, rec.best_streak, rec.total_workouts), (2, 2, 3));

    // Three-day gap breaks the streak.
    let rec = ledger.record_workout_on(date("2024-01-05")).unwrap();
    assert_eq!((rec.current_streak, rec.best_streak, rec.total_workouts), (1, 2, 4));
    assert_eq!(rec.last_workout_date, Some(date("2024-01-05")));

    assert_eq!(ledger.load(), rec);
}

#[test]
fn test_streak_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hiit.db");

    {
        let db = Database::open_at(&path).unwrap();
        StreakLedger::new(&db)
            .record_workout_on(date("2024-06-10"))
            .unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let ledger = StreakLedger::new(&db);
    assert!(ledger.load().at_risk(date("2024-06-11")));
    let rec = ledger.record_workout_on(date("2024-06-11")).unwrap();
    assert_eq!(rec.current_streak, 2);
}

#[test]
fn test_corrupt_record_is_replaced_on_next_workout() {
    let db = Database::open_memory().unwrap();
    db.set(STREAK_KEY, "not json at all").unwrap();

    let ledger = StreakLedger::new(&db);
    assert_eq!(ledger.load(), StreakRecord::default());

    let rec = ledger.record_workout_on(date("2024-01-01")).unwrap();
    assert_eq!(rec.current_streak, 1);
    assert_eq!(rec.total_workouts, 1);
}

#[test]
fn test_best_streak_never_below_current() {
    let db = Database::open_memory().unwrap();
    let ledger = StreakLedger::new(&db);
    let mut day = date("2024-02-27");
    for offset in [0, 1, 1, 1, 5, 1, 0, 1, 3] {
        day = day + chrono::Duration::days(offset);
        let rec = ledger.record_workout_on(day).unwrap();
        assert!(rec.best_streak >= rec.current_streak);
    }
    let rec = ledger.load();
    assert_eq!(rec.total_workouts, 9);
    assert_eq!(rec.best_streak, 4);
}
