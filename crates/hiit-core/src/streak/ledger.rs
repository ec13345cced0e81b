//! Consecutive-day workout streak derived from one persisted record.
//!
//! All day arithmetic is on calendar dates: both sides are reduced to a
//! date key before differencing, so the time of day never matters.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::StreakWriteError;
use crate::storage::KvStore;

/// Storage key for the streak record.
pub const STREAK_KEY: &str = "hiit-workout-streak";

/// Persisted as `{currentStreak, lastWorkoutDate, bestStreak, totalWorkouts}`
/// with the date as `YYYY-MM-DD` or null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    pub current_streak: u32,
    pub last_workout_date: Option<NaiveDate>,
    pub best_streak: u32,
    pub total_workouts: u32,
}

/// Signed calendar-day difference `to - from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Calendar date of `now` in its own time zone.
pub fn calendar_date<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.date_naive()
}

impl StreakRecord {
    /// Record after one more completed workout on `today`.
    pub fn advance(&self, today: NaiveDate) -> StreakRecord {
        let current_streak = match self.last_workout_date {
            None => 1,
            Some(last) => match days_between(last, today) {
                1 => self.current_streak.saturating_add(1),
                gap if gap > 1 => 1,
                // Same day, or a clock set back: leave the streak alone.
                _ => self.current_streak,
            },
        };
        StreakRecord {
            current_streak,
            last_workout_date: Some(today),
            best_streak: current_streak.max(self.best_streak),
            total_workouts: self.total_workouts.saturating_add(1),
        }
    }

    /// Last workout was yesterday and none yet today.
    pub fn at_risk(&self, today: NaiveDate) -> bool {
        self.last_workout_date
            .map(|last| days_between(last, today) == 1)
            .unwrap_or(false)
    }

    /// Restore `best_streak >= current_streak` on a record read from storage.
    pub fn normalized(self) -> StreakRecord {
        StreakRecord {
            best_streak: self.best_streak.max(self.current_streak),
            ..self
        }
    }

    pub fn worked_out_on(&self, day: NaiveDate) -> bool {
        self.last_workout_date == Some(day)
    }

    /// Hint shown next to the streak summary.
    pub fn encouragement(&self) -> Option<String> {
        if self.current_streak > 0 {
            Some(format!(
                "Keep it up! You're on a {} day streak. Don't break the chain!",
                self.current_streak
            ))
        } else if self.total_workouts > 0 {
            Some("Start a new streak! Complete a workout today to begin a new streak.".into())
        } else {
            None
        }
    }
}

/// Reads and writes the single [`StreakRecord`] through a [`KvStore`].
pub struct StreakLedger<S> {
    store: S,
}

impl<S: KvStore> StreakLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persisted record, or the zero record when absent, unreadable or corrupt.
    ///
    /// A record whose best streak is below its current streak is raised to
    /// match.
    pub fn load(&self) -> StreakRecord {
        match self.store.get(STREAK_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<StreakRecord>(&json) {
                Ok(record) => {
                    let fixed = record.normalized();
                    if fixed != record {
                        tracing::warn!(
                            current = record.current_streak,
                            best = record.best_streak,
                            "best streak below current streak, raising it"
                        );
                    }
                    fixed
                }
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt streak record, starting from zero");
                    StreakRecord::default()
                }
            },
            Ok(None) => StreakRecord::default(),
            Err(e) => {
                tracing::warn!(error = %e, "streak record unreadable, starting from zero");
                StreakRecord::default()
            }
        }
    }

    /// Count one completed workout at `now`. Call exactly once per session.
    ///
    /// # Errors
    ///
    /// Returns [`StreakWriteError`] carrying the computed record when it
    /// could not be persisted.
    pub fn record_workout<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<StreakRecord, StreakWriteError> {
        self.record_workout_on(calendar_date(now))
    }

    pub fn record_workout_on(&self, today: NaiveDate) -> Result<StreakRecord, StreakWriteError> {
        let prev = self.load();
        let record = prev.advance(today);
        self.persist(&record)
            .map_err(|source| StreakWriteError { record, source })?;
        tracing::info!(
            current = record.current_streak,
            best = record.best_streak,
            total = record.total_workouts,
            "streak updated"
        );
        Ok(record)
    }

    pub fn check_streak_risk<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.load().at_risk(calendar_date(now))
    }

    fn persist(&self, record: &StreakRecord) -> Result<(), crate::error::StorageError> {
        let json = serde_json::to_string(record).map_err(|e| crate::error::StorageError::Write {
            key: STREAK_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(STREAK_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Local, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn first_workout_starts_streak() {
        let rec = StreakRecord::default().advance(date("2024-01-01"));
        assert_eq!(rec.current_streak, 1);
        assert_eq!(rec.best_streak, 1);
        assert_eq!(rec.total_workouts, 1);
        assert_eq!(rec.last_workout_date, Some(date("2024-01-01")));
    }

    #[test]
    fn next_day_extends_streak() {
        let rec = StreakRecord::default()
            .advance(date("2024-01-31"))
            .advance(date("2024-02-01"));
        assert_eq!(rec.current_streak, 2);
        assert_eq!(rec.best_streak, 2);
    }

    #[test]
    fn same_day_keeps_streak_but_counts_workout() {
        let rec = StreakRecord::default()
            .advance(date("2024-01-01"))
            .advance(date("2024-01-01"));
        assert_eq!(rec.current_streak, 1);
        assert_eq!(rec.total_workouts, 2);
    }

    #[test]
    fn gap_breaks_streak_but_keeps_best() {
        let rec = StreakRecord {
            current_streak: 4,
            last_workout_date: Some(date("2024-03-01")),
            best_streak: 4,
            total_workouts: 9,
        }
        .advance(date("2024-03-03"));
        assert_eq!(rec.current_streak, 1);
        assert_eq!(rec.best_streak, 4);
        assert_eq!(rec.total_workouts, 10);
    }

    #[test]
    fn earlier_date_is_treated_as_same_day() {
        let rec = StreakRecord {
            current_streak: 3,
            last_workout_date: Some(date("2024-05-10")),
            best_streak: 5,
            total_workouts: 7,
        }
        .advance(date("2024-05-08"));
        assert_eq!(rec.current_streak, 3);
        assert_eq!(rec.best_streak, 5);
        assert_eq!(rec.total_workouts, 8);
        assert_eq!(rec.last_workout_date, Some(date("2024-05-08")));
    }

    #[test]
    fn day_gap_ignores_time_of_day() {
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 0, 1, 0).unwrap();
        assert_eq!(days_between(calendar_date(&late), calendar_date(&early)), 1);
    }

    #[test]
    fn risk_only_when_last_workout_was_yesterday() {
        let rec = StreakRecord::default().advance(date("2024-01-01"));
        assert!(!rec.at_risk(date("2024-01-01")));
        assert!(rec.at_risk(date("2024-01-02")));
        assert!(!rec.at_risk(date("2024-01-03")));
        assert!(!StreakRecord::default().at_risk(date("2024-01-02")));
    }

    #[test]
    fn load_defaults_on_missing_and_corrupt() {
        let store = MemoryStore::new();
        let ledger = StreakLedger::new(&store);
        assert_eq!(ledger.load(), StreakRecord::default());
        store.set(STREAK_KEY, "][").unwrap();
        assert_eq!(ledger.load(), StreakRecord::default());
    }

    #[test]
    fn counters_saturate_at_max() {
        let rec = StreakRecord {
            current_streak: u32::MAX,
            last_workout_date: Some(date("2024-01-01")),
            best_streak: u32::MAX,
            total_workouts: u32::MAX,
        };
        let next_day = rec.advance(date("2024-01-02"));
        assert_eq!(next_day.current_streak, u32::MAX);
        assert_eq!(next_day.best_streak, u32::MAX);
        assert_eq!(next_day.total_workouts, u32::MAX);
        assert_eq!(rec.advance(date("2024-01-01")).total_workouts, u32::MAX);
    }

    #[test]
    fn record_on_stored_max_total_does_not_wrap() {
        let store = MemoryStore::new();
        store
            .set(
                STREAK_KEY,
                r#"{"currentStreak":1,"lastWorkoutDate":"2024-01-01","bestStreak":1,"totalWorkouts":4294967295}"#,
            )
            .unwrap();
        let ledger = StreakLedger::new(&store);
        let rec = ledger.record_workout_on(date("2024-01-01")).unwrap();
        assert_eq!(rec.total_workouts, u32::MAX);
        assert_eq!(ledger.load().total_workouts, u32::MAX);
    }

    #[test]
    fn load_raises_best_to_current() {
        let store = MemoryStore::new();
        store
            .set(
                STREAK_KEY,
                r#"{"currentStreak":9,"lastWorkoutDate":"2024-01-01","bestStreak":2,"totalWorkouts":3}"#,
            )
            .unwrap();
        let ledger = StreakLedger::new(&store);
        let rec = ledger.load();
        assert_eq!(rec.current_streak, 9);
        assert_eq!(rec.best_streak, 9);
        assert_eq!(rec.total_workouts, 3);
        assert_eq!(rec.last_workout_date, Some(date("2024-01-01")));
        assert!(ledger.check_streak_risk(&Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()));
    }

    #[test]
    fn normalized_leaves_valid_record_alone() {
        let rec = StreakRecord {
            current_streak: 2,
            last_workout_date: Some(date("2024-01-01")),
            best_streak: 5,
            total_workouts: 8,
        };
        assert_eq!(rec.normalized(), rec);
    }

    #[test]
    fn record_persists_wire_format() {
        let store = MemoryStore::new();
        let ledger = StreakLedger::new(&store);
        ledger.record_workout_on(date("2024-01-01")).unwrap();
        let raw = store.get(STREAK_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["currentStreak"], 1);
        assert_eq!(json["bestStreak"], 1);
        assert_eq!(json["totalWorkouts"], 1);
        assert_eq!(json["lastWorkoutDate"], "2024-01-01");
    }

    #[test]
    fn reads_record_with_null_date() {
        let store = MemoryStore::new();
        store
            .set(
                STREAK_KEY,
                r#"{"currentStreak":0,"lastWorkoutDate":null,"bestStreak":0,"totalWorkouts":0}"#,
            )
            .unwrap();
        let ledger = StreakLedger::new(&store);
        assert_eq!(ledger.load(), StreakRecord::default());
    }

    #[test]
    fn write_failure_returns_computed_record() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let ledger = StreakLedger::new(&store);
        let err = ledger.record_workout_on(date("2024-01-01")).unwrap_err();
        assert_eq!(err.record.current_streak, 1);
        assert_eq!(ledger.load(), StreakRecord::default());
    }

    #[test]
    fn record_workout_uses_calendar_date_of_now() {
        let store = MemoryStore::new();
        let ledger = StreakLedger::new(&store);
        let now = Local::now();
        let rec = ledger.record_workout(&now).unwrap();
        assert_eq!(rec.last_workout_date, Some(now.date_naive()));
        assert!(!ledger.check_streak_risk(&now));
    }

    #[test]
    fn encouragement_messages() {
        assert!(StreakRecord::default().encouragement().is_none());
        let broken = StreakRecord {
            current_streak: 0,
            total_workouts: 3,
            ..Default::default()
        };
        assert!(broken.encouragement().unwrap().starts_with("Start a new streak"));
        let active = StreakRecord::default().advance(date("2024-01-01"));
        assert!(active.encouragement().unwrap().contains("1 day streak"));
    }
}
