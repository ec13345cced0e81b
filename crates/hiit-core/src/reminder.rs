//! Daily reminder bookkeeping.
//!
//! Delivering notifications is left to the host. This module keeps the
//! enabled flag, the date of the last completed workout and the time the
//! next reminder is due, and answers whether a reminder should fire today.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::StorageError;
use crate::storage::KvStore;

pub const REMINDERS_ENABLED_KEY: &str = "hiit-reminders-enabled";
pub const LAST_COMPLETION_KEY: &str = "hiit-last-completion";
pub const NEXT_REMINDER_KEY: &str = "hiit-next-reminder";

/// Delay between a completed workout and the next reminder.
pub const REMINDER_DELAY_HOURS: i64 = 24;

/// Consumer of "workout completed" notifications.
pub trait ReminderHook {
    fn on_workout_completed(&self, now: DateTime<Utc>, today: NaiveDate);
}

/// Reminder state kept in a [`KvStore`].
pub struct ReminderState<S> {
    store: S,
}

impl<S: KvStore> ReminderState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.store.get(REMINDERS_ENABLED_KEY), Ok(Some(v)) if v == "true")
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.store
            .set(REMINDERS_ENABLED_KEY, if enabled { "true" } else { "false" })
    }

    pub fn last_completion(&self) -> Option<NaiveDate> {
        self.read_parsed(LAST_COMPLETION_KEY, |v| v.parse().ok())
    }

    pub fn next_reminder(&self) -> Option<DateTime<Utc>> {
        self.read_parsed(NEXT_REMINDER_KEY, |v| {
            DateTime::parse_from_rfc3339(v)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        })
    }

    /// Enabled, and nothing completed on `today` yet.
    pub fn should_remind(&self, today: NaiveDate) -> bool {
        self.is_enabled() && self.last_completion() != Some(today)
    }

    /// Store the completion and push the next reminder out by a day.
    pub fn mark_completed(&self, now: DateTime<Utc>, today: NaiveDate) -> Result<(), StorageError> {
        self.store
            .set(LAST_COMPLETION_KEY, &today.format("%Y-%m-%d").to_string())?;
        let next = now + Duration::hours(REMINDER_DELAY_HOURS);
        self.store.set(NEXT_REMINDER_KEY, &next.to_rfc3339())?;
        Ok(())
    }

    fn read_parsed<T>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        match self.store.get(key) {
            Ok(Some(v)) => parse(&v),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "reminder state unreadable");
                None
            }
        }
    }
}

impl<S: KvStore> ReminderHook for ReminderState<S> {
    fn on_workout_completed(&self, now: DateTime<Utc>, today: NaiveDate) {
        if let Err(e) = self.mark_completed(now, today) {
            tracing::warn!(error = %e, "failed to record completion for reminders");
        }
    }
}
