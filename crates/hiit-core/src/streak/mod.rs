mod ledger;

pub use ledger::{calendar_date, days_between, StreakLedger, StreakRecord, STREAK_KEY};
