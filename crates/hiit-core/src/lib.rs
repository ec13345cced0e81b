//! # HIIT Timer Core Library
//!
//! Business logic for an interval-workout timer: the phase state machine
//! that walks an athlete through rounds of timed exercises, and the streak
//! ledger that counts consecutive workout days. The `hiit` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Workout Engine**: a pure `tick(state, config) -> (state, cues)`
//!   reducer wrapped by [`WorkoutEngine`]; the caller owns the clock
//! - **Clock Driver**: a tokio interval that yields one tick per second
//! - **Streak Ledger**: calendar-day streak arithmetic over one persisted record
//! - **Storage**: an injected key-value capability ([`KvStore`]) backed by
//!   SQLite or memory, plus TOML application config
//!
//! ## Key Components
//!
//! - [`WorkoutEngine`]: phase state machine
//! - [`WorkoutSession`]: clock + engine + ledger glue
//! - [`StreakLedger`]: streak persistence
//! - [`Database`]: SQLite key-value store
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod reminder;
pub mod storage;
pub mod streak;
pub mod workout;

pub use error::{ConfigurationError, StorageError, StreakWriteError};
pub use events::{Cue, Event};
pub use reminder::{ReminderHook, ReminderState};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use streak::{StreakLedger, StreakRecord};
pub use workout::{
    ClockDriver, NullPresenter, Phase, Presenter, SessionOutcome, SettingsField, TimerSettings,
    WorkoutConfig, WorkoutEngine, WorkoutSession, WorkoutState,
};
