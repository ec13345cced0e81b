mod clock;
mod config;
mod engine;
mod session;

pub use clock::{ClockDriver, DEFAULT_TICK};
pub use config::{SettingsField, TimerSettings, WorkoutConfig, TIMER_SETTINGS_KEY};
pub use engine::{tick, Phase, WorkoutEngine, WorkoutState, CUE_WINDOW};
pub use session::{NullPresenter, Presenter, SessionOutcome, WorkoutSession};
