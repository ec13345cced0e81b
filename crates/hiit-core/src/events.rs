use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::StreakRecord;
use crate::workout::Phase;

/// Fire-and-forget signal returned by `tick()`.
///
/// The presentation layer maps these to sound, vibration and visual flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Cue {
    /// Short beep plus visual flash.
    CountdownBeep,
    /// Distinct end-of-exercise tone.
    FinalBeep,
    /// Last exercise of the last round finished.
    WorkoutCompleted,
}

/// Session-level notifications, serialized for the CLI and any other host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkoutStarted {
        total_rounds: u32,
        exercise_count: usize,
        at: DateTime<Utc>,
    },
    WorkoutReset {
        at: DateTime<Utc>,
    },
    WorkoutFinished {
        streak: StreakRecord,
        persisted: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        round: u32,
        total_rounds: u32,
        exercise_index: usize,
        exercise: String,
        time_left: u32,
        phase_duration: u32,
        at: DateTime<Utc>,
    },
}
