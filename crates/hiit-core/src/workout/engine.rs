//! Workout phase state machine.
//!
//! The engine has no clock of its own: the caller invokes `tick()` once per
//! second (see [`super::ClockDriver`]) and acts on the returned cues.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -(start)-> Prepare -> Exercise -> [Rest ->] Prepare -> ...
//!                            Exercise (last of round, more rounds) -> RoundRest -> Prepare
//!                            Exercise (last of last round) -> Completed
//! any -(reset)-> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = WorkoutEngine::default();
//! engine.start(config)?;
//! // Once per second:
//! for cue in engine.tick() { /* beep, flash, record streak */ }
//! ```

use std::ops::RangeInclusive;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::WorkoutConfig;
use crate::error::ConfigurationError;
use crate::events::{Cue, Event};

/// Post-decrement seconds during Exercise that trigger a countdown beep.
///
/// 0 and 1 are left out so the beep never collides with the final beep.
pub const CUE_WINDOW: RangeInclusive<u32> = 2..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Prepare,
    Exercise,
    Rest,
    RoundRest,
    Completed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Prepare => "Get Ready!",
            Phase::Exercise => "Work!",
            Phase::Rest => "Rest",
            Phase::RoundRest => "Round Rest",
            Phase::Completed => "Workout Complete!",
        }
    }
}

/// Mutable session state, owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutState {
    pub phase: Phase,
    /// Countdown for the current phase only.
    pub time_left: u32,
    pub exercise_index: usize,
    /// 1-based.
    pub round: u32,
}

impl WorkoutState {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            time_left: 0,
            exercise_index: 0,
            round: 1,
        }
    }

    pub fn started(config: &WorkoutConfig) -> Self {
        Self {
            phase: Phase::Prepare,
            time_left: config.prepare_seconds,
            exercise_index: 0,
            round: 1,
        }
    }

    /// True while ticks should still be delivered.
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Completed)
    }
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Advance `state` by one second.
///
/// Pure: returns the next state and the cues it produced. Idle and
/// Completed are no-ops.
pub fn tick(state: &WorkoutState, config: &WorkoutConfig) -> (WorkoutState, Vec<Cue>) {
    let mut next = state.clone();
    let mut cues = Vec::new();

    if !state.is_running() {
        return (next, cues);
    }

    if state.time_left > 0 {
        next.time_left -= 1;
        if state.phase == Phase::Exercise && CUE_WINDOW.contains(&next.time_left) {
            cues.push(Cue::CountdownBeep);
        }
        return (next, cues);
    }

    match state.phase {
        Phase::Prepare => {
            next.phase = Phase::Exercise;
            next.time_left = config.exercise_seconds;
            cues.push(Cue::CountdownBeep);
        }
        Phase::Exercise => {
            cues.push(Cue::FinalBeep);
            if state.exercise_index >= config.last_exercise_index() {
                if state.round < config.total_rounds {
                    next.phase = Phase::RoundRest;
                    next.time_left = config.round_rest_seconds;
                    next.round += 1;
                    next.exercise_index = 0;
                } else {
                    next.phase = Phase::Completed;
                    next.time_left = 0;
                    cues.push(Cue::WorkoutCompleted);
                }
            } else {
                next.exercise_index += 1;
                if config.rest_seconds > 0 {
                    next.phase = Phase::Rest;
                    next.time_left = config.rest_seconds;
                } else {
                    next.phase = Phase::Prepare;
                    next.time_left = config.prepare_seconds;
                }
            }
        }
        Phase::Rest | Phase::RoundRest => {
            next.phase = Phase::Prepare;
            next.time_left = config.prepare_seconds;
        }
        Phase::Idle | Phase::Completed => {}
    }

    tracing::debug!(
        from = ?state.phase,
        to = ?next.phase,
        round = next.round,
        exercise_index = next.exercise_index,
        time_left = next.time_left,
        "phase transition"
    );
    (next, cues)
}

/// Core workout engine.
///
/// Holds the config of the current session and its state. The caller owns
/// the clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutEngine {
    config: WorkoutConfig,
    state: WorkoutState,
}

impl WorkoutEngine {
    /// Create an idle engine that will use `config` on `restart()`.
    pub fn new(config: WorkoutConfig) -> Self {
        Self {
            config,
            state: WorkoutState::idle(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left
    }

    pub fn exercise_index(&self) -> usize {
        self.state.exercise_index
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn current_exercise(&self) -> Option<&str> {
        self.config
            .exercises
            .get(self.state.exercise_index)
            .map(String::as_str)
    }

    /// The current exercise followed by up to `n - 1` later ones in this round.
    pub fn upcoming(&self, n: usize) -> &[String] {
        let start = self.state.exercise_index.min(self.config.exercises.len());
        let end = (start + n).min(self.config.exercises.len());
        &self.config.exercises[start..end]
    }

    /// Full length of the current phase.
    pub fn phase_duration(&self) -> u32 {
        match self.state.phase {
            Phase::Prepare => self.config.prepare_seconds,
            Phase::Exercise => self.config.exercise_seconds,
            Phase::Rest => self.config.rest_seconds,
            Phase::RoundRest => self.config.round_rest_seconds,
            Phase::Idle | Phase::Completed => 0,
        }
    }

    /// 1.0 .. 0.0 fraction of the current phase still to go.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_duration();
        if total == 0 {
            return 0.0;
        }
        (self.state.time_left as f64 / total as f64).min(1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            round: self.state.round,
            total_rounds: self.config.total_rounds,
            exercise_index: self.state.exercise_index,
            exercise: self.current_exercise().unwrap_or_default().to_string(),
            time_left: self.state.time_left,
            phase_duration: self.phase_duration(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session from round 1, exercise 0, Prepare.
    ///
    /// # Errors
    ///
    /// Returns the configuration error unchanged; the engine is left as it was.
    pub fn start(&mut self, config: WorkoutConfig) -> Result<Event, ConfigurationError> {
        config.validate()?;
        self.config = config;
        Ok(self.begin())
    }

    /// Start again with the config of the previous session.
    pub fn restart(&mut self) -> Result<Event, ConfigurationError> {
        self.config.validate()?;
        Ok(self.begin())
    }

    /// Abort from any phase.
    pub fn reset(&mut self) -> Event {
        tracing::info!(phase = ?self.state.phase, "workout reset");
        self.state = WorkoutState::idle();
        Event::WorkoutReset { at: Utc::now() }
    }

    /// Advance one second. See [`tick`].
    pub fn tick(&mut self) -> Vec<Cue> {
        let (next, cues) = tick(&self.state, &self.config);
        self.state = next;
        cues
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self) -> Event {
        self.state = WorkoutState::started(&self.config);
        tracing::info!(
            rounds = self.config.total_rounds,
            exercises = self.config.exercises.len(),
            "workout started"
        );
        Event::WorkoutStarted {
            total_rounds: self.config.total_rounds,
            exercise_count: self.config.exercises.len(),
            at: Utc::now(),
        }
    }
}
