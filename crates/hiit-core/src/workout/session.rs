//! Runs one workout: clock ticks in, cues and snapshots out, streak on completion.

use std::future::Future;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::clock::ClockDriver;
use super::config::WorkoutConfig;
use super::engine::WorkoutEngine;
use crate::error::ConfigurationError;
use crate::events::{Cue, Event};
use crate::reminder::ReminderHook;
use crate::storage::KvStore;
use crate::streak::{StreakLedger, StreakRecord};

/// Rendering and audio side of a session.
pub trait Presenter {
    /// Called after start and after every tick.
    fn render(&mut self, engine: &WorkoutEngine);
    fn cue(&mut self, cue: Cue);
    fn finished(&mut self, _outcome: &SessionOutcome) {}
}

/// Presenter that ignores everything.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _engine: &WorkoutEngine) {}
    fn cue(&mut self, _cue: Cue) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SessionOutcome {
    Completed {
        streak: StreakRecord,
        /// False when the streak could not be written.
        persisted: bool,
    },
    Aborted {
        round: u32,
        exercise_index: usize,
    },
}

impl SessionOutcome {
    pub fn to_event(&self) -> Option<Event> {
        match self {
            SessionOutcome::Completed { streak, persisted } => Some(Event::WorkoutFinished {
                streak: *streak,
                persisted: *persisted,
                at: Utc::now(),
            }),
            SessionOutcome::Aborted { .. } => None,
        }
    }
}

type NowFn = Box<dyn Fn() -> DateTime<Local> + Send>;

pub struct WorkoutSession<S, P> {
    engine: WorkoutEngine,
    clock: ClockDriver,
    ledger: StreakLedger<S>,
    reminders: Option<Box<dyn ReminderHook + Send>>,
    presenter: P,
    now: NowFn,
}

impl<S: KvStore, P: Presenter> WorkoutSession<S, P> {
    pub fn new(store: S, presenter: P) -> Self {
        Self {
            engine: WorkoutEngine::default(),
            clock: ClockDriver::default(),
            ledger: StreakLedger::new(store),
            reminders: None,
            presenter,
            now: Box::new(Local::now),
        }
    }

    pub fn with_reminders(mut self, hook: impl ReminderHook + Send + 'static) -> Self {
        self.reminders = Some(Box::new(hook));
        self
    }

    pub fn with_clock(mut self, clock: ClockDriver) -> Self {
        self.clock = clock;
        self
    }

    /// Source of "now" for the streak date.
    pub fn with_clock_source(mut self, now: impl Fn() -> DateTime<Local> + Send + 'static) -> Self {
        self.now = Box::new(now);
        self
    }

    pub fn engine(&self) -> &WorkoutEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &StreakLedger<S> {
        &self.ledger
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Abort the session. The clock is stopped before this returns.
    pub fn reset(&mut self) -> Event {
        self.clock.stop();
        self.engine.reset()
    }

    /// Run a whole session, or until `cancel` resolves.
    ///
    /// # Errors
    ///
    /// Returns the configuration error from `start`; nothing is ticked.
    pub async fn run_until<F>(
        &mut self,
        config: WorkoutConfig,
        cancel: F,
    ) -> Result<SessionOutcome, ConfigurationError>
    where
        F: Future<Output = ()>,
    {
        self.engine.start(config)?;
        self.clock.start();
        self.presenter.render(&self.engine);

        tokio::pin!(cancel);
        let outcome = loop {
            tokio::select! {
                biased;
                _ = &mut cancel => break self.abort(),
                tick = self.clock.next_tick() => {
                    if tick.is_none() {
                        break self.abort();
                    }
                    if let Some(outcome) = self.on_tick() {
                        break outcome;
                    }
                }
            }
        };
        self.presenter.finished(&outcome);
        Ok(outcome)
    }

    /// Run to completion.
    pub async fn run(&mut self, config: WorkoutConfig) -> Result<SessionOutcome, ConfigurationError> {
        self.run_until(config, std::future::pending()).await
    }

    fn on_tick(&mut self) -> Option<SessionOutcome> {
        let cues = self.engine.tick();
        let completed = cues.contains(&Cue::WorkoutCompleted);
        for cue in cues {
            self.presenter.cue(cue);
        }
        self.presenter.render(&self.engine);

        if completed {
            self.clock.stop();
            return Some(self.complete());
        }
        if !self.engine.is_running() {
            return Some(self.abort());
        }
        None
    }

    fn abort(&mut self) -> SessionOutcome {
        let outcome = SessionOutcome::Aborted {
            round: self.engine.round(),
            exercise_index: self.engine.exercise_index(),
        };
        self.reset();
        outcome
    }

    fn complete(&mut self) -> SessionOutcome {
        let now = (self.now)();
        match self.ledger.record_workout(&now) {
            Ok(streak) => {
                if let Some(hook) = &self.reminders {
                    hook.on_workout_completed(now.with_timezone(&Utc), now.date_naive());
                }
                SessionOutcome::Completed {
                    streak,
                    persisted: true,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "workout completed but the streak was not saved");
                SessionOutcome::Completed {
                    streak: e.record,
                    persisted: false,
                }
            }
        }
    }
}
