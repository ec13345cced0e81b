use std::io::Write;

use clap::Args;
use hiit_core::storage::CueConfig;
use hiit_core::{
    Config, Cue, Database, Phase, Presenter, ReminderState, SessionOutcome, TimerSettings,
    WorkoutConfig, WorkoutEngine, WorkoutSession,
};

#[derive(Args)]
pub struct RunArgs {
    /// Number of rounds (defaults to workout.rounds)
    #[arg(long)]
    rounds: Option<u32>,
    /// Prepare seconds for this session only
    #[arg(long)]
    prepare: Option<u32>,
    /// Exercise seconds for this session only
    #[arg(long)]
    exercise: Option<u32>,
    /// Rest seconds between exercises for this session only (0 = none)
    #[arg(long)]
    rest: Option<u32>,
    /// Rest seconds between rounds for this session only
    #[arg(long)]
    round_rest: Option<u32>,
}

/// Single-line terminal renderer. Writes to stderr so stdout carries only
/// the final JSON result.
struct TerminalPresenter {
    cues: CueConfig,
    flash: bool,
    write_failed: bool,
}

impl TerminalPresenter {
    fn new(cues: CueConfig) -> Self {
        Self {
            cues,
            flash: false,
            write_failed: false,
        }
    }

    /// Rendering is best effort; the first stderr failure is logged.
    fn note_write(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            if !std::mem::replace(&mut self.write_failed, true) {
                tracing::debug!(error = %e, "terminal render failed");
            }
        }
    }

    fn bell(&self, times: usize) {
        if self.cues.bell {
            eprint!("{}", "\x07".repeat(times));
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, engine: &WorkoutEngine) {
        let config = engine.config();
        let what = match engine.phase() {
            Phase::RoundRest => "Rest Between Rounds".to_string(),
            _ => engine.current_exercise().unwrap_or_default().to_string(),
        };
        let marker = if std::mem::take(&mut self.flash) { "!!" } else { "  " };
        let mut err = std::io::stderr();
        let written = write!(
            err,
            "\r\x1b[2KRound {}/{} | Exercise {}/{} | {:<22} | {:<12} {marker} {:02}",
            engine.round(),
            config.total_rounds,
            engine.exercise_index() + 1,
            config.exercises.len(),
            what,
            engine.phase().label(),
            engine.time_left(),
        )
        .and_then(|()| err.flush());
        self.note_write(written);
    }

    fn cue(&mut self, cue: Cue) {
        match cue {
            Cue::CountdownBeep => {
                self.flash = self.cues.flash;
                self.bell(1);
            }
            Cue::FinalBeep => self.bell(2),
            Cue::WorkoutCompleted => {}
        }
    }

    fn finished(&mut self, outcome: &SessionOutcome) {
        eprintln!();
        match outcome {
            SessionOutcome::Completed { streak, persisted } => {
                eprintln!("Workout Complete! Great job!");
                if !persisted {
                    eprintln!("warning: streak could not be saved");
                }
                if let Some(hint) = streak.encouragement() {
                    eprintln!("{hint}");
                }
            }
            SessionOutcome::Aborted { .. } => eprintln!("Workout ended."),
        }
    }
}

fn build_config(args: &RunArgs, settings: TimerSettings, config: &Config) -> WorkoutConfig {
    let settings = TimerSettings {
        prepare_time: args.prepare.unwrap_or(settings.prepare_time),
        exercise_time: args.exercise.unwrap_or(settings.exercise_time),
        rest_time: args.rest.unwrap_or(settings.rest_time),
        round_rest_time: args.round_rest.unwrap_or(settings.round_rest_time),
    };
    WorkoutConfig::new(
        settings,
        args.rounds.unwrap_or(config.workout.rounds),
        config.workout.exercises.clone(),
    )
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let app_config = Config::load()?;
    let workout = build_config(&args, TimerSettings::load(&db), &app_config);
    workout.validate()?;
    tracing::debug!(?workout, "session config");

    let reminders = ReminderState::new(Database::open()?);
    let mut session = WorkoutSession::new(&db, TerminalPresenter::new(app_config.cues.clone()))
        .with_reminders(reminders);

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(session.run_until(workout, async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
