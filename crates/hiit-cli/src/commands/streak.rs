use chrono::Local;
use clap::Subcommand;
use hiit_core::{Database, StreakLedger};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the streak record as JSON
    Show,
    /// Print whether today's workout is needed to keep the streak
    Risk,
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let ledger = StreakLedger::new(&db);

    match action {
        StreakAction::Show => {
            let record = ledger.load();
            println!("{}", serde_json::to_string_pretty(&record)?);
            if let Some(hint) = record.encouragement() {
                eprintln!("{hint}");
            }
        }
        StreakAction::Risk => {
            println!("{}", ledger.check_streak_risk(&Local::now()));
        }
    }
    Ok(())
}
