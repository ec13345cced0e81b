use chrono::Local;
use clap::Subcommand;
use hiit_core::{Database, ReminderState};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Print reminder state as JSON
    Status,
    /// Turn daily reminders on
    Enable,
    /// Turn daily reminders off
    Disable,
}

pub fn run(action: RemindersAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let reminders = ReminderState::new(&db);

    match action {
        RemindersAction::Status => {
            let today = Local::now().date_naive();
            let status = serde_json::json!({
                "enabled": reminders.is_enabled(),
                "lastCompletion": reminders.last_completion(),
                "nextReminder": reminders.next_reminder(),
                "remindToday": reminders.should_remind(today),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        RemindersAction::Enable => {
            reminders.set_enabled(true)?;
            println!("reminders enabled");
        }
        RemindersAction::Disable => {
            reminders.set_enabled(false)?;
            println!("reminders disabled");
        }
    }
    Ok(())
}
