use clap::Subcommand;
use hiit_core::{Database, SettingsField, TimerSettings};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the phase durations as JSON
    Show,
    /// Set one duration in seconds
    Set {
        /// prepare, exercise, rest or round-rest
        field: SettingsField,
        seconds: u32,
    },
    /// Restore the default durations
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SettingsAction::Show => {
            let settings = TimerSettings::load(&db);
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set { field, seconds } => {
            let mut settings = TimerSettings::load(&db);
            settings.set(field, seconds);
            settings.save(&db)?;
            let range = field.recommended_range();
            if !range.contains(&seconds) {
                eprintln!(
                    "warning: {} of {seconds}s is outside the usual {}-{}s",
                    field.as_str(),
                    range.start(),
                    range.end()
                );
            }
            println!("ok");
        }
        SettingsAction::Reset => {
            TimerSettings::default().save(&db)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
