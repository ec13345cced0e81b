pub mod config;
pub mod reminders;
pub mod run;
pub mod settings;
pub mod streak;
