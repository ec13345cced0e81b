mod config;
pub mod database;
pub mod kv;

pub use config::{default_exercises, Config, CueConfig, WorkoutSection, CONFIG_KEYS};
pub use database::Database;
pub use kv::{KvStore, MemoryStore};

use std::path::PathBuf;

/// Returns `~/.config/hiit-timer[-dev]/` based on HIIT_ENV.
///
/// Set HIIT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HIIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hiit-timer-dev")
    } else {
        base_dir.join("hiit-timer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
