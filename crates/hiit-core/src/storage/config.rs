//! TOML-based application configuration.
//!
//! Stores user preferences that sit around a workout session:
//! - Default round count and the exercise list
//! - Terminal cue behaviour (bell, flash)
//!
//! The per-phase durations live in the key-value store instead, see
//! [`crate::TimerSettings`].
//!
//! Configuration is stored at `~/.config/hiit-timer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Session shape: how many rounds, which exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSection {
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_exercises")]
    pub exercises: Vec<String>,
}

/// How cues are rendered in the terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_true")]
    pub bell: bool,
    #[serde(default = "default_true")]
    pub flash: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hiit-timer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workout: WorkoutSection,
    #[serde(default)]
    pub cues: CueConfig,
}

fn default_rounds() -> u32 {
    3
}
fn default_true() -> bool {
    true
}

/// The six-exercise dumbbell circuit.
pub fn default_exercises() -> Vec<String> {
    [
        "Goblet Squats",
        "Push-ups/Chest Press",
        "Romanian Deadlifts",
        "Dumbbell Rows",
        "Lunges",
        "Shoulder Press",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for WorkoutSection {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            exercises: default_exercises(),
        }
    }
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            bell: true,
            flash: true,
        }
    }
}

/// Dot-path keys accepted by [`Config::get`] and [`Config::apply`].
pub const CONFIG_KEYS: [&str; 4] = [
    "workout.rounds",
    "workout.exercises",
    "cues.bell",
    "cues.flash",
];

/// A JSON array of names, or a comma-separated list.
fn parse_exercises(value: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(value) {
        return list;
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, Box<dyn std::error::Error>> {
    value
        .parse()
        .map_err(|_| format!("cannot parse '{value}' as true/false for {key}").into())
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Lists are rendered as JSON.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "workout.rounds" => Some(self.workout.rounds.to_string()),
            "workout.exercises" => serde_json::to_string(&self.workout.exercises).ok(),
            "cues.bell" => Some(self.cues.bell.to_string()),
            "cues.flash" => Some(self.cues.flash.to_string()),
            _ => None,
        }
    }

    /// Apply a value by key without touching disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type. The config is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "workout.rounds" => {
                self.workout.rounds = value
                    .parse()
                    .map_err(|_| format!("cannot parse '{value}' as a non-negative integer"))?;
            }
            "workout.exercises" => self.workout.exercises = parse_exercises(value),
            "cues.bell" => self.cues.bell = parse_flag(key, value)?,
            "cues.flash" => self.cues.flash = parse_flag(key, value)?,
            _ => {
                return Err(format!(
                    "unknown config key: {key} (expected one of {})",
                    CONFIG_KEYS.join(", ")
                )
                .into())
            }
        }
        Ok(())
    }

    /// Set a value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
