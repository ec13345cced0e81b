use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, StorageError};
use crate::storage::KvStore;

/// Storage key for the persisted timer settings.
pub const TIMER_SETTINGS_KEY: &str = "hiit-timer-settings";

/// The four user-adjustable phase durations, in seconds.
///
/// Persisted as `{prepareTime, exerciseTime, restTime, roundRestTime}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub prepare_time: u32,
    pub exercise_time: u32,
    /// 0 disables the rest between exercises.
    pub rest_time: u32,
    pub round_rest_time: u32,
}

/// Names one of the [`TimerSettings`] durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Prepare,
    Exercise,
    Rest,
    RoundRest,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Prepare,
        SettingsField::Exercise,
        SettingsField::Rest,
        SettingsField::RoundRest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsField::Prepare => "prepare",
            SettingsField::Exercise => "exercise",
            SettingsField::Rest => "rest",
            SettingsField::RoundRest => "round-rest",
        }
    }

    /// Range offered by the settings panel. Values outside it are still valid.
    pub fn recommended_range(&self) -> RangeInclusive<u32> {
        match self {
            SettingsField::Prepare => 3..=15,
            SettingsField::Exercise => 10..=60,
            SettingsField::Rest => 0..=30,
            SettingsField::RoundRest => 30..=180,
        }
    }
}

impl std::str::FromStr for SettingsField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prepare" | "prepareTime" => Ok(SettingsField::Prepare),
            "exercise" | "exerciseTime" => Ok(SettingsField::Exercise),
            "rest" | "restTime" => Ok(SettingsField::Rest),
            "round-rest" | "round_rest" | "roundRestTime" => Ok(SettingsField::RoundRest),
            other => Err(ConfigurationError::InvalidValue {
                field: other.to_string(),
                message: "expected one of prepare, exercise, rest, round-rest".into(),
            }),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            prepare_time: 5,
            exercise_time: 20,
            rest_time: 0,
            round_rest_time: 75,
        }
    }
}

impl TimerSettings {
    pub fn get(&self, field: SettingsField) -> u32 {
        match field {
            SettingsField::Prepare => self.prepare_time,
            SettingsField::Exercise => self.exercise_time,
            SettingsField::Rest => self.rest_time,
            SettingsField::RoundRest => self.round_rest_time,
        }
    }

    pub fn set(&mut self, field: SettingsField, seconds: u32) {
        match field {
            SettingsField::Prepare => self.prepare_time = seconds,
            SettingsField::Exercise => self.exercise_time = seconds,
            SettingsField::Rest => self.rest_time = seconds,
            SettingsField::RoundRest => self.round_rest_time = seconds,
        }
    }

    /// Fields whose value lies outside the settings panel range.
    pub fn out_of_range(&self) -> Vec<SettingsField> {
        SettingsField::ALL
            .into_iter()
            .filter(|f| !f.recommended_range().contains(&self.get(*f)))
            .collect()
    }

    /// Load from the store. Missing or corrupt payloads yield the defaults.
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Self {
        match store.get(TIMER_SETTINGS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "corrupt timer settings, using defaults");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "timer settings unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn save<S: KvStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Write {
            key: TIMER_SETTINGS_KEY.to_string(),
            message: e.to_string(),
        })?;
        store.set(TIMER_SETTINGS_KEY, &json)
    }
}

/// Immutable description of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    pub prepare_seconds: u32,
    pub exercise_seconds: u32,
    /// 0 elides the Rest phase.
    pub rest_seconds: u32,
    pub round_rest_seconds: u32,
    pub total_rounds: u32,
    pub exercises: Vec<String>,
}

impl WorkoutConfig {
    pub fn new(settings: TimerSettings, total_rounds: u32, exercises: Vec<String>) -> Self {
        Self {
            prepare_seconds: settings.prepare_time,
            exercise_seconds: settings.exercise_time,
            rest_seconds: settings.rest_time,
            round_rest_seconds: settings.round_rest_time,
            total_rounds,
            exercises,
        }
    }

    /// # Errors
    ///
    /// Rejects zero rounds, an empty exercise list and blank exercise names.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.total_rounds == 0 {
            return Err(ConfigurationError::ZeroRounds);
        }
        if self.exercises.is_empty() {
            return Err(ConfigurationError::NoExercises);
        }
        if let Some(i) = self.exercises.iter().position(|e| e.trim().is_empty()) {
            return Err(ConfigurationError::InvalidValue {
                field: format!("exercises[{i}]"),
                message: "exercise name is blank".into(),
            });
        }
        Ok(())
    }

    pub fn last_exercise_index(&self) -> usize {
        self.exercises.len().saturating_sub(1)
    }

    /// Number of ticks from `start()` until the tick that enters Completed.
    ///
    /// Each phase of `d` seconds takes `d` decrement ticks plus one boundary tick.
    pub fn total_ticks(&self) -> u64 {
        let rounds = self.total_rounds as u64;
        let n = self.exercises.len() as u64;
        let per_exercise = self.prepare_seconds as u64 + 1 + self.exercise_seconds as u64 + 1;
        let rest = if self.rest_seconds > 0 {
            self.rest_seconds as u64 + 1
        } else {
            0
        };
        rounds * n * per_exercise
            + rounds * n.saturating_sub(1) * rest
            + rounds.saturating_sub(1) * (self.round_rest_seconds as u64 + 1)
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self::new(
            TimerSettings::default(),
            3,
            crate::storage::default_exercises(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn default_config_is_valid() {
        let cfg = WorkoutConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.exercises.len(), 6);
        assert_eq!(cfg.last_exercise_index(), 5);
    }

    #[test]
    fn zero_rounds_rejected() {
        let cfg = WorkoutConfig {
            total_rounds: 0,
            ..WorkoutConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigurationError::ZeroRounds));
    }

    #[test]
    fn empty_exercise_list_rejected() {
        let cfg = WorkoutConfig {
            exercises: vec![],
            ..WorkoutConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigurationError::NoExercises));
    }

    #[test]
    fn blank_exercise_name_rejected() {
        let cfg = WorkoutConfig {
            exercises: vec!["Lunges".into(), "  ".into()],
            ..WorkoutConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_durations_are_accepted() {
        let settings = TimerSettings {
            prepare_time: 0,
            exercise_time: 0,
            rest_time: 0,
            round_rest_time: 0,
        };
        let cfg = WorkoutConfig::new(settings, 1, vec!["Planks".into()]);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.total_ticks(), 2);
    }

    #[test]
    fn total_ticks_counts_boundary_ticks() {
        let settings = TimerSettings {
            prepare_time: 2,
            exercise_time: 3,
            rest_time: 1,
            round_rest_time: 4,
        };
        let cfg = WorkoutConfig::new(settings, 2, vec!["A".into(), "B".into()]);
        // per round: 2 * (3 + 4) + 1 * 2 = 16; plus one round rest of 5
        assert_eq!(cfg.total_ticks(), 2 * 16 + 5);
    }

    #[test]
    fn settings_load_defaults_when_missing_or_corrupt() {
        let store = MemoryStore::new();
        assert_eq!(TimerSettings::load(&store), TimerSettings::default());
        store.set(TIMER_SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(TimerSettings::load(&store), TimerSettings::default());
    }

    #[test]
    fn settings_persist_in_camel_case() {
        let store = MemoryStore::new();
        let mut settings = TimerSettings::default();
        settings.set(SettingsField::RoundRest, 90);
        settings.save(&store).unwrap();

        let raw = store.get(TIMER_SETTINGS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["roundRestTime"], 90);
        assert_eq!(json["prepareTime"], 5);
        assert_eq!(TimerSettings::load(&store).round_rest_time, 90);
    }

    #[test]
    fn negative_stored_duration_is_treated_as_corrupt() {
        let store = MemoryStore::new();
        store
            .set(
                TIMER_SETTINGS_KEY,
                r#"{"prepareTime":-1,"exerciseTime":20,"restTime":0,"roundRestTime":75}"#,
            )
            .unwrap();
        assert_eq!(TimerSettings::load(&store), TimerSettings::default());
    }

    #[test]
    fn out_of_range_reports_fields_outside_panel_ranges() {
        let mut settings = TimerSettings::default();
        assert!(settings.out_of_range().is_empty());
        settings.set(SettingsField::Exercise, 90);
        settings.set(SettingsField::Prepare, 1);
        assert_eq!(
            settings.out_of_range(),
            vec![SettingsField::Prepare, SettingsField::Exercise]
        );
    }

    #[test]
    fn settings_field_parses_cli_and_json_names() {
        assert_eq!("round-rest".parse::<SettingsField>(), Ok(SettingsField::RoundRest));
        assert_eq!("exerciseTime".parse::<SettingsField>(), Ok(SettingsField::Exercise));
        assert!("warmup".parse::<SettingsField>().is_err());
    }
}
