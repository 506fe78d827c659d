use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_LOG_CAPACITY;
use crate::ledger::DEFAULT_STARTING_CREDITS;
use crate::tables::GameTables;

/// Everything the floor needs to open a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorSettings {
    pub starting_credits: u64,
    pub log_capacity: usize,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub tables: GameTables,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            starting_credits: DEFAULT_STARTING_CREDITS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed: None,
            tables: GameTables::default(),
        }
    }
}

impl FloorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.starting_credits == 0 {
            return Err(SettingsError::InvalidValue(
                "starting_credits must be greater than 0".to_string(),
            ));
        }
        if self.log_capacity == 0 {
            return Err(SettingsError::InvalidValue(
                "log_capacity must be greater than 0".to_string(),
            ));
        }
        self.tables.validate()
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = FloorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.starting_credits, 1000);
        assert_eq!(settings.log_capacity, 20);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn rejects_zero_starting_credits() {
        let settings = FloorSettings {
            starting_credits: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue(msg)) if msg.contains("starting_credits")
        ));
    }

    #[test]
    fn rejects_zero_log_capacity() {
        let settings = FloorSettings {
            log_capacity: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn table_errors_surface() {
        let mut settings = FloorSettings::default();
        settings.tables.mines.max_bombs = 30;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn serde_roundtrip_keeps_seed() {
        let settings = FloorSettings::seeded(42);
        let json = serde_json::to_string(&settings).unwrap();
        let back: FloorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
