//! Tournament-level settings shared by the generators and the scoring rules.

use serde::{Deserialize, Serialize};

use crate::bracket::models::BracketFormat;
use crate::scoring::{BestOfSettings, is_valid_best_of};

/// Multiplier (percent) of the first elimination round
pub const DEFAULT_BASE_MULTIPLIER: u32 = 150;

/// Multiplier (percent) of the final
pub const DEFAULT_FINAL_MULTIPLIER: u32 = 300;

/// Multipliers are percentages; anything above this is a typo
pub const MAX_MULTIPLIER: u32 = 1_000;

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub format: BracketFormat,
    /// Groups for the round-robin format
    #[serde(default = "default_group_count")]
    pub group_count: usize,
    #[serde(default = "default_base_multiplier")]
    pub base_multiplier: u32,
    #[serde(default = "default_final_multiplier")]
    pub final_multiplier: u32,
    /// Multiplier of group and Swiss rounds
    #[serde(default = "default_group_multiplier")]
    pub group_multiplier: u32,
    #[serde(default)]
    pub best_of: BestOfSettings,
}

fn default_group_count() -> usize {
    1
}

fn default_base_multiplier() -> u32 {
    DEFAULT_BASE_MULTIPLIER
}

fn default_final_multiplier() -> u32 {
    DEFAULT_FINAL_MULTIPLIER
}

fn default_group_multiplier() -> u32 {
    100
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            format: BracketFormat::SingleElimination,
            group_count: default_group_count(),
            base_multiplier: DEFAULT_BASE_MULTIPLIER,
            final_multiplier: DEFAULT_FINAL_MULTIPLIER,
            group_multiplier: default_group_multiplier(),
            best_of: BestOfSettings::default(),
        }
    }
}

impl TournamentSettings {
    pub fn with_format(format: BracketFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        if self.format == BracketFormat::RoundRobin && self.group_count == 0 {
            return Err("Group count must be at least 1".to_string());
        }

        for (label, value) in [
            ("Base multiplier", self.base_multiplier),
            ("Final multiplier", self.final_multiplier),
            ("Group multiplier", self.group_multiplier),
        ] {
            if value == 0 || value > MAX_MULTIPLIER {
                return Err(format!("{label} must be between 1 and {MAX_MULTIPLIER}"));
            }
        }

        if !is_valid_best_of(self.best_of.default) {
            return Err(format!(
                "Default best-of {} is not one of 1, 3, 5, 7",
                self.best_of.default
            ));
        }

        let overrides = [
            self.best_of.group,
            self.best_of.early_rounds,
            self.best_of.semifinals,
            self.best_of.finals,
        ];
        if let Some(bad) = overrides
            .into_iter()
            .flatten()
            .find(|&b| !is_valid_best_of(b))
        {
            return Err(format!("Stage best-of {bad} is not one of 1, 3, 5, 7"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = TournamentSettings::default();
        assert_eq!(settings.base_multiplier, 150);
        assert_eq!(settings.final_multiplier, 300);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_best_of() {
        let mut settings = TournamentSettings::default();
        settings.best_of.default = 4;
        assert!(settings.validate().is_err());

        let mut settings = TournamentSettings::default();
        settings.best_of.finals = Some(9);
        assert!(settings.validate().unwrap_err().contains("9"));
    }

    #[test]
    fn test_rejects_zero_groups_for_round_robin() {
        let mut settings = TournamentSettings::with_format(BracketFormat::RoundRobin);
        settings.group_count = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_multiplier() {
        let settings = TournamentSettings {
            final_multiplier: 0,
            ..TournamentSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err("Final multiplier must be between 1 and 1000".to_string())
        );
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let settings: TournamentSettings =
            serde_json::from_str(r#"{"format": "double_elimination"}"#).unwrap();
        assert_eq!(settings.format, BracketFormat::DoubleElimination);
        assert_eq!(settings.group_count, 1);
        assert_eq!(settings.best_of, BestOfSettings::default());
    }
}
