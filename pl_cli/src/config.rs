//! CLI configuration management.
//!
//! Consolidates all `LADDER_*` environment variable reads and provides
//! validated tournament settings.

use pong_ladder::bracket::BracketFormat;
use pong_ladder::config::TournamentSettings;
use pong_ladder::scoring::{BestOfSettings, is_valid_best_of};
use std::path::PathBuf;

/// Complete CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Settings handed to the generators
    pub settings: TournamentSettings,
    /// Roster file, when set through the environment
    pub roster: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `format_override` - Optional format override (from CLI args)
    /// * `groups_override` - Optional group count override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<CliConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something that does not parse
    pub fn from_env(
        format_override: Option<BracketFormat>,
        groups_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), format_override, groups_override)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        format_override: Option<BracketFormat>,
        groups_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let format = match format_override {
            Some(format) => format,
            None => match lookup("LADDER_FORMAT") {
                Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                    var: "LADDER_FORMAT".to_string(),
                    reason,
                })?,
                None => BracketFormat::SingleElimination,
            },
        };

        let defaults = TournamentSettings::default();
        let best_of = BestOfSettings {
            default: parse_env_or(&lookup, "LADDER_DEFAULT_BEST_OF", defaults.best_of.default),
            group: parse_env_opt(&lookup, "LADDER_GROUP_BEST_OF")?,
            early_rounds: parse_env_opt(&lookup, "LADDER_EARLY_BEST_OF")?,
            semifinals: parse_env_opt(&lookup, "LADDER_SEMIFINAL_BEST_OF")?,
            finals: parse_env_opt(&lookup, "LADDER_FINALS_BEST_OF")?,
        };

        let settings = TournamentSettings {
            format,
            group_count: groups_override
                .unwrap_or_else(|| parse_env_or(&lookup, "LADDER_GROUP_COUNT", defaults.group_count)),
            base_multiplier: parse_env_or(
                &lookup,
                "LADDER_BASE_MULTIPLIER",
                defaults.base_multiplier,
            ),
            final_multiplier: parse_env_or(
                &lookup,
                "LADDER_FINAL_MULTIPLIER",
                defaults.final_multiplier,
            ),
            group_multiplier: parse_env_or(
                &lookup,
                "LADDER_GROUP_MULTIPLIER",
                defaults.group_multiplier,
            ),
            best_of,
        };

        Ok(CliConfig {
            settings,
            roster: lookup("LADDER_ROSTER").map(PathBuf::from),
        })
    }

    /// Roster path from the command line, falling back to `LADDER_ROSTER`
    pub fn roster_path(&self, cli_override: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        cli_override
            .or_else(|| self.roster.clone())
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "LADDER_ROSTER".to_string(),
                hint: "Pass --roster FILE with a JSON array of participants".to_string(),
            })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;

        if settings.base_multiplier == 0 {
            return Err(ConfigError::Invalid {
                var: "LADDER_BASE_MULTIPLIER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if settings.final_multiplier < settings.base_multiplier {
            return Err(ConfigError::Invalid {
                var: "LADDER_FINAL_MULTIPLIER".to_string(),
                reason: format!(
                    "Must be at least the base multiplier ({})",
                    settings.base_multiplier
                ),
            });
        }

        let best_of = [
            ("LADDER_DEFAULT_BEST_OF", Some(settings.best_of.default)),
            ("LADDER_GROUP_BEST_OF", settings.best_of.group),
            ("LADDER_EARLY_BEST_OF", settings.best_of.early_rounds),
            ("LADDER_SEMIFINAL_BEST_OF", settings.best_of.semifinals),
            ("LADDER_FINALS_BEST_OF", settings.best_of.finals),
        ];
        for (var, value) in best_of {
            if let Some(value) = value
                && !is_valid_best_of(value)
            {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("{value} is not one of 1, 3, 5, 7"),
                });
            }
        }

        settings.validate().map_err(|reason| ConfigError::Invalid {
            var: "LADDER_*".to_string(),
            reason,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Optional variable: unset is `None`, unparsable is an error
fn parse_env_opt<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("'{raw}' is not a number"),
            })
        })
        .transpose()
}
