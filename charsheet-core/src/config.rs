//! Rules configuration.
//!
//! The defaults reproduce the standard rules: a 70 point attribute cap,
//! attributes starting at 10, and a skill budget of `4 * INT modifier + 10`.
//! A TOML file can override any subset of the fields.

use crate::catalog::{Ability, ATTRIBUTES_SUM_MAX, ATTRIBUTE_INITIAL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading or validating a rules configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse rules TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid rules configuration: {0}")]
    Invalid(String),
}

/// Tunable numbers used by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Maximum sum of all six attribute scores.
    pub attribute_sum_max: u32,
    /// Score each attribute starts at on a new character.
    pub attribute_initial: u8,
    /// Skill points available with an Intelligence modifier of 0.
    pub base_skill_points: i32,
    /// Skill points gained per point of Intelligence modifier.
    pub skill_points_per_int_modifier: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            attribute_sum_max: ATTRIBUTES_SUM_MAX,
            attribute_initial: ATTRIBUTE_INITIAL,
            base_skill_points: 10,
            skill_points_per_int_modifier: 4,
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute sum cap.
    pub fn with_attribute_sum_max(mut self, max: u32) -> Self {
        self.attribute_sum_max = max;
        self
    }

    /// Set the starting score for every attribute.
    pub fn with_attribute_initial(mut self, score: u8) -> Self {
        self.attribute_initial = score;
        self
    }

    /// Set the base skill budget.
    pub fn with_base_skill_points(mut self, points: i32) -> Self {
        self.base_skill_points = points;
        self
    }

    /// Set how many skill points each Intelligence modifier point is worth.
    pub fn with_skill_points_per_int_modifier(mut self, points: i32) -> Self {
        self.skill_points_per_int_modifier = points;
        self
    }

    /// Check that a fresh character would be legal under these rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute_sum_max == 0 {
            return Err(ConfigError::Invalid(
                "attribute_sum_max must be greater than zero".to_string(),
            ));
        }
        let ceiling = u8::MAX as u32 * Ability::all().len() as u32;
        if self.attribute_sum_max > ceiling {
            return Err(ConfigError::Invalid(format!(
                "attribute_sum_max {} is above {ceiling}, the most six scores can hold",
                self.attribute_sum_max
            )));
        }
        if self.skill_points_per_int_modifier < 0 {
            return Err(ConfigError::Invalid(format!(
                "skill_points_per_int_modifier must not be negative, got {}",
                self.skill_points_per_int_modifier
            )));
        }
        let starting_total = self.attribute_initial as u32 * 6;
        if starting_total > self.attribute_sum_max {
            return Err(ConfigError::Invalid(format!(
                "six attributes at {} sum to {starting_total}, above the cap of {}",
                self.attribute_initial, self.attribute_sum_max
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML rules file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded rules configuration");
        Ok(config)
    }
}
