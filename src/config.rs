//! Gesture configuration, from defaults, JSON or environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use serde::Deserialize;

use crate::consts::{DEFAULT_WHEEL_FACTOR, START_THRESHOLD};

pub const WHEEL_FACTOR_VAR: &str = "PINCH_WHEEL_FACTOR";
pub const START_THRESHOLD_VAR: &str = "PINCH_START_THRESHOLD";

/// Error returned when configuration values are missing or malformed.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// An environment variable was set but does not hold a finite number.
    #[error("invalid number in {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    /// A value is outside the range the recognizer can work with.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Sensitivity multiplier for wheel-to-scale conversion.
    pub wheel_factor: f64,
    /// Spread (scene units) two or more contacts must exceed to start a gesture.
    pub start_threshold: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self { wheel_factor: DEFAULT_WHEEL_FACTOR, start_threshold: START_THRESHOLD }
    }
}

impl PinchConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PINCH_WHEEL_FACTOR`: default 1
    /// - `PINCH_START_THRESHOLD`: default 30
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            wheel_factor: env_parse_f64(WHEEL_FACTOR_VAR, defaults.wheel_factor)?,
            start_threshold: env_parse_f64(START_THRESHOLD_VAR, defaults.start_threshold)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wheel_factor.is_finite() {
            return Err(ConfigError::OutOfRange { field: "wheel_factor", value: self.wheel_factor });
        }
        if !self.start_threshold.is_finite() || self.start_threshold < 0.0 {
            return Err(ConfigError::OutOfRange { field: "start_threshold", value: self.start_threshold });
        }
        Ok(())
    }
}

fn env_parse_f64(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = match std::env::var(var) {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(default),
        Err(VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidNumber { var, value: raw.to_string_lossy().into_owned() });
        }
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}
