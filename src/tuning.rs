//! Physics tuning
//!
//! The per-tick constants of the ball model live here so they can be
//! adjusted from a JSON file without rebuilding.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning option `{option}` out of range: {value}")]
    Invalid { option: &'static str, value: f32 },
}

/// Ball physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsTuning {
    /// Velocity decay applied once per tick (0 < f < 1)
    pub friction: f32,
    /// Impulse magnitude for hits on a near-stationary ball
    pub initial_hit_speed_multiplier: f32,
    /// Multiplier for opponent hits on a moving ball
    pub moving_hit_speed_multiplier: f32,
    /// Per-axis speed below which the ball counts as near-stationary
    pub speed_threshold: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            friction: 0.987,
            initial_hit_speed_multiplier: 60.0,
            moving_hit_speed_multiplier: 2.0,
            speed_threshold: 0.5,
        }
    }
}

impl PhysicsTuning {
    /// Parse and validate tuning from a JSON object. Missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded physics tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check every option is inside its usable range
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(TuningError::Invalid {
                option: "friction",
                value: self.friction,
            });
        }
        for (option, value) in [
            ("initial_hit_speed_multiplier", self.initial_hit_speed_multiplier),
            ("moving_hit_speed_multiplier", self.moving_hit_speed_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid { option, value });
            }
        }
        if !(self.speed_threshold.is_finite() && self.speed_threshold >= 0.0) {
            return Err(TuningError::Invalid {
                option: "speed_threshold",
                value: self.speed_threshold,
            });
        }
        Ok(())
    }

    /// Whether a velocity counts as near-stationary
    #[inline]
    pub fn is_near_stationary(&self, vel: glam::Vec2) -> bool {
        vel.x.abs() < self.speed_threshold && vel.y.abs() < self.speed_threshold
    }
}
