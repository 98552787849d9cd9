//! Data-driven game balance
//!
//! Defaults reproduce the classic feel: the road starts at 10 points per
//! frame and gains half of that every 30 seconds, with no upper bound.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gameplay constants, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Road speed once the intro finishes (points per frame)
    pub initial_speed: f32,
    /// Time for the speed to grow by half of `initial_speed` (ms)
    pub speed_ramp_ms: f64,
    /// Optional ceiling for the ramp; `None` keeps accelerating forever
    pub max_speed: Option<f32>,
    /// Length of the intro where the player's car drives onto the screen (ms)
    pub intro_duration_ms: f64,
    /// Oncoming traffic moves this many times faster than the road
    pub enemy_speed_factor: f32,
    /// Fixed lane RNG seed; the host picks one when absent
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 10.0,
            speed_ramp_ms: 30.0 * 1000.0,
            max_speed: None,
            intro_duration_ms: 750.0,
            enemy_speed_factor: 1.5,
            seed: None,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "initial_speed",
                reason: format!("must be a non-negative number, got {}", self.initial_speed),
            });
        }
        if !(self.speed_ramp_ms.is_finite() && self.speed_ramp_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "speed_ramp_ms",
                reason: format!("must be positive, got {}", self.speed_ramp_ms),
            });
        }
        if let Some(max) = self.max_speed {
            if !(max >= self.initial_speed) {
                return Err(ConfigError::Invalid {
                    field: "max_speed",
                    reason: format!(
                        "must be at least initial_speed ({}), got {max}",
                        self.initial_speed
                    ),
                });
            }
        }
        if !(self.intro_duration_ms.is_finite() && self.intro_duration_ms >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "intro_duration_ms",
                reason: format!("must be non-negative, got {}", self.intro_duration_ms),
            });
        }
        if !(self.enemy_speed_factor.is_finite() && self.enemy_speed_factor > 0.0) {
            return Err(ConfigError::Invalid {
                field: "enemy_speed_factor",
                reason: format!("must be positive, got {}", self.enemy_speed_factor),
            });
        }
        Ok(())
    }

    /// Road speed after `runtime_ms` of play
    pub fn speed_at(&self, runtime_ms: f64) -> f32 {
        let ramp = (runtime_ms / self.speed_ramp_ms) as f32;
        let speed = self.initial_speed + self.initial_speed / 2.0 * ramp;
        match self.max_speed {
            Some(max) => speed.min(max),
            None => speed,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rock_n_race_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        Self::default()
    }
}
