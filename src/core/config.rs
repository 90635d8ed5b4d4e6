//! Aggregated simulation configuration
//!
//! Every tunable in the core lives in a per-module config struct with
//! documented fields; this module gathers them into one [`SimulationConfig`]
//! that can be loaded from TOML and validated for internal consistency
//! before a world is built from it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, VeilError};
use crate::detection::{SoundConfig, VisionConfig};
use crate::monster::{AuraConfig, MonsterConfig};
use crate::noise::NoiseConfig;
use crate::player::{FlashlightConfig, FootstepConfig, LivesConfig, PlayerConfig, SanityConfig};
use crate::simulation::RespawnConfig;

/// Configuration for the whole simulation
///
/// These values have been tuned to produce tense but fair stealth pacing.
/// Changing them affects how forgiving detection and pursuit feel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub noise: NoiseConfig,
    pub vision: VisionConfig,
    pub sound: SoundConfig,
    pub monster: MonsterConfig,
    pub aura: AuraConfig,
    pub player: PlayerConfig,
    pub footsteps: FootstepConfig,
    pub sanity: SanityConfig,
    pub lives: LivesConfig,
    pub flashlight: FlashlightConfig,
    pub respawn: RespawnConfig,
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, falling back to defaults for any
    /// section the file omits, then validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate().map_err(VeilError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        // Hysteresis only works with a real dead zone between the thresholds
        if self.sound.threshold_off >= self.sound.threshold_on {
            return Err(format!(
                "sound.threshold_off ({}) must be < sound.threshold_on ({})",
                self.sound.threshold_off, self.sound.threshold_on
            ));
        }

        if !(0.0..=360.0).contains(&self.vision.field_of_view_deg)
            || self.vision.field_of_view_deg <= 0.0
        {
            return Err(format!(
                "vision.field_of_view_deg ({}) must be in (0, 360]",
                self.vision.field_of_view_deg
            ));
        }

        if self.vision.detection_range <= 0.0 {
            return Err("vision.detection_range must be positive".into());
        }

        // Pin release must be outside pin entry or the state would flicker
        if self.monster.pin_resume_distance <= self.monster.pin_stop_distance {
            return Err(format!(
                "monster.pin_resume_distance ({}) must be > monster.pin_stop_distance ({})",
                self.monster.pin_resume_distance, self.monster.pin_stop_distance
            ));
        }

        if self.noise.decay_per_second <= 0.0 {
            return Err("noise.decay_per_second must be positive".into());
        }

        if self.footsteps.walk_step_interval <= 0.0
            || self.footsteps.run_step_interval <= 0.0
            || self.footsteps.crouch_step_interval <= 0.0
        {
            return Err("footstep intervals must be positive".into());
        }

        if self.aura.inner_radius >= self.aura.max_radius {
            return Err(format!(
                "aura.inner_radius ({}) must be < aura.max_radius ({})",
                self.aura.inner_radius, self.aura.max_radius
            ));
        }

        if self.sanity.max_sanity <= 0.0 {
            return Err("sanity.max_sanity must be positive".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_hysteresis_rejected() {
        let mut config = SimulationConfig::default();
        config.sound.threshold_off = config.sound.threshold_on + 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pin_distances_ordered() {
        let mut config = SimulationConfig::default();
        config.monster.pin_resume_distance = config.monster.pin_stop_distance;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig =
            toml::from_str("[sound]\nthreshold_on = 0.3\n").expect("parse");
        assert_eq!(config.sound.threshold_on, 0.3);
        assert_eq!(
            config.noise.decay_per_second,
            NoiseConfig::default().decay_per_second
        );
        assert!(config.validate().is_ok());
    }
}
