//! Normalized noise scalar with clamped accumulation and time decay

use serde::{Deserialize, Serialize};

use super::channel::NoiseChannel;
use crate::core::types::Seconds;

/// Tunables for the noise scalar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// How much of the full bar drains per second.
    ///
    /// At 0.25 a maxed-out bar settles back to silence in 4 seconds,
    /// which keeps one sprint burst audible across roughly two patrol
    /// waypoints.
    pub decay_per_second: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            decay_per_second: 0.25,
        }
    }
}

/// Owns the player's noise level, always in [0, 1]. Every mutation is
/// broadcast synchronously through the channel.
pub struct NoiseEmitter {
    level: f32,
    decay_per_second: f32,
    channel: NoiseChannel,
}

impl NoiseEmitter {
    pub fn new(config: &NoiseConfig) -> Self {
        Self {
            level: 0.0,
            decay_per_second: config.decay_per_second,
            channel: NoiseChannel::new(),
        }
    }

    /// Clamped add. Any finite amount is accepted; non-finite amounts are
    /// ignored since clamping cannot restore the [0, 1] invariant for NaN.
    pub fn add_normalized(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }
        self.level = (self.level + amount).clamp(0.0, 1.0);
        self.channel.publish(self.level);
    }

    /// Per-tick decay. Publishes only while there is noise left to decay,
    /// so a settled bar does not spam listeners with zeros.
    pub fn tick(&mut self, dt: Seconds) {
        if self.level <= 0.0 {
            return;
        }
        self.level = (self.level - self.decay_per_second * dt).max(0.0);
        self.channel.publish(self.level);
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn channel(&mut self) -> &mut NoiseChannel {
        &mut self.channel
    }
}
