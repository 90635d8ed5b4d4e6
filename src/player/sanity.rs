//! Sanity: the player's depleting survival resource

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub max_sanity: f32,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self { max_sanity: 100.0 }
    }
}

/// Clamped [0, max] resource. Depletion is reported exactly once per
/// depletion episode so the respawn flow is not re-triggered every tick the
/// value sits at zero.
#[derive(Debug, Clone)]
pub struct SanitySystem {
    current: f32,
    max: f32,
    depletion_reported: bool,
}

impl SanitySystem {
    pub fn new(config: &SanityConfig) -> Self {
        Self {
            current: config.max_sanity,
            max: config.max_sanity,
            depletion_reported: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Apply damage. Returns true when this call depleted the resource.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !amount.is_finite() {
            return false;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        if self.current <= 0.0 && !self.depletion_reported {
            self.depletion_reported = true;
            return true;
        }
        false
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
        self.depletion_reported = false;
    }
}
