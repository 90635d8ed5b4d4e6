//! Proximity aura: a 0..1 dread signal for ambience and UI
//!
//! Pure distance falloff, throttled so downstream consumers are not
//! re-rendered every tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    /// Distance beyond which the signal is zero.
    pub max_radius: f32,
    /// Distance within which the signal saturates at one.
    pub inner_radius: f32,
    /// Minimum time between emitted samples.
    pub send_every: Seconds,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            max_radius: 18.0,
            inner_radius: 4.5,
            send_every: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProximityAura {
    config: AuraConfig,
    next_send: Seconds,
    level: f32,
}

impl ProximityAura {
    pub fn new(config: AuraConfig) -> Self {
        Self {
            config,
            next_send: f32::NEG_INFINITY,
            level: 0.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Sample the falloff. Returns the new level when a throttled send is
    /// due, None otherwise.
    pub fn sample(&mut self, monster_pos: Vec3, player_pos: Vec3, now: Seconds) -> Option<f32> {
        if now < self.next_send {
            return None;
        }
        self.next_send = now + self.config.send_every;

        let d = monster_pos.distance(player_pos);
        self.level = if d <= self.config.inner_radius {
            1.0
        } else if d >= self.config.max_radius {
            0.0
        } else {
            // 0 far -> 1 near, eased.
            let k = (self.config.max_radius - d) / (self.config.max_radius - self.config.inner_radius);
            smoothstep(k.clamp(0.0, 1.0))
        };
        Some(self.level)
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_endpoints() {
        let mut aura = ProximityAura::new(AuraConfig::default());
        assert_eq!(
            aura.sample(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.0),
            Some(1.0)
        );
        assert_eq!(
            aura.sample(Vec3::ZERO, Vec3::new(25.0, 0.0, 0.0), 1.0),
            Some(0.0)
        );
    }

    #[test]
    fn test_falloff_monotone_between() {
        let mut aura = ProximityAura::new(AuraConfig::default());
        let near = aura.sample(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 0.0).unwrap();
        let far = aura.sample(Vec3::ZERO, Vec3::new(15.0, 0.0, 0.0), 1.0).unwrap();
        assert!(near > far);
        assert!((0.0..=1.0).contains(&near));
        assert!((0.0..=1.0).contains(&far));
    }

    #[test]
    fn test_send_throttle() {
        let mut aura = ProximityAura::new(AuraConfig::default());
        assert!(aura.sample(Vec3::ZERO, Vec3::ZERO, 0.0).is_some());
        assert!(aura.sample(Vec3::ZERO, Vec3::ZERO, 0.01).is_none());
        assert!(aura.sample(Vec3::ZERO, Vec3::ZERO, 0.06).is_some());
    }
}
