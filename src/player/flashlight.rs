//! Flashlight: the player's only weapon
//!
//! A burst attack on a wall-clock cooldown that stuns the monster when the
//! beam lands on it, plus a passive probe that growls when the lit beam
//! rests on the monster. Beam and growl both respect level occlusion.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;
use crate::monster::MonsterBehavior;
use crate::simulation::events::SimulationEvent;
use crate::spatial::{ray_sphere, GeometryQuery, Layers, Pose};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashlightConfig {
    /// Maximum distance the burst reaches.
    pub burst_range: f32,
    pub stun_duration: Seconds,
    /// Seconds between bursts. Spent on every attempt, hit or miss.
    pub cooldown: Seconds,
    /// When true, bursting requires the light to be switched on.
    pub require_light_on: bool,
    /// Beam dwell range for the growl cue.
    pub growl_range: f32,
    /// Minimum seconds between growls.
    pub growl_cooldown: Seconds,
}

impl Default for FlashlightConfig {
    fn default() -> Self {
        Self {
            burst_range: 15.0,
            stun_duration: 2.5,
            cooldown: 5.0,
            require_light_on: true,
            growl_range: 15.0,
            growl_cooldown: 2.0,
        }
    }
}

pub struct FlashlightAttack {
    config: FlashlightConfig,
    light_on: bool,
    next_ready: Seconds,
    next_growl: Seconds,
}

impl FlashlightAttack {
    pub fn new(config: FlashlightConfig) -> Self {
        Self {
            config,
            light_on: false,
            next_ready: f32::NEG_INFINITY,
            next_growl: f32::NEG_INFINITY,
        }
    }

    pub fn is_on(&self) -> bool {
        self.light_on
    }

    pub fn toggle(&mut self) {
        self.light_on = !self.light_on;
    }

    pub fn set_on(&mut self, on: bool) {
        self.light_on = on;
    }

    pub fn cooldown_remaining(&self, now: Seconds) -> Seconds {
        (self.next_ready - now).max(0.0)
    }

    pub fn cooldown_duration(&self) -> Seconds {
        self.config.cooldown
    }

    /// First monster whose body the beam reaches unoccluded, within `range`.
    fn beam_target<'a>(
        beam: &Pose,
        geometry: &dyn GeometryQuery,
        monsters: impl Iterator<Item = &'a MonsterBehavior>,
        range: f32,
    ) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, monster) in monsters.enumerate() {
            let center = monster.pose().position + Vec3::Y * 1.0;
            let Some(t) = ray_sphere(
                beam.position,
                beam.forward,
                center,
                monster.config().body_radius,
            ) else {
                continue;
            };
            if t > range {
                continue;
            }
            if let Some(hit) = geometry.linecast(beam.position, center, Layers::LEVEL) {
                if hit.distance < t {
                    continue;
                }
            }
            if best.map_or(true, |(_, bt)| t < bt) {
                best = Some((i, t));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Fire the burst. Returns false when gated (cooling down or light
    /// off); otherwise spends the cooldown, stuns a hit monster, and
    /// reports the attempt.
    pub fn try_burst(
        &mut self,
        beam: &Pose,
        geometry: &dyn GeometryQuery,
        monsters: &mut [&mut MonsterBehavior],
        now: Seconds,
        events: &mut Vec<SimulationEvent>,
    ) -> bool {
        if now < self.next_ready {
            return false;
        }
        if self.config.require_light_on && !self.light_on {
            return false;
        }

        let hit = Self::beam_target(
            beam,
            geometry,
            monsters.iter().map(|m| &**m),
            self.config.burst_range,
        );
        if let Some(i) = hit {
            let monster = &mut *monsters[i];
            monster.apply_light_stun(self.config.stun_duration, now);
            events.push(SimulationEvent::MonsterStunned {
                monster: monster.id(),
                until: now + self.config.stun_duration,
            });
        }
        events.push(SimulationEvent::FlashlightBurst {
            stunned: hit.is_some(),
        });

        self.next_ready = now + self.config.cooldown;
        true
    }

    /// Passive beam dwell: growl when the lit beam rests on a monster.
    pub fn probe(
        &mut self,
        beam: &Pose,
        geometry: &dyn GeometryQuery,
        monsters: &[&MonsterBehavior],
        now: Seconds,
        events: &mut Vec<SimulationEvent>,
    ) {
        if !self.light_on || now < self.next_growl {
            return;
        }
        if let Some(i) = Self::beam_target(
            beam,
            geometry,
            monsters.iter().copied(),
            self.config.growl_range,
        ) {
            self.next_growl = now + self.config.growl_cooldown;
            events.push(SimulationEvent::MonsterGrowl {
                monster: monsters[i].id(),
            });
        }
    }
}
