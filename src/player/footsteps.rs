//! Footstep cadence and the noise it feeds into the emitter

use serde::{Deserialize, Serialize};

use super::Stance;
use crate::core::types::Seconds;
use crate::noise::NoiseEmitter;
use crate::simulation::events::SimulationEvent;

/// Tunables for step cadence and loudness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    pub walk_step_interval: Seconds,
    pub run_step_interval: Seconds,
    pub crouch_step_interval: Seconds,
    /// Noise added per walking step. Roughly a third of the bar, so two
    /// quick steps put a walker just over the default hearing threshold.
    pub walk_noise_factor: f32,
    /// Noise added per running step.
    pub run_noise_factor: f32,
    /// Horizontal speed below which no steps are taken.
    pub min_move_speed: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            walk_step_interval: 0.44,
            run_step_interval: 0.30,
            crouch_step_interval: 0.60,
            walk_noise_factor: 0.33,
            run_noise_factor: 0.70,
            min_move_speed: 0.1,
        }
    }
}

/// Counts down between steps while the player moves on the ground. Each
/// step adds noise (crouched steps are slow and silent) and emits a
/// footstep cue for the audio layer.
#[derive(Debug, Clone)]
pub struct Footsteps {
    config: FootstepConfig,
    step_timer: Seconds,
}

impl Footsteps {
    pub fn new(config: FootstepConfig) -> Self {
        Self {
            config,
            step_timer: 0.0,
        }
    }

    pub fn update(
        &mut self,
        horizontal_speed: f32,
        grounded: bool,
        stance: Stance,
        dt: Seconds,
        noise: &mut NoiseEmitter,
        events: &mut Vec<SimulationEvent>,
    ) {
        if !grounded || horizontal_speed <= self.config.min_move_speed {
            self.step_timer = 0.0;
            return;
        }

        self.step_timer -= dt;
        if self.step_timer > 0.0 {
            return;
        }

        match stance {
            Stance::Crouching => {
                self.step_timer = self.config.crouch_step_interval;
            }
            Stance::Walking => {
                noise.add_normalized(self.config.walk_noise_factor);
                events.push(SimulationEvent::Footstep { running: false });
                self.step_timer = self.config.walk_step_interval;
            }
            Stance::Sprinting => {
                noise.add_normalized(self.config.run_noise_factor);
                events.push(SimulationEvent::Footstep { running: true });
                self.step_timer = self.config.run_step_interval;
            }
        }
    }
}
