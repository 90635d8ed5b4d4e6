//! The player entity: pose, movement stance, footstep noise, sanity,
//! lives, and the flashlight. Input handling and camera are out of scope;
//! the demo binary drives movement directly.

pub mod flashlight;
pub mod footsteps;
pub mod lives;
pub mod sanity;

pub use flashlight::{FlashlightAttack, FlashlightConfig};
pub use footsteps::{FootstepConfig, Footsteps};
pub use lives::{LivesConfig, LivesSystem};
pub use sanity::{SanityConfig, SanitySystem};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Seconds};
use crate::spatial::{flatten, Pose, MIN_DIRECTION_SQ};

/// Movement stances, each with its own speed and step profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Walking,
    Sprinting,
    Crouching,
}

/// Movement speeds per stance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_speed: 6.5,
            crouch_speed: 2.0,
        }
    }
}

pub struct Player {
    pub id: EntityId,
    pub pose: Pose,
    pub stance: Stance,
    pub grounded: bool,
    pub footsteps: Footsteps,
    pub sanity: SanitySystem,
    config: PlayerConfig,
    current_speed: f32,
}

impl Player {
    pub fn new(
        pose: Pose,
        config: PlayerConfig,
        footsteps: Footsteps,
        sanity: SanitySystem,
    ) -> Self {
        Self {
            id: EntityId::new(),
            pose,
            stance: Stance::Walking,
            grounded: true,
            footsteps,
            sanity,
            config,
            current_speed: 0.0,
        }
    }

    pub fn speed_for(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Walking => self.config.walk_speed,
            Stance::Sprinting => self.config.sprint_speed,
            Stance::Crouching => self.config.crouch_speed,
        }
    }

    /// Horizontal speed from the most recent movement call; feeds the
    /// footstep cadence.
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Move in `dir` at the stance's speed for one tick. A degenerate
    /// direction means standing still.
    pub fn apply_move(&mut self, dir: Vec3, stance: Stance, dt: Seconds) {
        self.stance = stance;
        let dir = flatten(dir);
        if dir.length_squared() < MIN_DIRECTION_SQ {
            self.current_speed = 0.0;
            return;
        }
        let dir = dir.normalize();
        let speed = self.speed_for(stance);
        self.pose.position += dir * speed * dt;
        self.pose.forward = dir;
        self.current_speed = speed;
    }

    /// Teleport to `pose`, zeroing movement (respawn).
    pub fn teleport(&mut self, pose: Pose) {
        self.pose = pose;
        self.current_speed = 0.0;
    }

    /// Consume the per-tick motion state once the footstep system has read
    /// it; movement is re-applied from input every tick.
    pub(crate) fn end_tick_motion(&mut self) {
        self.current_speed = 0.0;
    }
}
