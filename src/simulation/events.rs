//! Events generated during simulation ticks
//!
//! Returned by `run_simulation_tick` for the frontend layers (audio cues,
//! UI, logging). The core never talks to those layers directly.

use glam::Vec3;
use serde::Serialize;

use crate::core::types::{EntityId, Seconds};
use crate::monster::MonsterState;

#[derive(Debug, Clone, Serialize)]
pub enum SimulationEvent {
    /// A monster's behavior state changed
    MonsterStateChanged {
        monster: EntityId,
        from: MonsterState,
        to: MonsterState,
    },
    /// Detection stinger: play the "noticed you" sound. Fired at most once
    /// per detection episode.
    DetectionStinger { monster: EntityId },
    /// A monster was stunned by the flashlight burst
    MonsterStunned { monster: EntityId, until: Seconds },
    /// A monster was relocated (respawn grace or spawn placement)
    MonsterWarped { monster: EntityId, to: Vec3 },
    /// A patrol waypoint was skipped because progress stalled
    WaypointSkipped { monster: EntityId, index: usize },
    /// Growl cue: the lit flashlight beam is resting on a monster
    MonsterGrowl { monster: EntityId },
    /// Proximity dread level for ambience/UI, throttled
    AuraPulse { monster: EntityId, level: f32 },
    /// The player took a step; play a footstep sound
    Footstep { running: bool },
    /// A flashlight burst was fired
    FlashlightBurst { stunned: bool },
    /// The player's sanity took contact damage this tick
    SanityDamaged { amount: f32, remaining: f32 },
    /// Sanity hit zero; a respawn (or game over) follows
    SanityDepleted,
    /// The player was placed back at the spawn point
    PlayerRespawned { lives_left: u32 },
    /// No lives left
    GameOver,
    /// A note was collected toward the current quest phase
    NoteCollected {
        phase: usize,
        collected: u32,
        required: u32,
    },
    /// Completing a phase dropped a tool pickup
    ToolSpawned { phase: usize },
    /// The quest advanced to a new phase
    PhaseAdvanced { phase: usize },
    /// All phases complete; the level exit is open
    ExitUnlocked,
    /// The player reached the unlocked exit
    GoalReached,
}
