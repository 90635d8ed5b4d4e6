//! The monster: behavior state machine, patrol routes, spawn placement,
//! and the ambience signals it feeds.

pub mod aura;
pub mod behavior;
pub mod patrol;
pub mod spawn;

pub use aura::{AuraConfig, ProximityAura};
pub use behavior::{MonsterBehavior, MonsterConfig, MonsterState};
pub use patrol::{PatrolPlan, StuckConfig, StuckMonitor, TraversalMode};
pub use spawn::SpawnRegistry;
