pub mod events;
pub mod respawn;
pub mod tick;
pub mod world;

pub use events::SimulationEvent;
pub use respawn::{RespawnConfig, RespawnController};
pub use tick::run_simulation_tick;
pub use world::{MonsterSlot, World};
