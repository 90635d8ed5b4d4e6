//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities (player, monsters, level props)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation time in seconds
pub type Seconds = f32;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Monotonically increasing simulation clock.
///
/// All timers in the core (stun deadlines, suppression windows, detection
/// memory, step cadence) are deadlines compared against this clock; nothing
/// suspends mid-tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: Seconds,
    tick: Tick,
    delta: Seconds,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick by `dt` seconds.
    pub fn advance(&mut self, dt: Seconds) {
        self.now += dt;
        self.tick += 1;
        self.delta = dt;
    }

    /// Current simulation time in seconds.
    pub fn now(&self) -> Seconds {
        self.now
    }

    /// Number of ticks advanced so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Duration of the most recent tick.
    pub fn delta(&self) -> Seconds {
        self.delta
    }
}
