//! Respawn orchestration
//!
//! When sanity depletes, a life is spent and, if any remain, the player
//! is returned to the spawn pose after a short deadline, sanity restored,
//! while every monster is suppressed for a grace window and warped away
//! from the spawn. All waits are clock deadlines.

use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Small wait before the player is moved, leaving room for a fade.
    pub respawn_delay: Seconds,
    pub restore_sanity: bool,
    /// Monster suppression window after the respawn.
    pub grace_seconds: Seconds,
    /// Minimum distance the monster is warped away from the spawn.
    pub warp_min_distance: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            respawn_delay: 0.25,
            restore_sanity: true,
            grace_seconds: 3.0,
            warp_min_distance: 12.0,
        }
    }
}

/// Deadline holder for the pending respawn, if any.
#[derive(Debug, Clone)]
pub struct RespawnController {
    config: RespawnConfig,
    pending_at: Option<Seconds>,
}

impl RespawnController {
    pub fn new(config: RespawnConfig) -> Self {
        Self {
            config,
            pending_at: None,
        }
    }

    pub fn config(&self) -> &RespawnConfig {
        &self.config
    }

    pub fn is_pending(&self) -> bool {
        self.pending_at.is_some()
    }

    pub fn schedule(&mut self, now: Seconds) {
        self.pending_at = Some(now + self.config.respawn_delay);
    }

    /// True exactly once, when the pending deadline passes.
    pub fn take_due(&mut self, now: Seconds) -> bool {
        match self.pending_at {
            Some(at) if now >= at => {
                self.pending_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_fires_once_after_delay() {
        let mut respawn = RespawnController::new(RespawnConfig::default());
        assert!(!respawn.take_due(0.0));
        respawn.schedule(0.0);
        assert!(!respawn.take_due(0.1));
        assert!(respawn.take_due(0.3));
        assert!(!respawn.take_due(0.4));
    }
}
