//! Lives across respawns

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivesConfig {
    pub starting_lives: u32,
}

impl Default for LivesConfig {
    fn default() -> Self {
        Self { starting_lives: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct LivesSystem {
    lives: u32,
    starting: u32,
}

impl LivesSystem {
    pub fn new(config: &LivesConfig) -> Self {
        Self {
            lives: config.starting_lives,
            starting: config.starting_lives,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.lives
    }

    pub fn is_out(&self) -> bool {
        self.lives == 0
    }

    /// Spend one life; returns how many remain.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn reset(&mut self) {
        self.lives = self.starting;
    }
}
