//! Patrol routes and stall recovery

use glam::Vec3;
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Seconds;

/// How a route's waypoints are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalMode {
    /// 0,1,2,...,n-1,0,1,...
    Sequential,
    /// Bounce at the ends without re-touching an endpoint twice in a row:
    /// 0,1,2,3,2,1,0,1,...
    PingPong,
    /// Uniformly random, resampled to never repeat the current waypoint.
    Random,
}

/// An ordered set of waypoints plus traversal state. Swappable at runtime;
/// swapping resets the traversal to the first waypoint.
#[derive(Debug, Clone)]
pub struct PatrolPlan {
    points: Vec<Vec3>,
    mode: TraversalMode,
    index: usize,
    dir: i32,
}

impl PatrolPlan {
    pub fn new(points: Vec<Vec3>, mode: TraversalMode) -> Self {
        Self {
            points,
            mode,
            index: 0,
            dir: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Current waypoint, if the route has any.
    pub fn current(&self) -> Option<Vec3> {
        self.points.get(self.index.min(self.points.len().saturating_sub(1))).copied()
    }

    /// Replace the waypoints, restarting traversal from the first.
    pub fn set_points(&mut self, points: Vec<Vec3>) {
        self.points = points;
        self.index = 0;
        self.dir = 1;
    }

    /// Start traversal at the waypoint closest to `position`.
    pub fn start_at_closest(&mut self, position: Vec3) {
        if let Some((i, _)) = self
            .points
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| OrderedFloat(p.distance_squared(position)))
        {
            self.index = i;
        }
    }

    /// Move to the next waypoint per the traversal mode.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        let len = self.points.len();
        if len <= 1 {
            return;
        }
        match self.mode {
            TraversalMode::Sequential => {
                self.index = (self.index + 1) % len;
            }
            TraversalMode::Random => {
                let mut next = self.index;
                while next == self.index {
                    next = rng.gen_range(0..len);
                }
                self.index = next;
            }
            TraversalMode::PingPong => {
                // Two-point routes degenerate to plain alternation; the
                // asymmetric turnaround below needs at least three points.
                if len == 2 {
                    self.index = 1 - self.index;
                    return;
                }
                let next = self.index as i32 + self.dir;
                if next >= len as i32 {
                    self.index = len - 2;
                    self.dir = -1;
                } else if next < 0 {
                    self.index = 1;
                    self.dir = 1;
                } else {
                    self.index = next as usize;
                }
            }
        }
    }
}

/// Tunables for patrol stall recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StuckConfig {
    /// Seconds between displacement samples.
    pub check_every: Seconds,
    /// Displacement speed below which the agent counts as stalled.
    pub speed_threshold: f32,
    /// Continuous stall time after which the current waypoint is skipped.
    pub seconds_to_skip: Seconds,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            check_every: 0.25,
            speed_threshold: 0.05,
            seconds_to_skip: 2.0,
        }
    }
}

/// Watches displacement while the agent is trying to move; reports when the
/// current waypoint should be skipped because progress has stalled (door
/// boarded shut, route point sitting inside re-arranged furniture).
#[derive(Debug, Clone)]
pub struct StuckMonitor {
    config: StuckConfig,
    last_pos: Option<Vec3>,
    last_sample: Seconds,
    stalled: Seconds,
}

impl StuckMonitor {
    pub fn new(config: StuckConfig) -> Self {
        Self {
            config,
            last_pos: None,
            last_sample: 0.0,
            stalled: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.last_pos = None;
        self.stalled = 0.0;
    }

    /// Feed one position sample. Returns true when the waypoint should be
    /// skipped.
    pub fn sample(&mut self, position: Vec3, trying_to_move: bool, now: Seconds) -> bool {
        let Some(last) = self.last_pos else {
            self.last_pos = Some(position);
            self.last_sample = now;
            return false;
        };
        let interval = now - self.last_sample;
        if interval < self.config.check_every {
            return false;
        }
        let speed = position.distance(last) / interval;
        self.last_pos = Some(position);
        self.last_sample = now;

        if trying_to_move && speed < self.config.speed_threshold {
            self.stalled += interval;
        } else {
            self.stalled = 0.0;
        }
        if self.stalled >= self.config.seconds_to_skip {
            self.stalled = 0.0;
            return true;
        }
        false
    }
}
