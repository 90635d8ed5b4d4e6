//! Path-following agent contract
//!
//! Movement planning is an external capability: the behavior layer only
//! ever states an intent (destination + speed) and asks whether the body is
//! on a navigable surface. [`DirectAgent`] is the reference implementation
//! used by tests and the demo; it walks straight lines and turns with a
//! bounded rate, which is enough to exercise every behavior path.

use glam::Vec3;

use super::{flatten, Pose, MIN_DIRECTION_SQ};
use crate::core::types::Seconds;

pub trait PathAgent {
    fn pose(&self) -> Pose;

    /// Whether the body currently stands on a navigable surface. When
    /// false, behavior degrades to hold-position.
    fn is_on_surface(&self) -> bool;

    fn set_destination(&mut self, point: Vec3);

    fn reset_path(&mut self);

    fn set_speed(&mut self, speed: f32);

    fn set_stopped(&mut self, stopped: bool);

    /// Teleport, bypassing path planning.
    fn warp(&mut self, point: Vec3);

    /// Turn toward `point` at `turn_speed` (fraction of the remaining
    /// rotation per second, matching a damped slerp).
    fn face_toward(&mut self, point: Vec3, turn_speed: f32, dt: Seconds);

    /// Integrate movement for one tick. Driven by the simulation loop, not
    /// by the behavior layer.
    fn advance(&mut self, dt: Seconds);
}

/// Straight-line reference agent.
#[derive(Debug, Clone)]
pub struct DirectAgent {
    pose: Pose,
    destination: Option<Vec3>,
    speed: f32,
    stopped: bool,
    on_surface: bool,
}

impl DirectAgent {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            destination: None,
            speed: 0.0,
            stopped: false,
            on_surface: true,
        }
    }

    /// Mark the agent as off the navigable surface (test hook for the
    /// degraded hold-position mode).
    pub fn set_on_surface(&mut self, on_surface: bool) {
        self.on_surface = on_surface;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl PathAgent for DirectAgent {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn is_on_surface(&self) -> bool {
        self.on_surface
    }

    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
    }

    fn reset_path(&mut self) {
        self.destination = None;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn warp(&mut self, point: Vec3) {
        self.pose.position = point;
        self.destination = None;
    }

    fn face_toward(&mut self, point: Vec3, turn_speed: f32, dt: Seconds) {
        let dir = flatten(point - self.pose.position);
        if dir.length_squared() < MIN_DIRECTION_SQ {
            return;
        }
        let target = dir.normalize();
        let t = (turn_speed * dt).clamp(0.0, 1.0);
        let blended = self.pose.forward.lerp(target, t);
        if blended.length_squared() >= MIN_DIRECTION_SQ {
            self.pose.forward = blended.normalize();
        }
    }

    fn advance(&mut self, dt: Seconds) {
        if self.stopped || self.speed <= 0.0 {
            return;
        }
        let Some(dest) = self.destination else {
            return;
        };
        let to_dest = dest - self.pose.position;
        let dist = to_dest.length();
        if dist < 1e-4 {
            return;
        }
        let step = (self.speed * dt).min(dist);
        let dir = to_dest / dist;
        self.pose.position += dir * step;
        let facing = flatten(dir);
        if facing.length_squared() >= MIN_DIRECTION_SQ {
            self.pose.forward = facing.normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_toward_destination() {
        let mut agent = DirectAgent::new(Pose::at(Vec3::ZERO));
        agent.set_speed(2.0);
        agent.set_destination(Vec3::new(0.0, 0.0, 10.0));
        agent.advance(1.0);
        assert!((agent.pose().position.z - 2.0).abs() < 1e-5);
        assert!((agent.pose().forward - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_advance_does_not_overshoot() {
        let mut agent = DirectAgent::new(Pose::at(Vec3::ZERO));
        agent.set_speed(100.0);
        agent.set_destination(Vec3::new(0.0, 0.0, 3.0));
        agent.advance(1.0);
        assert!((agent.pose().position.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_stopped_agent_holds() {
        let mut agent = DirectAgent::new(Pose::at(Vec3::ZERO));
        agent.set_speed(2.0);
        agent.set_destination(Vec3::new(0.0, 0.0, 10.0));
        agent.set_stopped(true);
        agent.advance(1.0);
        assert_eq!(agent.pose().position, Vec3::ZERO);
    }

    #[test]
    fn test_warp_clears_path() {
        let mut agent = DirectAgent::new(Pose::at(Vec3::ZERO));
        agent.set_destination(Vec3::new(5.0, 0.0, 5.0));
        agent.warp(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(agent.pose().position, Vec3::new(1.0, 0.0, 1.0));
        assert!(agent.destination().is_none());
    }
}
