//! Monster spawn points

use glam::Vec3;
use ordered_float::OrderedFloat;
use rand::Rng;

use super::behavior::MonsterBehavior;
use crate::spatial::{GeometryQuery, Pose};

/// The level's monster spawn poses. Placement picks one at random and warps
/// the monster there, snapping onto the navigable surface when possible.
#[derive(Debug, Clone, Default)]
pub struct SpawnRegistry {
    points: Vec<Pose>,
}

impl SpawnRegistry {
    pub fn new(points: Vec<Pose>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add(&mut self, pose: Pose) {
        self.points.push(pose);
    }

    pub fn random(&self, rng: &mut impl Rng) -> Option<Pose> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points[rng.gen_range(0..self.points.len())])
    }

    /// Spawn pose farthest from `from`, used to restart the hunt away from
    /// the player.
    pub fn farthest_from(&self, from: Vec3) -> Option<Pose> {
        self.points
            .iter()
            .max_by_key(|p| OrderedFloat(p.position.distance_squared(from)))
            .copied()
    }

    /// Warp `monster` onto a random spawn pose. Returns where it landed, or
    /// None when no spawn points are registered.
    pub fn place(
        &self,
        monster: &mut MonsterBehavior,
        geometry: &dyn GeometryQuery,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        let pose = self.random(rng)?;
        let position = geometry
            .sample_navigable(pose.position, 1.0)
            .unwrap_or(pose.position);
        monster.place_at(Pose::new(position, pose.forward));
        Some(position)
    }
}
