//! Geometry query service
//!
//! The monster's senses and probes treat level geometry as a black box
//! answering raycast/linecast/sphere-cast questions against layered
//! occluders, plus "nearest navigable point" sampling. [`ObstacleField`] is
//! the axis-aligned reference implementation used by tests and the demo
//! binary; a real frontend would adapt its physics engine to this trait.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::Layers;
use crate::core::types::EntityId;

/// Result of a geometry query that struck something.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// World position of the hit point.
    pub point: Vec3,
    /// Distance from the query origin to the hit point.
    pub distance: f32,
    /// Entity the struck collider belongs to, when it belongs to one.
    pub entity: Option<EntityId>,
}

pub trait GeometryQuery {
    /// Nearest hit along a ray, filtered by layer mask.
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: Layers) -> Option<RayHit>;

    /// Nearest hit on the segment from `from` to `to`.
    fn linecast(&self, from: Vec3, to: Vec3, mask: Layers) -> Option<RayHit> {
        let delta = to - from;
        let len = delta.length();
        if len < 1e-5 {
            return None;
        }
        self.raycast(from, delta / len, len, mask)
    }

    /// Nearest hit of a sphere swept along a ray.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        dir: Vec3,
        max_dist: f32,
        mask: Layers,
    ) -> Option<RayHit>;

    /// Closest point on the navigable surface within `max_dist` of `point`,
    /// if one exists.
    fn sample_navigable(&self, point: Vec3, max_dist: f32) -> Option<Vec3>;
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on `center` extending `half` on each axis.
    pub fn centered(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    pub fn expanded(&self, by: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(by),
            max: self.max + Vec3::splat(by),
        }
    }

    /// Slab intersection: entry distance of `origin + t * dir` for
    /// t in [0, max_dist], or None.
    fn ray_entry(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_dist;
        for axis in 0..3 {
            let d = dir[axis];
            if d.abs() < 1e-8 {
                if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let mut t0 = (self.min[axis] - origin[axis]) * inv;
                let mut t1 = (self.max[axis] - origin[axis]) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }
}

/// One solid box in the field.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub layers: Layers,
    pub entity: Option<EntityId>,
}

/// A walkable rectangle of ground plus a set of solid boxes.
#[derive(Debug, Clone)]
pub struct ObstacleField {
    walkable: Aabb,
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// Open ground with no obstacles.
    pub fn open(walkable: Aabb) -> Self {
        Self {
            walkable,
            obstacles: Vec::new(),
        }
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Convenience for static level geometry.
    pub fn add_wall(&mut self, bounds: Aabb) {
        self.add(Obstacle {
            bounds,
            layers: Layers::LEVEL,
            entity: None,
        });
    }

    pub fn walkable(&self) -> Aabb {
        self.walkable
    }

    fn nearest(
        &self,
        mask: Layers,
        mut entry: impl FnMut(&Aabb) -> Option<f32>,
        origin: Vec3,
        dir: Vec3,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for obstacle in &self.obstacles {
            if !obstacle.layers.intersects(mask) {
                continue;
            }
            if let Some(t) = entry(&obstacle.bounds) {
                if best.map_or(true, |b| t < b.distance) {
                    best = Some(RayHit {
                        point: origin + dir * t,
                        distance: t,
                        entity: obstacle.entity,
                    });
                }
            }
        }
        best
    }
}

impl GeometryQuery for ObstacleField {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: Layers) -> Option<RayHit> {
        if dir.length_squared() < 1e-8 || max_dist <= 0.0 {
            return None;
        }
        let dir = dir.normalize();
        self.nearest(mask, |b| b.ray_entry(origin, dir, max_dist), origin, dir)
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        dir: Vec3,
        max_dist: f32,
        mask: Layers,
    ) -> Option<RayHit> {
        if dir.length_squared() < 1e-8 || max_dist <= 0.0 {
            return None;
        }
        let dir = dir.normalize();
        // Conservative: sweep against boxes inflated by the sphere radius.
        self.nearest(
            mask,
            |b| b.expanded(radius).ray_entry(origin, dir, max_dist),
            origin,
            dir,
        )
    }

    fn sample_navigable(&self, point: Vec3, max_dist: f32) -> Option<Vec3> {
        let clamped = self.walkable.closest_point(point);
        let snapped = Vec3::new(clamped.x, self.walkable.min.y, clamped.z);
        (snapped.distance(point) <= max_dist).then_some(snapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with_wall() -> ObstacleField {
        let mut field = ObstacleField::open(Aabb::new(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(20.0, 0.0, 20.0),
        ));
        field.add_wall(Aabb::new(Vec3::new(-1.0, 0.0, 4.0), Vec3::new(1.0, 3.0, 5.0)));
        field
    }

    #[test]
    fn test_raycast_hits_wall() {
        let field = field_with_wall();
        let hit = field
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0, Layers::LEVEL)
            .expect("should hit the wall");
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_mask() {
        let field = field_with_wall();
        let hit = field.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0, Layers::MONSTER);
        assert!(hit.is_none());
    }

    #[test]
    fn test_raycast_misses_past_range() {
        let field = field_with_wall();
        let hit = field.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 3.0, Layers::LEVEL);
        assert!(hit.is_none());
    }

    #[test]
    fn test_linecast_blocked_and_clear() {
        let field = field_with_wall();
        let a = Vec3::new(0.0, 1.0, 0.0);
        let behind_wall = Vec3::new(0.0, 1.0, 8.0);
        assert!(field.linecast(a, behind_wall, Layers::LEVEL).is_some());

        let beside_wall = Vec3::new(5.0, 1.0, 8.0);
        assert!(field.linecast(a, beside_wall, Layers::LEVEL).is_none());
    }

    #[test]
    fn test_sphere_cast_clips_near_edge() {
        let field = field_with_wall();
        // A thin ray slides past the wall edge; a fat sphere does not.
        let origin = Vec3::new(1.3, 1.0, 0.0);
        assert!(field.raycast(origin, Vec3::Z, 20.0, Layers::LEVEL).is_none());
        assert!(field
            .sphere_cast(origin, 0.5, Vec3::Z, 20.0, Layers::LEVEL)
            .is_some());
    }

    #[test]
    fn test_sample_navigable_clamps() {
        let field = field_with_wall();
        let sampled = field.sample_navigable(Vec3::new(25.0, 0.0, 0.0), 6.0);
        assert_eq!(sampled, Some(Vec3::new(20.0, 0.0, 0.0)));

        let too_far = field.sample_navigable(Vec3::new(40.0, 0.0, 0.0), 6.0);
        assert!(too_far.is_none());
    }
}
