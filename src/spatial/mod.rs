//! Spatial primitives and the narrow contracts the core consumes from the
//! surrounding engine: geometry queries (occlusion, probes, surface
//! sampling) and the path-following agent that actually moves a body.

pub mod agent;
pub mod query;

pub use agent::{DirectAgent, PathAgent};
pub use query::{Aabb, GeometryQuery, Obstacle, ObstacleField, RayHit};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Squared magnitude below which a direction is considered degenerate and
/// facing/angle math is skipped.
pub const MIN_DIRECTION_SQ: f32 = 1e-4;

/// Position and facing of an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Pose {
    /// Build a pose, normalizing the facing vector. A degenerate facing
    /// falls back to +Z.
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let forward = if forward.length_squared() < MIN_DIRECTION_SQ {
            Vec3::Z
        } else {
            forward.normalize()
        };
        Self { position, forward }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Z)
    }
}

/// Bitmask of collision layers for filtering geometry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layers(pub u32);

impl Layers {
    pub const NONE: Layers = Layers(0);
    /// Static level geometry: walls, boarded doors, furniture.
    pub const LEVEL: Layers = Layers(1);
    pub const MONSTER: Layers = Layers(1 << 1);
    pub const PLAYER: Layers = Layers(1 << 2);
    pub const ALL: Layers = Layers(u32::MAX);

    pub fn intersects(&self, other: Layers) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Layers {
    type Output = Layers;
    fn bitor(self, rhs: Layers) -> Layers {
        Layers(self.0 | rhs.0)
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::ALL
    }
}

/// Project a vector onto the ground plane.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal angle in degrees between two directions, ignoring pitch.
/// Returns 0 when either direction is degenerate after flattening.
pub fn horizontal_angle_deg(a: Vec3, b: Vec3) -> f32 {
    let a = flatten(a);
    let b = flatten(b);
    if a.length_squared() < MIN_DIRECTION_SQ || b.length_squared() < MIN_DIRECTION_SQ {
        return 0.0;
    }
    let cos = a.normalize().dot(b.normalize()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Distance along a ray at which it first intersects a sphere, if it does.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let proj = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - proj * proj;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let t = if proj - half_chord >= 0.0 {
        proj - half_chord
    } else {
        proj + half_chord
    };
    (t >= 0.0).then_some(t)
}
