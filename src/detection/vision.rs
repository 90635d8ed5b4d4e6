//! Sight: range, field of view, and line of sight, with short-term memory

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{DetectionContext, DetectionResult, DetectionStrategy};
use crate::core::types::Seconds;
use crate::spatial::{horizontal_angle_deg, Layers};

/// Tunables for sight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Maximum eye-to-eye distance at which the target can be seen.
    /// Boundary inclusive: a target exactly at this range is visible.
    pub detection_range: f32,
    /// Full cone angle in degrees; the check is against half of it on
    /// either side of the facing direction.
    pub field_of_view_deg: f32,
    /// Height above the ground at which both pairs of eyes sit, so a rail
    /// or low crate does not block sight.
    pub eye_height: f32,
    /// When true, an occluder between the eyes defeats the other checks.
    pub require_line_of_sight: bool,
    /// Layers that count as occluders for the line-of-sight test.
    pub occluders: Layers,
    /// How long a lost target is still reported at its last seen position.
    pub memory_seconds: Seconds,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            detection_range: 10.0,
            field_of_view_deg: 120.0,
            eye_height: 1.6,
            require_line_of_sight: true,
            occluders: Layers::LEVEL,
            memory_seconds: 1.5,
        }
    }
}

pub struct VisionDetection {
    config: VisionConfig,
    last_seen_pos: Vec3,
    last_seen_time: Seconds,
}

impl VisionDetection {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            last_seen_pos: Vec3::ZERO,
            last_seen_time: f32::NEG_INFINITY,
        }
    }

    fn fallback(&self, now: Seconds) -> DetectionResult {
        if now - self.last_seen_time <= self.config.memory_seconds {
            DetectionResult::remembered(self.last_seen_pos)
        } else {
            DetectionResult::miss()
        }
    }
}

impl DetectionStrategy for VisionDetection {
    fn detect(&mut self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let eye = Vec3::Y * self.config.eye_height;
        let from = ctx.owner.position + eye;
        let to = ctx.target.pose.position + eye;

        let dist = from.distance(to);
        if dist > self.config.detection_range {
            return self.fallback(ctx.now);
        }

        let angle = horizontal_angle_deg(ctx.owner.forward, to - from);
        if angle > self.config.field_of_view_deg * 0.5 {
            return self.fallback(ctx.now);
        }

        if self.config.require_line_of_sight {
            if let Some(hit) = ctx.geometry.linecast(from, to, self.config.occluders) {
                if hit.entity != Some(ctx.target.id) {
                    return self.fallback(ctx.now);
                }
            }
        }

        self.last_seen_pos = ctx.target.pose.position;
        self.last_seen_time = ctx.now;
        DetectionResult::spotted(self.last_seen_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::detection::Target;
    use crate::spatial::{Aabb, ObstacleField, Pose};

    fn open_field() -> ObstacleField {
        ObstacleField::open(Aabb::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
        ))
    }

    fn ctx_at<'a>(
        geometry: &'a ObstacleField,
        target_pos: Vec3,
        now: Seconds,
    ) -> DetectionContext<'a> {
        DetectionContext {
            owner: Pose::new(Vec3::ZERO, Vec3::Z),
            target: Target {
                id: EntityId::new(),
                pose: Pose::at(target_pos),
            },
            geometry,
            now,
        }
    }

    #[test]
    fn test_detects_at_exact_range_boundary() {
        let field = open_field();
        let mut vision = VisionDetection::new(VisionConfig::default());

        let at_range = ctx_at(&field, Vec3::new(0.0, 0.0, 10.0), 0.0);
        assert!(vision.detect(&at_range).detected);

        let past_range = ctx_at(&field, Vec3::new(0.0, 0.0, 10.01), 100.0);
        assert!(!vision.detect(&past_range).detected);
    }

    #[test]
    fn test_half_fov_edge() {
        let field = open_field();
        let mut vision = VisionDetection::new(VisionConfig::default());

        // 120 degree cone: just inside 60 degrees off forward is seen,
        // just outside is not. (The exact edge is inclusive by the `>`
        // comparison but not representable exactly in floats.)
        let rad = 59.9f32.to_radians();
        let inside = Vec3::new(rad.sin(), 0.0, rad.cos()) * 5.0;
        assert!(vision.detect(&ctx_at(&field, inside, 0.0)).detected);

        let rad = 60.1f32.to_radians();
        let outside = Vec3::new(rad.sin(), 0.0, rad.cos()) * 5.0;
        assert!(!vision.detect(&ctx_at(&field, outside, 100.0)).detected);
    }

    #[test]
    fn test_occluder_blocks_and_memory_coasts() {
        let mut field = open_field();
        field.add_wall(Aabb::new(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 3.0, 5.0)));
        let mut vision = VisionDetection::new(VisionConfig::default());

        // Seen in the open, then steps behind the wall.
        let seen = vision.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 3.0), 0.0));
        assert!(seen.detected);

        let hidden = vision.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 8.0), 1.0));
        assert!(!hidden.detected);
        assert_eq!(hidden.perceived_position, Some(Vec3::new(0.0, 0.0, 3.0)));

        // Memory expires.
        let forgotten = vision.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 8.0), 10.0));
        assert!(!forgotten.detected);
        assert!(forgotten.perceived_position.is_none());
    }

    #[test]
    fn test_behind_owner_not_detected() {
        let field = open_field();
        let mut vision = VisionDetection::new(VisionConfig::default());
        let behind = ctx_at(&field, Vec3::new(0.0, 0.0, -5.0), 0.0);
        assert!(!vision.detect(&behind).detected);
    }
}
