//! Hearing: a spatial volume plus noise-level gating with hysteresis

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{DetectionContext, DetectionResult, DetectionStrategy};
use crate::core::types::Seconds;
use crate::noise::NoiseTap;

/// Convex hearing region centered on the monster, axis-aligned in its
/// local frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum HearingVolume {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    Capsule { radius: f32, half_height: f32 },
}

impl HearingVolume {
    /// Closest point of the volume (centered at `center`) to `point`.
    pub fn closest_point(&self, center: Vec3, point: Vec3) -> Vec3 {
        let local = point - center;
        let clamped = match *self {
            HearingVolume::Sphere { radius } => {
                if local.length_squared() <= radius * radius {
                    local
                } else {
                    local.normalize_or_zero() * radius
                }
            }
            HearingVolume::Box { half_extents } => local.clamp(-half_extents, half_extents),
            HearingVolume::Capsule {
                radius,
                half_height,
            } => {
                // Closest point on the core segment, then clamp radially.
                let spine_y = local.y.clamp(-half_height, half_height);
                let from_spine = local - Vec3::new(0.0, spine_y, 0.0);
                let from_spine = if from_spine.length_squared() <= radius * radius {
                    from_spine
                } else {
                    from_spine.normalize_or_zero() * radius
                };
                Vec3::new(0.0, spine_y, 0.0) + from_spine
            }
        };
        center + clamped
    }

    /// Containment via the closest-point test: inside means the closest
    /// point is the point itself.
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        (self.closest_point(center, point) - point).length_squared() <= 1e-6
    }
}

impl Default for HearingVolume {
    fn default() -> Self {
        HearingVolume::Sphere { radius: 12.0 }
    }
}

/// Tunables for hearing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Noise level at which the monster latches onto the sound.
    pub threshold_on: f32,
    /// Noise level below which the sound is released. Must sit under
    /// `threshold_on`; the band between the two is the hysteresis dead
    /// zone where recent-memory keeps the prior state sticky.
    pub threshold_off: f32,
    /// How long a heard target is still reported at its last anchor.
    pub memory_seconds: Seconds,
    pub volume: HearingVolume,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            threshold_on: 0.15,
            threshold_off: 0.10,
            memory_seconds: 1.5,
            volume: HearingVolume::default(),
        }
    }
}

/// Hearing strategy.
///
/// `target_in_volume` is fed by enter/exit notifications AND re-checked
/// geometrically every poll; either mechanism suffices. Trigger callbacks
/// can be missed around teleports, so the per-poll test is the backstop.
pub struct SoundDetection {
    config: SoundConfig,
    tap: NoiseTap,
    target_in_volume: bool,
    last_heard_pos: Vec3,
    last_heard_time: Seconds,
}

impl SoundDetection {
    /// `tap` must come from the noise channel this monster should hear.
    pub fn new(config: SoundConfig, tap: NoiseTap) -> Self {
        Self {
            config,
            tap,
            target_in_volume: false,
            last_heard_pos: Vec3::ZERO,
            last_heard_time: f32::NEG_INFINITY,
        }
    }

    fn remembers(&self, now: Seconds) -> bool {
        now - self.last_heard_time <= self.config.memory_seconds
    }
}

impl DetectionStrategy for SoundDetection {
    fn detect(&mut self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let in_range = self.target_in_volume
            || self
                .config
                .volume
                .contains(ctx.owner.position, ctx.target.pose.position);

        let noise = self.tap.level();
        let loud = if noise >= self.config.threshold_on {
            true
        } else if noise <= self.config.threshold_off {
            false
        } else {
            self.remembers(ctx.now)
        };

        if in_range && loud {
            self.last_heard_pos = ctx.target.pose.position;
            self.last_heard_time = ctx.now;
            return DetectionResult::spotted(self.last_heard_pos);
        }

        if self.remembers(ctx.now) {
            return DetectionResult::remembered(self.last_heard_pos);
        }
        DetectionResult::miss()
    }

    fn hearing_volume(&self) -> Option<HearingVolume> {
        Some(self.config.volume)
    }

    fn notify_volume(&mut self, entered: bool) {
        self.target_in_volume = entered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::detection::Target;
    use crate::noise::{NoiseConfig, NoiseEmitter};
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
    fn test_volume_closest_point_shapes() {
        let sphere = HearingVolume::Sphere { radius: 2.0 };
        assert!(sphere.contains(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)));
        assert!(!sphere.contains(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)));

        let boxy = HearingVolume::Box {
            half_extents: Vec3::new(2.0, 1.0, 2.0),
        };
        assert!(boxy.contains(Vec3::ZERO, Vec3::new(1.9, 0.5, -1.9)));
        assert!(!boxy.contains(Vec3::ZERO, Vec3::new(0.0, 1.5, 0.0)));

        let capsule = HearingVolume::Capsule {
            radius: 1.0,
            half_height: 2.0,
        };
        assert!(capsule.contains(Vec3::ZERO, Vec3::new(0.0, 2.5, 0.0)));
        assert!(!capsule.contains(Vec3::ZERO, Vec3::new(0.0, 3.5, 0.0)));
    }

    #[test]
    fn test_hysteresis_latch_and_release() {
        let field = open_field();
        let mut noise = NoiseEmitter::new(&NoiseConfig::default());
        let mut hearing = SoundDetection::new(SoundConfig::default(), noise.channel().tap());

        // Exactly at threshold_on: latches.
        noise.add_normalized(0.15);
        assert!(hearing.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 3.0), 0.0)).detected);

        // Dead zone, recently heard: stays loud.
        noise.add_normalized(-0.03);
        assert!(hearing.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 3.0), 0.5)).detected);

        // Below threshold_off: releases, but memory still points home.
        noise.add_normalized(-0.05);
        let released = hearing.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 3.0), 1.0));
        assert!(!released.detected);
        assert!(released.perceived_position.is_some());
    }

    #[test]
    fn test_dead_zone_without_memory_is_quiet() {
        let field = open_field();
        let mut noise = NoiseEmitter::new(&NoiseConfig::default());
        let mut hearing = SoundDetection::new(SoundConfig::default(), noise.channel().tap());

        // Never latched; dead-zone noise alone does not detect.
        noise.add_normalized(0.12);
        let result = hearing.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 3.0), 0.0));
        assert!(!result.detected);
        assert!(result.perceived_position.is_none());
    }

    #[test]
    fn test_out_of_volume_hears_nothing() {
        let field = open_field();
        let mut noise = NoiseEmitter::new(&NoiseConfig::default());
        let mut hearing = SoundDetection::new(SoundConfig::default(), noise.channel().tap());

        noise.add_normalized(1.0);
        let far = ctx_at(&field, Vec3::new(0.0, 0.0, 30.0), 0.0);
        assert!(!hearing.detect(&far).detected);
    }

    #[test]
    fn test_volume_event_alone_counts_as_in_range() {
        let field = open_field();
        let mut noise = NoiseEmitter::new(&NoiseConfig::default());
        let mut hearing = SoundDetection::new(SoundConfig::default(), noise.channel().tap());

        noise.add_normalized(1.0);
        // Geometrically outside, but the trigger system says inside.
        hearing.notify_volume(true);
        let far = ctx_at(&field, Vec3::new(0.0, 0.0, 30.0), 0.0);
        assert!(hearing.detect(&far).detected);

        hearing.notify_volume(false);
        let result = hearing.detect(&ctx_at(&field, Vec3::new(0.0, 0.0, 30.0), 10.0));
        assert!(!result.detected);
    }
}
