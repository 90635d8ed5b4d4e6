//! Combining senses: first confirmed detection wins

use super::{DetectionContext, DetectionResult, DetectionStrategy, HearingVolume};

/// Polls every child each tick so each keeps its own memory warm, then
/// reports the first confirmed detection, falling back to the freshest
/// remembered position. Children never share anchors.
pub struct CompositeDetection {
    children: Vec<Box<dyn DetectionStrategy>>,
}

impl CompositeDetection {
    pub fn new(children: Vec<Box<dyn DetectionStrategy>>) -> Self {
        Self { children }
    }
}

impl DetectionStrategy for CompositeDetection {
    fn detect(&mut self, ctx: &DetectionContext<'_>) -> DetectionResult {
        let mut best = DetectionResult::miss();
        for child in &mut self.children {
            let result = child.detect(ctx);
            if result.detected && !best.detected {
                best = result;
            } else if !best.detected && best.perceived_position.is_none() {
                best = result;
            }
        }
        best
    }

    fn hearing_volume(&self) -> Option<HearingVolume> {
        self.children.iter().find_map(|c| c.hearing_volume())
    }

    fn notify_volume(&mut self, entered: bool) {
        for child in &mut self.children {
            child.notify_volume(entered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::detection::sound::{SoundConfig, SoundDetection};
    use crate::detection::vision::{VisionConfig, VisionDetection};
    use crate::detection::Target;
    use crate::noise::{NoiseConfig, NoiseEmitter};
    use crate::spatial::{Aabb, ObstacleField, Pose};
    use glam::Vec3;

    #[test]
    fn test_sound_catches_target_behind_vision() {
        let field = ObstacleField::open(Aabb::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
        ));
        let mut noise = NoiseEmitter::new(&NoiseConfig::default());
        let mut detection = CompositeDetection::new(vec![
            Box::new(VisionDetection::new(VisionConfig::default())),
            Box::new(SoundDetection::new(
                SoundConfig::default(),
                noise.channel().tap(),
            )),
        ]);

        // Target directly behind the owner: outside the cone, but loud.
        noise.add_normalized(0.5);
        let ctx = DetectionContext {
            owner: Pose::new(Vec3::ZERO, Vec3::Z),
            target: Target {
                id: EntityId::new(),
                pose: Pose::at(Vec3::new(0.0, 0.0, -4.0)),
            },
            geometry: &field,
            now: 0.0,
        };
        assert!(detection.detect(&ctx).detected);
        assert!(detection.hearing_volume().is_some());
    }
}
