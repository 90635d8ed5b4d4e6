//! Detection strategies
//!
//! A strategy answers one question every tick: can the monster currently
//! perceive the target, and where. Both senses keep a private memory of the
//! last confirmed position so the caller can coast toward a recently lost
//! target instead of losing awareness instantly.

pub mod composite;
pub mod sound;
pub mod vision;

pub use composite::CompositeDetection;
pub use sound::{HearingVolume, SoundConfig, SoundDetection};
pub use vision::{VisionConfig, VisionDetection};

use glam::Vec3;

use crate::core::types::{EntityId, Seconds};
use crate::spatial::{GeometryQuery, Pose};

/// Outcome of one detection poll. Produced fresh each tick.
///
/// When not detected but inside the memory window, `perceived_position`
/// still carries the last known position; outside the window it is `None`.
#[derive(Debug, Clone, Copy)]
pub struct DetectionResult {
    pub detected: bool,
    pub perceived_position: Option<Vec3>,
}

impl DetectionResult {
    /// Target confirmed right now at `position`.
    pub fn spotted(position: Vec3) -> Self {
        Self {
            detected: true,
            perceived_position: Some(position),
        }
    }

    /// Not currently perceived, but remembered at `position`.
    pub fn remembered(position: Vec3) -> Self {
        Self {
            detected: false,
            perceived_position: Some(position),
        }
    }

    /// Nothing perceived and nothing remembered.
    pub fn miss() -> Self {
        Self {
            detected: false,
            perceived_position: None,
        }
    }
}

/// The target as seen from a monster's point of view.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: EntityId,
    pub pose: Pose,
}

/// Everything a strategy may consult during one poll.
pub struct DetectionContext<'a> {
    pub owner: Pose,
    pub target: Target,
    pub geometry: &'a dyn GeometryQuery,
    pub now: Seconds,
}

pub trait DetectionStrategy {
    fn detect(&mut self, ctx: &DetectionContext<'_>) -> DetectionResult;

    /// Hearing volume for strategies that listen through one, in the
    /// monster's local frame. The trigger system uses this to deliver
    /// enter/exit notifications.
    fn hearing_volume(&self) -> Option<HearingVolume> {
        None
    }

    /// Volume enter (`true`) / exit (`false`) notification from the
    /// trigger system. Default: not interested.
    fn notify_volume(&mut self, _entered: bool) {}
}
