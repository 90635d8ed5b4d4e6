//! Monster behavior state machine
//!
//! Consumes a detection strategy, a patrol plan, and a path-following
//! agent, and turns them into movement intents. Evaluated once per
//! simulation tick with a fixed priority: stun > suppression > pinning >
//! chase > patrol. All timers are clock deadlines; repeated triggers are
//! last-write-wins.
//!
//! Missing collaborators are never an error: without a target, strategy,
//! plan, or navigable surface the monster degrades to patrolling or holding
//! position.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::patrol::{PatrolPlan, StuckConfig, StuckMonitor, TraversalMode};
use crate::core::types::{EntityId, Seconds, SimClock};
use crate::detection::{
    DetectionContext, DetectionResult, DetectionStrategy, HearingVolume, Target,
};
use crate::simulation::events::SimulationEvent;
use crate::spatial::{flatten, GeometryQuery, Layers, PathAgent, Pose, MIN_DIRECTION_SQ};

/// Height above the ground at which the pin probe is cast, so the sweep
/// clears skirting-board clutter but still catches waist-high walls.
const PIN_PROBE_HEIGHT: f32 = 0.5;

/// Tunables for the behavior state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Distance at which pursuit stops and the monster squares up.
    /// The sticky-chase handoff back to patrol triggers at 1.1x this.
    pub stopping_distance: f32,
    /// Turn rate, as the fraction of remaining rotation covered per second.
    pub rotation_speed: f32,
    pub chase_speed: f32,
    pub patrol_speed: f32,
    /// Pause at each waypoint, and after losing a chase, before moving on.
    pub patrol_wait_seconds: Seconds,
    /// Radius of the monster's body, used by beam and contact tests.
    pub body_radius: f32,
    /// Range within which a detected player takes sanity damage.
    pub contact_radius: f32,
    pub sanity_damage_per_second: f32,
    /// Range at which a cornered target triggers the pinning stand-off.
    pub pin_stop_distance: f32,
    /// Range the target must open up before pinning releases. Must exceed
    /// `pin_stop_distance` or the state flickers.
    pub pin_resume_distance: f32,
    /// Length of the probe cast behind the target to decide "cornered".
    pub pin_back_wall_check: f32,
    /// Radius of that probe.
    pub pin_probe_radius: f32,
    /// Continuous non-detection required before the detection stinger may
    /// fire again. Prevents audio spam on flickering detection.
    pub detection_sfx_rearm_seconds: Seconds,
    /// How far a waypoint may be snapped onto the navigable surface.
    pub waypoint_snap_distance: f32,
    pub stuck: StuckConfig,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            stopping_distance: 2.0,
            rotation_speed: 5.0,
            chase_speed: 3.5,
            patrol_speed: 2.5,
            patrol_wait_seconds: 0.5,
            body_radius: 0.8,
            contact_radius: 1.8,
            sanity_damage_per_second: 5.0,
            pin_stop_distance: 2.0,
            pin_resume_distance: 3.0,
            pin_back_wall_check: 1.2,
            pin_probe_radius: 0.4,
            detection_sfx_rearm_seconds: 4.0,
            waypoint_snap_distance: 1.0,
            stuck: StuckConfig::default(),
        }
    }
}

/// Behavior states, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterState {
    /// Flashlight stun: frozen, blind, deaf until the deadline.
    Stunned,
    /// Respawn grace: forced patrol, detection ignored until the deadline.
    Suppressed,
    /// Close-range stand-off against a cornered target.
    Pinning,
    /// Moving toward the perceived (or last perceived) target position.
    Chasing,
    /// Walking the patrol route, or holding position without one.
    Patrolling,
}

pub struct MonsterBehavior {
    id: EntityId,
    config: MonsterConfig,
    agent: Box<dyn PathAgent>,
    detection: Option<Box<dyn DetectionStrategy>>,
    patrol: Option<PatrolPlan>,
    state: MonsterState,
    stun_until: Seconds,
    suppress_until: Seconds,
    last_perceived: Vec3,
    patrol_wait_until: Seconds,
    currently_detecting: bool,
    stinger_armed: bool,
    last_detected_time: Seconds,
    stuck: StuckMonitor,
    rng: ChaCha8Rng,
}

impl MonsterBehavior {
    pub fn new(
        id: EntityId,
        config: MonsterConfig,
        agent: Box<dyn PathAgent>,
        detection: Option<Box<dyn DetectionStrategy>>,
        patrol: Option<PatrolPlan>,
        seed: u64,
    ) -> Self {
        let stuck = StuckMonitor::new(config.stuck.clone());
        Self {
            id,
            config,
            agent,
            detection,
            patrol,
            state: MonsterState::Patrolling,
            stun_until: f32::NEG_INFINITY,
            suppress_until: f32::NEG_INFINITY,
            last_perceived: Vec3::ZERO,
            patrol_wait_until: f32::NEG_INFINITY,
            currently_detecting: false,
            stinger_armed: true,
            last_detected_time: f32::NEG_INFINITY,
            stuck,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> MonsterState {
        self.state
    }

    pub fn pose(&self) -> Pose {
        self.agent.pose()
    }

    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    pub fn currently_detecting(&self) -> bool {
        self.currently_detecting
    }

    pub fn is_stunned(&self, now: Seconds) -> bool {
        now < self.stun_until
    }

    pub fn last_perceived_position(&self) -> Vec3 {
        self.last_perceived
    }

    /// Freeze the monster until `now + duration`. Re-triggering extends the
    /// deadline (last-write-wins, not additive).
    pub fn apply_light_stun(&mut self, duration: Seconds, now: Seconds) {
        self.stun_until = now + duration;
        tracing::debug!(monster = ?self.id, duration, "light stun applied");
    }

    /// Force patrol behavior until `now + seconds`, ignoring detection.
    pub fn suppress_for(&mut self, seconds: Seconds, now: Seconds) {
        self.suppress_until = now + seconds;
        tracing::debug!(monster = ?self.id, seconds, "suppressed");
    }

    /// Relocate away from `origin` in a random direction at `min_distance`,
    /// snapped to the navigable surface when possible. Clears the current
    /// detection episode. Returns where the monster landed.
    pub fn warp_away_from(
        &mut self,
        origin: Vec3,
        min_distance: f32,
        geometry: &dyn GeometryQuery,
    ) -> Vec3 {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let dir = Vec3::new(angle.cos(), 0.0, angle.sin());
        let candidate = origin + dir * min_distance;
        let dest = geometry
            .sample_navigable(candidate, min_distance)
            .unwrap_or(candidate);
        self.agent.warp(dest);
        self.clear_episode();
        dest
    }

    /// Teleport straight to `pose` (spawn placement).
    pub fn place_at(&mut self, pose: Pose) {
        self.agent.warp(pose.position);
        self.clear_episode();
    }

    /// Swap the patrol route, restarting from its first waypoint.
    pub fn use_patrol_route(&mut self, plan: PatrolPlan) {
        self.patrol = Some(plan);
        self.stuck.reset();
    }

    pub fn set_patrol_points(&mut self, points: Vec<Vec3>) {
        match self.patrol.as_mut() {
            Some(plan) => plan.set_points(points),
            None => self.patrol = Some(PatrolPlan::new(points, TraversalMode::Sequential)),
        }
        self.stuck.reset();
    }

    /// Hearing volume of the bound strategy, for the trigger system.
    pub fn hearing_volume(&self) -> Option<HearingVolume> {
        self.detection.as_ref().and_then(|d| d.hearing_volume())
    }

    /// Forward a hearing-volume enter/exit notification to the strategy.
    pub fn notify_hearing_volume(&mut self, entered: bool) {
        if let Some(detection) = self.detection.as_mut() {
            detection.notify_volume(entered);
        }
    }

    /// Integrate the path agent for one tick. Called by the simulation
    /// loop after `update`; a real engine agent moves itself instead.
    pub fn integrate(&mut self, dt: Seconds) {
        self.agent.advance(dt);
    }

    /// Evaluate the state machine for one tick.
    pub fn update(
        &mut self,
        target: Option<Target>,
        geometry: &dyn GeometryQuery,
        clock: &SimClock,
        events: &mut Vec<SimulationEvent>,
    ) {
        let now = clock.now();
        let dt = clock.delta();

        // Stun overrides everything, including detection.
        if now < self.stun_until {
            if self.state != MonsterState::Stunned {
                self.set_state(MonsterState::Stunned, events);
                self.agent.reset_path();
                self.agent.set_stopped(true);
            }
            self.currently_detecting = false;
            return;
        }
        if self.state == MonsterState::Stunned {
            self.agent.set_stopped(false);
            self.set_state(MonsterState::Patrolling, events);
        }

        // Respawn grace: patrol as if the strategy did not exist.
        if now < self.suppress_until {
            self.currently_detecting = false;
            if self.state != MonsterState::Suppressed {
                self.set_state(MonsterState::Suppressed, events);
            }
            self.patrol_move(false, geometry, now, events);
            return;
        }
        if self.state == MonsterState::Suppressed {
            self.set_state(MonsterState::Patrolling, events);
        }

        let on_surface = self.agent.is_on_surface();
        if target.is_none() || self.detection.is_none() || !on_surface {
            self.currently_detecting = false;
            self.tick_stinger_rearm(now);
            self.set_state(MonsterState::Patrolling, events);
            self.patrol_move(false, geometry, now, events);
            return;
        }
        let target = target.expect("checked above");

        let owner = self.agent.pose();
        let result = match self.detection.as_mut() {
            Some(strategy) => {
                let ctx = DetectionContext {
                    owner,
                    target,
                    geometry,
                    now,
                };
                strategy.detect(&ctx)
            }
            None => DetectionResult::miss(),
        };

        self.currently_detecting = result.detected;
        if result.detected {
            self.last_detected_time = now;
            if self.stinger_armed {
                self.stinger_armed = false;
                events.push(SimulationEvent::DetectionStinger { monster: self.id });
            }
        } else {
            self.tick_stinger_rearm(now);
        }

        let target_pos = target.pose.position;
        let dist_to_target = owner.position.distance(target_pos);

        // Close-range stand-off against a cornered target.
        if self.state == MonsterState::Pinning {
            if dist_to_target <= self.config.pin_resume_distance {
                self.hold();
                self.agent
                    .face_toward(target_pos, self.config.rotation_speed, dt);
                return;
            }
            // Target opened the gap: fall through and re-evaluate.
        } else if dist_to_target <= self.config.pin_stop_distance
            && self.target_cornered(geometry, owner.position, target_pos)
        {
            self.set_state(MonsterState::Pinning, events);
            self.hold();
            self.agent
                .face_toward(target_pos, self.config.rotation_speed, dt);
            return;
        }

        if result.detected {
            let perceived = result.perceived_position.unwrap_or(target_pos);
            self.last_perceived = perceived;
            self.set_state(MonsterState::Chasing, events);
            self.chase(perceived, dt);
        } else if self.state == MonsterState::Chasing {
            // Sticky chase: investigate where the target was last noticed.
            let remaining = owner.position.distance(self.last_perceived);
            if remaining > self.config.stopping_distance * 1.1 {
                self.chase(self.last_perceived, dt);
            } else {
                self.set_state(MonsterState::Patrolling, events);
                self.patrol_move(true, geometry, now, events);
            }
        } else {
            if self.state == MonsterState::Pinning {
                self.set_state(MonsterState::Patrolling, events);
            }
            self.patrol_move(false, geometry, now, events);
        }
    }

    fn set_state(&mut self, to: MonsterState, events: &mut Vec<SimulationEvent>) {
        if self.state != to {
            tracing::debug!(monster = ?self.id, from = ?self.state, ?to, "state change");
            events.push(SimulationEvent::MonsterStateChanged {
                monster: self.id,
                from: self.state,
                to,
            });
            self.state = to;
        }
    }

    fn tick_stinger_rearm(&mut self, now: Seconds) {
        if !self.stinger_armed
            && now - self.last_detected_time >= self.config.detection_sfx_rearm_seconds
        {
            self.stinger_armed = true;
        }
    }

    fn clear_episode(&mut self) {
        self.currently_detecting = false;
        self.stinger_armed = true;
        self.last_detected_time = f32::NEG_INFINITY;
        self.state = MonsterState::Patrolling;
        self.stuck.reset();
    }

    fn hold(&mut self) {
        let here = self.agent.pose().position;
        self.agent.set_destination(here);
    }

    fn chase(&mut self, pos: Vec3, dt: Seconds) {
        if self.agent.is_on_surface() {
            self.agent.set_speed(self.config.chase_speed);
            self.agent.set_destination(pos);
        }
        if self.agent.pose().position.distance(pos) <= self.config.stopping_distance {
            self.agent.face_toward(pos, self.config.rotation_speed, dt);
        }
    }

    fn target_cornered(
        &self,
        geometry: &dyn GeometryQuery,
        my_pos: Vec3,
        target_pos: Vec3,
    ) -> bool {
        let away = flatten(target_pos - my_pos);
        if away.length_squared() < MIN_DIRECTION_SQ {
            return false;
        }
        geometry
            .sphere_cast(
                target_pos + Vec3::Y * PIN_PROBE_HEIGHT,
                self.config.pin_probe_radius,
                away.normalize(),
                self.config.pin_back_wall_check,
                Layers::LEVEL,
            )
            .is_some()
    }

    fn patrol_move(
        &mut self,
        just_lost_target: bool,
        geometry: &dyn GeometryQuery,
        now: Seconds,
        events: &mut Vec<SimulationEvent>,
    ) {
        let has_route = self.patrol.as_ref().map_or(false, |p| !p.is_empty());
        if !has_route {
            self.hold();
            return;
        }
        if just_lost_target {
            self.patrol_wait_until = now + self.config.patrol_wait_seconds;
        }
        if now < self.patrol_wait_until {
            self.hold();
            return;
        }
        if !self.agent.is_on_surface() {
            self.hold();
            return;
        }

        self.agent.set_speed(self.config.patrol_speed);
        let position = self.agent.pose().position;
        let plan = self.patrol.as_mut().expect("checked above");
        let waypoint = plan.current().expect("route is non-empty");

        let arrive = self.config.stopping_distance + 0.1;
        if position.distance(waypoint) <= arrive {
            plan.advance(&mut self.rng);
            self.stuck.reset();
            self.patrol_wait_until = now + self.config.patrol_wait_seconds;
            let here = position;
            self.agent.set_destination(here);
            return;
        }

        if self.stuck.sample(position, true, now) {
            let skipped = plan.index();
            plan.advance(&mut self.rng);
            events.push(SimulationEvent::WaypointSkipped {
                monster: self.id,
                index: skipped,
            });
        }

        let waypoint = plan.current().expect("route is non-empty");
        let dest = geometry
            .sample_navigable(waypoint, self.config.waypoint_snap_distance)
            .unwrap_or(waypoint);
        self.agent.set_destination(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Aabb, DirectAgent, ObstacleField};

    fn open_field() -> ObstacleField {
        ObstacleField::open(Aabb::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
        ))
    }

    fn bare_monster() -> MonsterBehavior {
        MonsterBehavior::new(
            EntityId::new(),
            MonsterConfig::default(),
            Box::new(DirectAgent::new(Pose::at(Vec3::ZERO))),
            None,
            None,
            7,
        )
    }

    #[test]
    fn test_stun_deadline_is_last_write_wins() {
        let mut monster = bare_monster();
        monster.apply_light_stun(2.0, 0.0);
        monster.apply_light_stun(1.0, 0.5);
        assert!(monster.is_stunned(1.4));
        assert!(!monster.is_stunned(1.6));
    }

    #[test]
    fn test_no_collaborators_holds_position() {
        let mut monster = bare_monster();
        let field = open_field();
        let mut clock = SimClock::new();
        let mut events = Vec::new();
        for _ in 0..20 {
            clock.advance(0.1);
            monster.update(None, &field, &clock, &mut events);
            monster.integrate(0.1);
        }
        assert_eq!(monster.state(), MonsterState::Patrolling);
        assert_eq!(monster.pose().position, Vec3::ZERO);
    }

    #[test]
    fn test_route_swap_restarts_traversal() {
        let mut monster = bare_monster();
        monster.use_patrol_route(PatrolPlan::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            TraversalMode::Sequential,
        ));
        monster.set_patrol_points(vec![Vec3::new(5.0, 0.0, 5.0)]);

        let field = open_field();
        let mut clock = SimClock::new();
        let mut events = Vec::new();
        for _ in 0..100 {
            clock.advance(0.1);
            monster.update(None, &field, &clock, &mut events);
            monster.integrate(0.1);
        }
        // Walks toward the single replacement waypoint until arrival range.
        let dist = monster.pose().position.distance(Vec3::new(5.0, 0.0, 5.0));
        assert!(dist <= monster.config().stopping_distance + 0.2);
    }
}
