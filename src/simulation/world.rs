//! World wiring
//!
//! Owns every collaborator and hands them to the tick systems. All
//! dependencies are injected at construction or spawn time; there is no
//! runtime service discovery.

use ahash::AHashMap;
use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, SimClock};
use crate::detection::DetectionStrategy;
use crate::monster::{MonsterBehavior, PatrolPlan, ProximityAura, SpawnRegistry};
use crate::noise::NoiseEmitter;
use crate::player::{
    FlashlightAttack, Footsteps, LivesSystem, Player, SanitySystem, Stance,
};
use crate::quest::NoteQuest;
use crate::simulation::events::SimulationEvent;
use crate::simulation::respawn::RespawnController;
use crate::spatial::{DirectAgent, ObstacleField, Pose};

use rand::SeedableRng;

/// Height above the player position at which the flashlight beam starts.
const BEAM_HEIGHT: f32 = 1.5;

/// One monster plus the per-instance bookkeeping the tick systems keep for
/// it (trigger-volume edge state, aura throttle).
pub struct MonsterSlot {
    pub behavior: MonsterBehavior,
    pub aura: ProximityAura,
    pub(crate) prev_in_hearing: bool,
}

pub struct World {
    pub clock: SimClock,
    pub config: SimulationConfig,
    pub geometry: ObstacleField,
    pub player: Player,
    pub player_spawn: Pose,
    pub noise: NoiseEmitter,
    pub flashlight: FlashlightAttack,
    pub lives: LivesSystem,
    pub quest: NoteQuest,
    pub respawn: RespawnController,
    pub monster_spawns: SpawnRegistry,
    pub monsters: Vec<MonsterSlot>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) pending: Vec<SimulationEvent>,
    pub(crate) game_over: bool,
    pub(crate) level_complete: bool,
    pub(crate) death_pending: bool,
    monster_index: AHashMap<EntityId, usize>,
    next_seed: u64,
}

impl World {
    pub fn new(
        config: SimulationConfig,
        geometry: ObstacleField,
        player_spawn: Pose,
        seed: u64,
    ) -> Self {
        let player = Player::new(
            player_spawn,
            config.player.clone(),
            Footsteps::new(config.footsteps.clone()),
            SanitySystem::new(&config.sanity),
        );
        Self {
            clock: SimClock::new(),
            noise: NoiseEmitter::new(&config.noise),
            flashlight: FlashlightAttack::new(config.flashlight.clone()),
            lives: LivesSystem::new(&config.lives),
            quest: NoteQuest::new(Vec::new()),
            respawn: RespawnController::new(config.respawn.clone()),
            monster_spawns: SpawnRegistry::default(),
            monsters: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: Vec::new(),
            game_over: false,
            level_complete: false,
            death_pending: false,
            monster_index: AHashMap::new(),
            next_seed: seed,
            config,
            geometry,
            player,
            player_spawn,
        }
    }

    pub fn set_quest(&mut self, quest: NoteQuest) {
        self.quest = quest;
    }

    /// Spawn a monster at `pose` with its strategy and route injected.
    pub fn spawn_monster(
        &mut self,
        pose: Pose,
        detection: Option<Box<dyn DetectionStrategy>>,
        patrol: Option<PatrolPlan>,
    ) -> EntityId {
        self.next_seed = self.next_seed.wrapping_add(1);
        let behavior = MonsterBehavior::new(
            EntityId::new(),
            self.config.monster.clone(),
            Box::new(DirectAgent::new(pose)),
            detection,
            patrol,
            self.next_seed,
        );
        let id = behavior.id();
        self.monster_index.insert(id, self.monsters.len());
        self.monsters.push(MonsterSlot {
            behavior,
            aura: ProximityAura::new(self.config.aura.clone()),
            prev_in_hearing: false,
        });
        id
    }

    pub fn monster(&self, id: EntityId) -> Option<&MonsterBehavior> {
        self.monster_index
            .get(&id)
            .map(|&i| &self.monsters[i].behavior)
    }

    pub fn monster_mut(&mut self, id: EntityId) -> Option<&mut MonsterBehavior> {
        self.monster_index
            .get(&id)
            .map(|&i| &mut self.monsters[i].behavior)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    /// Drive the player for one tick. Ignored while dead or done.
    pub fn move_player(&mut self, dir: Vec3, stance: Stance, dt: f32) {
        if self.respawn.is_pending() || self.game_over || self.level_complete {
            return;
        }
        self.player.apply_move(dir, stance, dt);
    }

    /// Register a collected note with the quest.
    pub fn collect_note(&mut self) {
        self.quest.on_note_collected(&mut self.pending);
    }

    /// Attempt to leave through the level exit. Succeeds once the quest is
    /// complete.
    pub fn try_exit(&mut self) -> bool {
        if self.quest.is_complete() && !self.level_complete && !self.game_over {
            self.level_complete = true;
            self.pending.push(SimulationEvent::GoalReached);
            tracing::info!("level exit reached");
            return true;
        }
        false
    }

    pub fn toggle_flashlight(&mut self) {
        self.flashlight.toggle();
    }

    /// Fire the flashlight burst along the player's facing.
    pub fn trigger_flashlight(&mut self) -> bool {
        let now = self.clock.now();
        let beam = Pose::new(
            self.player.pose.position + Vec3::Y * BEAM_HEIGHT,
            self.player.pose.forward,
        );
        let mut targets: Vec<&mut MonsterBehavior> = self
            .monsters
            .iter_mut()
            .map(|slot| &mut slot.behavior)
            .collect();
        self.flashlight.try_burst(
            &beam,
            &self.geometry,
            &mut targets,
            now,
            &mut self.pending,
        )
    }

    /// Passive beam dwell check (growl cue). Called by the tick.
    pub(crate) fn flashlight_probe(&mut self) {
        let now = self.clock.now();
        let beam = Pose::new(
            self.player.pose.position + Vec3::Y * BEAM_HEIGHT,
            self.player.pose.forward,
        );
        let targets: Vec<&MonsterBehavior> = self
            .monsters
            .iter()
            .map(|slot| &slot.behavior)
            .collect();
        self.flashlight
            .probe(&beam, &self.geometry, &targets, now, &mut self.pending);
    }
}
