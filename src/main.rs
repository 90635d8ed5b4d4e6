//! Veilhunt - Headless Demo
//!
//! Builds a small level, spawns the monster with combined sight and
//! hearing, and drives a scripted player through the note quest while the
//! simulation runs. Useful for watching the behavior state machine and
//! tuning configs without a frontend.

use clap::Parser;
use glam::Vec3;
use std::collections::BTreeMap;
use std::path::PathBuf;

use veilhunt::core::config::SimulationConfig;
use veilhunt::core::error::Result;
use veilhunt::detection::{CompositeDetection, SoundDetection, VisionDetection};
use veilhunt::monster::{MonsterState, PatrolPlan, TraversalMode};
use veilhunt::player::Stance;
use veilhunt::quest::{NoteQuest, QuestPhase};
use veilhunt::simulation::{run_simulation_tick, SimulationEvent, World};
use veilhunt::spatial::{Aabb, ObstacleField, Pose};

#[derive(Parser, Debug)]
#[command(name = "veilhunt", about = "Headless stealth-horror simulation demo")]
struct Args {
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 4000)]
    ticks: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// RNG seed for patrol and spawn randomness
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional TOML config overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every event as a JSON line instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn build_level() -> ObstacleField {
    let mut field = ObstacleField::open(Aabb::new(
        Vec3::new(-20.0, 0.0, -20.0),
        Vec3::new(20.0, 0.0, 20.0),
    ));
    // A corridor wall down the middle and two side rooms.
    field.add_wall(Aabb::new(Vec3::new(-0.5, 0.0, -12.0), Vec3::new(0.5, 3.0, 4.0)));
    field.add_wall(Aabb::new(Vec3::new(-12.0, 0.0, 7.5), Vec3::new(-4.0, 3.0, 8.5)));
    field.add_wall(Aabb::new(Vec3::new(4.0, 0.0, -8.5), Vec3::new(12.0, 3.0, -7.5)));
    // Perimeter corner the player can get pinned against.
    field.add_wall(Aabb::new(Vec3::new(16.0, 0.0, -20.0), Vec3::new(20.0, 3.0, -16.0)));
    field
}

fn build_world(config: SimulationConfig, seed: u64) -> World {
    let player_spawn = Pose::new(Vec3::new(-15.0, 0.0, -15.0), Vec3::Z);
    let mut world = World::new(config, build_level(), player_spawn, seed);

    world.set_quest(NoteQuest::new(vec![
        QuestPhase {
            notes_required: 2,
            spawn_tool: true,
        },
        QuestPhase {
            notes_required: 2,
            spawn_tool: false,
        },
    ]));

    let patrol = PatrolPlan::new(
        vec![
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, 10.0),
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
        ],
        TraversalMode::PingPong,
    );
    let vision = VisionDetection::new(world.config.vision.clone());
    let hearing = SoundDetection::new(world.config.sound.clone(), world.noise.channel().tap());
    let detection = CompositeDetection::new(vec![Box::new(vision), Box::new(hearing)]);
    world.spawn_monster(
        Pose::new(Vec3::new(12.0, 0.0, 12.0), -Vec3::Z),
        Some(Box::new(detection)),
        Some(patrol),
    );

    // Respawns restart the hunt from one of these corners.
    world.monster_spawns.add(Pose::new(Vec3::new(14.0, 0.0, 14.0), -Vec3::Z));
    world.monster_spawns.add(Pose::new(Vec3::new(-14.0, 0.0, 14.0), -Vec3::Z));
    world.monster_spawns.add(Pose::new(Vec3::new(14.0, 0.0, -14.0), Vec3::Z));

    // The scripted player keeps the light on the whole run.
    world.flashlight.set_on(true);
    world
}

/// Where the scripted player wants to go, in order: four notes, then the
/// exit.
const NOTE_SPOTS: [Vec3; 4] = [
    Vec3::new(-8.0, 0.0, 5.0),
    Vec3::new(8.0, 0.0, -4.0),
    Vec3::new(-14.0, 0.0, 14.0),
    Vec3::new(14.0, 0.0, -14.0),
];
const EXIT_SPOT: Vec3 = Vec3::new(18.0, 0.0, 18.0);

struct ScriptedPlayer {
    next_note: usize,
}

impl ScriptedPlayer {
    fn drive(&mut self, world: &mut World, dt: f32) {
        let player_pos = world.player.pose.position;

        // Nearest monster threat, if any.
        let threat = world
            .monsters
            .iter()
            .map(|slot| &slot.behavior)
            .find(|b| b.currently_detecting() || b.state() == MonsterState::Chasing);

        if let Some(monster) = threat {
            let monster_pos = monster.pose().position;
            let dist = monster_pos.distance(player_pos);
            if dist < 10.0 {
                // Face the threat, try to stun it, then run.
                let face = (monster_pos - player_pos).normalize_or_zero();
                if face.length_squared() > 0.0 {
                    world.player.pose.forward = face;
                }
                if world.flashlight.cooldown_remaining(world.clock.now()) <= 0.0 {
                    world.trigger_flashlight();
                }
                let flee = player_pos - monster_pos;
                world.move_player(flee, Stance::Sprinting, dt);
                return;
            }
        }

        // Otherwise work through the objectives, quietly.
        let goal = if self.next_note < NOTE_SPOTS.len() {
            NOTE_SPOTS[self.next_note]
        } else {
            EXIT_SPOT
        };
        let to_goal = goal - player_pos;
        if to_goal.length() <= 1.0 {
            if self.next_note < NOTE_SPOTS.len() {
                world.collect_note();
                self.next_note += 1;
            } else {
                world.try_exit();
            }
            return;
        }
        world.move_player(to_goal, Stance::Walking, dt);
    }
}

fn event_label(event: &SimulationEvent) -> &'static str {
    match event {
        SimulationEvent::MonsterStateChanged { .. } => "monster_state_changed",
        SimulationEvent::DetectionStinger { .. } => "detection_stinger",
        SimulationEvent::MonsterStunned { .. } => "monster_stunned",
        SimulationEvent::MonsterWarped { .. } => "monster_warped",
        SimulationEvent::WaypointSkipped { .. } => "waypoint_skipped",
        SimulationEvent::MonsterGrowl { .. } => "monster_growl",
        SimulationEvent::AuraPulse { .. } => "aura_pulse",
        SimulationEvent::Footstep { .. } => "footstep",
        SimulationEvent::FlashlightBurst { .. } => "flashlight_burst",
        SimulationEvent::SanityDamaged { .. } => "sanity_damaged",
        SimulationEvent::SanityDepleted => "sanity_depleted",
        SimulationEvent::PlayerRespawned { .. } => "player_respawned",
        SimulationEvent::GameOver => "game_over",
        SimulationEvent::NoteCollected { .. } => "note_collected",
        SimulationEvent::ToolSpawned { .. } => "tool_spawned",
        SimulationEvent::PhaseAdvanced { .. } => "phase_advanced",
        SimulationEvent::ExitUnlocked => "exit_unlocked",
        SimulationEvent::GoalReached => "goal_reached",
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veilhunt=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut world = build_world(config, args.seed);
    let mut script = ScriptedPlayer { next_note: 0 };
    let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();

    tracing::info!(ticks = args.ticks, seed = args.seed, "starting simulation");

    for _ in 0..args.ticks {
        script.drive(&mut world, args.dt);
        let events = run_simulation_tick(&mut world, args.dt);
        for event in &events {
            if args.json {
                println!("{}", serde_json::to_string(event)?);
            }
            *counts.entry(event_label(event)).or_default() += 1;
        }
        if world.is_game_over() || world.is_level_complete() {
            break;
        }
    }

    println!("\n=== RUN SUMMARY ===");
    println!("ticks elapsed:   {}", world.clock.tick());
    println!("sim time:        {:.1}s", world.clock.now());
    println!("lives left:      {}", world.lives.remaining());
    println!("sanity:          {:.0}", world.player.sanity.current());
    println!(
        "outcome:         {}",
        if world.is_level_complete() {
            "escaped"
        } else if world.is_game_over() {
            "lost to the dark"
        } else {
            "still inside"
        }
    );
    println!("\nevents:");
    for (label, count) in &counts {
        if *label == "aura_pulse" || *label == "footstep" {
            continue; // high-frequency ambience, not worth a line each
        }
        println!("  {label:<24} {count}");
    }
    Ok(())
}
