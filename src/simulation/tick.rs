//! Tick system - orchestrates one simulation step
//!
//! Everything happens synchronously inside one call, in a fixed order:
//! noise decay -> footsteps -> hearing triggers -> monster behavior ->
//! aura/beam ambience -> contact damage -> respawn flow.
//!
//! Returns the events that occurred during the tick for the frontend
//! layers; player-action events queued between ticks are drained first.

use crate::core::types::Seconds;
use crate::detection::Target;
use crate::simulation::events::SimulationEvent;
use crate::simulation::world::World;

/// Run a single simulation tick of `dt` seconds.
pub fn run_simulation_tick(world: &mut World, dt: Seconds) -> Vec<SimulationEvent> {
    let mut events = std::mem::take(&mut world.pending);

    world.clock.advance(dt);
    world.noise.tick(dt);

    footstep_system(world, dt, &mut events);
    hearing_trigger_system(world);
    monster_system(world, dt, &mut events);
    world.flashlight_probe();
    aura_system(world, &mut events);
    contact_damage_system(world, dt, &mut events);
    respawn_system(world, &mut events);

    // Probe events queue into pending; fold them into this tick's batch.
    events.append(&mut world.pending);
    events
}

/// Convert player movement into step noise.
fn footstep_system(world: &mut World, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    if world.respawn.is_pending() || world.game_over {
        return;
    }
    let speed = world.player.current_speed();
    let stance = world.player.stance;
    let grounded = world.player.grounded;
    world
        .player
        .footsteps
        .update(speed, grounded, stance, dt, &mut world.noise, events);
    world.player.end_tick_motion();
}

/// Edge-detects the player crossing each monster's hearing volume and
/// notifies the strategy. The strategy re-checks containment geometrically
/// every poll as well; a missed edge around a warp cannot strand the flag.
fn hearing_trigger_system(world: &mut World) {
    let player_pos = world.player.pose.position;
    let player_present = !world.respawn.is_pending() && !world.game_over;
    for slot in &mut world.monsters {
        let Some(volume) = slot.behavior.hearing_volume() else {
            continue;
        };
        let inside =
            player_present && volume.contains(slot.behavior.pose().position, player_pos);
        if inside != slot.prev_in_hearing {
            slot.behavior.notify_hearing_volume(inside);
            slot.prev_in_hearing = inside;
        }
    }
}

/// Poll detection and evaluate the state machine for every monster, then
/// integrate their agents.
fn monster_system(world: &mut World, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    let target = (!world.respawn.is_pending() && !world.game_over).then_some(Target {
        id: world.player.id,
        pose: world.player.pose,
    });
    for slot in &mut world.monsters {
        slot.behavior
            .update(target, &world.geometry, &world.clock, events);
        slot.behavior.integrate(dt);
    }
}

/// Throttled proximity dread signal per monster.
fn aura_system(world: &mut World, events: &mut Vec<SimulationEvent>) {
    let now = world.clock.now();
    let player_pos = world.player.pose.position;
    for slot in &mut world.monsters {
        let monster_pos = slot.behavior.pose().position;
        if let Some(level) = slot.aura.sample(monster_pos, player_pos, now) {
            events.push(SimulationEvent::AuraPulse {
                monster: slot.behavior.id(),
                level,
            });
        }
    }
}

/// Sanity drain while a detecting monster is in contact with the player.
fn contact_damage_system(world: &mut World, dt: Seconds, events: &mut Vec<SimulationEvent>) {
    if world.respawn.is_pending() || world.game_over {
        return;
    }
    let player_pos = world.player.pose.position;
    let mut total = 0.0;
    for slot in &world.monsters {
        let behavior = &slot.behavior;
        if !behavior.currently_detecting() {
            continue;
        }
        let config = behavior.config();
        if behavior.pose().position.distance(player_pos) > config.contact_radius {
            continue;
        }
        total += config.sanity_damage_per_second * dt;
    }
    if total > 0.0 {
        let depleted = world.player.sanity.take_damage(total);
        events.push(SimulationEvent::SanityDamaged {
            amount: total,
            remaining: world.player.sanity.current(),
        });
        if depleted {
            world.death_pending = true;
            events.push(SimulationEvent::SanityDepleted);
        }
    }
}

/// Spend a life on depletion, then carry out the scheduled respawn: player
/// back at the spawn pose, monsters suppressed and warped away.
fn respawn_system(world: &mut World, events: &mut Vec<SimulationEvent>) {
    if world.game_over {
        return;
    }
    let now = world.clock.now();

    if world.death_pending {
        world.death_pending = false;
        let remaining = world.lives.lose_life();
        if remaining == 0 {
            world.game_over = true;
            events.push(SimulationEvent::GameOver);
            tracing::info!("out of lives");
            return;
        }
        world.respawn.schedule(now);
        tracing::debug!(remaining, "respawn scheduled");
    }

    if world.respawn.take_due(now) {
        world.player.teleport(world.player_spawn);
        if world.respawn.config().restore_sanity {
            world.player.sanity.restore_full();
        }
        let grace = world.respawn.config().grace_seconds;
        let min_dist = world.respawn.config().warp_min_distance;
        for slot in &mut world.monsters {
            slot.behavior.suppress_for(grace, now);
            // Registered spawn points win; otherwise warp a fixed distance
            // off in a random direction.
            let to = match world
                .monster_spawns
                .place(&mut slot.behavior, &world.geometry, &mut world.rng)
            {
                Some(to) => to,
                None => slot.behavior.warp_away_from(
                    world.player_spawn.position,
                    min_dist,
                    &world.geometry,
                ),
            };
            slot.behavior.notify_hearing_volume(false);
            slot.prev_in_hearing = false;
            events.push(SimulationEvent::MonsterWarped {
                monster: slot.behavior.id(),
                to,
            });
        }
        events.push(SimulationEvent::PlayerRespawned {
            lives_left: world.lives.remaining(),
        });
        tracing::info!(lives_left = world.lives.remaining(), "player respawned");
    }
}
