//! Fixed timestep simulation tick
//!
//! Core game loop that advances a match deterministically. One call is one
//! tick of integration; the host decides how often to call it.

use std::collections::HashMap;

use super::bot;
use super::combat;
use super::director;
use super::geometry::{Axis, Hazard, resolve_against_map};
use super::state::{ActorId, ActorInput, DeathCause, Facing, GameEvent, MatchState};
use super::weapons::WeaponEffect;
use crate::config::SimConfig;

/// Held input per human actor. A missing entry means idle.
pub type TickInputs = HashMap<ActorId, ActorInput>;

/// Advance a match by one tick, returning the next state and the events it
/// produced. A finished match comes back untouched.
pub fn step(
    mut state: MatchState,
    inputs: &TickInputs,
    config: &SimConfig,
) -> (MatchState, Vec<GameEvent>) {
    let events = tick(&mut state, inputs, config);
    (state, events)
}

/// In-place form of [`step`]
pub fn tick(state: &mut MatchState, inputs: &TickInputs, config: &SimConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.winner.is_some() {
        return events;
    }

    state.time_ticks += 1;

    // Spawns
    director::update_waves(state, &config.director, &config.physics, &mut events);
    combat::maybe_spawn_supply_drop(state, config.director.supply_drop_chance, &mut events);

    // Actors, in roster order (includes anything spawned above)
    for idx in 0..state.actors.len() {
        update_actor(state, idx, inputs, config, &mut events);
    }

    combat::update_projectiles(state, &mut events);
    combat::update_particles(state);
    combat::update_items(state, config.physics.gravity);

    // Dead actors stay as corpses; everything else is pruned
    state.projectiles.retain(|p| !p.is_dead);
    state.particles.retain(|p| !p.is_dead);
    state.items.retain(|i| !i.is_dead);

    director::settle(state, &mut events);
    events
}

/// Input, movement, map collision, firing and pickups for one actor
fn update_actor(
    state: &mut MatchState,
    idx: usize,
    inputs: &TickInputs,
    config: &SimConfig,
    events: &mut Vec<GameEvent>,
) {
    if state.actors[idx].is_dead {
        return;
    }

    let input = if state.actors[idx].is_bot {
        let decision = bot::decide(&state.actors[idx], &state.actors, &mut state.rng, &config.bot);
        if let Some(facing) = decision.face {
            state.actors[idx].facing = facing;
        }
        decision.input
    } else {
        inputs
            .get(&state.actors[idx].id)
            .copied()
            .unwrap_or_default()
    };

    let physics = &config.physics;
    let actor = &mut state.actors[idx];
    let accel = if actor.is_bot {
        physics.move_speed * config.bot.speed_factor
    } else {
        physics.move_speed
    };

    if input.left {
        actor.body.vel.x -= accel;
        actor.facing = Facing::Left;
    }
    if input.right {
        actor.body.vel.x += accel;
        actor.facing = Facing::Right;
    }
    actor.body.vel.x *= physics.friction;

    if actor.grounded {
        if actor.body.vel.x.abs() > 0.1 {
            actor.walk_cycle += actor.body.vel.x.abs() * 0.2;
        } else {
            actor.walk_cycle = 0.0;
        }
    }

    // Jumps fire on the press, not while held
    let flight = actor.weapon.has_effect(WeaponEffect::Flight);
    if input.jump && !actor.was_jump_pressed {
        if actor.grounded {
            actor.body.vel.y = physics.jump_force;
            actor.grounded = false;
            actor.jumps_left = physics.max_jumps.saturating_sub(1);
            events.push(GameEvent::Jumped { actor: actor.id });
        } else if actor.jumps_left > 0 {
            let factor = if flight {
                physics.flight_jump_factor
            } else {
                physics.air_jump_factor
            };
            actor.body.vel.y = physics.jump_force * factor;
            actor.jumps_left -= 1;
            events.push(GameEvent::Jumped { actor: actor.id });
        }
    }
    actor.was_jump_pressed = input.jump;

    actor.body.vel.y += physics.gravity;
    if flight && actor.body.vel.y > 0.0 && input.jump {
        actor.body.vel.y *= physics.glide_factor;
    }
    actor.body.vel.y = actor.body.vel.y.min(physics.terminal_velocity);

    // Axis-separated: horizontal then vertical
    actor.body.pos.x += actor.body.vel.x;
    let horizontal = resolve_against_map(&mut actor.body, &state.map, Axis::Horizontal, &config.collision);

    actor.body.pos.y += actor.body.vel.y;
    // Landing does not restore air jumps; only a grounded jump resets them
    let vertical = resolve_against_map(&mut actor.body, &state.map, Axis::Vertical, &config.collision);
    actor.grounded = vertical.landed;

    if let Some(hazard) = horizontal.hazard.or(vertical.hazard) {
        actor.kill();
        let line = match hazard {
            Hazard::FellOut => format!("{} fell off the map", actor.name),
            Hazard::Spike => format!("{} was impaled", actor.name),
        };
        log::debug!("Actor {} died: {:?}", actor.id, hazard);
        events.push(GameEvent::Died {
            actor: actor.id,
            cause: DeathCause::Map(hazard),
        });
        state.messages.push(line);
        return;
    }

    // Drop through a platform. Sink past the landing tolerance or the next
    // vertical pass catches the feet again.
    if input.down && actor.grounded {
        actor.body.pos.y += config.collision.platform_tolerance + 1.0;
        actor.grounded = false;
    }

    actor.shoot_timer = actor.shoot_timer.saturating_sub(1);
    actor.attack_timer = actor.attack_timer.saturating_sub(1);

    if input.shoot {
        combat::fire(state, idx, events);
    }
    combat::pickup_items(state, idx, events);
}
