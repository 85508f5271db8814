//! Match director
//!
//! Horde waves for co-op and the win condition for every mode.

use glam::Vec2;
use rand::Rng;

use super::state::{Facing, GameEvent, MatchMode, MatchState, Winner};
use super::weapons::{Ammo, WeaponKind};
use crate::config::{DirectorTuning, PhysicsTuning};
use crate::consts::*;

/// Tick the wave timer while the horde is wiped out and spawn the next wave
/// once it runs past the delay. Co-op only.
pub fn update_waves(
    state: &mut MatchState,
    tuning: &DirectorTuning,
    physics: &PhysicsTuning,
    events: &mut Vec<GameEvent>,
) {
    if state.mode != MatchMode::Coop || state.live_on_team(TEAM_HORDE) > 0 {
        return;
    }

    state.wave_timer += 1;
    if state.wave_timer <= tuning.wave_delay {
        return;
    }

    state.wave += 1;
    state.wave_timer = 0;
    let count = (state.wave + 1).min(tuning.max_per_wave);
    spawn_wave(state, count, tuning, physics);

    log::info!("Wave {}: {} hostiles", state.wave, count);
    state
        .messages
        .push(format!("Wave {} incoming: {} hostiles", state.wave, count));
    events.push(GameEvent::WaveStarted {
        wave: state.wave,
        hostiles: count,
    });
}

/// Drop `count` hostiles in from the top of the map above random spawn points
fn spawn_wave(state: &mut MatchState, count: u32, tuning: &DirectorTuning, physics: &PhysicsTuning) {
    let hp = tuning.horde_base_hp + state.wave as i32 * tuning.horde_hp_per_wave;

    for i in 0..count {
        let spawn_count = state.map.spawns.len().max(1);
        let pick = state.rng.random_range(0..spawn_count);
        let spawn = state.spawn_position(pick);
        let facing = if state.rng.random::<f32>() < 0.5 {
            Facing::Right
        } else {
            Facing::Left
        };
        let weapon = if state.rng.random::<f32>() < tuning.horde_shotgun_chance {
            WeaponKind::Shotgun
        } else {
            WeaponKind::Pistol
        };

        let name = format!("Horde {}", i + 1);
        let id = state.add_actor(&name, Vec2::new(spawn.x, 0.0), TEAM_HORDE, true);
        if let Some(actor) = state.actor_mut(id) {
            actor.hp = hp;
            actor.max_hp = hp;
            actor.facing = facing;
            actor.weapon = weapon;
            // Hostiles never run dry, even with a shotgun
            actor.ammo = Ammo::Unlimited;
            actor.shoot_timer = tuning.horde_shoot_delay;
            actor.jumps_left = physics.max_jumps;
        }
    }
}

/// The result of the match as it stands, if it is decided
pub fn evaluate_winner(state: &MatchState) -> Option<Winner> {
    match state.mode {
        // Survival never ends in the humans' favor
        MatchMode::Coop => (state.live_on_team(TEAM_HUMANS) == 0).then_some(Winner::Horde),
        MatchMode::Pvp | MatchMode::Solo => {
            if state.actors.len() <= 1 {
                return None;
            }
            let mut alive = state.live_actors();
            match (alive.next(), alive.next()) {
                (Some(survivor), None) => Some(Winner::Actor(survivor.id)),
                (None, _) => Some(Winner::Draw),
                _ => None,
            }
        }
    }
}

/// Settle the match if decided. Returns true if it just ended.
pub fn settle(state: &mut MatchState, events: &mut Vec<GameEvent>) -> bool {
    if state.winner.is_some() {
        return false;
    }
    let Some(winner) = evaluate_winner(state) else {
        return false;
    };

    let line = match winner {
        Winner::Actor(id) => {
            let name = state.actor(id).map_or("Unknown", |a| a.name.as_str());
            format!("{} wins!", name)
        }
        Winner::Draw => "Draw!".to_string(),
        Winner::Horde => format!("The horde consumed you on wave {}", state.wave),
    };
    log::info!("Match over after {} ticks: {}", state.time_ticks, line);
    state.messages.push(line);
    state.winner = Some(winner);
    events.push(GameEvent::MatchOver { winner });
    true
}
