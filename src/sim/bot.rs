//! Bot controller
//!
//! Reactive per-tick policy: chase the nearest enemy, hop toward higher
//! ground, shoot when roughly lined up. No pathing.

use rand::Rng;

use super::state::{Actor, ActorInput, Facing};
use crate::config::BotTuning;

/// What a bot wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotDecision {
    pub input: ActorInput,
    /// Turn to face the target (set when lined up to shoot)
    pub face: Option<Facing>,
}

/// Nearest living actor on another team, by Manhattan distance.
/// Ties go to the earlier actor in the roster.
pub fn nearest_enemy<'a>(bot: &Actor, roster: &'a [Actor]) -> Option<&'a Actor> {
    roster
        .iter()
        .filter(|t| t.is_alive() && t.team != bot.team)
        .min_by(|a, b| {
            let da = (a.body.pos - bot.body.pos).abs().element_sum();
            let db = (b.body.pos - bot.body.pos).abs().element_sum();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Decide a bot's input for this tick
pub fn decide<R: Rng + ?Sized>(
    bot: &Actor,
    roster: &[Actor],
    rng: &mut R,
    tuning: &BotTuning,
) -> BotDecision {
    let mut decision = BotDecision::default();
    let Some(target) = nearest_enemy(bot, roster) else {
        return decision;
    };

    // Hesitate now and then
    if rng.random::<f32>() < tuning.hesitation_chance {
        return decision;
    }

    let delta = target.body.pos - bot.body.pos;
    let input = &mut decision.input;

    if delta.x > tuning.deadband {
        input.right = true;
    }
    if delta.x < -tuning.deadband {
        input.left = true;
    }

    if bot.grounded && target.body.pos.y < bot.body.pos.y - tuning.jump_height {
        input.jump = true;
    }
    if rng.random::<f32>() < tuning.random_jump_chance && bot.grounded {
        input.jump = true;
    }

    if delta.y.abs() < tuning.fire_band && delta.x.abs() < tuning.fire_range {
        decision.face = Some(Facing::toward(bot.body.pos.x, target.body.pos.x));
        if rng.random::<f32>() < tuning.fire_chance {
            decision.input.shoot = true;
        }
    }

    decision
}
