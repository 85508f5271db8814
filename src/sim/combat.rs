//! Combat resolution
//!
//! Firing, projectile flight and impacts, particles, weapon pickups and
//! supply drops.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Body, intersects};
use super::map::Tile;
use super::state::{DeathCause, GameEvent, ItemDrop, MatchState, Particle, Projectile};
use super::weapons::{Ammo, WeaponKind};
use crate::consts::*;

/// Fire the actor's weapon if its cooldown allows. Returns true if it fired.
pub fn fire(state: &mut MatchState, idx: usize, events: &mut Vec<GameEvent>) -> bool {
    let actor = &state.actors[idx];
    if actor.is_dead || !actor.can_shoot || actor.shoot_timer > 0 {
        return false;
    }

    let owner = actor.id;
    let weapon = actor.weapon;
    let spec = weapon.spec();
    let dir = actor.facing.sign();
    let origin = actor.body.center();

    let mut angles: Vec<f32> = vec![0.0];
    if let Some(spread) = spec.spread {
        angles.push(spread);
        angles.push(-spread);
    }

    for angle in angles {
        let vel = Vec2::new(angle.cos() * spec.speed * dir, angle.sin() * spec.speed);
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            body: Body {
                pos: origin,
                vel,
                size: Vec2::splat(spec.size),
            },
            color: spec.color,
            weapon,
            owner,
            damage: spec.damage,
            lifetime: PROJECTILE_LIFETIME,
            is_dead: false,
        });
    }

    let actor = &mut state.actors[idx];
    actor.shoot_timer = spec.cooldown;
    actor.attack_timer = ATTACK_ANIM_TICKS;
    events.push(GameEvent::Fired { actor: owner, weapon });

    if let Ammo::Remaining(left) = actor.ammo {
        let left = left.saturating_sub(1);
        if left == 0 {
            actor.equip(WeaponKind::Pistol);
            events.push(GameEvent::WeaponDepleted { actor: owner });
        } else {
            actor.ammo = Ammo::Remaining(left);
        }
    }

    true
}

/// Move projectiles and resolve tile and actor impacts
pub fn update_projectiles(state: &mut MatchState, events: &mut Vec<GameEvent>) {
    for i in 0..state.projectiles.len() {
        let proj = &mut state.projectiles[i];
        if proj.is_dead {
            continue;
        }

        // Its last tick of flight still resolves impacts
        proj.body.pos += proj.body.vel;
        proj.lifetime = proj.lifetime.saturating_sub(1);
        if proj.lifetime == 0 {
            proj.is_dead = true;
        }

        let body = proj.body;
        let owner = proj.owner;
        let damage = proj.damage;
        let color = proj.color;

        if state.map.tile_at_world(body.pos) == Tile::Solid {
            state.projectiles[i].is_dead = true;
            spawn_burst(
                state,
                body.pos,
                color,
                IMPACT_PARTICLES,
                IMPACT_PARTICLE_SIZE,
                IMPACT_PARTICLE_LIFE,
                IMPACT_PARTICLE_JITTER,
            );
            events.push(GameEvent::ProjectileImpact { pos: body.pos });
        }

        // A vanished owner has no team, so nobody is exempt
        let owner_team = state.actor(owner).map(|a| a.team);
        let Some(victim_idx) = state.actors.iter().position(|a| {
            a.is_alive()
                && a.id != owner
                && owner_team != Some(a.team)
                && intersects(&body, &a.body)
        }) else {
            continue;
        };

        state.projectiles[i].is_dead = true;
        let victim = &mut state.actors[victim_idx];
        victim.hp -= damage;
        let push = if body.vel.x > 0.0 { 1.0 } else { -1.0 };
        victim.body.vel.x += push * KNOCKBACK_PUSH;
        victim.body.vel.y = KNOCKBACK_POP;
        let victim_id = victim.id;
        events.push(GameEvent::Hit {
            victim: victim_id,
            attacker: owner,
            damage,
        });

        if victim.hp <= 0 {
            victim.is_dead = true;
            let victim_name = victim.name.clone();
            let victim_pos = victim.body.pos;
            let victim_color = victim.color;

            if let Some(killer) = state.actor_mut(owner) {
                killer.score += 1;
                let line = format!("{} fragged {}", killer.name, victim_name);
                state.messages.push(line);
            }
            log::debug!("Actor {} killed by {}", victim_id, owner);
            events.push(GameEvent::Died {
                actor: victim_id,
                cause: DeathCause::Shot { by: owner },
            });
            spawn_burst(
                state,
                victim_pos,
                victim_color,
                DEATH_PARTICLES,
                DEATH_PARTICLE_SIZE,
                DEATH_PARTICLE_LIFE,
                DEATH_PARTICLE_JITTER,
            );
        }
    }
}

/// Spawn `count` particles flying out from `pos` with random velocity
fn spawn_burst(
    state: &mut MatchState,
    pos: Vec2,
    color: u32,
    count: usize,
    size: f32,
    life: u32,
    jitter: f32,
) {
    for _ in 0..count {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * jitter,
            (state.rng.random::<f32>() - 0.5) * jitter,
        );
        let id = state.next_entity_id();
        state.particles.push(Particle {
            id,
            body: Body {
                pos,
                vel,
                size: Vec2::splat(size),
            },
            color,
            life,
            max_life: life,
            is_dead: false,
        });
    }
}

/// Ballistic particle decay
pub fn update_particles(state: &mut MatchState) {
    for particle in state.particles.iter_mut() {
        particle.body.pos += particle.body.vel;
        particle.life = particle.life.saturating_sub(1);
        if particle.life == 0 {
            particle.is_dead = true;
        }
    }
}

/// Hand every overlapping item to the actor
pub fn pickup_items(state: &mut MatchState, idx: usize, events: &mut Vec<GameEvent>) {
    let actor = &mut state.actors[idx];
    if actor.is_dead {
        return;
    }
    for item in state.items.iter_mut() {
        if !item.is_dead && intersects(&actor.body, &item.body) {
            actor.equip(item.weapon);
            item.is_dead = true;
            log::debug!("Actor {} picked up {}", actor.id, item.weapon.name());
            events.push(GameEvent::PickedUp {
                actor: actor.id,
                weapon: item.weapon,
            });
        }
    }
}

/// Roll for a supply drop at the top of the map
pub fn maybe_spawn_supply_drop(state: &mut MatchState, chance: f32, events: &mut Vec<GameEvent>) {
    if state.rng.random::<f32>() >= chance {
        return;
    }
    let weapon = WeaponKind::ALL[state.rng.random_range(0..WeaponKind::ALL.len())];
    let span = state.map.pixel_width() - 2.0 * ITEM_MARGIN;
    let x = state.rng.random::<f32>() * span + ITEM_MARGIN;
    let bob_phase = state.rng.random::<f32>() * std::f32::consts::PI;
    let id = state.next_entity_id();
    state.items.push(ItemDrop {
        id,
        body: Body::new(Vec2::new(x, 0.0), Vec2::splat(ITEM_SIZE)),
        color: weapon.spec().color,
        weapon,
        bob_phase,
        is_dead: false,
    });
    log::debug!("Supply drop {} ({}) at x={:.0}", id, weapon.name(), x);
    events.push(GameEvent::SupplyDropped { item: id, weapon });
}

/// Drop items under half gravity until they land on a solid tile
pub fn update_items(state: &mut MatchState, gravity: f32) {
    let map = &state.map;
    let floor = map.pixel_height();
    for item in state.items.iter_mut() {
        if item.is_dead {
            continue;
        }
        item.body.vel.y += gravity * 0.5;
        item.body.pos.y += item.body.vel.y;

        // Land only when arriving from above, so drops spawned inside the
        // ceiling fall through it
        let feet_x = map.cell(item.body.center().x);
        let feet_y = map.cell(item.body.feet());
        let tile_top = feet_y as f32 * map.tile_size;
        let prev_feet = item.body.feet() - item.body.vel.y;
        if map.tile(feet_x, feet_y) == Tile::Solid && prev_feet <= tile_top {
            item.body.pos.y = tile_top - item.body.size.y;
            item.body.vel.y = 0.0;
        }

        if item.body.pos.y > floor {
            item.is_dead = true;
        }

        item.bob_phase += ITEM_BOB_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::map::TileMap;
    use crate::sim::state::{Facing, MatchMode};

    /// Two actors facing each other on open ground, 200 units apart
    fn duel() -> MatchState {
        let mut state = MatchState::empty(MatchMode::Pvp, TileMap::empty_arena(), 7);
        state.add_actor("A", Vec2::new(200.0, 300.0), 1, false);
        state.add_actor("B", Vec2::new(400.0, 300.0), 2, false);
        state.actors[1].facing = Facing::Left;
        state
    }

    fn projectile(state: &mut MatchState, owner: u32, pos: Vec2, vel: Vec2, damage: i32) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            body: Body { pos, vel, size: Vec2::splat(4.0) },
            color: 0xFFFFFF,
            weapon: WeaponKind::Pistol,
            owner,
            damage,
            lifetime: PROJECTILE_LIFETIME,
            is_dead: false,
        });
    }

    #[test]
    fn test_fire_pistol() {
        let mut state = duel();
        let mut events = Vec::new();
        assert!(fire(&mut state, 0, &mut events));
        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert_eq!(p.body.pos, state.actors[0].body.center());
        assert_eq!(p.body.vel, Vec2::new(12.0, 0.0));
        assert_eq!(state.actors[0].shoot_timer, 20);
        assert_eq!(state.actors[0].attack_timer, ATTACK_ANIM_TICKS);
        assert_eq!(state.actors[0].ammo, Ammo::Unlimited);

        // Cooldown blocks the next shot
        assert!(!fire(&mut state, 0, &mut events));
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_fire_blocked_when_not_permitted() {
        let mut state = duel();
        state.actors[0].can_shoot = false;
        assert!(!fire(&mut state, 0, &mut Vec::new()));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_shotgun_spread() {
        let mut state = duel();
        state.actors[1].equip(WeaponKind::Shotgun);
        fire(&mut state, 1, &mut Vec::new());
        assert_eq!(state.projectiles.len(), 3);
        let vy: Vec<f32> = state.projectiles.iter().map(|p| p.body.vel.y).collect();
        assert_eq!(vy[0], 0.0);
        assert!((vy[1] - 0.2f32.sin() * 10.0).abs() < 1e-5);
        assert!((vy[2] + 0.2f32.sin() * 10.0).abs() < 1e-5);
        // Facing left
        assert!(state.projectiles.iter().all(|p| p.body.vel.x < 0.0));
        assert_eq!(state.actors[1].ammo, Ammo::Remaining(14));
    }

    #[test]
    fn test_last_round_reverts_to_pistol() {
        let mut state = duel();
        state.actors[0].weapon = WeaponKind::Rocket;
        state.actors[0].ammo = Ammo::Remaining(1);
        let mut events = Vec::new();
        fire(&mut state, 0, &mut events);
        assert_eq!(state.actors[0].weapon, WeaponKind::Pistol);
        assert_eq!(state.actors[0].ammo, Ammo::Unlimited);
        assert!(events.contains(&GameEvent::WeaponDepleted { actor: state.actors[0].id }));
        // The rocket still went out
        assert_eq!(state.projectiles[0].damage, 40);
    }

    #[test]
    fn test_hit_damages_and_knocks_back() {
        let mut state = duel();
        let (a, b) = (state.actors[0].id, state.actors[1].id);
        projectile(&mut state, a, Vec2::new(390.0, 310.0), Vec2::new(12.0, 0.0), 10);
        let mut events = Vec::new();
        update_projectiles(&mut state, &mut events);

        let victim = &state.actors[1];
        assert_eq!(victim.hp, 90);
        assert_eq!(victim.body.vel, Vec2::new(KNOCKBACK_PUSH, KNOCKBACK_POP));
        assert!(state.projectiles[0].is_dead);
        assert_eq!(events, vec![GameEvent::Hit { victim: b, attacker: a, damage: 10 }]);
    }

    #[test]
    fn test_kill_scores_and_bursts() {
        let mut state = duel();
        let a = state.actors[0].id;
        state.actors[1].hp = 5;
        projectile(&mut state, a, Vec2::new(420.0, 310.0), Vec2::new(-12.0, 0.0), 10);
        update_projectiles(&mut state, &mut Vec::new());

        assert!(state.actors[1].is_dead);
        assert_eq!(state.actors[1].body.vel.x, -KNOCKBACK_PUSH);
        assert_eq!(state.actors[0].score, 1);
        assert_eq!(state.particles.len(), DEATH_PARTICLES);
        assert_eq!(state.messages, vec!["A fragged B".to_string()]);
    }

    #[test]
    fn test_no_friendly_fire() {
        let mut state = duel();
        state.actors[1].team = 1;
        let a = state.actors[0].id;
        projectile(&mut state, a, Vec2::new(405.0, 310.0), Vec2::new(0.0, 0.1), 10);
        update_projectiles(&mut state, &mut Vec::new());
        assert_eq!(state.actors[1].hp, 100);
        assert!(!state.projectiles[0].is_dead);
    }

    #[test]
    fn test_owner_not_hit_by_own_shot() {
        let mut state = duel();
        let a = state.actors[0].id;
        projectile(&mut state, a, Vec2::new(205.0, 310.0), Vec2::new(0.0, 0.1), 10);
        update_projectiles(&mut state, &mut Vec::new());
        assert_eq!(state.actors[0].hp, 100);
    }

    #[test]
    fn test_dangling_owner_still_damages() {
        let mut state = duel();
        // Same team as B, but the owner id matches nobody
        state.actors[0].team = 2;
        projectile(&mut state, 999, Vec2::new(405.0, 310.0), Vec2::new(0.0, 0.1), 10);
        update_projectiles(&mut state, &mut Vec::new());
        assert_eq!(state.actors[0].hp, 100);
        assert_eq!(state.actors[1].hp, 90);
    }

    #[test]
    fn test_dangling_owner_kill_does_not_crash() {
        let mut state = duel();
        state.actors[1].hp = 1;
        projectile(&mut state, 999, Vec2::new(405.0, 310.0), Vec2::new(0.0, 0.1), 10);
        update_projectiles(&mut state, &mut Vec::new());
        assert!(state.actors[1].is_dead);
        assert_eq!(state.actors[0].score, 0);
    }

    #[test]
    fn test_wall_impact_emits_particles() {
        let mut state = duel();
        let a = state.actors[0].id;
        // Heading into the right border wall at x = 24 * 32
        projectile(&mut state, a, Vec2::new(24.0 * 32.0 - 5.0, 100.0), Vec2::new(12.0, 0.0), 10);
        let mut events = Vec::new();
        update_projectiles(&mut state, &mut events);
        assert!(state.projectiles[0].is_dead);
        assert_eq!(state.particles.len(), IMPACT_PARTICLES);
        assert!(state.particles.iter().all(|p| p.life == IMPACT_PARTICLE_LIFE));
        assert!(matches!(events[0], GameEvent::ProjectileImpact { .. }));
    }

    #[test]
    fn test_projectile_expires() {
        let mut state = duel();
        let a = state.actors[0].id;
        projectile(&mut state, a, Vec2::new(300.0, 100.0), Vec2::ZERO, 10);
        state.projectiles[0].lifetime = 2;
        update_projectiles(&mut state, &mut Vec::new());
        assert!(!state.projectiles[0].is_dead);
        update_projectiles(&mut state, &mut Vec::new());
        assert!(state.projectiles[0].is_dead);
    }

    #[test]
    fn test_last_tick_of_flight_still_hits() {
        let mut state = duel();
        let a = state.actors[0].id;
        projectile(&mut state, a, Vec2::new(390.0, 310.0), Vec2::new(12.0, 0.0), 10);
        state.projectiles[0].lifetime = 1;
        update_projectiles(&mut state, &mut Vec::new());
        assert!(state.projectiles[0].is_dead);
        assert_eq!(state.actors[1].hp, 90);
    }

    #[test]
    fn test_wall_impact_still_hits_actor_in_same_tick() {
        let mut state = duel();
        let a = state.actors[0].id;
        // B straddles the right border wall
        state.actors[1].body.pos = Vec2::new(24.0 * 32.0 - 8.0, 300.0);
        projectile(&mut state, a, Vec2::new(24.0 * 32.0 - 8.0, 310.0), Vec2::new(10.0, 0.0), 10);
        let mut events = Vec::new();
        update_projectiles(&mut state, &mut events);
        assert!(matches!(events[0], GameEvent::ProjectileImpact { .. }));
        assert!(matches!(events[1], GameEvent::Hit { damage: 10, .. }));
        assert_eq!(state.actors[1].hp, 90);
    }

    #[test]
    fn test_particles_decay() {
        let mut state = duel();
        spawn_burst(&mut state, Vec2::new(100.0, 100.0), 0, 3, 2.0, 2, 5.0);
        update_particles(&mut state);
        assert!(state.particles.iter().all(|p| !p.is_dead && p.life == 1));
        update_particles(&mut state);
        assert!(state.particles.iter().all(|p| p.is_dead));
    }

    #[test]
    fn test_pickup_equips_full_ammo() {
        let mut state = duel();
        let id = state.next_entity_id();
        let pos = state.actors[0].body.pos;
        state.items.push(ItemDrop {
            id,
            body: Body::new(pos, Vec2::splat(ITEM_SIZE)),
            color: 0,
            weapon: WeaponKind::Laser,
            bob_phase: 0.0,
            is_dead: false,
        });
        let mut events = Vec::new();
        pickup_items(&mut state, 0, &mut events);
        assert_eq!(state.actors[0].weapon, WeaponKind::Laser);
        assert_eq!(state.actors[0].ammo, Ammo::Remaining(10));
        assert!(state.items[0].is_dead);

        // Already consumed
        pickup_items(&mut state, 1, &mut events);
        assert_eq!(state.actors[1].weapon, WeaponKind::Pistol);
    }

    #[test]
    fn test_supply_drop_spawns_in_bounds() {
        let mut state = duel();
        let mut events = Vec::new();
        for _ in 0..50 {
            maybe_spawn_supply_drop(&mut state, 1.0, &mut events);
        }
        assert_eq!(state.items.len(), 50);
        let width = state.map.pixel_width();
        for item in &state.items {
            assert!(item.body.pos.x >= ITEM_MARGIN);
            assert!(item.body.max().x <= width - ITEM_MARGIN + ITEM_SIZE);
            assert_eq!(item.body.pos.y, 0.0);
            assert_eq!(item.body.vel, Vec2::ZERO);
            assert_eq!(item.color, item.weapon.spec().color);
        }

        maybe_spawn_supply_drop(&mut state, 0.0, &mut events);
        assert_eq!(state.items.len(), 50);
    }

    #[test]
    fn test_supply_drop_lands_on_solid() {
        let mut state = duel();
        let id = state.next_entity_id();
        state.items.push(ItemDrop {
            id,
            body: Body::new(Vec2::new(300.0, 0.0), Vec2::splat(ITEM_SIZE)),
            color: 0,
            weapon: WeaponKind::Rocket,
            bob_phase: 0.0,
            is_dead: false,
        });
        for _ in 0..200 {
            update_items(&mut state, 0.6);
        }
        let item = &state.items[0];
        let floor_top = 17.0 * TILE_SIZE;
        assert_eq!(item.body.vel.y, 0.0);
        assert_eq!(item.body.feet(), floor_top);
        assert!(item.bob_phase > 19.0);
    }
}
