//! Match state and entity model
//!
//! Everything a step reads or writes lives here, including the RNG, so a
//! state value plus inputs fully determines the next state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Body, Hazard};
use super::map::TileMap;
use super::weapons::{Ammo, WeaponKind};
use crate::consts::*;

pub type ActorId = u32;

/// Match rules in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Two humans, last one standing
    Pvp,
    /// Human against a bot, last one standing
    Solo,
    /// Two humans against endless waves
    Coop,
}

/// Terminal result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Actor(ActorId),
    Draw,
    Horde,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for left, 1 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points from `from` toward `to` along x
    pub fn toward(from: f32, to: f32) -> Self {
        if to - from > 0.0 { Facing::Right } else { Facing::Left }
    }
}

/// Held intents for one actor on one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Drop through a platform
    pub down: bool,
    pub shoot: bool,
    /// Special action (reserved by the input contract)
    pub action: bool,
}

/// A combatant, human or bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub color: u32,
    pub body: Body,
    /// Dead actors stay in the roster as corpses
    pub is_dead: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub facing: Facing,
    pub grounded: bool,
    /// Jump charges left before landing again
    pub jumps_left: u8,
    /// Jump intent last tick (edge detection)
    pub was_jump_pressed: bool,
    pub weapon: WeaponKind,
    pub ammo: Ammo,
    pub can_shoot: bool,
    /// Ticks until the next shot is allowed
    pub shoot_timer: u32,
    /// Ticks of recoil animation left
    pub attack_timer: u32,
    pub is_bot: bool,
    pub score: u32,
    pub team: u8,
    /// Animation only
    pub walk_cycle: f32,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, pos: Vec2, team: u8, color: u32) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            body: Body::new(pos, Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT)),
            is_dead: false,
            hp: ACTOR_MAX_HP,
            max_hp: ACTOR_MAX_HP,
            facing: Facing::Right,
            grounded: false,
            jumps_left: 2,
            was_jump_pressed: false,
            weapon: WeaponKind::Pistol,
            ammo: Ammo::Unlimited,
            can_shoot: true,
            shoot_timer: 0,
            attack_timer: 0,
            is_bot: false,
            score: 0,
            team,
            walk_cycle: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Equip a weapon with its full ammo allotment
    pub fn equip(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
        self.ammo = weapon.spec().ammo;
    }

    /// Zero HP and mark dead
    pub fn kill(&mut self) {
        self.hp = 0;
        self.is_dead = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Body,
    pub color: u32,
    pub weapon: WeaponKind,
    pub owner: ActorId,
    pub damage: i32,
    /// Ticks left
    pub lifetime: u32,
    pub is_dead: bool,
}

/// Cosmetic debris
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub body: Body,
    pub color: u32,
    pub life: u32,
    pub max_life: u32,
    pub is_dead: bool,
}

impl Particle {
    /// Render alpha, fades from 1 to 0
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// A weapon pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub id: u32,
    pub body: Body,
    pub color: u32,
    pub weapon: WeaponKind,
    /// Bobbing animation phase
    pub bob_phase: f32,
    pub is_dead: bool,
}

/// Why an actor died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Shot { by: ActorId },
    Map(Hazard),
}

/// Notifications for audio/render collaborators, one batch per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { actor: ActorId },
    Fired { actor: ActorId, weapon: WeaponKind },
    Hit { victim: ActorId, attacker: ActorId, damage: i32 },
    ProjectileImpact { pos: Vec2 },
    Died { actor: ActorId, cause: DeathCause },
    PickedUp { actor: ActorId, weapon: WeaponKind },
    WeaponDepleted { actor: ActorId },
    SupplyDropped { item: u32, weapon: WeaponKind },
    WaveStarted { wave: u32, hostiles: u32 },
    MatchOver { winner: Winner },
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Every random draw of the simulation comes from here
    pub rng: Pcg32,
    pub mode: MatchMode,
    pub map: TileMap,
    /// Roster in creation order. Never shrinks during a match.
    pub actors: Vec<Actor>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub items: Vec<ItemDrop>,
    /// Set once; a state with a winner no longer changes
    pub winner: Option<Winner>,
    /// Narrative log, append-only
    pub messages: Vec<String>,
    /// Horde wave counter
    pub wave: u32,
    /// Ticks spent with no hostiles alive
    pub wave_timer: u32,
    pub time_ticks: u64,
    next_id: u32,
}

impl MatchState {
    /// Start a match with the fixed two-actor roster
    pub fn new(mode: MatchMode, map: TileMap, seed: u64) -> Self {
        let mut state = Self::empty(mode, map, seed);

        let spawn_a = state.spawn_position(0);
        let spawn_b = state.spawn_position(1);

        let id = state.next_entity_id();
        state
            .actors
            .push(Actor::new(id, "Player 1", spawn_a, TEAM_HUMANS, PLAYER_ONE_COLOR));

        let id = state.next_entity_id();
        let (name, team, color) = match mode {
            MatchMode::Solo => ("Bot 2.5", TEAM_HORDE, PLAYER_TWO_COLOR),
            MatchMode::Pvp => ("Player 2", TEAM_HORDE, PLAYER_TWO_COLOR),
            MatchMode::Coop => ("Player 2", TEAM_HUMANS, COOP_PARTNER_COLOR),
        };
        let mut second = Actor::new(id, name, spawn_b, team, color);
        second.facing = Facing::Left;
        second.is_bot = mode == MatchMode::Solo;
        state.actors.push(second);

        log::info!(
            "Match created: {:?} on '{}' (seed {})",
            mode,
            state.map.theme,
            seed
        );
        state
    }

    /// A match with no actors; callers build the roster themselves
    pub fn empty(mode: MatchMode, map: TileMap, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode,
            map,
            actors: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            items: Vec::new(),
            winner: None,
            messages: Vec::new(),
            wave: 1,
            wave_timer: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// World position of a spawn point, wrapping around the spawn list
    pub fn spawn_position(&self, index: usize) -> Vec2 {
        match self.map.spawns.len() {
            0 => Vec2::splat(self.map.tile_size * 2.0),
            n => self.map.spawns[index % n].to_world(),
        }
    }

    /// Add an actor at a world position; returns its id
    pub fn add_actor(&mut self, name: &str, pos: Vec2, team: u8, is_bot: bool) -> ActorId {
        let id = self.next_entity_id();
        let color = if team == TEAM_HUMANS { PLAYER_ONE_COLOR } else { HORDE_COLOR };
        let mut actor = Actor::new(id, name, pos, team, color);
        actor.is_bot = is_bot;
        self.actors.push(actor);
        id
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn live_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.is_alive())
    }

    /// Living actors on a team
    pub fn live_on_team(&self, team: u8) -> usize {
        self.live_actors().filter(|a| a.team == team).count()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Serialize a snapshot for replays or debugging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
