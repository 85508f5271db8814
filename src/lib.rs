//! Tile Brawl - A tile-arena platformer combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, combat, bots, match modes)
//! - `config`: Data-driven tuning for physics, collision, bots and modes
//!
//! Rendering, audio and map generation live outside this crate. They read
//! the [`sim::MatchState`] and the [`sim::GameEvent`]s returned by each step.

pub mod config;
pub mod sim;

pub use config::SimConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tile edge length in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Expected map width in tiles
    pub const MAP_WIDTH: usize = 25;
    /// Expected map height in tiles
    pub const MAP_HEIGHT: usize = 18;

    /// Actor box (width, height)
    pub const ACTOR_WIDTH: f32 = 20.0;
    pub const ACTOR_HEIGHT: f32 = 40.0;
    pub const ACTOR_MAX_HP: i32 = 100;

    /// Ticks a projectile lives before fizzling out
    pub const PROJECTILE_LIFETIME: u32 = 100;
    /// Recoil animation length after firing
    pub const ATTACK_ANIM_TICKS: u32 = 10;

    /// Knockback applied to a hit actor
    pub const KNOCKBACK_PUSH: f32 = 8.0;
    pub const KNOCKBACK_POP: f32 = -5.0;

    /// Supply drop box edge
    pub const ITEM_SIZE: f32 = 20.0;
    /// Horizontal margin kept free when placing supply drops
    pub const ITEM_MARGIN: f32 = 20.0;
    pub const ITEM_BOB_STEP: f32 = 0.1;

    /// Particle bursts (count, edge, lifetime, velocity jitter)
    pub const IMPACT_PARTICLES: usize = 5;
    pub const IMPACT_PARTICLE_SIZE: f32 = 2.0;
    pub const IMPACT_PARTICLE_LIFE: u32 = 20;
    pub const IMPACT_PARTICLE_JITTER: f32 = 5.0;
    pub const DEATH_PARTICLES: usize = 20;
    pub const DEATH_PARTICLE_SIZE: f32 = 4.0;
    pub const DEATH_PARTICLE_LIFE: u32 = 40;
    pub const DEATH_PARTICLE_JITTER: f32 = 10.0;

    /// Actor palette (0xRRGGBB)
    pub const PLAYER_ONE_COLOR: u32 = 0x00FFFF;
    pub const PLAYER_TWO_COLOR: u32 = 0xFF00FF;
    pub const COOP_PARTNER_COLOR: u32 = 0x00FF00;
    pub const HORDE_COLOR: u32 = 0xEF4444;

    /// Team ids
    pub const TEAM_HUMANS: u8 = 1;
    pub const TEAM_HORDE: u8 = 2;
}

/// Top-left corner of a grid cell in world units
#[inline]
pub fn grid_to_world(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 * consts::TILE_SIZE, y as f32 * consts::TILE_SIZE)
}
