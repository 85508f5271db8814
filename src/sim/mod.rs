//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the match state
//! - Stable iteration order (roster order, then entity ID)
//! - No rendering, audio or input dependencies

pub mod bot;
pub mod combat;
pub mod director;
pub mod geometry;
pub mod map;
pub mod state;
pub mod tick;
pub mod weapons;

pub use geometry::{Axis, Body, Hazard, MapContact, intersects, resolve_against_map};
pub use map::{GridPoint, MapError, MapLayout, Tile, TileMap};
pub use state::{
    Actor, ActorId, ActorInput, DeathCause, Facing, GameEvent, ItemDrop, MatchMode, MatchState,
    Particle, Projectile, Winner,
};
pub use tick::{TickInputs, step, tick};
pub use weapons::{Ammo, WeaponEffect, WeaponKind, WeaponSpec};
