//! Box overlap and tile-grid collision resolution
//!
//! Boxes are axis-aligned with `pos` at the top-left corner and `size` as the
//! full extent. Resolution is a shallow-overlap snap, not a swept test: small
//! penetrations are pushed back to the tile face, deep ones are left alone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::{Tile, TileMap};
use crate::config::CollisionTuning;

/// Position, velocity and extent shared by every entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Bottom edge
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Half-open AABB overlap: touching edges do not intersect
#[inline]
pub fn intersects(a: &Body, b: &Body) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

/// Which axis a resolution pass handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Lethal map conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    /// Dropped below the bottom of the map
    FellOut,
    /// Feet touched a spike tile
    Spike,
}

/// What a resolution pass found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapContact {
    /// Came to rest on a solid tile or platform
    pub landed: bool,
    pub hazard: Option<Hazard>,
}

/// Push `body` out of solid tiles and onto one-way platforms on one axis.
///
/// The scanned cells are those under the box. During the horizontal pass the
/// scanned rows are inset so the floor being stood on never reads as a wall.
pub fn resolve_against_map(
    body: &mut Body,
    map: &TileMap,
    axis: Axis,
    tuning: &CollisionTuning,
) -> MapContact {
    let mut contact = MapContact::default();

    if body.pos.y > map.pixel_height() {
        contact.hazard = Some(Hazard::FellOut);
        return contact;
    }

    // Feet sample: horizontal center, just above the bottom edge
    let feet_x = map.cell(body.pos.x + body.size.x / 2.0);
    let feet_y = map.cell(body.feet() - 2.0);
    if map.tile(feet_x, feet_y) == Tile::Spike {
        contact.hazard = Some(Hazard::Spike);
    }

    let inset = match axis {
        Axis::Horizontal => tuning.horizontal_inset,
        Axis::Vertical => 0.0,
    };
    let start_x = map.cell(body.pos.x);
    let end_x = map.cell(body.pos.x + body.size.x);
    let start_y = map.cell(body.pos.y + inset);
    let end_y = map.cell(body.pos.y + body.size.y - inset);
    let ts = map.tile_size;

    for y in start_y..=end_y {
        for x in start_x..=end_x {
            let tile_x = x as f32 * ts;
            let tile_y = y as f32 * ts;
            match (map.tile(x, y), axis) {
                (Tile::Solid, Axis::Vertical) => {
                    if body.vel.y > 0.0 {
                        let overlap = body.feet() - tile_y;
                        if overlap < tuning.vertical_snap && body.pos.y < tile_y {
                            body.pos.y = tile_y - body.size.y;
                            body.vel.y = 0.0;
                            contact.landed = true;
                        }
                    } else if body.vel.y < 0.0 {
                        let overlap = tile_y + ts - body.pos.y;
                        if overlap < tuning.vertical_snap {
                            body.pos.y = tile_y + ts;
                            body.vel.y = 0.0;
                        }
                    }
                }
                (Tile::Solid, Axis::Horizontal) => {
                    if body.vel.x > 0.0 {
                        let overlap = body.pos.x + body.size.x - tile_x;
                        if overlap < tuning.horizontal_snap && body.pos.x < tile_x {
                            body.pos.x = tile_x - body.size.x;
                            body.vel.x = 0.0;
                        }
                    } else if body.vel.x < 0.0 {
                        let overlap = tile_x + ts - body.pos.x;
                        if overlap < tuning.horizontal_snap && body.pos.x > tile_x {
                            body.pos.x = tile_x + ts;
                            body.vel.x = 0.0;
                        }
                    }
                }
                (Tile::Platform, Axis::Vertical) if body.vel.y > 0.0 => {
                    // Only catch bodies whose feet were above the top last tick
                    let prev_feet = body.pos.y - body.vel.y + body.size.y;
                    if prev_feet <= tile_y + tuning.platform_tolerance && body.feet() > tile_y {
                        body.pos.y = tile_y - body.size.y;
                        body.vel.y = 0.0;
                        contact.landed = true;
                    }
                }
                _ => {}
            }
        }
    }

    contact
}
