//! Tile map and the map contract
//!
//! Maps arrive as a JSON layout from an external generator. Anything with the
//! wrong dimensions is swapped for the built-in arena so a match can always
//! start.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};

/// Cell type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    /// One-way: blocks only from above
    Platform,
    /// Kills on contact with the feet
    Spike,
}

impl Tile {
    /// Decode a layout cell. Unknown codes are open air.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Tile::Solid,
            2 => Tile::Platform,
            3 => Tile::Spike,
            _ => Tile::Empty,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Tile::Empty => 0,
            Tile::Solid => 1,
            Tile::Platform => 2,
            Tile::Spike => 3,
        }
    }
}

/// A cell coordinate in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the cell in world units
    pub fn to_world(self) -> Vec2 {
        crate::grid_to_world(self.x, self.y)
    }
}

/// Raw map as produced by the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapLayout {
    /// Rows of cell codes, top row first
    pub tiles: Vec<Vec<i32>>,
    #[serde(default)]
    pub spawns: Vec<GridPoint>,
    #[serde(default)]
    pub theme: String,
}

/// Why a layout was rejected
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map JSON could not be decoded: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("map is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Immutable tile grid for one match
///
/// Serialized in the generator's layout format, so a snapshot's map goes
/// through the same validation as a freshly generated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MapLayout", into = "MapLayout")]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    pub tile_size: f32,
    /// Row-major cells
    tiles: Vec<Tile>,
    pub spawns: Vec<GridPoint>,
    /// Opaque to the simulation
    pub theme: String,
}

impl TryFrom<MapLayout> for TileMap {
    type Error = MapError;

    fn try_from(layout: MapLayout) -> Result<Self, Self::Error> {
        Self::from_layout(layout)
    }
}

impl From<TileMap> for MapLayout {
    fn from(map: TileMap) -> Self {
        map.to_layout()
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::default_arena()
    }
}

impl TileMap {
    /// Validate a generator layout against the expected grid size
    pub fn from_layout(layout: MapLayout) -> Result<Self, MapError> {
        let height = layout.tiles.len();
        let width = layout.tiles.first().map_or(0, Vec::len);
        if height != MAP_HEIGHT || width != MAP_WIDTH {
            return Err(MapError::DimensionMismatch {
                expected_width: MAP_WIDTH,
                expected_height: MAP_HEIGHT,
                actual_width: width,
                actual_height: height,
            });
        }
        if let Some((row, cells)) = layout
            .tiles
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(MapError::RaggedRows {
                row,
                expected: width,
                actual: cells.len(),
            });
        }

        let tiles = layout
            .tiles
            .iter()
            .flat_map(|row| row.iter().map(|&code| Tile::from_code(code)))
            .collect();

        // Generator fallback when it forgets (or skimps on) spawn points
        let spawns = if layout.spawns.len() >= 2 {
            layout.spawns
        } else {
            vec![GridPoint::new(2, 2), GridPoint::new(width as i32 - 3, 2)]
        };

        Ok(Self {
            width,
            height,
            tile_size: TILE_SIZE,
            tiles,
            spawns,
            theme: layout.theme,
        })
    }

    /// Parse and validate generator JSON
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let layout: MapLayout = serde_json::from_str(json)?;
        Self::from_layout(layout)
    }

    /// Validate a layout, substituting the default arena on rejection
    pub fn from_layout_or_default(layout: MapLayout) -> Self {
        match Self::from_layout(layout) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Rejected map ({}), using default arena", e);
                Self::default_arena()
            }
        }
    }

    /// Parse generator JSON, substituting the default arena (with the
    /// requested theme) on any failure
    pub fn from_json_or_default(json: &str, theme: &str) -> Self {
        match Self::from_json(json) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Rejected map ({}), using default arena", e);
                let mut map = Self::default_arena();
                map.theme = theme.to_string();
                map
            }
        }
    }

    /// Built-in arena used whenever a supplied map is unusable
    pub fn default_arena() -> Self {
        let tiles = DEFAULT_ARENA
            .iter()
            .flat_map(|row| row.iter().map(|&code| Tile::from_code(code)))
            .collect();
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            tile_size: TILE_SIZE,
            tiles,
            spawns: vec![
                GridPoint::new(2, 2),
                GridPoint::new(22, 2),
                GridPoint::new(12, 2),
            ],
            theme: "Industrial Zone".to_string(),
        }
    }

    /// Tile at a grid cell. Anything outside the grid is open air.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Tile::Empty;
        }
        self.tiles
            .get(y as usize * self.width + x as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Tile containing a world-space point
    pub fn tile_at_world(&self, pos: Vec2) -> Tile {
        self.tile(self.cell(pos.x), self.cell(pos.y))
    }

    /// Grid index along one axis for a world coordinate
    #[inline]
    pub fn cell(&self, v: f32) -> i32 {
        (v / self.tile_size).floor() as i32
    }

    /// World width in units
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// World height in units
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Overwrite a cell (map authoring and tests)
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
    }

    /// Back to the generator's row format
    pub fn to_layout(&self) -> MapLayout {
        MapLayout {
            tiles: self
                .tiles
                .chunks(self.width)
                .map(|row| row.iter().map(|t| t.code()).collect())
                .collect(),
            spawns: self.spawns.clone(),
            theme: self.theme.clone(),
        }
    }

    /// An open box of the expected size: solid border, empty inside
    pub fn empty_arena() -> Self {
        let mut map = Self::default_arena();
        for y in 0..map.height {
            for x in 0..map.width {
                let border = x == 0 || y == 0 || x == map.width - 1 || y == map.height - 1;
                map.set_tile(x, y, if border { Tile::Solid } else { Tile::Empty });
            }
        }
        map.theme = "Test Chamber".to_string();
        map
    }
}

#[rustfmt::skip]
const DEFAULT_ARENA: [[i32; MAP_WIDTH]; MAP_HEIGHT] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,1,1,1,1,1,0,0,0,0,0,1,1,1,1,1,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,1,1,0,0,0,0,0,0,1,1,1,0,0,0,0,0,0,1,1,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,1,1,1,1,1,0,1,1,1,1,1,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1,1,1],
    [1,0,0,0,0,0,1,1,0,0,0,0,0,0,0,1,1,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,1,1,1,1,0,0,0,1,1,1,0,0,0,1,1,1,1,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,0,1,1,1,0,0,0,1,1,1,1,1,1,1,0,0,0,1,1,1,0,0,0,1],
    [1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: usize, height: usize) -> MapLayout {
        MapLayout {
            tiles: vec![vec![0; width]; height],
            spawns: vec![GridPoint::new(1, 1), GridPoint::new(3, 1)],
            theme: "Frozen Tundra".to_string(),
        }
    }

    #[test]
    fn test_default_arena_shape() {
        let map = TileMap::default_arena();
        assert_eq!(map.width, MAP_WIDTH);
        assert_eq!(map.height, MAP_HEIGHT);
        assert!(map.spawns.len() >= 2);
        assert_eq!(map.tile(0, 0), Tile::Solid);
        assert_eq!(map.tile(1, 1), Tile::Empty);
        assert_eq!(map.tile(4, 3), Tile::Solid);
    }

    #[test]
    fn test_out_of_range_is_open_air() {
        let map = TileMap::default_arena();
        assert_eq!(map.tile(-1, 5), Tile::Empty);
        assert_eq!(map.tile(5, -1), Tile::Empty);
        assert_eq!(map.tile(MAP_WIDTH as i32, 0), Tile::Empty);
        assert_eq!(map.tile(0, MAP_HEIGHT as i32), Tile::Empty);
        assert_eq!(map.tile_at_world(Vec2::new(-1000.0, 1e6)), Tile::Empty);
    }

    #[test]
    fn test_layout_accepted_and_decoded() {
        let mut raw = layout(MAP_WIDTH, MAP_HEIGHT);
        raw.tiles[5][6] = 2;
        raw.tiles[5][7] = 3;
        raw.tiles[5][8] = 42;
        let map = TileMap::from_layout(raw).unwrap();
        assert_eq!(map.tile(6, 5), Tile::Platform);
        assert_eq!(map.tile(7, 5), Tile::Spike);
        assert_eq!(map.tile(8, 5), Tile::Empty);
        assert_eq!(map.theme, "Frozen Tundra");
        assert_eq!(map.spawns[1], GridPoint::new(3, 1));
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        let err = TileMap::from_layout(layout(10, 10)).unwrap_err();
        assert!(matches!(err, MapError::DimensionMismatch { actual_width: 10, .. }));

        let map = TileMap::from_layout_or_default(layout(MAP_WIDTH, MAP_HEIGHT - 1));
        assert_eq!(map, TileMap::default_arena());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let mut raw = layout(MAP_WIDTH, MAP_HEIGHT);
        raw.tiles[7].pop();
        let err = TileMap::from_layout(raw).unwrap_err();
        assert!(matches!(err, MapError::RaggedRows { row: 7, .. }));
    }

    #[test]
    fn test_missing_spawns_get_fallback() {
        let mut raw = layout(MAP_WIDTH, MAP_HEIGHT);
        raw.spawns.clear();
        let map = TileMap::from_layout(raw).unwrap();
        assert_eq!(
            map.spawns,
            vec![GridPoint::new(2, 2), GridPoint::new(MAP_WIDTH as i32 - 3, 2)]
        );
    }

    #[test]
    fn test_bad_json_keeps_theme() {
        let map = TileMap::from_json_or_default("not json at all", "Toxic Sewers");
        assert_eq!(map.theme, "Toxic Sewers");
        assert_eq!(map.width, MAP_WIDTH);
    }

    #[test]
    fn test_map_deserializes_through_validation() {
        let json = serde_json::to_string(&layout(MAP_WIDTH, MAP_HEIGHT - 3)).unwrap();
        assert!(serde_json::from_str::<TileMap>(&json).is_err());

        let map = TileMap::empty_arena();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(serde_json::from_str::<TileMap>(&json).unwrap(), map);
    }

    #[test]
    fn test_short_grid_reads_as_open_air() {
        let mut map = TileMap::default_arena();
        map.tiles.truncate(MAP_WIDTH);
        assert_eq!(map.tile(0, 0), Tile::Solid);
        assert_eq!(map.tile(4, 3), Tile::Empty);
    }

    #[test]
    fn test_json_layout_round_trip() {
        let map = TileMap::default_arena();
        let json = serde_json::to_string(&map.to_layout()).unwrap();
        assert_eq!(TileMap::from_json(&json).unwrap(), map);
    }
}
