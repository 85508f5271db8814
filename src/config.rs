//! Simulation tuning
//!
//! Every gameplay constant that a designer might want to tweak. Loaded from
//! JSON by the host; missing fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Movement and gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Horizontal velocity multiplier applied every tick
    pub friction: f32,
    /// Horizontal acceleration while a move intent is held
    pub move_speed: f32,
    /// Vertical velocity of a grounded jump (negative is up)
    pub jump_force: f32,
    /// Maximum downward speed
    pub terminal_velocity: f32,
    /// Jump charges including the grounded jump
    pub max_jumps: u8,
    /// Multiplier on `jump_force` for mid-air jumps
    pub air_jump_factor: f32,
    /// Multiplier on `jump_force` for mid-air jumps with the flight effect
    pub flight_jump_factor: f32,
    /// Downward velocity multiplier while gliding with the flight effect
    pub glide_factor: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            friction: 0.80,
            move_speed: 1.5,
            jump_force: -14.0,
            terminal_velocity: 15.0,
            max_jumps: 2,
            air_jump_factor: 0.9,
            flight_jump_factor: 1.2,
            glide_factor: 0.5,
        }
    }
}

/// Shallow-overlap thresholds used by tile resolution.
///
/// These are tied to `TILE_SIZE` and the movement constants. Changing either
/// means re-deriving them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Vertical inset applied to the scanned rows during the horizontal pass
    pub horizontal_inset: f32,
    /// Max penetration snapped out on the vertical axis
    pub vertical_snap: f32,
    /// Max penetration snapped out on the horizontal axis
    pub horizontal_snap: f32,
    /// How far below a platform top the previous feet position may sit
    pub platform_tolerance: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            horizontal_inset: 4.0,
            vertical_snap: 20.0,
            horizontal_snap: 15.0,
            platform_tolerance: 5.0,
        }
    }
}

/// Bot controller behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Chance per tick to do nothing at all
    pub hesitation_chance: f32,
    /// Horizontal gap below which the bot stops walking toward its target
    pub deadband: f32,
    /// Height difference that makes a grounded bot jump
    pub jump_height: f32,
    /// Chance per tick of a random grounded jump
    pub random_jump_chance: f32,
    /// Max horizontal distance to open fire
    pub fire_range: f32,
    /// Max vertical distance to open fire
    pub fire_band: f32,
    /// Chance per tick to pull the trigger while lined up
    pub fire_chance: f32,
    /// Fraction of `move_speed` bots accelerate with
    pub speed_factor: f32,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            hesitation_chance: 0.05,
            deadband: 50.0,
            jump_height: 50.0,
            random_jump_chance: 0.01,
            fire_range: 400.0,
            fire_band: 50.0,
            fire_chance: 0.1,
            speed_factor: 0.8,
        }
    }
}

/// Waves and supply drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorTuning {
    /// Ticks with no hostiles alive before the next wave arrives
    pub wave_delay: u32,
    /// Cap on hostiles per wave
    pub max_per_wave: u32,
    /// Chance per tick of a supply drop
    pub supply_drop_chance: f32,
    pub horde_base_hp: i32,
    pub horde_hp_per_wave: i32,
    /// Chance a hostile spawns with a shotgun instead of a pistol
    pub horde_shotgun_chance: f32,
    /// Shoot cooldown hostiles spawn with
    pub horde_shoot_delay: u32,
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            wave_delay: 300,
            max_per_wave: 5,
            supply_drop_chance: 0.001,
            horde_base_hp: 30,
            horde_hp_per_wave: 10,
            horde_shotgun_chance: 0.2,
            horde_shoot_delay: 30,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsTuning,
    pub collision: CollisionTuning,
    pub bot: BotTuning,
    pub director: DirectorTuning,
}

impl SimConfig {
    /// Parse a configuration, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file, falling back to defaults if it is missing
    /// or malformed
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Same tuning with supply drops switched off (scripted scenarios)
    pub fn without_random_drops(mut self) -> Self {
        self.director.supply_drop_chance = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "director": { "wave_delay": 10 } }"#).unwrap();
        assert_eq!(config.director.wave_delay, 10);
        assert_eq!(config.director.max_per_wave, 5);
        assert_eq!(config.physics, PhysicsTuning::default());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = SimConfig::load(Path::new("/definitely/not/here.json"));
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = SimConfig::default();
        config.collision.horizontal_snap = 12.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }
}
