//! Weapon table

use serde::{Deserialize, Serialize};

/// Rounds left in the equipped weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    Unlimited,
    Remaining(u32),
}

/// Special behavior carried by a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponEffect {
    /// Stronger air jumps and gliding while jump is held
    Flight,
    /// Cosmetic, rendered as a lightning bolt
    Lightning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Shotgun,
    Rocket,
    Laser,
    AngelCannon,
    NimbusStaff,
}

/// Static per-weapon configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub damage: i32,
    /// Projectile speed in units per tick
    pub speed: f32,
    /// Ticks between shots
    pub cooldown: u32,
    /// Projectile color (0xRRGGBB)
    pub color: u32,
    /// Projectile box edge
    pub size: f32,
    /// Ammo granted on pickup
    pub ammo: Ammo,
    /// Angle of the two extra flanking shots (radians)
    pub spread: Option<f32>,
    pub effect: Option<WeaponEffect>,
}

impl WeaponSpec {
    /// Projectiles produced per trigger pull
    pub fn projectile_count(&self) -> usize {
        if self.spread.is_some() { 3 } else { 1 }
    }
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::Rocket,
        WeaponKind::Laser,
        WeaponKind::AngelCannon,
        WeaponKind::NimbusStaff,
    ];

    pub fn spec(self) -> WeaponSpec {
        match self {
            WeaponKind::Pistol => WeaponSpec {
                damage: 10,
                speed: 12.0,
                cooldown: 20,
                color: 0xFFFF00,
                size: 4.0,
                ammo: Ammo::Unlimited,
                spread: None,
                effect: None,
            },
            WeaponKind::Shotgun => WeaponSpec {
                damage: 8,
                speed: 10.0,
                cooldown: 50,
                color: 0xFFA500,
                size: 3.0,
                ammo: Ammo::Remaining(15),
                spread: Some(0.2),
                effect: None,
            },
            WeaponKind::Rocket => WeaponSpec {
                damage: 40,
                speed: 8.0,
                cooldown: 80,
                color: 0xFF0000,
                size: 8.0,
                ammo: Ammo::Remaining(5),
                spread: None,
                effect: None,
            },
            WeaponKind::Laser => WeaponSpec {
                damage: 25,
                speed: 20.0,
                cooldown: 40,
                color: 0x00FFFF,
                size: 2.0,
                ammo: Ammo::Remaining(10),
                spread: None,
                effect: None,
            },
            WeaponKind::AngelCannon => WeaponSpec {
                damage: 15,
                speed: 15.0,
                cooldown: 15,
                color: 0xFCD34D,
                size: 6.0,
                ammo: Ammo::Remaining(30),
                spread: None,
                effect: Some(WeaponEffect::Flight),
            },
            WeaponKind::NimbusStaff => WeaponSpec {
                damage: 50,
                speed: 25.0,
                cooldown: 60,
                color: 0xE0F2FE,
                size: 10.0,
                ammo: Ammo::Remaining(8),
                spread: Some(0.1),
                effect: Some(WeaponEffect::Lightning),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::Rocket => "Rocket",
            WeaponKind::Laser => "Laser",
            WeaponKind::AngelCannon => "Angel Cannon",
            WeaponKind::NimbusStaff => "Nimbus Staff",
        }
    }

    pub fn has_effect(self, effect: WeaponEffect) -> bool {
        self.spec().effect == Some(effect)
    }
}
