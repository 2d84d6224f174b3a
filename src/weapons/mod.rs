//! Weapons: one effect applier per weapon
//!
//! `WeaponKind` is the plain selector. `Weapon` carries the tuning for one
//! kind and dispatches to its applier. Appliers paint onto the layers, spawn
//! debris and may start a shake; they return the sound to play.

mod blade;
mod flamethrower;
mod grenade;
mod gun;

pub use blade::BladeParams;
pub use flamethrower::FlameParams;
pub use grenade::GrenadeParams;
pub use gun::GunParams;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::display::GradientStop;
use crate::geometry::{Point, Rect};
use crate::layers::LayerBuffers;
use crate::particles::ParticleSystem;
use crate::shake::Shake;
use crate::util::{hex_color, jitter};

/// Debris colour for ordinary hits
pub const NEUTRAL_DEBRIS: (u8, u8, u8) = (0xb0, 0xb6, 0xc0);
/// Debris colour for explosions
pub const BRIGHT_DEBRIS: (u8, u8, u8) = (0xe8, 0xed, 0xf5);

/// Burn mark: dark amber core fading to nothing at the rim
pub const SCORCH_STOPS: [GradientStop; 3] = [
    GradientStop::new(0.0, (80, 60, 0), 0.5),
    GradientStop::new(0.6, (40, 20, 0), 0.35),
    GradientStop::new(1.0, (0, 0, 0), 0.0),
];

// ============================================================================
// Selector
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    #[default]
    Gun,
    Knife,
    Machete,
    Flamethrower,
    Grenade,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Gun,
        WeaponKind::Knife,
        WeaponKind::Machete,
        WeaponKind::Flamethrower,
        WeaponKind::Grenade,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Gun => "gun",
            WeaponKind::Knife => "knife",
            WeaponKind::Machete => "machete",
            WeaponKind::Flamethrower => "flamethrower",
            WeaponKind::Grenade => "grenade",
        }
    }

    /// Weapon bound to number key `slot` (1-based)
    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeaponKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(WeaponKind::name).collect();
                format!("unknown weapon '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// How pointer input drives a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires once per press
    Discrete,
    /// Fires along the pointer path while pressed
    Continuous,
}

// ============================================================================
// Shared parameter types
// ============================================================================

/// A value drawn uniformly from [base, base + spread)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jitter {
    pub base: f32,
    pub spread: f32,
}

impl Jitter {
    pub const fn new(base: f32, spread: f32) -> Self {
        Self { base, spread }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        jitter(rng, self.base, self.spread)
    }

    pub fn max(&self) -> f32 {
        self.base + self.spread.max(0.0)
    }
}

/// A spray of debris particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    pub count: usize,
    pub max_speed: f32,
    #[serde(with = "hex_color")]
    pub color: (u8, u8, u8),
}

impl Burst {
    pub const fn new(count: usize, max_speed: f32, color: (u8, u8, u8)) -> Self {
        Self {
            count,
            max_speed,
            color,
        }
    }
}

/// Everything an applier may touch
pub struct Target<'a> {
    /// Image rectangle; path-following dabs land only inside it
    pub bounds: Rect,
    pub layers: &'a mut LayerBuffers,
    pub particles: &'a mut ParticleSystem,
    pub shake: &'a mut Shake,
    pub rng: &'a mut StdRng,
}

impl Target<'_> {
    fn burst(&mut self, at: Point, burst: &Burst) {
        self.particles
            .spawn(&mut *self.rng, at, burst.count, burst.max_speed, burst.color);
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// A weapon with its tuning
#[derive(Debug, Clone, PartialEq)]
pub enum Weapon {
    Gun(GunParams),
    Knife(BladeParams),
    Machete(BladeParams),
    Flamethrower(FlameParams),
    Grenade(GrenadeParams),
}

impl Weapon {
    pub fn kind(&self) -> WeaponKind {
        match self {
            Weapon::Gun(_) => WeaponKind::Gun,
            Weapon::Knife(_) => WeaponKind::Knife,
            Weapon::Machete(_) => WeaponKind::Machete,
            Weapon::Flamethrower(_) => WeaponKind::Flamethrower,
            Weapon::Grenade(_) => WeaponKind::Grenade,
        }
    }

    pub fn trigger(&self) -> Trigger {
        match self {
            Weapon::Gun(_) | Weapon::Grenade(_) => Trigger::Discrete,
            Weapon::Knife(_) | Weapon::Machete(_) | Weapon::Flamethrower(_) => {
                Trigger::Continuous
            },
        }
    }

    /// Pointer went down at `at`
    pub fn press(&self, target: &mut Target<'_>, at: Point) -> Option<Cue> {
        match self {
            Weapon::Gun(params) => Some(gun::fire(params, target, at)),
            Weapon::Grenade(params) => Some(grenade::detonate(params, target, at)),
            Weapon::Flamethrower(params) => Some(flamethrower::burn(params, target, at)),
            // Blades need a path to cut along
            Weapon::Knife(_) | Weapon::Machete(_) => None,
        }
    }

    /// Pointer moved from `from` to `to` while pressed
    pub fn drag(&self, target: &mut Target<'_>, from: Point, to: Point) -> Option<Cue> {
        match self {
            Weapon::Knife(params) => Some(blade::slash(params, target, from, to, Cue::Knife)),
            Weapon::Machete(params) => Some(blade::slash(params, target, from, to, Cue::Machete)),
            Weapon::Flamethrower(params) => {
                Some(flamethrower::sweep(params, target, from, to))
            },
            Weapon::Gun(_) | Weapon::Grenade(_) => None,
        }
    }
}

/// Tuning for every weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arsenal {
    pub gun: GunParams,
    #[serde(deserialize_with = "blade::knife_with_defaults")]
    pub knife: BladeParams,
    #[serde(deserialize_with = "blade::machete_with_defaults")]
    pub machete: BladeParams,
    pub flamethrower: FlameParams,
    pub grenade: GrenadeParams,
}

impl Default for Arsenal {
    fn default() -> Self {
        Self {
            gun: GunParams::default(),
            knife: BladeParams::knife(),
            machete: BladeParams::machete(),
            flamethrower: FlameParams::default(),
            grenade: GrenadeParams::default(),
        }
    }
}

impl Arsenal {
    pub fn weapon(&self, kind: WeaponKind) -> Weapon {
        match kind {
            WeaponKind::Gun => Weapon::Gun(self.gun),
            WeaponKind::Knife => Weapon::Knife(self.knife),
            WeaponKind::Machete => Weapon::Machete(self.machete),
            WeaponKind::Flamethrower => Weapon::Flamethrower(self.flamethrower),
            WeaponKind::Grenade => Weapon::Grenade(self.grenade),
        }
    }
}
