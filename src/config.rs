//! Game tuning and reward tables
//!
//! Built once at startup and passed by reference to the components that
//! need it. Every field has a default so partial JSON overrides work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, DIE_SIZE};
use crate::island::Bonus;

/// Number of distinct face identities on a die
pub const FACE_KINDS: usize = 5;

/// Physics constants for the dice box
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceTuning {
    /// Box extent along x
    pub arena_width: f32,
    /// Box extent along y
    pub arena_height: f32,
    /// Half edge length of each die
    pub die_size: f32,
    /// Downward acceleration (per-tick velocity units per second)
    pub gravity: f32,
    /// Fraction of linear velocity kept per second
    pub damping: f32,
    /// Fraction of spin rate kept per second
    pub spin_damping: f32,
    /// Fraction of linear velocity kept on each bounce
    pub bounce_damping: f32,
    /// Weight of the collision impulse when blended into the spin
    pub spin_blend: f32,
    /// Tumble impulse per unit of speed and contact offset
    pub tumble: f32,
    /// Uprighting impulse per unit of velocity
    pub upright: f32,
    /// Velocity kick applied to both dice of a colliding pair
    pub collision_kick: f32,
    /// Fraction of sliding speed and spin kept per second on the floor
    pub floor_friction: f32,
    /// Share of the remaining tilt a grounded die tips over per second
    pub topple_rate: f32,
    /// Below this L1 velocity a die may come to rest
    pub rest_speed: f32,
    /// Below this spin angle (radians per second) a die may come to rest
    pub rest_spin: f32,
    /// Alignment with "up" needed for the resting face to lock
    pub settle_dot: f32,
    /// Steering rotation rate during face selection (radians per second)
    pub steer_rate: f32,
    /// Largest Euler rate used for a random throw spin (radians per second)
    pub throw_spin: f32,
    /// Largest horizontal throw speed (per tick)
    pub throw_speed: f32,
    /// Drop height range above the bounding radius
    pub drop_height: (f32, f32),
}

impl Default for DiceTuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            die_size: DIE_SIZE,
            gravity: 40.0,
            damping: 0.9,
            spin_damping: 0.6,
            bounce_damping: 0.8,
            spin_blend: 0.7,
            tumble: 0.002,
            upright: 0.02,
            collision_kick: 20.0,
            floor_friction: 0.02,
            topple_rate: 6.0,
            rest_speed: 1.0,
            rest_spin: 0.3,
            settle_dot: 0.98,
            steer_rate: 3.0,
            throw_spin: 12.0,
            throw_speed: 8.0,
            drop_height: (20.0, 80.0),
        }
    }
}

impl DiceTuning {
    /// Bounding sphere radius of a die (corner distance from centre)
    pub fn die_radius(&self) -> f32 {
        self.die_size * 3.0_f32.sqrt()
    }
}

/// Rewards paid out when a throw settles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    /// Reward for each face number
    pub faces: [Bonus; FACE_KINDS],
    /// Extra reward for every matched pair of faces
    pub pair: Bonus,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            faces: [
                Bonus::food(1),
                Bonus::food(2),
                Bonus::magic(1),
                Bonus::cube(1),
                Bonus::default(),
            ],
            pair: Bonus::magic(1),
        }
    }
}

impl RewardTable {
    /// Reward for a single face (out-of-range faces pay nothing)
    pub fn face(&self, face: u8) -> Bonus {
        self.faces.get(face as usize).copied().unwrap_or_default()
    }
}

/// Complete immutable game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dice: DiceTuning,
    pub rewards: RewardTable,
}

impl Config {
    /// Parse a configuration from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load configuration from a JSON file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
