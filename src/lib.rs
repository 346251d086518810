//! Cast Away! - island mini-games
//!
//! Core modules:
//! - `dice`: Rigid-die physics and the dice-throwing mini-game
//! - `burrow`: Card-driven path tracing and thing shape encoding
//! - `sched`: Per-frame cooperative task scheduler
//! - `island`: Resource economy (food, magic, cube, things)
//! - `persistence`: Key-value save store and load policy
//! - `render`: Visual adapter seam for the rendering backend
//! - `config`: Data-driven tuning and reward tables

pub mod burrow;
pub mod config;
pub mod dice;
pub mod island;
pub mod persistence;
pub mod render;
pub mod sched;

pub use config::{Config, DiceTuning, RewardTable};
pub use island::{Bonus, Inventory};

use glam::{IVec2, Quat};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Dice box dimensions (scene pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Half the edge length of a die
    pub const DIE_SIZE: f32 = 16.0;

    /// Burrowing grid dimensions
    pub const GRID_WIDTH: i32 = 4;
    pub const GRID_HEIGHT: i32 = 5;
    pub const GRID_TILES: usize = (GRID_WIDTH * GRID_HEIGHT) as usize;
}

/// Rotation angle of a quaternion in [0, π] (shortest arc)
#[inline]
pub fn rotation_angle(q: Quat) -> f32 {
    2.0 * q.w.abs().min(1.0).acos()
}

/// Heading class of a grid direction: +x = 0, +y = 1, -x = 2, -y = 3
#[inline]
pub fn heading_class(d: IVec2) -> Option<usize> {
    match (d.x, d.y) {
        (1, 0) => Some(0),
        (0, 1) => Some(1),
        (-1, 0) => Some(2),
        (0, -1) => Some(3),
        _ => None,
    }
}

/// True if a grid position lies inside the burrowing grid
#[inline]
pub fn in_grid(pos: IVec2) -> bool {
    (0..consts::GRID_WIDTH).contains(&pos.x) && (0..consts::GRID_HEIGHT).contains(&pos.y)
}
