//! Dice-throwing simulation
//!
//! All gameplay logic for the dice lives here. Like the rest of the
//! simulation it is deterministic for a given seed:
//! - Seeded RNG only
//! - Stable iteration order (by die index)
//! - No rendering or platform dependencies

pub mod die;
pub mod geometry;
pub mod throwing;

pub use die::{Die, FACE_NUMBERS, TickOutcome, random_spin};
pub use geometry::{Plane, PowerError, Support, box_planes, quat_pow, reflect, support};
pub use throwing::{DiceEvent, DiceInput, DiceThrowing, Score, ThrowPhase, score_faces};
