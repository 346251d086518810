//! Burrowing mini-game core
//!
//! The player draws direction cards from three decks; the cards trace a
//! worm's path over a 4x5 grid starting just below the top row. The tiles it
//! passes through form the shape of a "thing", which is classified by its
//! letter code and stored as a compact text record.

pub mod deck;
pub mod grid;
pub mod path;
pub mod record;
pub mod session;
pub mod symbols;
pub mod tile;

pub use deck::{DECK_COUNT, Decks};
pub use grid::{Grid, Shape};
pub use path::{Card, PathStep, START_HEADING, START_POS, Trace, carve, trace};
pub use record::ThingRecord;
pub use session::{BurrowPhase, Burrowing, Thing};
pub use symbols::{SymbolTable, thing_message};
pub use tile::{BlockShape, ThingTile, TileFace};

use thiserror::Error;

/// Failure to decode a tile, letter code, or thing record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("invalid tile code {0:?}")]
    InvalidTile(char),
    #[error("invalid column code {0:?}")]
    InvalidColumn(char),
    #[error("expected {expected} code characters, found {found}")]
    WrongLength { expected: usize, found: usize },
    #[error("malformed thing record {0:?}")]
    MalformedRecord(String),
}
