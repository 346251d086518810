//! Text record of a collected thing: `letter-tiles-symbol`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CodeError;
use super::grid::{Grid, Shape};
use super::symbols::SymbolTable;
use super::tile::{ThingTile, TileFace};
use crate::consts::GRID_HEIGHT;

const SEPARATOR: char = '-';

/// A completed burrowing shape as it is stored in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingRecord {
    /// Four-character letter code of the filled cells
    pub letter: String,
    /// Twenty tile codes, column-major
    pub tiles: String,
    /// Classified symbol name, if the letter code is known
    pub symbol: Option<String>,
}

impl ThingRecord {
    /// Encode a carved grid, classifying it against `symbols`
    pub fn encode(grid: &Grid, symbols: &SymbolTable) -> Self {
        let letter = grid.classify();
        let symbol = symbols.lookup(&letter).map(str::to_owned);
        Self {
            letter,
            tiles: grid.tile_codes(),
            symbol,
        }
    }

    /// Rebuild the grid from the tile codes
    pub fn grid(&self) -> Result<Grid, CodeError> {
        Grid::from_tile_codes(&self.tiles)
    }

    /// Shape given by the letter code
    pub fn shape(&self) -> Result<Shape, CodeError> {
        Shape::from_letter_code(&self.letter)
    }

    /// Block image for every non-empty tile, as `(x, y, face)`
    pub fn sprite_info(&self) -> impl Iterator<Item = Result<(i32, i32, TileFace), CodeError>> + '_ {
        self.tiles
            .chars()
            .enumerate()
            .filter(|(_, c)| *c != '0')
            .map(|(i, c)| {
                let i = i as i32;
                let tile = ThingTile::from_code(c)?;
                Ok((i / GRID_HEIGHT, i % GRID_HEIGHT, tile.face()))
            })
    }
}

impl fmt::Display for ThingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.letter,
            self.tiles,
            self.symbol.as_deref().unwrap_or("")
        )
    }
}

impl FromStr for ThingRecord {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CodeError::MalformedRecord(s.to_owned());
        let mut parts = s.splitn(3, SEPARATOR);
        let letter = parts.next().ok_or_else(malformed)?;
        let tiles = parts.next().ok_or_else(malformed)?;
        let symbol = parts.next().ok_or_else(malformed)?;

        Shape::from_letter_code(letter)?;
        Grid::from_tile_codes(tiles)?;

        Ok(Self {
            letter: letter.to_owned(),
            tiles: tiles.to_owned(),
            symbol: (!symbol.is_empty()).then(|| symbol.to_owned()),
        })
    }
}
