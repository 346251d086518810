//! The 4x5 burrowing grid, filled-cell shapes and their letter codes

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::CodeError;
use super::tile::{ThingTile, code_bits, code_char};
use crate::consts::{GRID_HEIGHT, GRID_TILES, GRID_WIDTH};
use crate::in_grid;

/// Tile index of an in-bounds position (column major: x * height + y)
#[inline]
fn index(pos: IVec2) -> Option<usize> {
    in_grid(pos).then(|| (pos.x * GRID_HEIGHT + pos.y) as usize)
}

#[inline]
fn position(index: usize) -> IVec2 {
    let i = index as i32;
    IVec2::new(i / GRID_HEIGHT, i % GRID_HEIGHT)
}

/// A set of grid cells, one bit per tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Shape(u32);

impl Shape {
    pub const EMPTY: Shape = Shape(0);

    pub fn from_bits(bits: u32) -> Self {
        Shape(bits & ((1 << GRID_TILES) - 1))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Add a cell; out-of-bounds cells are ignored
    pub fn insert(&mut self, pos: IVec2) {
        if let Some(i) = index(pos) {
            self.0 |= 1 << i;
        }
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        index(pos).is_some_and(|i| self.0 & (1 << i) != 0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Cells in column-major order
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..GRID_TILES)
            .filter(|i| self.0 & (1 << i) != 0)
            .map(position)
    }

    /// Four-character code: one character per column, bit `4 - y` set when
    /// row `y` is filled (top row most significant)
    pub fn letter_code(&self) -> String {
        (0..GRID_WIDTH)
            .map(|x| {
                let column = (0..GRID_HEIGHT).fold(0u8, |n, y| {
                    (n << 1) | u8::from(self.contains(IVec2::new(x, y)))
                });
                code_char(column)
            })
            .collect()
    }

    /// Recover a shape from its four-character code
    pub fn from_letter_code(code: &str) -> Result<Self, CodeError> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != GRID_WIDTH as usize {
            return Err(CodeError::WrongLength {
                expected: GRID_WIDTH as usize,
                found: chars.len(),
            });
        }
        let mut shape = Shape::EMPTY;
        for (x, &c) in chars.iter().enumerate() {
            let column = code_bits(c).ok_or(CodeError::InvalidColumn(c))?;
            for y in 0..GRID_HEIGHT {
                if column & (1 << (GRID_HEIGHT - 1 - y)) != 0 {
                    shape.insert(IVec2::new(x as i32, y));
                }
            }
        }
        Ok(shape)
    }
}

impl FromIterator<IVec2> for Shape {
    fn from_iter<I: IntoIterator<Item = IVec2>>(iter: I) -> Self {
        let mut shape = Shape::EMPTY;
        for pos in iter {
            shape.insert(pos);
        }
        shape
    }
}

/// The puzzle grid. Fresh (all empty) for every puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<ThingTile>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            tiles: vec![ThingTile::default(); GRID_TILES],
        }
    }

    pub fn get(&self, pos: IVec2) -> Option<&ThingTile> {
        index(pos).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut ThingTile> {
        index(pos).map(|i| &mut self.tiles[i])
    }

    /// Every tile with its position, column-major
    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, &ThingTile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (position(i), t))
    }

    /// The set of filled cells
    pub fn shape(&self) -> Shape {
        self.tiles()
            .filter(|(_, t)| t.filled)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Letter code of the filled cells
    pub fn classify(&self) -> String {
        self.shape().letter_code()
    }

    /// One code character per tile, column-major
    pub fn tile_codes(&self) -> String {
        self.tiles.iter().map(ThingTile::encode).collect()
    }

    pub fn from_tile_codes(codes: &str) -> Result<Self, CodeError> {
        let tiles = codes
            .chars()
            .map(ThingTile::from_code)
            .collect::<Result<Vec<_>, _>>()?;
        if tiles.len() != GRID_TILES {
            return Err(CodeError::WrongLength {
                expected: GRID_TILES,
                found: tiles.len(),
            });
        }
        Ok(Self { tiles })
    }
}

impl fmt::Display for Grid {
    /// Row-by-row sketch: `#` filled, `+` carved but empty, `.` untouched
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let c = match self.get(IVec2::new(x, y)) {
                    Some(t) if t.filled => '#',
                    Some(t) if t.corner_count() > 0 => '+',
                    _ => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
