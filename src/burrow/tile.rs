//! A single cell of the burrowing grid
//!
//! Corner `c` sits between the sides facing heading classes `c` and `c + 1`
//! (+x = 0, +y = 1, -x = 2, -y = 3), so corners `c - 1` and `c` flank the
//! side facing class `c`.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::CodeError;
use crate::heading_class;

/// First character of the 5-bit code alphabet
pub const CODE_BASE: u8 = b'0';

/// Encode a 5-bit value as a code character
#[inline]
pub fn code_char(bits: u8) -> char {
    char::from(CODE_BASE + (bits & 0x1f))
}

/// Decode a code character back to its 5-bit value
#[inline]
pub fn code_bits(c: char) -> Option<u8> {
    let n = u32::from(c).checked_sub(u32::from(CODE_BASE))?;
    (n < 32).then_some(n as u8)
}

/// Filled flag plus four carved corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThingTile {
    pub filled: bool,
    pub corners: [bool; 4],
}

impl ThingTile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a corner; any integer index is taken modulo 4
    pub fn set_corner(&mut self, corner: i32) {
        self.corners[corner.rem_euclid(4) as usize] = true;
    }

    /// Set both corners of the side facing `heading` rotated by `plus`
    /// quarter turns
    pub fn set_wormy_corners(&mut self, heading: IVec2, plus: i32) {
        let Some(class) = heading_class(heading) else {
            return;
        };
        let rot = class as i32 + plus;
        self.set_corner(rot);
        self.set_corner(rot - 1);
    }

    pub fn corner_count(&self) -> usize {
        self.corners.iter().filter(|c| **c).count()
    }

    /// Filled flag in bit 4, then corners 0..4 from bit 3 down to bit 0
    pub fn bits(&self) -> u8 {
        self.corners
            .iter()
            .fold(u8::from(self.filled), |n, &c| (n << 1) | u8::from(c))
    }

    pub fn from_bits(bits: u8) -> Self {
        let mut tile = Self {
            filled: bits & 0x10 != 0,
            corners: [false; 4],
        };
        for (i, corner) in tile.corners.iter_mut().enumerate() {
            *corner = bits & (0x08 >> i) != 0;
        }
        tile
    }

    /// One-character code
    pub fn encode(&self) -> char {
        code_char(self.bits())
    }

    pub fn from_code(code: char) -> Result<Self, CodeError> {
        code_bits(code)
            .map(Self::from_bits)
            .ok_or(CodeError::InvalidTile(code))
    }

    /// Block image and rotation for this tile
    pub fn face(&self) -> TileFace {
        let c = self.corners;
        let first_set = c.iter().position(|&x| x).unwrap_or(0) as u8;
        let (shape, quarter_turns) = match self.corner_count() {
            0 => (BlockShape::Plain, 0),
            1 => (BlockShape::OneCorner, first_set),
            2 => match c {
                [true, false, true, false] => (BlockShape::Opposite, 0),
                [false, true, false, true] => (BlockShape::Opposite, 1),
                [true, false, false, true] => (BlockShape::Adjacent, 3),
                _ => (BlockShape::Adjacent, first_set),
            },
            3 => {
                let clear = c.iter().position(|&x| !x).unwrap_or(0) as u8;
                (BlockShape::ThreeCorners, (clear + 2) % 4)
            }
            _ => (BlockShape::Full, 0),
        };
        TileFace {
            filled: self.filled,
            shape,
            quarter_turns,
        }
    }
}

/// The five block outlines, by which corners are carved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockShape {
    Plain,
    OneCorner,
    Opposite,
    Adjacent,
    ThreeCorners,
    Full,
}

impl BlockShape {
    /// Corner pattern as used in image names
    pub fn pattern(&self) -> &'static str {
        match self {
            BlockShape::Plain => "0000",
            BlockShape::OneCorner => "1000",
            BlockShape::Opposite => "1010",
            BlockShape::Adjacent => "1100",
            BlockShape::ThreeCorners => "1110",
            BlockShape::Full => "1111",
        }
    }
}

/// Which block image to draw for a tile and how to turn it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFace {
    pub filled: bool,
    pub shape: BlockShape,
    /// Rotation in quarter turns (0..4)
    pub quarter_turns: u8,
}

impl TileFace {
    /// Image name, e.g. `block_11100`
    pub fn image(&self) -> String {
        format!("block_{}{}", u8::from(self.filled), self.shape.pattern())
    }

    /// Rotation in radians
    pub fn angle(&self) -> f32 {
        f32::from(self.quarter_turns) * FRAC_PI_2
    }
}

impl fmt::Display for TileFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.image(), u32::from(self.quarter_turns) * 90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(filled: bool, corners: [u8; 4]) -> ThingTile {
        ThingTile {
            filled,
            corners: corners.map(|c| c != 0),
        }
    }

    #[test]
    fn test_round_trip_all_states() {
        for bits in 0..32u8 {
            let t = ThingTile::from_bits(bits);
            assert_eq!(t.bits(), bits);
            assert_eq!(ThingTile::from_code(t.encode()).unwrap(), t);
        }
    }

    #[test]
    fn test_bit_layout() {
        assert_eq!(tile(true, [0, 0, 0, 0]).encode(), '@');
        assert_eq!(tile(false, [1, 0, 0, 0]).encode(), '8');
        assert_eq!(tile(false, [0, 0, 0, 1]).encode(), '1');
        assert_eq!(tile(true, [1, 1, 1, 1]).encode(), 'O');
        assert_eq!(ThingTile::new().encode(), '0');
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ThingTile::from_code('/'), Err(CodeError::InvalidTile('/')));
        assert_eq!(ThingTile::from_code('P'), Err(CodeError::InvalidTile('P')));
    }

    #[test]
    fn test_corner_index_wraps() {
        let mut t = ThingTile::new();
        t.set_corner(-1);
        t.set_corner(5);
        assert_eq!(t.corners, [false, true, false, true]);
    }

    #[test]
    fn test_wormy_corners_flank_side() {
        let mut t = ThingTile::new();
        // Side facing +y (class 1): corners 0 and 1
        t.set_wormy_corners(IVec2::new(0, 1), 0);
        assert_eq!(t.corners, [true, true, false, false]);

        let mut t = ThingTile::new();
        // Opposite side of +x (class 0 + 2): corners 1 and 2
        t.set_wormy_corners(IVec2::new(1, 0), 2);
        assert_eq!(t.corners, [false, true, true, false]);

        let mut t = ThingTile::new();
        // Side facing +x: corners 3 and 0
        t.set_wormy_corners(IVec2::new(1, 0), 0);
        assert_eq!(t.corners, [true, false, false, true]);
    }

    #[test]
    fn test_face_single_corner() {
        let f = tile(true, [0, 0, 1, 0]).face();
        assert_eq!(f.shape, BlockShape::OneCorner);
        assert_eq!(f.quarter_turns, 2);
        assert_eq!(f.image(), "block_11000");
    }

    #[test]
    fn test_face_two_corners() {
        let f = tile(false, [1, 0, 1, 0]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::Opposite, 0));
        let f = tile(false, [0, 1, 0, 1]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::Opposite, 1));
        let f = tile(false, [1, 0, 0, 1]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::Adjacent, 3));
        let f = tile(false, [0, 1, 1, 0]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::Adjacent, 1));
        assert_eq!(f.image(), "block_01100");
    }

    #[test]
    fn test_face_three_and_four_corners() {
        let f = tile(true, [1, 1, 0, 1]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::ThreeCorners, 0));
        let f = tile(true, [0, 1, 1, 1]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::ThreeCorners, 2));
        let f = tile(true, [1, 1, 1, 1]).face();
        assert_eq!((f.shape, f.quarter_turns), (BlockShape::Full, 0));
        assert_eq!(f.to_string(), "block_11111@0");
    }
}
