//! Card path tracing and grid carving
//!
//! The worm starts on the entry square just above the grid, facing down
//! into it. Forward cards move it one tile; turn cards rotate its heading in
//! place. The first move that lands outside the grid crashes the worm and
//! ends the path.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::{heading_class, in_grid};

/// Entry square, just outside the top row
pub const START_POS: IVec2 = IVec2::new(0, -1);
/// Initial heading, into the grid
pub const START_HEADING: IVec2 = IVec2::new(0, 1);

/// Corner painted on the tile diagonally behind a turn, indexed by the
/// heading class before the turn, then `[left, right]`
pub const TURN_CORNERS: [[i32; 2]; 4] = [[0, 3], [1, 0], [2, 1], [3, 2]];

/// A direction card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Forward,
    TurnLeft,
    TurnRight,
}

impl Card {
    /// Image name of the card face
    pub fn image(&self) -> &'static str {
        match self {
            Card::Forward => "card_foot",
            Card::TurnLeft => "card_left",
            Card::TurnRight => "card_right",
        }
    }

    /// Heading after playing this card
    #[inline]
    pub fn turn(&self, heading: IVec2) -> IVec2 {
        match self {
            Card::Forward => heading,
            Card::TurnLeft => IVec2::new(heading.y, -heading.x),
            Card::TurnRight => IVec2::new(-heading.y, heading.x),
        }
    }
}

/// One element of a traced path: the state after playing `card`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub pos: IVec2,
    pub heading: IVec2,
    pub card: Card,
    /// The move left the grid; this is the last step of the path
    pub crashed: bool,
}

/// Lazy walk over a card sequence
#[derive(Debug, Clone)]
pub struct Trace<I> {
    cards: I,
    pos: IVec2,
    heading: IVec2,
    crashed: bool,
}

impl<I: Iterator<Item = Card>> Iterator for Trace<I> {
    type Item = PathStep;

    fn next(&mut self) -> Option<PathStep> {
        if self.crashed {
            return None;
        }
        let card = self.cards.next()?;
        match card {
            Card::Forward => {
                self.pos += self.heading;
                self.crashed = !in_grid(self.pos);
            }
            Card::TurnLeft | Card::TurnRight => self.heading = card.turn(self.heading),
        }
        Some(PathStep {
            pos: self.pos,
            heading: self.heading,
            card,
            crashed: self.crashed,
        })
    }
}

/// Trace a card sequence from the entry square
pub fn trace<C: IntoIterator<Item = Card>>(cards: C) -> Trace<C::IntoIter> {
    Trace {
        cards: cards.into_iter(),
        pos: START_POS,
        heading: START_HEADING,
        crashed: false,
    }
}

/// Quarter turn from one heading to another: `Some(0)` left, `Some(1)`
/// right, `None` for no turn or a U-turn
fn quarter_turn(from: IVec2, to: IVec2) -> Option<usize> {
    let (a, b) = (heading_class(from)?, heading_class(to)?);
    match (b + 4 - a) % 4 {
        3 => Some(0),
        1 => Some(1),
        _ => None,
    }
}

/// Replay a card sequence over a fresh grid and carve the worm's tunnel
pub fn carve(cards: &[Card]) -> Grid {
    let mut grid = Grid::new();
    let mut last_heading: Option<IVec2> = None;

    for step in trace(cards.iter().copied()) {
        if step.crashed {
            break;
        }
        if step.card != Card::Forward {
            continue;
        }
        let heading = step.heading;
        let from = step.pos - heading;

        if let Some(tile) = grid.get_mut(step.pos) {
            tile.filled = true;
            tile.set_wormy_corners(heading, 2);
        }
        if let Some(tile) = grid.get_mut(from) {
            tile.set_wormy_corners(heading, 0);
        }

        if let Some(old) = last_heading {
            let corner = quarter_turn(old, heading)
                .zip(heading_class(old))
                .map(|(turn, class)| TURN_CORNERS[class][turn]);
            if let (Some(corner), Some(tile)) = (corner, grid.get_mut(from - old + heading)) {
                tile.set_corner(corner);
            }
        }
        last_heading = Some(heading);
    }

    log::debug!("Carved {} tiles", grid.shape().len());
    grid
}
