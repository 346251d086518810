//! The three card decks the player draws from

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::path::Card;

pub const DECK_COUNT: usize = 3;

const FORWARD_CARDS: usize = 10;
const TURN_CARDS: usize = 9;
const DECK_SIZE: usize = 10;

/// Face-up card decks. The last card of each deck is its top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decks {
    decks: [Vec<Card>; DECK_COUNT],
}

impl Decks {
    /// Shuffle the pool and deal it into three decks. The first deck always
    /// shows Forward cards on top, the others a left and a right turn.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut pool = Vec::with_capacity(FORWARD_CARDS + 2 * TURN_CARDS);
        pool.extend([Card::Forward; FORWARD_CARDS]);
        pool.extend([Card::TurnLeft; TURN_CARDS]);
        pool.extend([Card::TurnRight; TURN_CARDS]);
        pool.shuffle(rng);

        let mut chunks = pool.chunks(DECK_SIZE).map(<[Card]>::to_vec);
        let mut decks: [Vec<Card>; DECK_COUNT] =
            std::array::from_fn(|_| chunks.next().unwrap_or_default());

        decks[0].extend([Card::Forward, Card::Forward]);
        decks[1].push(Card::TurnLeft);
        decks[2].push(Card::TurnRight);

        Self { decks }
    }

    /// Decks with the given cards, last card on top
    pub fn from_cards(decks: [Vec<Card>; DECK_COUNT]) -> Self {
        Self { decks }
    }

    /// Card on top of a deck
    pub fn top(&self, deck: usize) -> Option<Card> {
        self.decks.get(deck)?.last().copied()
    }

    /// Take the top card of a deck
    pub fn draw(&mut self, deck: usize) -> Option<Card> {
        self.decks.get_mut(deck)?.pop()
    }

    /// Cards left in a deck (0 for an unknown deck)
    pub fn len(&self, deck: usize) -> usize {
        self.decks.get(deck).map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.decks.iter().map(Vec::len).sum()
    }

    /// True once every deck is empty
    pub fn is_exhausted(&self) -> bool {
        self.decks.iter().all(Vec::is_empty)
    }
}
