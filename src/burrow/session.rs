//! One burrowing puzzle: card selection, then carving and classification

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::deck::Decks;
use super::path::{Card, PathStep, carve, trace};
use super::record::ThingRecord;
use super::symbols::{SymbolTable, thing_message};

/// Burrowing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurrowPhase {
    /// Player is drawing cards
    Selecting,
    /// Selection ended by the player, a crash, or empty decks
    Finished,
    /// Player left without making anything
    Aborted,
}

/// A thing made by burrowing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thing {
    pub record: ThingRecord,
    pub message: String,
}

/// State of one burrowing puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Burrowing {
    decks: Decks,
    selected: Vec<Card>,
    phase: BurrowPhase,
}

impl Burrowing {
    /// Start with the given decks; the first card of deck 0 is played
    /// straight away
    pub fn new(decks: Decks) -> Self {
        let mut burrowing = Self {
            decks,
            selected: Vec::new(),
            phase: BurrowPhase::Selecting,
        };
        burrowing.choose(0);
        burrowing
    }

    pub fn shuffled(rng: &mut impl Rng) -> Self {
        Self::new(Decks::shuffled(rng))
    }

    pub fn phase(&self) -> BurrowPhase {
        self.phase
    }

    pub fn decks(&self) -> &Decks {
        &self.decks
    }

    pub fn selected(&self) -> &[Card] {
        &self.selected
    }

    /// Path of the cards played so far
    pub fn trace(&self) -> impl Iterator<Item = PathStep> + '_ {
        trace(self.selected.iter().copied())
    }

    /// Play the top card of a deck. Returns the resulting path step, or
    /// `None` if selection is over or the deck is empty.
    pub fn choose(&mut self, deck: usize) -> Option<PathStep> {
        if self.phase != BurrowPhase::Selecting {
            return None;
        }
        let card = self.decks.draw(deck)?;
        self.selected.push(card);
        let step = self.trace().last()?;

        if step.crashed {
            log::info!("Worm crashed at {} after {} cards", step.pos, self.selected.len());
            self.phase = BurrowPhase::Finished;
        } else if self.decks.is_exhausted() {
            log::info!("All decks used up");
            self.phase = BurrowPhase::Finished;
        }
        Some(step)
    }

    /// End selection and dig
    pub fn go(&mut self) {
        if self.phase == BurrowPhase::Selecting {
            self.phase = BurrowPhase::Finished;
        }
    }

    /// Leave without digging
    pub fn abort(&mut self) {
        if self.phase == BurrowPhase::Selecting {
            log::info!("Burrowing aborted");
            self.phase = BurrowPhase::Aborted;
        }
    }

    /// Carve the selected path into a fresh grid and describe the result.
    /// `None` unless selection has finished.
    pub fn finish(&self, symbols: &SymbolTable, rng: &mut impl Rng) -> Option<Thing> {
        if self.phase != BurrowPhase::Finished {
            return None;
        }
        let grid = carve(&self.selected);
        let record = ThingRecord::encode(&grid, symbols);
        let message = thing_message(record.symbol.as_deref(), rng);
        log::info!("Made thing {}", record);
        log::debug!("Carved grid:\n{}", grid);
        Some(Thing { record, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burrow::DECK_COUNT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use Card::*;

    fn decks() -> Decks {
        Decks::from_cards([
            vec![Forward, Forward, Forward, Forward, Forward],
            vec![TurnLeft, TurnLeft],
            vec![TurnRight],
        ])
    }

    #[test]
    fn test_first_card_is_played() {
        let b = Burrowing::new(decks());
        assert_eq!(b.selected(), &[Forward]);
        assert_eq!(b.decks().len(0), 4);
        assert_eq!(b.phase(), BurrowPhase::Selecting);
    }

    #[test]
    fn test_go_then_finish() {
        let mut b = Burrowing::new(decks());
        b.choose(0);
        b.choose(0);
        b.go();
        assert_eq!(b.phase(), BurrowPhase::Finished);
        assert_eq!(b.choose(0), None);

        let table = SymbolTable::parse("dot @000\nstub L000\n");
        let mut rng = Pcg32::seed_from_u64(1);
        let thing = b.finish(&table, &mut rng).unwrap();
        // Three tiles down the first column
        assert_eq!(thing.record.letter, "L000");
        assert_eq!(thing.record.symbol.as_deref(), Some("stub"));
        assert!(thing.message.contains("stub"));
    }

    #[test]
    fn test_crash_ends_selection() {
        let mut b = Burrowing::new(decks());
        let step = b.choose(2).unwrap();
        assert!(!step.crashed);
        let step = b.choose(0).unwrap();
        assert!(step.crashed);
        assert_eq!(b.phase(), BurrowPhase::Finished);
        assert_eq!(b.choose(0), None);
        assert_eq!(b.trace().count(), 3);
    }

    #[test]
    fn test_empty_deck_plays_nothing() {
        let mut b = Burrowing::new(decks());
        assert!(b.choose(2).is_some());
        assert_eq!(b.choose(2), None);
        assert_eq!(b.choose(DECK_COUNT), None);
        assert_eq!(b.selected().len(), 2);
    }

    #[test]
    fn test_exhausted_decks_finish() {
        let mut b = Burrowing::new(Decks::from_cards([vec![Forward, Forward], vec![], vec![]]));
        assert_eq!(b.phase(), BurrowPhase::Selecting);
        b.choose(0);
        assert_eq!(b.phase(), BurrowPhase::Finished);
    }

    #[test]
    fn test_abort_makes_nothing() {
        let mut b = Burrowing::new(decks());
        b.abort();
        assert_eq!(b.phase(), BurrowPhase::Aborted);
        b.go();
        assert_eq!(b.phase(), BurrowPhase::Aborted);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(b.finish(&SymbolTable::default(), &mut rng).is_none());
    }

    #[test]
    fn test_shuffled_session_always_enters_grid() {
        let mut rng = Pcg32::seed_from_u64(21);
        let b = Burrowing::shuffled(&mut rng);
        let first = b.trace().next().unwrap();
        assert_eq!(first.card, Forward);
        assert!(!first.crashed);
    }
}
