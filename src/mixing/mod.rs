//! Deck loading and BPM matching.

pub mod decks;

pub use decks::{BpmSync, DeckLoad, DeckManager, DeckStatus, DECK_COUNT, FIRST_LOAD_DECK};
