//! Two-deck manager.
//!
//! Each slot owns at most one track. Loading always clones the incoming
//! track, installs the clone on the inactive slot, then releases the
//! previously active track and flips `active_deck` to the new slot.

use std::fmt;

use serde::Serialize;
use tracing::{error, info};

use crate::config::DjConfig;
use crate::error::Result;
use crate::types::Track;

/// Number of deck slots.
pub const DECK_COUNT: usize = 2;

/// Slot targeted by the very first load into an empty manager.
pub const FIRST_LOAD_DECK: usize = 1;

/// BPM change applied to an incoming track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BpmSync {
    pub from: u32,
    pub to: u32,
}

/// Outcome of [`DeckManager::load_track_to_deck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckLoad {
    /// Slot now holding the new track; also the new active deck.
    pub deck: usize,
    /// Set when auto-sync adjusted the incoming track's BPM.
    pub synced: Option<BpmSync>,
    /// True when another track was playing before this load.
    pub transition: bool,
}

/// Snapshot of deck occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckStatus {
    /// Title loaded on each slot, `None` when empty.
    pub decks: [Option<String>; DECK_COUNT],
    pub active_deck: usize,
}

impl fmt::Display for DeckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, deck) in self.decks.iter().enumerate() {
            match deck {
                Some(title) => writeln!(f, "Deck {}: {}", i, title)?,
                None => writeln!(f, "Deck {}: [EMPTY]", i)?,
            }
        }
        writeln!(f, "Active Deck: {}", self.active_deck)
    }
}

/// Holds the two deck slots and the BPM matching policy.
#[derive(Debug)]
pub struct DeckManager {
    decks: [Option<Track>; DECK_COUNT],
    active_deck: usize,
    auto_sync: bool,
    bpm_tolerance: u32,
}

impl DeckManager {
    /// Creates a manager with two empty decks.
    pub fn new(bpm_tolerance: u32, auto_sync: bool) -> Self {
        info!(bpm_tolerance, auto_sync, "Deck manager initialized with 2 empty decks");
        Self {
            decks: [None, None],
            active_deck: FIRST_LOAD_DECK,
            auto_sync,
            bpm_tolerance,
        }
    }

    /// Creates a manager using the tolerance and auto-sync of `config`.
    pub fn from_config(config: &DjConfig) -> Self {
        Self::new(config.bpm_tolerance, config.auto_sync)
    }

    /// Index of the deck currently playing.
    pub fn active_deck(&self) -> usize {
        self.active_deck
    }

    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    /// Enables or disables BPM reconciliation on later loads.
    pub fn set_auto_sync(&mut self, auto_sync: bool) {
        self.auto_sync = auto_sync;
    }

    /// Largest BPM difference still considered mixable.
    pub fn bpm_tolerance(&self) -> u32 {
        self.bpm_tolerance
    }

    pub fn set_bpm_tolerance(&mut self, bpm_tolerance: u32) {
        self.bpm_tolerance = bpm_tolerance;
    }

    /// Track on the given slot. Out-of-range slots are empty.
    pub fn deck(&self, index: usize) -> Option<&Track> {
        self.decks.get(index).and_then(Option::as_ref)
    }

    /// Track on the active deck, if that slot is occupied.
    pub fn active_track(&self) -> Option<&Track> {
        self.deck(self.active_deck)
    }

    /// True when neither slot holds a track.
    pub fn is_empty(&self) -> bool {
        self.decks.iter().all(Option::is_none)
    }

    /// Loads a clone of `track` onto the inactive deck and makes it active.
    ///
    /// The first load into an empty manager always lands on deck 1. A clone
    /// failure returns `CLONE_FAILED` with every slot left as it was.
    pub fn load_track_to_deck(&mut self, track: &Track) -> Result<DeckLoad> {
        // Clone first: no slot or index changes until the copy exists.
        let mut incoming = track.try_clone().map_err(|e| {
            error!(title = %track.title(), error = %e, "Track failed to clone");
            e
        })?;

        let first_load = self.is_empty();
        let target = if first_load {
            FIRST_LOAD_DECK
        } else {
            1 - self.active_deck
        };
        info!(deck = target, title = %incoming.title(), "Target deck selected");

        if let Some(previous) = self.decks[target].take() {
            info!(deck = target, title = %previous.title(), "Releasing target deck");
        }

        incoming.load();
        incoming.analyze_beatgrid();

        let mut synced = None;
        if !first_load && self.auto_sync && !self.can_mix_tracks(&incoming) {
            synced = self.sync_bpm(&mut incoming);
        }

        info!(deck = target, title = %incoming.title(), "Load complete");
        self.decks[target] = Some(incoming);

        let mut transition = false;
        if !first_load {
            if let Some(outgoing) = self.decks[self.active_deck].take() {
                info!(
                    deck = self.active_deck,
                    title = %outgoing.title(),
                    "Unloading previous deck"
                );
                transition = true;
            }
        }

        self.active_deck = target;
        info!(deck = target, "Switched active deck");

        Ok(DeckLoad {
            deck: target,
            synced,
            transition,
        })
    }

    /// True when the active deck holds a track whose BPM is within
    /// tolerance of `candidate`.
    pub fn can_mix_tracks(&self, candidate: &Track) -> bool {
        self.active_track()
            .is_some_and(|active| active.bpm().abs_diff(candidate.bpm()) <= self.bpm_tolerance)
    }

    /// Moves `candidate`'s BPM to the truncated average of its own and the
    /// active deck's BPM. Does nothing when no deck is active.
    pub fn sync_bpm(&self, candidate: &mut Track) -> Option<BpmSync> {
        let active_bpm = self.active_track()?.bpm();
        let from = candidate.bpm();
        let to = ((u64::from(from) + u64::from(active_bpm)) / 2) as u32;

        candidate.set_bpm(to);
        info!(title = %candidate.title(), from, to, "Synced BPM");
        Some(BpmSync { from, to })
    }

    /// Titles on each slot plus the active deck index.
    pub fn status(&self) -> DeckStatus {
        DeckStatus {
            decks: [
                self.deck(0).map(|t| t.title().to_string()),
                self.deck(1).map(|t| t.title().to_string()),
            ],
            active_deck: self.active_deck,
        }
    }
}

impl Default for DeckManager {
    fn default() -> Self {
        Self::from_config(&DjConfig::default())
    }
}
