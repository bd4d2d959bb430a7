//! Card identifiers, card locations and the card set abstraction.
//!
//! The core never interprets what a card *does*. A card is an opaque
//! identifier that lives in exactly one [`CardLocation`] at any time.

use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque unique identifier for a physical card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Where a card currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "player")]
pub enum CardLocation {
    /// Face down in the draw pile
    Deck,
    /// Face up in the discard pile
    Waste,
    /// Private to the owning player
    PlayerHand(PlayerId),
    /// Money pile, visible to everyone
    PlayerBank(PlayerId),
    /// Laid-down property, visible to everyone
    PlayerProperty(PlayerId),
}

impl CardLocation {
    /// The player owning this location, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            CardLocation::Deck | CardLocation::Waste => None,
            CardLocation::PlayerHand(p)
            | CardLocation::PlayerBank(p)
            | CardLocation::PlayerProperty(p) => Some(*p),
        }
    }
}

impl fmt::Display for CardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardLocation::Deck => write!(f, "deck"),
            CardLocation::Waste => write!(f, "waste"),
            CardLocation::PlayerHand(p) => write!(f, "{}'s hand", p),
            CardLocation::PlayerBank(p) => write!(f, "{}'s bank", p),
            CardLocation::PlayerProperty(p) => write!(f, "{}'s property", p),
        }
    }
}

/// A card resolved to its full entity, as handed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub location: CardLocation,
}

/// A set of card identifiers with deterministic iteration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSet(BTreeSet<CardId>);

impl CardSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a card, returning false if it was already present
    pub fn insert(&mut self, card: CardId) -> bool {
        self.0.insert(card)
    }

    /// Remove a card, returning false if it was absent
    pub fn remove(&mut self, card: CardId) -> bool {
        self.0.remove(&card)
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.0.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_owner() {
        assert_eq!(CardLocation::Deck.owner(), None);
        assert_eq!(CardLocation::Waste.owner(), None);
        assert_eq!(CardLocation::PlayerBank(PlayerId(2)).owner(), Some(PlayerId(2)));
    }

    #[test]
    fn test_card_set_basics() {
        let mut set = CardSet::new();
        assert!(set.insert(CardId(3)));
        assert!(!set.insert(CardId(3)));
        assert!(set.insert(CardId(1)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![CardId(1), CardId(3)]);
        assert!(set.remove(CardId(3)));
        assert!(!set.contains(CardId(3)));
        assert!(!set.remove(CardId(3)));
    }

    #[test]
    fn test_location_json_shape() {
        let json = serde_json::to_string(&CardLocation::PlayerBank(PlayerId(4))).unwrap();
        assert_eq!(json, r#"{"type":"PlayerBank","player":4}"#);
        let back: CardLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CardLocation::PlayerBank(PlayerId(4)));
    }
}
