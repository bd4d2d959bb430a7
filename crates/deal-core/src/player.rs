//! Player identity and per-player card holdings.
//!
//! This module contains:
//! - `PlayerId`, the opaque participant identifier
//! - `PlayerHoldings`, the hand/bank/property sets kept inside `GameState`
//! - `PlayerState` and `PublicPlayerState`, the private and public views

use crate::card::{Card, CardId, CardLocation, CardSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque participant identifier, unique within one game and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// The three kinds of per-player location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingKind {
    Hand,
    Bank,
    Property,
}

impl HoldingKind {
    pub const ALL: [HoldingKind; 3] = [HoldingKind::Hand, HoldingKind::Bank, HoldingKind::Property];

    /// The concrete location of this kind for a given player
    pub fn location(self, player: PlayerId) -> CardLocation {
        match self {
            HoldingKind::Hand => CardLocation::PlayerHand(player),
            HoldingKind::Bank => CardLocation::PlayerBank(player),
            HoldingKind::Property => CardLocation::PlayerProperty(player),
        }
    }

    /// Split a player-owned location into its owner and kind
    pub fn of(location: CardLocation) -> Option<(PlayerId, HoldingKind)> {
        match location {
            CardLocation::Deck | CardLocation::Waste => None,
            CardLocation::PlayerHand(p) => Some((p, HoldingKind::Hand)),
            CardLocation::PlayerBank(p) => Some((p, HoldingKind::Bank)),
            CardLocation::PlayerProperty(p) => Some((p, HoldingKind::Property)),
        }
    }
}

/// Cards owned by one player. The three sets are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHoldings {
    pub hand: CardSet,
    pub bank: CardSet,
    pub property: CardSet,
}

impl PlayerHoldings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: HoldingKind) -> &CardSet {
        match kind {
            HoldingKind::Hand => &self.hand,
            HoldingKind::Bank => &self.bank,
            HoldingKind::Property => &self.property,
        }
    }

    pub fn get_mut(&mut self, kind: HoldingKind) -> &mut CardSet {
        match kind {
            HoldingKind::Hand => &mut self.hand,
            HoldingKind::Bank => &mut self.bank,
            HoldingKind::Property => &mut self.property,
        }
    }
}

/// A player's full holdings as concrete cards. Only ever shown to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub hand: Vec<Card>,
    pub bank: Vec<Card>,
    pub property: Vec<Card>,
}

impl PlayerState {
    /// Build the private view from a player's holdings
    pub fn from_holdings(id: PlayerId, holdings: &PlayerHoldings) -> Self {
        Self {
            id,
            hand: cards_of(id, HoldingKind::Hand, holdings),
            bank: cards_of(id, HoldingKind::Bank, holdings),
            property: cards_of(id, HoldingKind::Property, holdings),
        }
    }

    /// Whether the player holds this card in their hand
    pub fn holds(&self, card: CardId) -> bool {
        self.hand.iter().any(|c| c.id == card)
    }
}

/// What everyone may see about a player: hand size only, bank and property in full
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerState {
    pub hand_count: usize,
    pub bank: Vec<Card>,
    pub property: Vec<Card>,
}

impl PublicPlayerState {
    pub fn from_holdings(id: PlayerId, holdings: &PlayerHoldings) -> Self {
        Self {
            hand_count: holdings.hand.len(),
            bank: cards_of(id, HoldingKind::Bank, holdings),
            property: cards_of(id, HoldingKind::Property, holdings),
        }
    }
}

fn cards_of(id: PlayerId, kind: HoldingKind, holdings: &PlayerHoldings) -> Vec<Card> {
    let location = kind.location(id);
    holdings
        .get(kind)
        .iter()
        .map(|card| Card { id: card, location })
        .collect()
}
