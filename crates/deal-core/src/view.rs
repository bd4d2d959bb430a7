//! Read-only projections of the game handed to participants.

use crate::actions::Transfer;
use crate::card::Card;
use crate::moves::MovePhase;
use crate::player::{PlayerId, PublicPlayerState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reply as seen by everyone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicResponse {
    pub transfers: Vec<Transfer>,
    pub confirmed: bool,
}

/// The active move with card identifiers resolved.
/// A proposed cause is public knowledge, even if it came from a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMove {
    pub proposer: PlayerId,
    pub phase: MovePhase,
    pub cause: Vec<Card>,
    pub transfers: BTreeMap<PlayerId, Vec<Transfer>>,
    pub responses: BTreeMap<PlayerId, PublicResponse>,
}

/// Spectator-safe snapshot of the whole game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicGameState {
    pub deck_card_count: usize,
    pub waste_top_card: Option<Card>,
    pub players: BTreeMap<PlayerId, PublicPlayerState>,
    pub current_player: PlayerId,
    pub moves_remaining: u32,
    /// `None` while the negotiation slot is idle
    pub current_move: Option<PublicMove>,
}

impl PublicGameState {
    pub fn is_idle(&self) -> bool {
        self.current_move.is_none()
    }

    /// Opponents of `player`, in seating-independent id order
    pub fn opponents(&self, player: PlayerId) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied().filter(move |p| *p != player)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
