//! Proposals submitted by participants and the events that result from them.

use crate::card::{Card, CardId, CardLocation};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Intent to move one card to a new location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProposal {
    pub card: CardId,
    pub target: CardLocation,
}

impl TransferProposal {
    pub fn new(card: CardId, target: CardLocation) -> Self {
        Self { card, target }
    }
}

/// A transfer with its card resolved, as shown in public views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub card: Card,
    pub target: CardLocation,
}

/// What the current player wants to do with one of their moves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProposal {
    /// Cards being played. Empty means the player has nothing to play.
    pub cause: Vec<CardId>,
    /// Transfers keyed by the player each one is directed at
    pub transfers: BTreeMap<PlayerId, Vec<TransferProposal>>,
}

impl MoveProposal {
    pub fn new(cause: Vec<CardId>) -> Self {
        Self {
            cause,
            transfers: BTreeMap::new(),
        }
    }

    /// Add a transfer directed at `player`
    pub fn with_transfer(mut self, player: PlayerId, transfer: TransferProposal) -> Self {
        self.transfers.entry(player).or_default().push(transfer);
        self
    }

    /// Players whose confirmation gates the commit
    pub fn targets(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.transfers.keys().copied()
    }
}

/// A targeted player's answer to a move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseProposal {
    /// Veto the move, pending the proposer's ruling
    pub say_no: bool,
    /// Counter-transfers (e.g. paying rent), ignored when saying no
    pub transfers: Vec<TransferProposal>,
}

impl ResponseProposal {
    /// Plain acceptance with no counter-transfers
    pub fn accept() -> Self {
        Self::default()
    }

    pub fn pay(transfers: Vec<TransferProposal>) -> Self {
        Self {
            say_no: false,
            transfers,
        }
    }

    pub fn say_no() -> Self {
        Self {
            say_no: true,
            transfers: Vec::new(),
        }
    }
}

/// Events that occur as a result of negotiation operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A move was installed in the negotiation slot
    MoveProposed {
        proposer: PlayerId,
        cause: Vec<CardId>,
        moves_remaining: u32,
    },

    /// A targeted player confirmed the move
    Responded {
        player: PlayerId,
        transfers: Vec<TransferProposal>,
    },

    /// A targeted player vetoed the move
    SaidNo { player: PlayerId },

    /// The proposer upheld a veto
    NoAccepted { player: PlayerId },

    /// The proposer overruled a veto; the player must answer again
    NoDeclined { player: PlayerId },

    /// Every targeted player confirmed and the transfers were applied
    MoveCommitted {
        proposer: PlayerId,
        applied: Vec<TransferProposal>,
    },

    /// Turn passed to the next player in the queue
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// Cards moved from the deck into a hand
    CardsDrawn { player: PlayerId, count: usize },

    /// A card was put on top of the waste pile
    CardDiscarded { card: CardId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_groups_transfers_by_target() {
        let a = PlayerId(1);
        let b = PlayerId(2);
        let proposal = MoveProposal::new(vec![CardId(7)])
            .with_transfer(b, TransferProposal::new(CardId(7), CardLocation::PlayerBank(b)))
            .with_transfer(b, TransferProposal::new(CardId(8), CardLocation::PlayerBank(a)))
            .with_transfer(a, TransferProposal::new(CardId(9), CardLocation::Waste));

        assert_eq!(proposal.targets().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(proposal.transfers[&b].len(), 2);
    }

    #[test]
    fn test_proposal_json_uses_player_keys() {
        let b = PlayerId(2);
        let proposal = MoveProposal::new(vec![CardId(7)])
            .with_transfer(b, TransferProposal::new(CardId(7), CardLocation::PlayerBank(b)));
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["cause"], serde_json::json!([7]));
        assert_eq!(json["transfers"]["2"][0]["card"], 7);

        let back: MoveProposal = serde_json::from_value(json).unwrap();
        assert_eq!(back, proposal);
    }
}
