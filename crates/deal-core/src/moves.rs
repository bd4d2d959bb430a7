//! The in-flight move record and per-player response bookkeeping.

use crate::actions::TransferProposal;
use crate::card::CardId;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's reply to the active move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Counter-transfers bundled with the reply. Always empty for a veto.
    pub transfers: Vec<TransferProposal>,
    /// False while a say-no awaits the proposer's ruling
    pub confirmed: bool,
}

impl Response {
    pub fn confirmed(transfers: Vec<TransferProposal>) -> Self {
        Self {
            transfers,
            confirmed: true,
        }
    }

    pub fn veto() -> Self {
        Self {
            transfers: Vec::new(),
            confirmed: false,
        }
    }
}

/// Where an active move stands in the negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePhase {
    /// Nobody has answered yet
    Proposed,
    /// Some targeted players have answered, none is vetoing
    Awaiting,
    /// At least one say-no is waiting for the proposer's ruling
    ResolvingVeto,
}

/// An active move. The idle slot is `None` in [`crate::GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Player whose turn produced this move
    pub proposer: PlayerId,
    /// Cards being played, never empty
    pub cause: Vec<CardId>,
    /// Transfers keyed by the player each is directed at
    pub transfers: BTreeMap<PlayerId, Vec<TransferProposal>>,
    /// Replies collected so far
    pub responses: BTreeMap<PlayerId, Response>,
}

impl Move {
    pub fn new(
        proposer: PlayerId,
        cause: Vec<CardId>,
        transfers: BTreeMap<PlayerId, Vec<TransferProposal>>,
    ) -> Self {
        Self {
            proposer,
            cause,
            transfers,
            responses: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> MovePhase {
        if self.responses.is_empty() {
            MovePhase::Proposed
        } else if self.responses.values().any(|r| !r.confirmed) {
            MovePhase::ResolvingVeto
        } else {
            MovePhase::Awaiting
        }
    }

    pub fn response(&self, player: PlayerId) -> Option<&Response> {
        self.responses.get(&player)
    }

    /// Whether every player keyed in `transfers` has a confirmed response.
    /// Players that are not targeted never gate the commit.
    pub fn is_fully_confirmed(&self) -> bool {
        self.pending_players().next().is_none()
    }

    /// Targeted players that still owe a confirmed response
    pub fn pending_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.transfers
            .keys()
            .filter(|p| !self.responses.get(p).is_some_and(|r| r.confirmed))
            .copied()
    }

    /// All transfers to apply on commit: the proposer's first, then each
    /// responder's counter-transfers, both in player order
    pub fn all_transfers(&self) -> Vec<TransferProposal> {
        self.transfers
            .values()
            .flatten()
            .chain(self.responses.values().flat_map(|r| r.transfers.iter()))
            .copied()
            .collect()
    }
}
