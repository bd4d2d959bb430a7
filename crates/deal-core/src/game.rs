//! Core game state and the move negotiation state machine.
//!
//! A move goes through propose, respond or say-no, accept-no or decline-no,
//! and is committed once every targeted player has confirmed. Every
//! operation validates its preconditions first and leaves the state
//! untouched when it returns an error.

use crate::actions::{GameEvent, MoveProposal, Transfer, TransferProposal};
use crate::card::{Card, CardId, CardLocation};
use crate::moves::{Move, Response};
use crate::player::{HoldingKind, PlayerHoldings, PlayerId, PlayerState, PublicPlayerState};
use crate::turn::TurnOrder;
use crate::view::{PublicGameState, PublicMove, PublicResponse};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Moves per turn in the standard game
pub const DEFAULT_MOVES_PER_TURN: u32 = 3;

/// Errors that can occur when applying negotiation operations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Move already in progress")]
    MoveAlreadyInProgress,

    #[error("Empty cause")]
    EmptyCause,

    #[error("No move in progress")]
    NoMoveInProgress,

    #[error("{0} already responded")]
    AlreadyResponded(PlayerId),

    #[error("No response from {0} yet")]
    NoResponseYet(PlayerId),

    #[error("Response for {0} already confirmed")]
    AlreadyConfirmed(PlayerId),

    #[error("Unknown card {0}")]
    UnknownCard(CardId),

    #[error("Unknown {0}")]
    UnknownPlayer(PlayerId),

    #[error("No players in the queue")]
    NoPlayers,

    #[error("{0} appears twice in the queue")]
    DuplicatePlayer(PlayerId),

    #[error("{0} appears twice in the deck")]
    DuplicateCard(CardId),

    #[error("Moves per turn must be at least 1")]
    ZeroMoveBudget,
}

/// Fixed parameters of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub moves_per_turn: u32,
    /// Seating order; the first player starts
    pub player_queue: Vec<PlayerId>,
}

impl Settings {
    pub fn new(moves_per_turn: u32, player_queue: Vec<PlayerId>) -> Self {
        Self {
            moves_per_turn,
            player_queue,
        }
    }

    /// Standard settings for `count` players numbered from 1
    pub fn standard(count: u32) -> Self {
        Self::new(DEFAULT_MOVES_PER_TURN, (1..=count).map(PlayerId).collect())
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.player_queue.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if self.moves_per_turn == 0 {
            return Err(GameError::ZeroMoveBudget);
        }
        let mut seen = HashSet::new();
        for &player in &self.player_queue {
            if !seen.insert(player) {
                return Err(GameError::DuplicatePlayer(player));
            }
        }
        Ok(())
    }
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    settings: Settings,
    /// Authoritative card -> location index
    locations: HashMap<CardId, CardLocation>,
    /// Draw pile, top is the last element
    deck: Vec<CardId>,
    /// Discard pile, top is the last element
    waste: Vec<CardId>,
    holdings: BTreeMap<PlayerId, PlayerHoldings>,
    moves_remaining: u32,
    /// The negotiation slot; `None` is idle
    current_move: Option<Move>,
    turn_order: TurnOrder,
}

impl GameState {
    /// Create a game with every card in `deck`. The last card is drawn first.
    pub fn new(settings: Settings, deck: Vec<CardId>) -> Result<Self, GameError> {
        settings.validate()?;

        let mut locations = HashMap::with_capacity(deck.len());
        for &card in &deck {
            if locations.insert(card, CardLocation::Deck).is_some() {
                return Err(GameError::DuplicateCard(card));
            }
        }

        let holdings = settings
            .player_queue
            .iter()
            .map(|&p| (p, PlayerHoldings::new()))
            .collect();

        Ok(Self {
            moves_remaining: settings.moves_per_turn,
            turn_order: TurnOrder::new(settings.player_queue.clone()),
            settings,
            locations,
            deck,
            waste: Vec::new(),
            holdings,
            current_move: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_player(&self) -> PlayerId {
        self.turn_order.current()
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn_order
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// The active move, or `None` when the slot is idle
    pub fn current_move(&self) -> Option<&Move> {
        self.current_move.as_ref()
    }

    pub fn location_of(&self, card: CardId) -> Option<CardLocation> {
        self.locations.get(&card).copied()
    }

    pub fn card(&self, card: CardId) -> Option<Card> {
        self.location_of(card).map(|location| Card { id: card, location })
    }

    pub fn card_count(&self) -> usize {
        self.locations.len()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn holdings(&self, player: PlayerId) -> Option<&PlayerHoldings> {
        self.holdings.get(&player)
    }

    // ==================== Location Model ====================

    /// Move a card to `target` without any legality checks.
    /// Returns the card's previous location.
    pub fn relocate(&mut self, card: CardId, target: CardLocation) -> Result<CardLocation, GameError> {
        let previous = self.location_of(card).ok_or(GameError::UnknownCard(card))?;
        self.validate_location(target)?;
        self.move_card(card, target);
        Ok(previous)
    }

    /// Caller guarantees `card` is known and `target` names a seated player
    fn move_card(&mut self, card: CardId, target: CardLocation) {
        let Some(previous) = self.locations.insert(card, target) else {
            return;
        };

        match HoldingKind::of(previous) {
            Some((owner, kind)) => {
                if let Some(h) = self.holdings.get_mut(&owner) {
                    h.get_mut(kind).remove(card);
                }
            }
            None if previous == CardLocation::Deck => self.deck.retain(|&c| c != card),
            None => self.waste.retain(|&c| c != card),
        }

        match HoldingKind::of(target) {
            Some((owner, kind)) => {
                self.holdings.entry(owner).or_default().get_mut(kind).insert(card);
            }
            None if target == CardLocation::Deck => self.deck.push(card),
            None => self.waste.push(card),
        }
    }

    /// Move up to `count` cards from the top of the deck into a hand
    pub fn draw(&mut self, player: PlayerId, count: usize) -> Result<Vec<GameEvent>, GameError> {
        self.validate_player(player)?;

        let mut drawn = 0;
        while drawn < count {
            let Some(&card) = self.deck.last() else {
                break;
            };
            self.move_card(card, CardLocation::PlayerHand(player));
            drawn += 1;
        }

        Ok(vec![GameEvent::CardsDrawn {
            player,
            count: drawn,
        }])
    }

    /// Put a card on top of the waste pile
    pub fn discard(&mut self, card: CardId) -> Result<Vec<GameEvent>, GameError> {
        self.relocate(card, CardLocation::Waste)?;
        Ok(vec![GameEvent::CardDiscarded { card }])
    }

    // ==================== Negotiation ====================

    /// Install a new move for the current player.
    ///
    /// The turn's move budget is spent here, not at commit: a move that is
    /// never confirmed still costs the proposer one move.
    pub fn propose_move(&mut self, proposal: MoveProposal) -> Result<Vec<GameEvent>, GameError> {
        if self.current_move.is_some() {
            return Err(GameError::MoveAlreadyInProgress);
        }
        if proposal.cause.is_empty() {
            return Err(GameError::EmptyCause);
        }
        for &card in &proposal.cause {
            self.validate_card(card)?;
        }
        for (&target, transfers) in &proposal.transfers {
            self.validate_player(target)?;
            self.validate_transfers(transfers)?;
        }

        let proposer = self.current_player();
        self.moves_remaining = self.moves_remaining.saturating_sub(1);

        let events = vec![GameEvent::MoveProposed {
            proposer,
            cause: proposal.cause.clone(),
            moves_remaining: self.moves_remaining,
        }];
        self.current_move = Some(Move::new(proposer, proposal.cause, proposal.transfers));
        Ok(events)
    }

    /// Confirm the active move, optionally bundling counter-transfers
    pub fn respond(
        &mut self,
        player: PlayerId,
        transfers: Vec<TransferProposal>,
    ) -> Result<Vec<GameEvent>, GameError> {
        let active = self.current_move.as_ref().ok_or(GameError::NoMoveInProgress)?;
        if active.responses.contains_key(&player) {
            return Err(GameError::AlreadyResponded(player));
        }
        self.validate_player(player)?;
        self.validate_transfers(&transfers)?;

        let mut events = vec![GameEvent::Responded {
            player,
            transfers: transfers.clone(),
        }];
        self.active_move_mut()?
            .responses
            .insert(player, Response::confirmed(transfers));
        self.post_response(&mut events);
        Ok(events)
    }

    /// Veto the active move, pending the proposer's ruling
    pub fn say_no(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        let active = self.current_move.as_ref().ok_or(GameError::NoMoveInProgress)?;
        if active.responses.contains_key(&player) {
            return Err(GameError::AlreadyResponded(player));
        }
        self.validate_player(player)?;

        self.active_move_mut()?.responses.insert(player, Response::veto());
        Ok(vec![GameEvent::SaidNo { player }])
    }

    /// Proposer upholds `player`'s veto: it becomes a binding non-transfer
    pub fn accept_no(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        let response = self.pending_veto_mut(player)?;
        response.confirmed = true;

        let mut events = vec![GameEvent::NoAccepted { player }];
        self.post_response(&mut events);
        Ok(events)
    }

    /// Proposer overrules `player`'s veto. The response is erased entirely,
    /// so the player answers again as if for the first time.
    pub fn decline_no(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        self.pending_veto_mut(player)?;
        self.active_move_mut()?.responses.remove(&player);
        Ok(vec![GameEvent::NoDeclined { player }])
    }

    /// The current player gives up the rest of their turn
    pub fn end_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.current_move.is_some() {
            return Err(GameError::MoveAlreadyInProgress);
        }
        Ok(vec![self.advance_turn()])
    }

    fn active_move_mut(&mut self) -> Result<&mut Move, GameError> {
        self.current_move.as_mut().ok_or(GameError::NoMoveInProgress)
    }

    fn pending_veto_mut(&mut self, player: PlayerId) -> Result<&mut Response, GameError> {
        let response = self
            .active_move_mut()?
            .responses
            .get_mut(&player)
            .ok_or(GameError::NoResponseYet(player))?;
        if response.confirmed {
            return Err(GameError::AlreadyConfirmed(player));
        }
        Ok(response)
    }

    /// Commit once every targeted player has confirmed, then end the turn
    /// if the move budget is spent
    fn post_response(&mut self, events: &mut Vec<GameEvent>) {
        if !self.current_move.as_ref().is_some_and(Move::is_fully_confirmed) {
            return;
        }
        let Some(committed) = self.current_move.take() else {
            return;
        };

        let applied = committed.all_transfers();
        for transfer in &applied {
            self.move_card(transfer.card, transfer.target);
        }
        debug_assert!(self.is_consistent());

        events.push(GameEvent::MoveCommitted {
            proposer: committed.proposer,
            applied,
        });

        if self.moves_remaining == 0 {
            events.push(self.advance_turn());
        }
    }

    fn advance_turn(&mut self) -> GameEvent {
        let player = self.turn_order.current();
        let next_player = self.turn_order.advance();
        self.moves_remaining = self.settings.moves_per_turn;
        GameEvent::TurnEnded {
            player,
            next_player,
        }
    }

    // ==================== Validation ====================

    fn validate_card(&self, card: CardId) -> Result<(), GameError> {
        if self.locations.contains_key(&card) {
            Ok(())
        } else {
            Err(GameError::UnknownCard(card))
        }
    }

    fn validate_player(&self, player: PlayerId) -> Result<(), GameError> {
        if self.holdings.contains_key(&player) {
            Ok(())
        } else {
            Err(GameError::UnknownPlayer(player))
        }
    }

    fn validate_location(&self, location: CardLocation) -> Result<(), GameError> {
        match location.owner() {
            Some(owner) => self.validate_player(owner),
            None => Ok(()),
        }
    }

    fn validate_transfers(&self, transfers: &[TransferProposal]) -> Result<(), GameError> {
        for transfer in transfers {
            self.validate_card(transfer.card)?;
            self.validate_location(transfer.target)?;
        }
        Ok(())
    }

    /// Every card is in exactly one place and the index agrees with the
    /// deck, waste and holdings
    pub fn is_consistent(&self) -> bool {
        let mut seen: HashMap<CardId, CardLocation> = HashMap::with_capacity(self.locations.len());
        let placed = self
            .deck
            .iter()
            .map(|&c| (c, CardLocation::Deck))
            .chain(self.waste.iter().map(|&c| (c, CardLocation::Waste)))
            .chain(self.holdings.iter().flat_map(|(&player, h)| {
                HoldingKind::ALL
                    .into_iter()
                    .flat_map(move |kind| h.get(kind).iter().map(move |c| (c, kind.location(player))))
            }));

        for (card, location) in placed {
            if seen.insert(card, location).is_some() {
                return false;
            }
        }
        seen == self.locations
    }

    // ==================== Views ====================

    /// Spectator-safe snapshot: deck count, waste top, bank and property in
    /// full, hand counts only
    pub fn public(&self) -> PublicGameState {
        let players = self
            .holdings
            .iter()
            .map(|(&id, h)| (id, PublicPlayerState::from_holdings(id, h)))
            .collect();

        PublicGameState {
            deck_card_count: self.deck.len(),
            waste_top_card: self.waste.last().and_then(|&c| self.card(c)),
            players,
            current_player: self.current_player(),
            moves_remaining: self.moves_remaining,
            current_move: self.current_move.as_ref().map(|m| self.public_move(m)),
        }
    }

    /// A player's full holdings. Only for that player's own view.
    pub fn player_state(&self, player: PlayerId) -> Option<PlayerState> {
        self.holdings
            .get(&player)
            .map(|h| PlayerState::from_holdings(player, h))
    }

    fn public_move(&self, active: &Move) -> PublicMove {
        PublicMove {
            proposer: active.proposer,
            phase: active.phase(),
            cause: active.cause.iter().filter_map(|&c| self.card(c)).collect(),
            transfers: active
                .transfers
                .iter()
                .map(|(&p, ts)| (p, self.resolve_transfers(ts)))
                .collect(),
            responses: active
                .responses
                .iter()
                .map(|(&p, r)| {
                    (
                        p,
                        PublicResponse {
                            transfers: self.resolve_transfers(&r.transfers),
                            confirmed: r.confirmed,
                        },
                    )
                })
                .collect(),
        }
    }

    fn resolve_transfers(&self, transfers: &[TransferProposal]) -> Vec<Transfer> {
        transfers
            .iter()
            .filter_map(|t| {
                self.card(t.card).map(|card| Transfer {
                    card,
                    target: t.target,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MovePhase;

    const A: PlayerId = PlayerId(1);
    const B: PlayerId = PlayerId(2);
    const C: PlayerId = PlayerId(3);

    fn game(players: u32, cards: u32) -> GameState {
        GameState::new(Settings::standard(players), (0..cards).map(CardId).collect()).unwrap()
    }

    fn bank_for(target: PlayerId, card: u32) -> MoveProposal {
        MoveProposal::new(vec![CardId(card)])
            .with_transfer(target, TransferProposal::new(CardId(card), CardLocation::PlayerBank(target)))
    }

    #[test]
    fn test_new_game_starts_idle() {
        let g = game(2, 10);
        assert_eq!(g.current_player(), A);
        assert_eq!(g.moves_remaining(), 3);
        assert!(g.current_move().is_none());
        assert_eq!(g.deck_len(), 10);
        assert!(g.is_consistent());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert_eq!(
            GameState::new(Settings::new(3, vec![]), vec![]).unwrap_err(),
            GameError::NoPlayers
        );
        assert_eq!(
            GameState::new(Settings::new(0, vec![A]), vec![]).unwrap_err(),
            GameError::ZeroMoveBudget
        );
        assert_eq!(
            GameState::new(Settings::new(3, vec![A, B, A]), vec![]).unwrap_err(),
            GameError::DuplicatePlayer(A)
        );
        assert_eq!(
            GameState::new(Settings::standard(2), vec![CardId(1), CardId(1)]).unwrap_err(),
            GameError::DuplicateCard(CardId(1))
        );
    }

    #[test]
    fn test_draw_takes_from_top() {
        let mut g = game(2, 5);
        let events = g.draw(A, 2).unwrap();
        assert_eq!(events, vec![GameEvent::CardsDrawn { player: A, count: 2 }]);
        assert_eq!(g.location_of(CardId(4)), Some(CardLocation::PlayerHand(A)));
        assert_eq!(g.location_of(CardId(3)), Some(CardLocation::PlayerHand(A)));
        assert_eq!(g.location_of(CardId(2)), Some(CardLocation::Deck));

        // Drawing past the end stops at an empty deck
        let events = g.draw(B, 10).unwrap();
        assert_eq!(events, vec![GameEvent::CardsDrawn { player: B, count: 3 }]);
        assert_eq!(g.deck_len(), 0);
        assert!(g.is_consistent());

        assert_eq!(g.draw(PlayerId(99), 1).unwrap_err(), GameError::UnknownPlayer(PlayerId(99)));
    }

    #[test]
    fn test_discard_puts_card_on_top() {
        let mut g = game(2, 5);
        g.discard(CardId(1)).unwrap();
        g.discard(CardId(2)).unwrap();
        assert_eq!(g.public().waste_top_card.map(|c| c.id), Some(CardId(2)));
        assert_eq!(g.discard(CardId(50)).unwrap_err(), GameError::UnknownCard(CardId(50)));
    }

    #[test]
    fn test_relocate_keeps_sets_disjoint() {
        let mut g = game(2, 3);
        assert_eq!(g.relocate(CardId(0), CardLocation::PlayerHand(A)).unwrap(), CardLocation::Deck);
        assert_eq!(
            g.relocate(CardId(0), CardLocation::PlayerProperty(A)).unwrap(),
            CardLocation::PlayerHand(A)
        );
        let h = g.holdings(A).unwrap();
        assert!(h.hand.is_empty());
        assert!(h.property.contains(CardId(0)));
        assert!(g.is_consistent());

        assert_eq!(
            g.relocate(CardId(0), CardLocation::PlayerBank(PlayerId(42))).unwrap_err(),
            GameError::UnknownPlayer(PlayerId(42))
        );
        assert_eq!(g.location_of(CardId(0)), Some(CardLocation::PlayerProperty(A)));
    }

    #[test]
    fn test_propose_requires_idle_slot_and_cause() {
        let mut g = game(2, 10);
        assert_eq!(g.propose_move(MoveProposal::default()).unwrap_err(), GameError::EmptyCause);
        assert_eq!(g.moves_remaining(), 3);

        g.propose_move(bank_for(B, 0)).unwrap();
        assert_eq!(g.moves_remaining(), 2);
        assert_eq!(g.propose_move(bank_for(B, 1)).unwrap_err(), GameError::MoveAlreadyInProgress);
        assert_eq!(g.moves_remaining(), 2);
    }

    #[test]
    fn test_propose_rejects_unknown_references() {
        let mut g = game(2, 10);
        assert_eq!(
            g.propose_move(MoveProposal::new(vec![CardId(77)])).unwrap_err(),
            GameError::UnknownCard(CardId(77))
        );
        assert_eq!(
            g.propose_move(bank_for(C, 0)).unwrap_err(),
            GameError::UnknownPlayer(C)
        );
        assert!(g.current_move().is_none());
        assert_eq!(g.moves_remaining(), 3);
    }

    #[test]
    fn test_operations_without_move_fail() {
        let mut g = game(2, 10);
        assert_eq!(g.respond(B, vec![]).unwrap_err(), GameError::NoMoveInProgress);
        assert_eq!(g.say_no(B).unwrap_err(), GameError::NoMoveInProgress);
        assert_eq!(g.accept_no(B).unwrap_err(), GameError::NoMoveInProgress);
        assert_eq!(g.decline_no(B).unwrap_err(), GameError::NoMoveInProgress);
    }

    #[test]
    fn test_double_response_rejected() {
        let mut g = game(3, 10);
        g.propose_move(bank_for(B, 0).with_transfer(C, TransferProposal::new(CardId(1), CardLocation::Waste)))
            .unwrap();
        g.respond(B, vec![]).unwrap();
        assert_eq!(g.respond(B, vec![]).unwrap_err(), GameError::AlreadyResponded(B));
        assert_eq!(g.say_no(B).unwrap_err(), GameError::AlreadyResponded(B));

        g.say_no(C).unwrap();
        assert_eq!(g.respond(C, vec![]).unwrap_err(), GameError::AlreadyResponded(C));
        assert_eq!(g.say_no(C).unwrap_err(), GameError::AlreadyResponded(C));
    }

    #[test]
    fn test_veto_rulings_preconditions() {
        let mut g = game(3, 10);
        g.propose_move(bank_for(B, 0).with_transfer(C, TransferProposal::new(CardId(1), CardLocation::Waste)))
            .unwrap();
        assert_eq!(g.accept_no(B).unwrap_err(), GameError::NoResponseYet(B));
        assert_eq!(g.decline_no(B).unwrap_err(), GameError::NoResponseYet(B));

        g.respond(B, vec![]).unwrap();
        assert_eq!(g.accept_no(B).unwrap_err(), GameError::AlreadyConfirmed(B));
        assert_eq!(g.decline_no(B).unwrap_err(), GameError::AlreadyConfirmed(B));
    }

    #[test]
    fn test_accept_no_commits_without_transfer_for_vetoing_player() {
        let mut g = game(3, 10);
        let proposal = bank_for(B, 0).with_transfer(C, TransferProposal::new(CardId(1), CardLocation::PlayerBank(A)));
        g.propose_move(proposal).unwrap();

        g.respond(B, vec![]).unwrap();
        g.say_no(C).unwrap();
        assert_eq!(g.current_move().unwrap().phase(), MovePhase::ResolvingVeto);

        let events = g.accept_no(C).unwrap();
        assert_eq!(events[0], GameEvent::NoAccepted { player: C });
        assert!(matches!(events[1], GameEvent::MoveCommitted { proposer: A, .. }));
        assert!(g.current_move().is_none());
        // The vetoing player's own response carried nothing; the proposer's
        // transfers still apply as proposed
        assert_eq!(g.location_of(CardId(0)), Some(CardLocation::PlayerBank(B)));
        assert_eq!(g.location_of(CardId(1)), Some(CardLocation::PlayerBank(A)));
    }

    #[test]
    fn test_decline_no_returns_player_to_unanswered() {
        let mut g = game(2, 10);
        g.propose_move(bank_for(B, 0)).unwrap();
        g.say_no(B).unwrap();
        let events = g.decline_no(B).unwrap();
        assert_eq!(events, vec![GameEvent::NoDeclined { player: B }]);

        let active = g.current_move().unwrap();
        assert!(active.response(B).is_none());
        assert_eq!(active.phase(), MovePhase::Proposed);

        // May say no again
        g.say_no(B).unwrap();
    }

    #[test]
    fn test_counter_transfers_applied_on_commit() {
        let mut g = game(2, 10);
        g.draw(B, 1).unwrap(); // card 9
        g.relocate(CardId(9), CardLocation::PlayerBank(B)).unwrap();

        let mut rent = MoveProposal::new(vec![CardId(0)])
            .with_transfer(A, TransferProposal::new(CardId(0), CardLocation::Waste));
        rent.transfers.insert(B, vec![]);
        g.propose_move(rent).unwrap();
        g.respond(A, vec![]).unwrap();
        let events = g
            .respond(B, vec![TransferProposal::new(CardId(9), CardLocation::PlayerBank(A))])
            .unwrap();

        assert!(matches!(events.last(), Some(GameEvent::MoveCommitted { .. })));
        assert_eq!(g.location_of(CardId(9)), Some(CardLocation::PlayerBank(A)));
        assert_eq!(g.location_of(CardId(0)), Some(CardLocation::Waste));
        assert!(g.is_consistent());
    }

    #[test]
    fn test_budget_exhaustion_advances_turn() {
        let mut g = game(2, 10);
        for card in 0..3 {
            g.propose_move(bank_for(B, card)).unwrap();
            let events = g.respond(B, vec![]).unwrap();
            if card < 2 {
                assert_eq!(g.current_player(), A);
                assert_eq!(events.len(), 2);
            } else {
                assert_eq!(
                    events.last(),
                    Some(&GameEvent::TurnEnded {
                        player: A,
                        next_player: B
                    })
                );
            }
        }
        assert_eq!(g.current_player(), B);
        assert_eq!(g.moves_remaining(), 3);
    }

    #[test]
    fn test_end_turn_blocked_by_active_move() {
        let mut g = game(2, 10);
        g.propose_move(bank_for(B, 0)).unwrap();
        assert_eq!(g.end_turn().unwrap_err(), GameError::MoveAlreadyInProgress);
        g.respond(B, vec![]).unwrap();

        g.end_turn().unwrap();
        assert_eq!(g.current_player(), B);
        assert_eq!(g.moves_remaining(), 3);
    }

    #[test]
    fn test_public_view_redacts_hands() {
        let mut g = game(2, 10);
        g.draw(A, 3).unwrap();
        g.relocate(CardId(9), CardLocation::PlayerBank(A)).unwrap();
        g.propose_move(bank_for(B, 8)).unwrap();
        g.say_no(B).unwrap();

        let public = g.public();
        assert_eq!(public.deck_card_count, 7);
        assert_eq!(public.players[&A].hand_count, 2);
        assert_eq!(public.players[&A].bank.len(), 1);
        assert_eq!(public.moves_remaining, 2);

        let active = public.current_move.expect("move should be public");
        assert_eq!(active.proposer, A);
        assert_eq!(active.phase, MovePhase::ResolvingVeto);
        assert_eq!(active.cause[0].location, CardLocation::PlayerHand(A));
        assert!(!active.responses[&B].confirmed);

        let private = g.player_state(A).unwrap();
        assert_eq!(private.hand.len(), 2);
        assert!(g.player_state(C).is_none());
    }
}
