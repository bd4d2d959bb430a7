//! Random bot participant.
//!
//! Plays a random card from its hand each move, either banking it, laying it
//! down as property, or discarding it to demand payment from an opponent.
//! Pays demands with a random bank card and occasionally says no.

use crate::client::Client;
use async_trait::async_trait;
use deal_core::{
    CardId, CardLocation, MoveProposal, PlayerId, PlayerState, PublicGameState, ResponseProposal,
    TransferProposal,
};
use rand::prelude::*;
use std::sync::{Mutex, PoisonError};

pub struct RandomClient {
    rng: Mutex<StdRng>,
    /// Chance of passing the rest of the turn instead of playing
    pass_chance: f64,
    /// Chance of saying no to a move
    say_no_chance: f64,
}

impl RandomClient {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            pass_chance: 0.1,
            say_no_chance: 0.2,
        }
    }

    #[cfg(test)]
    fn with_chances(mut self, pass_chance: f64, say_no_chance: f64) -> Self {
        self.pass_chance = pass_chance.clamp(0.0, 1.0);
        self.say_no_chance = say_no_chance.clamp(0.0, 1.0);
        self
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn choose_move(&self, public: &PublicGameState, private: &PlayerState) -> MoveProposal {
        let me = private.id;
        self.with_rng(|rng| {
            let Some(card) = private.hand.choose(rng).map(|c| c.id) else {
                return MoveProposal::default();
            };
            if rng.gen_bool(self.pass_chance) {
                return MoveProposal::default();
            }

            let opponents: Vec<PlayerId> = public.opponents(me).collect();
            match rng.gen_range(0..3) {
                0 => match opponents.choose(rng) {
                    Some(&victim) => demand(me, victim, card),
                    None => bank(me, card),
                },
                1 => bank(me, card),
                _ => MoveProposal::new(vec![card]).with_transfer(
                    me,
                    TransferProposal::new(card, CardLocation::PlayerProperty(me)),
                ),
            }
        })
    }

    fn choose_response(&self, public: &PublicGameState, private: &PlayerState) -> ResponseProposal {
        self.with_rng(|rng| {
            if rng.gen_bool(self.say_no_chance) {
                return ResponseProposal::say_no();
            }
            let proposer = match &public.current_move {
                Some(active) if active.proposer != private.id => active.proposer,
                _ => return ResponseProposal::accept(),
            };
            match private.bank.choose(rng) {
                Some(payment) => ResponseProposal::pay(vec![TransferProposal::new(
                    payment.id,
                    CardLocation::PlayerBank(proposer),
                )]),
                None => ResponseProposal::accept(),
            }
        })
    }
}

/// Bank a card from hand
fn bank(me: PlayerId, card: CardId) -> MoveProposal {
    MoveProposal::new(vec![card])
        .with_transfer(me, TransferProposal::new(card, CardLocation::PlayerBank(me)))
}

/// Discard a card and ask `victim` to pay
fn demand(me: PlayerId, victim: PlayerId, card: CardId) -> MoveProposal {
    let mut proposal = MoveProposal::new(vec![card])
        .with_transfer(me, TransferProposal::new(card, CardLocation::Waste));
    proposal.transfers.insert(victim, Vec::new());
    proposal
}

#[async_trait]
impl Client for RandomClient {
    async fn request_move_proposal(
        &self,
        public: &PublicGameState,
        private: &PlayerState,
    ) -> MoveProposal {
        self.choose_move(public, private)
    }

    async fn request_response(
        &self,
        public: &PublicGameState,
        private: &PlayerState,
    ) -> ResponseProposal {
        self.choose_response(public, private)
    }

    async fn request_say_no_confirmation(
        &self,
        _public: &PublicGameState,
        _private: &PlayerState,
    ) -> bool {
        self.with_rng(|rng| rng.gen_bool(0.5))
    }
}
