//! The capability a participant must provide to take part in a game.

use async_trait::async_trait;
use deal_core::{MoveProposal, PlayerState, PublicGameState, ResponseProposal};

/// A participant: human UI, bot, or network peer.
///
/// The session never assumes an answer arrives; every call is wrapped in a
/// timeout by the caller. Implementations only ever see the public state
/// and their own holdings.
#[async_trait]
pub trait Client: Send + Sync {
    /// Choose the next move. An empty cause means "nothing more this turn".
    async fn request_move_proposal(
        &self,
        public: &PublicGameState,
        private: &PlayerState,
    ) -> MoveProposal;

    /// Answer the active move: accept (optionally paying) or say no.
    async fn request_response(
        &self,
        public: &PublicGameState,
        private: &PlayerState,
    ) -> ResponseProposal;

    /// Rule on a say-no against your move. `true` upholds it.
    async fn request_say_no_confirmation(
        &self,
        public: &PublicGameState,
        private: &PlayerState,
    ) -> bool;
}
