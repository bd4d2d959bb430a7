//! Deal - rules engine for a turn-based card-trading game
//!
//! This crate provides the authoritative game state, including:
//! - Card identifiers and the locations a card can occupy
//! - Per-player holdings (hand, bank, property)
//! - The move negotiation state machine: propose, respond or say no,
//!   accept or decline the no, commit
//! - Turn order and the per-turn move budget
//! - Public and private projections of the state for participants
//!
//! # Architecture
//!
//! The engine is a single-writer state machine with no I/O. Every mutating
//! operation returns the [`GameEvent`]s it produced or a [`GameError`]
//! without having changed anything. Talking to participants and
//! serializing their answers is left to the host.
//!
//! # Modules
//!
//! - [`card`]: Card identifiers, locations and card sets
//! - [`player`]: Player identifiers, holdings and player views
//! - [`actions`]: Proposals from participants and resulting events
//! - [`moves`]: The in-flight move record
//! - [`turn`]: Cyclic turn order
//! - [`game`]: Game state and negotiation operations
//! - [`view`]: Spectator-safe projection

pub mod actions;
pub mod card;
pub mod game;
pub mod moves;
pub mod player;
pub mod turn;
pub mod view;

// Re-export commonly used types
pub use actions::{GameEvent, MoveProposal, ResponseProposal, Transfer, TransferProposal};
pub use card::{Card, CardId, CardLocation, CardSet};
pub use game::{GameError, GameState, Settings, DEFAULT_MOVES_PER_TURN};
pub use moves::{Move, MovePhase, Response};
pub use player::{HoldingKind, PlayerHoldings, PlayerId, PlayerState, PublicPlayerState};
pub use turn::TurnOrder;
pub use view::{PublicGameState, PublicMove, PublicResponse};
