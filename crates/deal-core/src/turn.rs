//! Fixed cyclic turn order.

use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Players in seating order plus a cursor at the current player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    players: Vec<PlayerId>,
    cursor: usize,
}

impl TurnOrder {
    /// `players` must be non-empty; `GameState::new` checks this
    pub(crate) fn new(players: Vec<PlayerId>) -> Self {
        Self { players, cursor: 0 }
    }

    pub fn current(&self) -> PlayerId {
        self.players[self.cursor]
    }

    /// Advance the cursor, wrapping around, and return the new current player
    pub(crate) fn advance(&mut self) -> PlayerId {
        self.cursor = (self.cursor + 1) % self.players.len();
        self.current()
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let mut order = TurnOrder::new(vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        assert_eq!(order.current(), PlayerId(1));
        assert_eq!(order.advance(), PlayerId(2));
        assert_eq!(order.advance(), PlayerId(3));
        assert_eq!(order.advance(), PlayerId(1));
    }

    #[test]
    fn test_single_player_cycles_to_self() {
        let mut order = TurnOrder::new(vec![PlayerId(9)]);
        assert_eq!(order.advance(), PlayerId(9));
    }
}
