//! The table task: sole owner of the game state.
//!
//! Every mutation is queued as a [`Command`] and applied one at a time, so
//! negotiation operations never interleave. After each successful mutation
//! a fresh public snapshot is published on a watch channel.

use deal_core::{
    GameError, GameEvent, GameState, MoveProposal, PlayerId, PlayerState, PublicGameState,
    TransferProposal,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

const QUEUE_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table has shut down")]
    Closed,

    #[error("Rejected: {0}")]
    Rejected(#[from] GameError),
}

/// A mutation to apply to the game
#[derive(Debug, Clone)]
pub enum Op {
    Propose(MoveProposal),
    Respond(PlayerId, Vec<TransferProposal>),
    SayNo(PlayerId),
    AcceptNo(PlayerId),
    DeclineNo(PlayerId),
    EndTurn,
    Draw(PlayerId, usize),
}

impl Op {
    fn apply(self, state: &mut GameState) -> Result<Vec<GameEvent>, GameError> {
        match self {
            Op::Propose(proposal) => state.propose_move(proposal),
            Op::Respond(player, transfers) => state.respond(player, transfers),
            Op::SayNo(player) => state.say_no(player),
            Op::AcceptNo(player) => state.accept_no(player),
            Op::DeclineNo(player) => state.decline_no(player),
            Op::EndTurn => state.end_turn(),
            Op::Draw(player, count) => state.draw(player, count),
        }
    }
}

/// What one participant is allowed to see
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub public: PublicGameState,
    pub private: PlayerState,
}

enum Command {
    Apply {
        op: Op,
        reply: oneshot::Sender<Result<Vec<GameEvent>, GameError>>,
    },
    View {
        player: PlayerId,
        reply: oneshot::Sender<Option<PlayerView>>,
    },
}

/// Cloneable handle for queueing commands to the table task
#[derive(Clone)]
pub struct TableHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<PublicGameState>,
}

/// Start the table task. It runs until every handle is dropped and then
/// yields the final game state.
pub fn spawn(state: GameState) -> (TableHandle, JoinHandle<GameState>) {
    let (commands, inbox) = mpsc::channel(QUEUE_DEPTH);
    let (publisher, snapshots) = watch::channel(state.public());
    let task = tokio::spawn(run(state, inbox, publisher));
    (TableHandle { commands, snapshots }, task)
}

async fn run(
    mut state: GameState,
    mut inbox: mpsc::Receiver<Command>,
    publisher: watch::Sender<PublicGameState>,
) -> GameState {
    while let Some(command) = inbox.recv().await {
        match command {
            Command::Apply { op, reply } => {
                debug!(?op, "applying");
                let result = op.apply(&mut state);
                match &result {
                    Ok(events) => {
                        for event in events {
                            debug!(?event, "game event");
                        }
                        publisher.send_replace(state.public());
                    }
                    Err(err) => debug!(%err, "operation rejected"),
                }
                let _ = reply.send(result);
            }
            Command::View { player, reply } => {
                let view = state.player_state(player).map(|private| PlayerView {
                    public: state.public(),
                    private,
                });
                let _ = reply.send(view);
            }
        }
    }
    state
}

impl TableHandle {
    /// Queue an operation and wait for its outcome
    pub async fn apply(&self, op: Op) -> Result<Vec<GameEvent>, TableError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Apply { op, reply })
            .await
            .map_err(|_| TableError::Closed)?;
        Ok(outcome.await.map_err(|_| TableError::Closed)??)
    }

    pub async fn propose(&self, proposal: MoveProposal) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::Propose(proposal)).await
    }

    pub async fn respond(
        &self,
        player: PlayerId,
        transfers: Vec<TransferProposal>,
    ) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::Respond(player, transfers)).await
    }

    pub async fn say_no(&self, player: PlayerId) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::SayNo(player)).await
    }

    pub async fn accept_no(&self, player: PlayerId) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::AcceptNo(player)).await
    }

    pub async fn decline_no(&self, player: PlayerId) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::DeclineNo(player)).await
    }

    pub async fn end_turn(&self) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::EndTurn).await
    }

    pub async fn draw(&self, player: PlayerId, count: usize) -> Result<Vec<GameEvent>, TableError> {
        self.apply(Op::Draw(player, count)).await
    }

    /// Public snapshot plus the player's own holdings, taken atomically
    pub async fn view(&self, player: PlayerId) -> Result<PlayerView, TableError> {
        let (reply, view) = oneshot::channel();
        self.commands
            .send(Command::View { player, reply })
            .await
            .map_err(|_| TableError::Closed)?;
        view.await
            .map_err(|_| TableError::Closed)?
            .ok_or(TableError::Rejected(GameError::UnknownPlayer(player)))
    }

    /// Latest published public snapshot. Never blocks on the table task.
    pub fn public(&self) -> PublicGameState {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PublicGameState> {
        self.snapshots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deal_core::{CardId, CardLocation, Settings};

    const A: PlayerId = PlayerId(1);
    const B: PlayerId = PlayerId(2);

    fn new_table() -> (TableHandle, JoinHandle<GameState>) {
        let state = GameState::new(Settings::standard(2), (0..10).map(CardId).collect()).unwrap();
        spawn(state)
    }

    #[tokio::test]
    async fn test_operations_are_applied_in_order() {
        let (table, task) = new_table();
        let proposal = MoveProposal::new(vec![CardId(3)])
            .with_transfer(B, TransferProposal::new(CardId(3), CardLocation::PlayerBank(B)));

        table.propose(proposal).await.unwrap();
        assert!(matches!(
            table.propose(MoveProposal::new(vec![CardId(4)])).await,
            Err(TableError::Rejected(GameError::MoveAlreadyInProgress))
        ));
        table.say_no(B).await.unwrap();
        table.decline_no(B).await.unwrap();
        table.respond(B, vec![]).await.unwrap();

        drop(table);
        let state = task.await.unwrap();
        assert_eq!(state.location_of(CardId(3)), Some(CardLocation::PlayerBank(B)));
        assert_eq!(state.moves_remaining(), 2);
    }

    #[tokio::test]
    async fn test_snapshots_published_after_mutation() {
        let (table, _task) = new_table();
        let mut snapshots = table.subscribe();
        assert!(table.public().is_idle());

        table.draw(A, 2).await.unwrap();
        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().players[&A].hand_count, 2);
        assert_eq!(table.public().deck_card_count, 8);
    }

    #[tokio::test]
    async fn test_view_of_unknown_player_is_rejected() {
        let (table, _task) = new_table();
        let view = table.view(A).await.unwrap();
        assert_eq!(view.private.id, A);
        assert!(matches!(
            table.view(PlayerId(9)).await,
            Err(TableError::Rejected(GameError::UnknownPlayer(PlayerId(9))))
        ));
    }
}
