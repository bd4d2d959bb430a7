//! Session driver: runs turns by asking clients for proposals and answers
//! and feeding them to the table one operation at a time.

use crate::client::Client;
use crate::table::{TableError, TableHandle};
use deal_core::{GameError, GameEvent, PlayerId};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("No client registered for {0}")]
    MissingClient(PlayerId),
}

/// Orchestration policy knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Cards drawn by the current player at the start of each turn
    pub draw_per_turn: usize,
    /// How long any single client request may take
    pub response_timeout: Duration,
    /// Declined vetoes allowed per player per move before the next no is upheld
    pub max_veto_rounds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            draw_per_turn: 2,
            response_timeout: Duration::from_secs(5),
            max_veto_rounds: 3,
        }
    }
}

/// What happened during one turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSummary {
    pub player: Option<PlayerId>,
    pub proposed: u32,
    pub committed: u32,
}

pub struct Session {
    table: TableHandle,
    clients: HashMap<PlayerId, Arc<dyn Client>>,
    config: SessionConfig,
}

impl Session {
    pub fn new(
        table: TableHandle,
        clients: HashMap<PlayerId, Arc<dyn Client>>,
        config: SessionConfig,
    ) -> Self {
        Self {
            table,
            clients,
            config,
        }
    }

    pub fn table(&self) -> &TableHandle {
        &self.table
    }

    fn client(&self, player: PlayerId) -> Result<&Arc<dyn Client>, SessionError> {
        self.clients
            .get(&player)
            .ok_or(SessionError::MissingClient(player))
    }

    /// Run a client request under the configured timeout
    async fn ask<T>(&self, request: impl Future<Output = T>) -> Option<T> {
        timeout(self.config.response_timeout, request).await.ok()
    }

    /// Play `max_turns` turns back to back
    pub async fn run(&self, max_turns: u32) -> Result<Vec<TurnSummary>, SessionError> {
        let mut summaries = Vec::with_capacity(max_turns as usize);
        for turn in 1..=max_turns {
            let summary = self.play_turn().await?;
            info!(
                turn,
                player = ?summary.player,
                proposed = summary.proposed,
                committed = summary.committed,
                "turn finished"
            );
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Play moves for the current player until their turn ends
    pub async fn play_turn(&self) -> Result<TurnSummary, SessionError> {
        let player = self.table.public().current_player;
        let client = self.client(player)?;
        let mut summary = TurnSummary {
            player: Some(player),
            ..Default::default()
        };

        if self.config.draw_per_turn > 0 {
            self.table.draw(player, self.config.draw_per_turn).await?;
        }

        loop {
            let view = self.table.view(player).await?;
            let Some(proposal) = self
                .ask(client.request_move_proposal(&view.public, &view.private))
                .await
            else {
                warn!(%player, "timed out choosing a move, ending turn");
                self.table.end_turn().await?;
                break;
            };

            let targets: Vec<PlayerId> = proposal.targets().collect();
            match self.table.propose(proposal).await {
                Ok(_) => summary.proposed += 1,
                Err(TableError::Rejected(GameError::EmptyCause)) => {
                    info!(%player, "passes");
                    self.table.end_turn().await?;
                    break;
                }
                Err(TableError::Rejected(err)) => {
                    warn!(%player, %err, "proposal rejected, ending turn");
                    self.table.end_turn().await?;
                    break;
                }
                Err(err) => return Err(err.into()),
            }

            let outcomes = if targets.is_empty() {
                // Nobody gates the move; the proposer's own confirmation commits it
                vec![self
                    .table
                    .respond(player, Vec::new())
                    .await
                    .map_err(SessionError::from)]
            } else {
                join_all(targets.iter().map(|&target| self.negotiate(player, target))).await
            };

            let mut turn_over = false;
            for events in outcomes {
                for event in events? {
                    match event {
                        GameEvent::MoveCommitted { .. } => summary.committed += 1,
                        GameEvent::TurnEnded { .. } => turn_over = true,
                        _ => {}
                    }
                }
            }
            if turn_over {
                break;
            }
        }

        Ok(summary)
    }

    /// Obtain a confirmed response from `target` for the active move
    async fn negotiate(
        &self,
        proposer: PlayerId,
        target: PlayerId,
    ) -> Result<Vec<GameEvent>, SessionError> {
        if target == proposer {
            return Ok(self.table.respond(target, Vec::new()).await?);
        }
        let client = self.client(target)?;

        let mut events = Vec::new();
        let mut rounds = 0;
        loop {
            let view = self.table.view(target).await?;
            let Some(answer) = self
                .ask(client.request_response(&view.public, &view.private))
                .await
            else {
                warn!(%target, "timed out responding, upholding an implicit no");
                events.extend(self.force_no(target).await?);
                return Ok(events);
            };

            if !answer.say_no {
                match self.table.respond(target, answer.transfers).await {
                    Ok(applied) => {
                        events.extend(applied);
                        return Ok(events);
                    }
                    Err(TableError::Rejected(err)) => {
                        warn!(%target, %err, "response rejected");
                        rounds += 1;
                        if rounds > self.config.max_veto_rounds {
                            events.extend(self.force_no(target).await?);
                            return Ok(events);
                        }
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            events.extend(self.table.say_no(target).await?);
            rounds += 1;
            let upheld =
                rounds > self.config.max_veto_rounds || self.rule_on_no(proposer, target).await?;
            if upheld {
                events.extend(self.table.accept_no(target).await?);
                return Ok(events);
            }
            events.extend(self.table.decline_no(target).await?);
        }
    }

    /// Ask the proposer whether `target`'s no stands
    async fn rule_on_no(&self, proposer: PlayerId, target: PlayerId) -> Result<bool, SessionError> {
        let client = self.client(proposer)?;
        let view = self.table.view(proposer).await?;
        match self
            .ask(client.request_say_no_confirmation(&view.public, &view.private))
            .await
        {
            Some(upheld) => {
                debug!(%proposer, %target, upheld, "ruled on no");
                Ok(upheld)
            }
            None => {
                warn!(%proposer, %target, "timed out ruling on no, upholding it");
                Ok(true)
            }
        }
    }

    /// Abandon `target`'s part of the negotiation through the public
    /// say-no path: they transfer nothing.
    async fn force_no(&self, target: PlayerId) -> Result<Vec<GameEvent>, SessionError> {
        let mut events = self.table.say_no(target).await?;
        events.extend(self.table.accept_no(target).await?);
        Ok(events)
    }
}
