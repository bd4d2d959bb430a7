//! Deal game host: runs a bot game against the rules engine.

use deal_core::{CardId, GameState, PlayerId};
use rand::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod client;
mod config;
mod session;
mod table;

use bot::RandomClient;
use client::Client;
use config::HostConfig;
use session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HostConfig::from_env()?;
    let seed = config.seed.unwrap_or_else(|| thread_rng().gen());
    info!(?config, seed, "Starting Deal host...");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut deck: Vec<CardId> = (0..config.deck_size).map(CardId).collect();
    deck.shuffle(&mut rng);

    let mut game = GameState::new(config.settings(), deck)?;
    let players: Vec<PlayerId> = game.settings().player_queue.clone();
    for &player in &players {
        game.draw(player, config.hand_size)?;
    }

    let clients: HashMap<PlayerId, Arc<dyn Client>> = players
        .iter()
        .map(|&p| (p, Arc::new(RandomClient::new(rng.gen())) as Arc<dyn Client>))
        .collect();

    let (table, task) = table::spawn(game);
    let session = Session::new(table, clients, config.session());

    // Spectator reading published snapshots alongside the game
    let mut snapshots = session.table().subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let public = snapshots.borrow_and_update().clone();
            debug!(
                current_player = %public.current_player,
                moves_remaining = public.moves_remaining,
                deck = public.deck_card_count,
                negotiating = !public.is_idle(),
                "snapshot"
            );
        }
    });

    let summaries = session.run(config.max_turns).await?;
    drop(session);

    let final_state = task.await?;
    let committed: u32 = summaries.iter().map(|s| s.committed).sum();
    info!(
        turns = summaries.len(),
        committed,
        consistent = final_state.is_consistent(),
        "Game finished"
    );
    println!("{}", serde_json::to_string_pretty(&final_state.public())?);

    Ok(())
}
