//! Host configuration from environment variables.

use crate::session::SessionConfig;
use deal_core::{PlayerId, Settings, DEFAULT_MOVES_PER_TURN};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub players: u32,
    pub moves_per_turn: u32,
    pub deck_size: u32,
    pub hand_size: usize,
    pub draw_per_turn: usize,
    pub max_turns: u32,
    pub response_timeout: Duration,
    pub max_veto_rounds: u32,
    /// Fixed seed for the deck shuffle and bots; random if unset
    pub seed: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            players: 4,
            moves_per_turn: DEFAULT_MOVES_PER_TURN,
            deck_size: 106,
            hand_size: 5,
            draw_per_turn: 2,
            max_turns: 40,
            response_timeout: Duration::from_millis(5000),
            max_veto_rounds: 3,
            seed: None,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_ms = parse(
            &lookup,
            "DEAL_RESPONSE_TIMEOUT_MS",
            defaults.response_timeout.as_millis() as u64,
        )?;

        let config = Self {
            players: parse(&lookup, "DEAL_PLAYERS", defaults.players)?,
            moves_per_turn: parse(&lookup, "DEAL_MOVES_PER_TURN", defaults.moves_per_turn)?,
            deck_size: parse(&lookup, "DEAL_DECK_SIZE", defaults.deck_size)?,
            hand_size: parse(&lookup, "DEAL_HAND_SIZE", defaults.hand_size)?,
            draw_per_turn: parse(&lookup, "DEAL_DRAW_PER_TURN", defaults.draw_per_turn)?,
            max_turns: parse(&lookup, "DEAL_MAX_TURNS", defaults.max_turns)?,
            response_timeout: Duration::from_millis(timeout_ms),
            max_veto_rounds: parse(&lookup, "DEAL_MAX_VETO_ROUNDS", defaults.max_veto_rounds)?,
            seed: match lookup("DEAL_SEED") {
                Some(raw) => Some(parse_value("DEAL_SEED", &raw)?),
                None => None,
            },
        };

        if config.players == 0 {
            return Err(ConfigError::Invalid {
                key: "DEAL_PLAYERS",
                value: "0".into(),
            });
        }
        Ok(config)
    }

    /// Players are numbered from 1 in seating order
    pub fn settings(&self) -> Settings {
        Settings::new(self.moves_per_turn, (1..=self.players).map(PlayerId).collect())
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            draw_per_turn: self.draw_per_turn,
            response_timeout: self.response_timeout,
            max_veto_rounds: self.max_veto_rounds,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
