//! Configuration loading for the game server
//!
//! Supports JSON configuration files for:
//! - Server address
//! - Game rules (starting cash, round limits, oracle timeout, room expiry)
//! - Room shard layout
//! - Seed quotes for the local stock feed
//! - Player tokens for the local identity verifier

use crate::application::GeneratorConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Root configuration for the game server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinsimConfig {
    /// Server name shown in logs
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub shards: ShardsConfig,

    /// Quotes served by the static stock feed; empty means built-in defaults
    #[serde(default)]
    pub stocks: Vec<StockConfig>,

    /// Tokens accepted by the static identity verifier
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}

fn default_name() -> String {
    "finsim".to_string()
}

impl Default for FinsimConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            server: ServerConfig::default(),
            game: GameConfig::default(),
            shards: ShardsConfig::default(),
            stocks: Vec::new(),
            players: Vec::new(),
        }
    }
}

impl FinsimConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `HOST` / `PORT` taken from the environment when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.starting_cash <= Decimal::ZERO {
            return Err(ConfigError::Invalid(
                "game.starting_cash must be positive".to_string(),
            ));
        }
        if self.game.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "game.max_rounds must be positive".to_string(),
            ));
        }
        if self.game.ticker_count == 0 {
            return Err(ConfigError::Invalid(
                "game.ticker_count must be positive".to_string(),
            ));
        }
        if self.shards.num_shards == 0 || self.shards.command_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "shards need a positive count and buffer size".to_string(),
            ));
        }
        for player in &self.players {
            if player.token.is_empty() || player.player_id.is_empty() {
                return Err(ConfigError::InvalidPlayer(format!(
                    "token and player_id are required (display name '{}')",
                    player.display_name
                )));
            }
        }
        Ok(())
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            ticker_count: self.game.ticker_count,
            oracle_timeout: self.game.oracle_timeout(),
            seed: self.game.seed,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Game rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_starting_cash")]
    pub starting_cash: Decimal,
    /// Tickers priced in every round
    #[serde(default = "default_ticker_count")]
    pub ticker_count: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,
    /// Idle time after which a room is evicted and deleted
    #[serde(default = "default_room_ttl_secs")]
    pub room_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Fixed RNG seed for reproducible games
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_starting_cash() -> Decimal {
    dec!(100000)
}

fn default_ticker_count() -> usize {
    10
}

fn default_max_rounds() -> u32 {
    20
}

fn default_oracle_timeout_ms() -> u64 {
    20_000
}

fn default_room_ttl_secs() -> u64 {
    6 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            ticker_count: default_ticker_count(),
            max_rounds: default_max_rounds(),
            oracle_timeout_ms: default_oracle_timeout_ms(),
            room_ttl_secs: default_room_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs(self.room_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Room shard layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardsConfig {
    #[serde(default = "default_num_shards")]
    pub num_shards: usize,
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,
}

fn default_num_shards() -> usize {
    num_cpus::get().max(4)
}

fn default_command_buffer_size() -> usize {
    1024
}

impl Default for ShardsConfig {
    fn default() -> Self {
        Self {
            num_shards: default_num_shards(),
            command_buffer_size: default_command_buffer_size(),
        }
    }
}

/// A seed quote for the static stock feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    pub ticker: String,
    pub last_close: Decimal,
}

/// A player known to the static identity verifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub token: String,
    pub player_id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid stock config: {0}")]
    InvalidStock(String),

    #[error("Invalid player config: {0}")]
    InvalidPlayer(String),
}
