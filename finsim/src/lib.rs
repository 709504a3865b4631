//! Finsim
//!
//! A multiplayer trading-simulation game server. Players gather in a room,
//! the owner starts the game, and the server pre-generates every market
//! round up front. Each player trades against the same precomputed prices
//! and the room advances once every player has completed the current round.
//!
//! # Architecture
//!
//! - **Domain**: rooms, rounds, the portfolio ledger and the completion barrier
//! - **Application**: use cases, the round generator and port interfaces
//!   (identity, stock feed, pricing and news oracles, room storage)
//! - **Infrastructure**: room shard actors, in-memory storage, local oracle
//!   adapters, clocks and configuration
//! - **Presentation**: REST API
//!
//! # Example
//!
//! ```ignore
//! use finsim::{FinsimConfig, FinsimServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = FinsimServer::from_config(FinsimConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{
    Clock, Direction, GameCode, Ledger, PlayerId, Portfolio, Position, Room, RoomConfig,
    RoomPhase, Round, RoundId, Ticker, Timestamp,
};

pub use application::{
    ErrorCategory, GameError, GenerationError, GeneratorConfig, RoomGateway, RoomRepository,
    RoundGenerator,
};

pub use infrastructure::{
    ConfigError, FinsimConfig, InMemoryRoomRepository, LexiconPricingOracle, ManualClock,
    RoomShardManager, ShardManagerConfig, StaticStockFeed, StaticTokenVerifier, SystemClock,
    TemplateNewsOracle,
};

pub use presentation::{AppState, GameRules, ROUTES, create_router};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// The game server: adapters, room shards and the HTTP surface
pub struct FinsimServer {
    pub config: FinsimConfig,
    pub rooms: Arc<RoomShardManager>,
    pub identity: Arc<StaticTokenVerifier>,
    pub stock_feed: Arc<StaticStockFeed>,
    pub generator: Arc<RoundGenerator>,
    pub clock: Arc<dyn Clock>,
    sweeper: JoinHandle<()>,
}

impl FinsimServer {
    /// Build the server with the local adapters described by `config`.
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: FinsimConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: FinsimConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        // Without configured players any `dev:<name>` token is accepted
        let identity = Arc::new(
            StaticTokenVerifier::from_config(&config.players)
                .with_dev_tokens(config.players.is_empty()),
        );
        let stock_feed = Arc::new(StaticStockFeed::from_config(&config.stocks)?);
        let news = Arc::new(match config.game.seed {
            Some(seed) => TemplateNewsOracle::seeded(seed),
            None => TemplateNewsOracle::new(),
        });
        let generator = Arc::new(RoundGenerator::new(
            stock_feed.clone(),
            Arc::new(LexiconPricingOracle::default()),
            news,
            config.generator_config(),
        ));

        let repository = Arc::new(InMemoryRoomRepository::new());
        let rooms = Arc::new(RoomShardManager::new(
            ShardManagerConfig::default()
                .with_num_shards(config.shards.num_shards)
                .with_command_buffer_size(config.shards.command_buffer_size),
            repository,
            Arc::clone(&clock),
        ));
        let sweeper = rooms.spawn_sweeper(
            Arc::clone(&clock),
            config.game.room_ttl(),
            config.game.sweep_interval(),
        );

        tracing::info!(
            name = %config.name,
            shards = config.shards.num_shards,
            stocks = config.stocks.len(),
            players = config.players.len(),
            "Game server configured"
        );

        Ok(FinsimServer {
            config,
            rooms,
            identity,
            stock_feed,
            generator,
            clock,
            sweeper,
        })
    }

    /// Create the REST API router
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState::new(
            self.rooms.clone(),
            self.identity.clone(),
            self.stock_feed.clone(),
            Arc::clone(&self.generator),
            Arc::clone(&self.clock),
            GameRules {
                max_rounds: self.config.game.max_rounds,
                starting_cash: self.config.game.starting_cash,
            },
        ));

        create_router(state)
    }

    /// Run the game server until the listener fails
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.address();
        let router = self.router();

        tracing::info!("Game server listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        self.sweeper.abort();
        Ok(())
    }
}
