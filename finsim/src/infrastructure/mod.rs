pub mod clock;
pub mod config;
pub mod identity;
pub mod market;
pub mod repositories;
pub mod room_shard;

pub use clock::{ManualClock, SystemClock};
pub use config::{ConfigError, FinsimConfig};
pub use identity::StaticTokenVerifier;
pub use market::{LexiconPricingOracle, StaticStockFeed, TemplateNewsOracle};
pub use repositories::InMemoryRoomRepository;
pub use room_shard::{
    ConsistentHashStrategy, RoomCommand, RoomShard, RoomShardManager, ShardConfig, ShardError,
    ShardHandle, ShardManagerConfig, ShardStats, ShardingStrategy,
};
