mod command;
mod manager;
mod shard;

pub use command::{Reply, RoomCommand, ShardStats};
pub use manager::{ConsistentHashStrategy, RoomShardManager, ShardManagerConfig, ShardingStrategy};
pub use shard::{RoomShard, ShardConfig, ShardError, ShardHandle};
