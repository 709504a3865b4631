use crate::application::GameError;
use crate::application::ports::{RoomGateway, RoomRepository};
use crate::domain::{
    Clock, GameCode, Leaderboard, PlayerId, Portfolio, PositionId, Release, Room, RoomSummary,
    Round, RoundId, RoundView, StartTicket, Timestamp, TradeOrder,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::command::{Reply, RoomCommand, ShardStats};
use super::shard::{RoomShard, ShardConfig, ShardError, ShardHandle};

// ============================================================================
// Sharding Strategy
// ============================================================================

/// Strategy for distributing rooms across shards
pub trait ShardingStrategy: Send + Sync {
    /// Get the shard index for a game code
    fn get_shard_index(&self, code: &str, num_shards: usize) -> usize;
}

/// Default sharding strategy using consistent hashing
pub struct ConsistentHashStrategy;

impl ShardingStrategy for ConsistentHashStrategy {
    fn get_shard_index(&self, code: &str, num_shards: usize) -> usize {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        code.hash(&mut hasher);
        (hasher.finish() as usize) % num_shards
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the room shard manager
#[derive(Debug, Clone)]
pub struct ShardManagerConfig {
    pub num_shards: usize,
    /// Buffer size for command channels
    pub command_buffer_size: usize,
}

impl Default for ShardManagerConfig {
    fn default() -> Self {
        Self {
            num_shards: num_cpus::get().max(4),
            command_buffer_size: 1024,
        }
    }
}

impl ShardManagerConfig {
    pub fn with_num_shards(mut self, n: usize) -> Self {
        self.num_shards = n.max(1);
        self
    }

    pub fn with_command_buffer_size(mut self, size: usize) -> Self {
        self.command_buffer_size = size.max(1);
        self
    }
}

// ============================================================================
// Room Shard Manager
// ============================================================================

/// Owns every live room through a fixed set of shard tasks.
///
/// A game code always maps to the same shard, so all commands for one room
/// are processed in order by a single task.
pub struct RoomShardManager {
    shards: Vec<ShardHandle>,
    task_handles: Vec<JoinHandle<()>>,
    sharding_strategy: Arc<dyn ShardingStrategy>,
}

impl RoomShardManager {
    /// Create and start all shards with the default sharding strategy.
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: ShardManagerConfig,
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_strategy(config, repository, clock, Arc::new(ConsistentHashStrategy))
    }

    pub fn with_strategy(
        config: ShardManagerConfig,
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        sharding_strategy: Arc<dyn ShardingStrategy>,
    ) -> Self {
        let num_shards = config.num_shards.max(1);
        let mut shards = Vec::with_capacity(num_shards);
        let mut task_handles = Vec::with_capacity(num_shards);

        for shard_id in 0..num_shards {
            let shard_config = ShardConfig {
                shard_id,
                command_buffer_size: config.command_buffer_size.max(1),
            };
            let (handle, task) =
                RoomShard::spawn(shard_config, Arc::clone(&repository), Arc::clone(&clock));
            shards.push(handle);
            task_handles.push(task);
        }

        tracing::info!(shards = num_shards, "RoomShardManager started");

        Self {
            shards,
            task_handles,
            sharding_strategy,
        }
    }

    /// Get the shard handle for a game code
    fn get_shard(&self, code: &GameCode) -> &ShardHandle {
        let shard_idx = self
            .sharding_strategy
            .get_shard_index(code.as_str(), self.shards.len());
        &self.shards[shard_idx % self.shards.len()]
    }

    /// Send a command to the shard owning `code` and wait for its reply
    async fn request<T>(
        &self,
        code: &GameCode,
        command: impl FnOnce(Reply<T>) -> RoomCommand,
    ) -> Result<T, GameError> {
        let (tx, rx) = oneshot::channel();
        self.get_shard(code).send(command(tx)).await?;
        rx.await.map_err(|_| ShardError::ShardShutdown)?
    }

    async fn sweep_shard(shard: &ShardHandle, idle_before: Timestamp) -> Result<usize, GameError> {
        let (tx, rx) = oneshot::channel();
        shard
            .send(RoomCommand::Sweep {
                idle_before,
                response: tx,
            })
            .await?;
        rx.await.map_err(|_| ShardError::ShardShutdown)?
    }

    /// Get statistics for all shards
    pub fn stats(&self) -> Vec<ShardStats> {
        self.shards.iter().map(|s| s.stats()).collect()
    }

    /// Check if all shards are healthy
    pub fn is_healthy(&self) -> bool {
        self.shards.iter().all(|s| s.is_alive())
    }

    /// Periodically sweep rooms idle for longer than `ttl`.
    /// The task ends once the manager is dropped.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        interval: Duration,
    ) -> JoinHandle<()> {
        let manager = Arc::downgrade(self);
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let idle_before = clock
                    .now()
                    .checked_sub_signed(ttl)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                match manager.sweep(idle_before).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "Idle rooms swept"),
                    Err(e) => tracing::warn!(error = %e, "Room sweep failed"),
                }
            }
            tracing::debug!("Room sweeper stopped");
        })
    }

    /// Send shutdown command to all shards
    fn send_shutdown_to_all_shards(&self) {
        for shard in &self.shards {
            let _ = shard.try_send(RoomCommand::Shutdown);
        }
    }

    /// Shutdown all shards gracefully
    pub async fn shutdown(mut self) {
        for shard in &self.shards {
            let _ = shard.send(RoomCommand::Shutdown).await;
        }

        let handles = std::mem::take(&mut self.task_handles);
        for handle in handles {
            let _ = handle.await;
        }

        tracing::info!("RoomShardManager shutdown complete");
    }
}

impl Drop for RoomShardManager {
    fn drop(&mut self) {
        // Shards also exit once every sender is gone
        self.send_shutdown_to_all_shards();
    }
}

#[async_trait]
impl RoomGateway for RoomShardManager {
    async fn create(&self, room: Room) -> Result<(), GameError> {
        let code = room.code.clone();
        self.request(&code, |response| RoomCommand::Create {
            room: Box::new(room),
            response,
        })
        .await
    }

    async fn join(
        &self,
        code: &GameCode,
        player: PlayerId,
        name: String,
    ) -> Result<bool, GameError> {
        self.request(code, |response| RoomCommand::Join {
            code: code.clone(),
            player,
            name,
            response,
        })
        .await
    }

    async fn summary(&self, code: &GameCode) -> Result<RoomSummary, GameError> {
        self.request(code, |response| RoomCommand::Summary {
            code: code.clone(),
            response,
        })
        .await
    }

    async fn begin_start(
        &self,
        code: &GameCode,
        requester: PlayerId,
    ) -> Result<StartTicket, GameError> {
        self.request(code, |response| RoomCommand::BeginStart {
            code: code.clone(),
            requester,
            response,
        })
        .await
    }

    async fn commit_start(
        &self,
        code: &GameCode,
        rounds: Vec<Round>,
        starting_cash: Decimal,
    ) -> Result<RoundId, GameError> {
        self.request(code, |response| RoomCommand::CommitStart {
            code: code.clone(),
            rounds,
            starting_cash,
            response,
        })
        .await
    }

    async fn abort_start(&self, code: &GameCode) -> Result<(), GameError> {
        self.request(code, |response| RoomCommand::AbortStart {
            code: code.clone(),
            response,
        })
        .await
    }

    async fn round_view(
        &self,
        code: &GameCode,
        round_id: RoundId,
        player: PlayerId,
    ) -> Result<RoundView, GameError> {
        self.request(code, |response| RoomCommand::RoundView {
            code: code.clone(),
            round_id,
            player,
            response,
        })
        .await
    }

    async fn trade(
        &self,
        code: &GameCode,
        player: PlayerId,
        order: TradeOrder,
    ) -> Result<Portfolio, GameError> {
        self.request(code, |response| RoomCommand::Trade {
            code: code.clone(),
            player,
            order,
            response,
        })
        .await
    }

    async fn close_position(
        &self,
        code: &GameCode,
        player: PlayerId,
        position_id: PositionId,
        round_id: RoundId,
    ) -> Result<Portfolio, GameError> {
        self.request(code, |response| RoomCommand::ClosePosition {
            code: code.clone(),
            player,
            position_id,
            round_id,
            response,
        })
        .await
    }

    async fn complete_round(
        &self,
        code: &GameCode,
        player: PlayerId,
        round_id: RoundId,
    ) -> Result<bool, GameError> {
        self.request(code, |response| RoomCommand::CompleteRound {
            code: code.clone(),
            player,
            round_id,
            response,
        })
        .await
    }

    async fn check_release(
        &self,
        code: &GameCode,
        round_id: RoundId,
    ) -> Result<Release, GameError> {
        self.request(code, |response| RoomCommand::CheckRelease {
            code: code.clone(),
            round_id,
            response,
        })
        .await
    }

    async fn leaderboard(&self, code: &GameCode) -> Result<Leaderboard, GameError> {
        self.request(code, |response| RoomCommand::Leaderboard {
            code: code.clone(),
            response,
        })
        .await
    }

    async fn sweep(&self, idle_before: Timestamp) -> Result<usize, GameError> {
        let replies = join_all(
            self.shards
                .iter()
                .map(|shard| Self::sweep_shard(shard, idle_before)),
        )
        .await;

        let mut removed = 0;
        for reply in replies {
            removed += reply?;
        }
        Ok(removed)
    }
}
