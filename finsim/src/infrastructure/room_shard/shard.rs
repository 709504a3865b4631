use crate::application::GameError;
use crate::application::ports::{RecordAppend, RoomRepository};
use crate::domain::{
    Clock, GameCode, Leaderboard, PlayerId, Release, Room, RoomError, RoundId, RoundView,
    StartTicket, Timestamp,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::command::{RoomCommand, ShardStats};

/// Configuration for a shard
#[derive(Debug, Clone)]
pub struct ShardConfig {
    /// Shard identifier
    pub shard_id: usize,
    /// Channel buffer size for commands
    pub command_buffer_size: usize,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            shard_id: 0,
            command_buffer_size: 1024,
        }
    }
}

// Shard state constants
const SHARD_STATE_ALIVE: u8 = 0;
const SHARD_STATE_SHUTTING_DOWN: u8 = 1;
const SHARD_STATE_DEAD: u8 = 2;

/// Handle to communicate with a shard
#[derive(Clone)]
pub struct ShardHandle {
    pub shard_id: usize,
    sender: mpsc::Sender<RoomCommand>,
    commands_processed: Arc<AtomicU64>,
    rooms_cached: Arc<AtomicUsize>,
    state: Arc<AtomicU8>,
}

impl ShardHandle {
    /// Send a command to the shard, waiting for queue space
    pub async fn send(&self, cmd: RoomCommand) -> Result<(), ShardError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| ShardError::ShardShutdown)
    }

    /// Send without waiting; used where awaiting is not possible
    pub fn try_send(&self, cmd: RoomCommand) -> Result<(), ShardError> {
        self.sender.try_send(cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => ShardError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => ShardError::ShardShutdown,
        })
    }

    /// Get shard statistics
    pub fn stats(&self) -> ShardStats {
        ShardStats {
            shard_id: self.shard_id,
            rooms_cached: self.rooms_cached.load(Ordering::Relaxed),
            commands_processed: self.commands_processed.load(Ordering::Relaxed),
            commands_in_queue: self.sender.max_capacity() - self.sender.capacity(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state.load(Ordering::Acquire) == SHARD_STATE_ALIVE
    }
}

struct CachedRoom {
    room: Room,
    last_active: Timestamp,
}

/// A shard that owns a set of rooms and applies their commands one at a time.
///
/// Mutations are applied to a copy of the room, written to the repository and
/// only then installed in the cache, so a failed write leaves the cached room
/// exactly as it was.
pub struct RoomShard {
    config: ShardConfig,
    rooms: HashMap<GameCode, CachedRoom>,
    receiver: mpsc::Receiver<RoomCommand>,
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    commands_processed: Arc<AtomicU64>,
    rooms_cached: Arc<AtomicUsize>,
    state: Arc<AtomicU8>,
}

impl RoomShard {
    /// Create a new shard task and return its handle
    pub fn spawn(
        config: ShardConfig,
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> (ShardHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.command_buffer_size);
        let commands_processed = Arc::new(AtomicU64::new(0));
        let rooms_cached = Arc::new(AtomicUsize::new(0));
        let state = Arc::new(AtomicU8::new(SHARD_STATE_ALIVE));

        let handle = ShardHandle {
            shard_id: config.shard_id,
            sender,
            commands_processed: Arc::clone(&commands_processed),
            rooms_cached: Arc::clone(&rooms_cached),
            state: Arc::clone(&state),
        };

        let shard = RoomShard {
            config,
            rooms: HashMap::new(),
            receiver,
            repository,
            clock,
            commands_processed,
            rooms_cached,
            state,
        };

        (handle, tokio::spawn(shard.run()))
    }

    /// Main event loop - processes commands sequentially
    async fn run(mut self) {
        tracing::info!(shard_id = self.config.shard_id, "Room shard started");

        loop {
            match self.receiver.recv().await {
                Some(cmd) => {
                    let keep_running = self.process_command(cmd).await;
                    self.commands_processed.fetch_add(1, Ordering::Relaxed);
                    if !keep_running {
                        tracing::info!(shard_id = self.config.shard_id, "Shard shutdown requested");
                        self.state
                            .store(SHARD_STATE_SHUTTING_DOWN, Ordering::Release);
                        break;
                    }
                }
                None => {
                    tracing::info!(shard_id = self.config.shard_id, "Shard channel closed");
                    self.state
                        .store(SHARD_STATE_SHUTTING_DOWN, Ordering::Release);
                    break;
                }
            }
        }

        self.state.store(SHARD_STATE_DEAD, Ordering::Release);
        tracing::info!(
            shard_id = self.config.shard_id,
            rooms = self.rooms.len(),
            "Room shard shutdown complete"
        );
    }

    /// Process a single command, returns false if should shutdown
    async fn process_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Create { room, response } => {
                let result = self.handle_create(*room).await;
                let _ = response.send(result);
            }

            RoomCommand::Join {
                code,
                player,
                name,
                response,
            } => {
                let result = self.handle_join(&code, player, name).await;
                let _ = response.send(result);
            }

            RoomCommand::Summary { code, response } => {
                let result = self.entry(&code).await.map(|room| room.summary());
                let _ = response.send(result);
            }

            RoomCommand::BeginStart {
                code,
                requester,
                response,
            } => {
                let result = self.handle_begin_start(&code, &requester).await;
                let _ = response.send(result);
            }

            RoomCommand::CommitStart {
                code,
                rounds,
                starting_cash,
                response,
            } => {
                let result = self
                    .mutate(&code, |room| room.commit_start(rounds, starting_cash))
                    .await;
                let _ = response.send(result);
            }

            RoomCommand::AbortStart { code, response } => {
                let result = self.entry(&code).await.map(|room| room.abort_start());
                let _ = response.send(result);
            }

            RoomCommand::RoundView {
                code,
                round_id,
                player,
                response,
            } => {
                let result = self.handle_round_view(&code, &round_id, &player).await;
                let _ = response.send(result);
            }

            RoomCommand::Trade {
                code,
                player,
                order,
                response,
            } => {
                let result = self
                    .mutate(&code, |room| room.trade(&player, order))
                    .await;
                let _ = response.send(result);
            }

            RoomCommand::ClosePosition {
                code,
                player,
                position_id,
                round_id,
                response,
            } => {
                let result = self
                    .mutate(&code, |room| {
                        room.close_position(&player, position_id, &round_id)
                    })
                    .await;
                let _ = response.send(result);
            }

            RoomCommand::CompleteRound {
                code,
                player,
                round_id,
                response,
            } => {
                let result = self
                    .mutate(&code, |room| room.complete_round(&player, &round_id))
                    .await;
                let _ = response.send(result);
            }

            RoomCommand::CheckRelease {
                code,
                round_id,
                response,
            } => {
                let result = self.handle_check_release(&code, &round_id).await;
                let _ = response.send(result);
            }

            RoomCommand::Leaderboard { code, response } => {
                let result = self.handle_leaderboard(&code).await;
                let _ = response.send(result);
            }

            RoomCommand::Sweep {
                idle_before,
                response,
            } => {
                let result = self.handle_sweep(idle_before).await;
                let _ = response.send(result);
            }

            RoomCommand::Shutdown => {
                return false;
            }
        }
        true
    }

    /// Cached room for `code`, hydrated from the repository on first use
    async fn entry(&mut self, code: &GameCode) -> Result<&mut Room, GameError> {
        if !self.rooms.contains_key(code) {
            let room = self
                .repository
                .get(code)
                .await?
                .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;
            tracing::debug!(shard_id = self.config.shard_id, code = %code, "Room hydrated");
            self.cache(room);
        }

        let now = self.clock.now();
        match self.rooms.get_mut(code) {
            Some(cached) => {
                cached.last_active = now;
                Ok(&mut cached.room)
            }
            None => Err(GameError::RoomNotFound(code.clone())),
        }
    }

    /// Apply `apply` to a copy of the room, persist it, then install it
    async fn mutate<T>(
        &mut self,
        code: &GameCode,
        apply: impl FnOnce(&mut Room) -> Result<T, RoomError>,
    ) -> Result<T, GameError> {
        let mut draft = self.entry(code).await?.clone();
        let value = apply(&mut draft)?;
        self.repository.put(&draft).await?;
        self.cache(draft);
        Ok(value)
    }

    fn cache(&mut self, room: Room) {
        let last_active = self.clock.now();
        self.rooms
            .insert(room.code.clone(), CachedRoom { room, last_active });
        self.rooms_cached.store(self.rooms.len(), Ordering::Relaxed);
    }

    async fn handle_create(&mut self, room: Room) -> Result<(), GameError> {
        let code = room.code.clone();
        if self.rooms.contains_key(&code) || self.repository.get(&code).await?.is_some() {
            return Err(GameError::DuplicateRoom(code));
        }
        self.repository.put(&room).await?;
        self.cache(room);
        Ok(())
    }

    async fn handle_join(
        &mut self,
        code: &GameCode,
        player: PlayerId,
        name: String,
    ) -> Result<bool, GameError> {
        let mut draft = self.entry(code).await?.clone();
        if !draft.join(player.clone(), name.clone())? {
            return Ok(false);
        }
        self.repository
            .union_append(code, RecordAppend::Player { id: player, name })
            .await?;
        self.cache(draft);
        Ok(true)
    }

    async fn handle_begin_start(
        &mut self,
        code: &GameCode,
        requester: &PlayerId,
    ) -> Result<StartTicket, GameError> {
        let room = self.entry(code).await?;
        Ok(room.begin_start(requester)?)
    }

    async fn handle_round_view(
        &mut self,
        code: &GameCode,
        round_id: &RoundId,
        player: &PlayerId,
    ) -> Result<RoundView, GameError> {
        let room = self.entry(code).await?;
        Ok(room.round_view(round_id, player)?)
    }

    async fn handle_check_release(
        &mut self,
        code: &GameCode,
        round_id: &RoundId,
    ) -> Result<Release, GameError> {
        let room = self.entry(code).await?;
        Ok(room.check_release(round_id)?)
    }

    async fn handle_leaderboard(&mut self, code: &GameCode) -> Result<Leaderboard, GameError> {
        Ok(self.entry(code).await?.leaderboard())
    }

    async fn handle_sweep(&mut self, idle_before: Timestamp) -> Result<usize, GameError> {
        let expired: Vec<GameCode> = self
            .rooms
            .iter()
            .filter(|(_, c)| c.last_active < idle_before && !c.room.is_starting())
            .map(|(code, _)| code.clone())
            .collect();

        let mut removed = 0;
        for code in expired {
            match self.repository.delete(&code).await {
                Ok(()) => {
                    self.rooms.remove(&code);
                    removed += 1;
                    tracing::info!(shard_id = self.config.shard_id, code = %code, "Idle room expired");
                }
                Err(e) => {
                    tracing::warn!(
                        shard_id = self.config.shard_id,
                        code = %code,
                        error = %e,
                        "Failed to delete idle room"
                    );
                }
            }
        }
        self.rooms_cached.store(self.rooms.len(), Ordering::Relaxed);
        Ok(removed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShardError {
    #[error("Shard has shutdown")]
    ShardShutdown,

    #[error("Command channel is full")]
    ChannelFull,
}

impl From<ShardError> for GameError {
    fn from(e: ShardError) -> Self {
        GameError::Unavailable(e.to_string())
    }
}

