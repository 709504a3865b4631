use crate::application::GameError;
use crate::domain::{
    GameCode, Leaderboard, PlayerId, Portfolio, PositionId, Release, Room, RoomSummary, Round,
    RoundId, RoundView, StartTicket, Timestamp, TradeOrder,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Serialized access to live rooms.
///
/// Every call on one game code is applied in arrival order against a
/// consistent view of that room. Mutations are durable before they return.
#[async_trait]
pub trait RoomGateway: Send + Sync {
    /// Register a new room; fails with `DuplicateRoom` if the code is taken
    async fn create(&self, room: Room) -> Result<(), GameError>;

    /// Returns true if the player was newly added
    async fn join(&self, code: &GameCode, player: PlayerId, name: String)
    -> Result<bool, GameError>;

    async fn summary(&self, code: &GameCode) -> Result<RoomSummary, GameError>;

    async fn begin_start(
        &self,
        code: &GameCode,
        requester: PlayerId,
    ) -> Result<StartTicket, GameError>;

    async fn commit_start(
        &self,
        code: &GameCode,
        rounds: Vec<Round>,
        starting_cash: Decimal,
    ) -> Result<RoundId, GameError>;

    async fn abort_start(&self, code: &GameCode) -> Result<(), GameError>;

    async fn round_view(
        &self,
        code: &GameCode,
        round_id: RoundId,
        player: PlayerId,
    ) -> Result<RoundView, GameError>;

    async fn trade(
        &self,
        code: &GameCode,
        player: PlayerId,
        order: TradeOrder,
    ) -> Result<Portfolio, GameError>;

    async fn close_position(
        &self,
        code: &GameCode,
        player: PlayerId,
        position_id: PositionId,
        round_id: RoundId,
    ) -> Result<Portfolio, GameError>;

    /// Returns true if this was the player's first completion of the round
    async fn complete_round(
        &self,
        code: &GameCode,
        player: PlayerId,
        round_id: RoundId,
    ) -> Result<bool, GameError>;

    async fn check_release(&self, code: &GameCode, round_id: RoundId)
    -> Result<Release, GameError>;

    async fn leaderboard(&self, code: &GameCode) -> Result<Leaderboard, GameError>;

    /// Evict and delete rooms with no activity since `idle_before`.
    /// Returns the number of rooms removed.
    async fn sweep(&self, idle_before: Timestamp) -> Result<usize, GameError>;
}
