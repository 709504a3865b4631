use crate::application::GameError;
use crate::domain::{
    GameCode, Leaderboard, PlayerId, Portfolio, PositionId, Release, Room, RoomSummary, Round,
    RoundId, RoundView, StartTicket, Timestamp, TradeOrder,
};
use rust_decimal::Decimal;
use tokio::sync::oneshot;

/// Reply channel carried by every room command
pub type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands that can be sent to a room shard
#[derive(Debug)]
pub enum RoomCommand {
    /// Register and persist a new room
    Create {
        room: Box<Room>,
        response: Reply<()>,
    },

    Join {
        code: GameCode,
        player: PlayerId,
        name: String,
        response: Reply<bool>,
    },

    Summary {
        code: GameCode,
        response: Reply<RoomSummary>,
    },

    /// Reserve the start transition; not persisted
    BeginStart {
        code: GameCode,
        requester: PlayerId,
        response: Reply<StartTicket>,
    },

    CommitStart {
        code: GameCode,
        rounds: Vec<Round>,
        starting_cash: Decimal,
        response: Reply<RoundId>,
    },

    AbortStart {
        code: GameCode,
        response: Reply<()>,
    },

    RoundView {
        code: GameCode,
        round_id: RoundId,
        player: PlayerId,
        response: Reply<RoundView>,
    },

    Trade {
        code: GameCode,
        player: PlayerId,
        order: TradeOrder,
        response: Reply<Portfolio>,
    },

    ClosePosition {
        code: GameCode,
        player: PlayerId,
        position_id: PositionId,
        round_id: RoundId,
        response: Reply<Portfolio>,
    },

    CompleteRound {
        code: GameCode,
        player: PlayerId,
        round_id: RoundId,
        response: Reply<bool>,
    },

    CheckRelease {
        code: GameCode,
        round_id: RoundId,
        response: Reply<Release>,
    },

    Leaderboard {
        code: GameCode,
        response: Reply<Leaderboard>,
    },

    /// Evict and delete cached rooms idle since before `idle_before`
    Sweep {
        idle_before: Timestamp,
        response: Reply<usize>,
    },

    /// Shutdown the shard
    Shutdown,
}

/// Statistics for a shard
#[derive(Debug, Clone, Default)]
pub struct ShardStats {
    pub shard_id: usize,
    pub rooms_cached: usize,
    pub commands_processed: u64,
    pub commands_in_queue: usize,
}
