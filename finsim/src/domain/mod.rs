pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::{
    CompletionBarrier, Difficulty, HeadlineEffect, HistoryPoint, Leaderboard, LeaderboardEntry,
    Ledger, LedgerError, MacroIndicators, Portfolio, Position, Release, Room, RoomConfig,
    RoomError, RoomPhase, RoomSummary, Round, RoundSnapshot, RoundView, Sentiment, StartTicket, StockSnapshot,
    StockView, TradeOrder,
};
pub use services::Clock;
pub use value_objects::{
    Direction, GameCode, PlayerId, PositionId, ROUND_ID_ALPHABET, ROUND_ID_LEN, RoundId, Ticker,
    Timestamp, round2,
};
