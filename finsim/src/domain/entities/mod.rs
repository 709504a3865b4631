mod barrier;
mod ledger;
mod portfolio;
mod room;
mod round;

pub use barrier::{CompletionBarrier, Release};
pub use ledger::Ledger;
pub use portfolio::{LedgerError, Portfolio, Position};
pub use room::{
    Difficulty, HistoryPoint, Leaderboard, LeaderboardEntry, Room, RoomConfig, RoomError,
    RoomPhase, RoomSummary, RoundSnapshot, RoundView, StartTicket, StockView, TradeOrder,
};
pub use round::{HeadlineEffect, MacroIndicators, Round, Sentiment, StockSnapshot};
