mod leaderboard;
mod rooms;
mod rounds;
mod start_game;
mod stocks;
mod trading;

pub use leaderboard::GetLeaderboardUseCase;
pub use rooms::{
    CreateRoomCommand, CreateRoomUseCase, GameStatus, GetGameStatusUseCase, GetRoomUseCase,
    JoinRoomResult, JoinRoomUseCase,
};
pub use rounds::{
    CheckRoundCompletionUseCase, CompleteRoundResult, CompleteRoundUseCase, CompletionStatus,
    GetRoundViewUseCase,
};
pub use start_game::{StartGameResult, StartGameUseCase};
pub use stocks::{DEFAULT_TOP_STOCKS, GetTopStocksUseCase, MAX_TOP_STOCKS};
pub use trading::{ClosePositionCommand, ClosePositionUseCase, TradeCommand, TradeUseCase};

use crate::application::GameError;
use crate::domain::{GameCode, RoundId};

pub(crate) fn parse_code(code: &str) -> Result<GameCode, GameError> {
    GameCode::new(code).map_err(|e| GameError::invalid("code", e))
}

pub(crate) fn parse_round_id(round_id: &str) -> Result<RoundId, GameError> {
    RoundId::new(round_id).map_err(|e| GameError::invalid("roundId", e))
}
