mod error;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use error::{ErrorCategory, GameError};
pub use ports::{
    AuthError, IdentityVerifier, NewsOracle, OracleError, PriceAssessment, PricingOracle,
    RecordAppend, RoomGateway, RoomRepository, StockFeed, StockQuote, StoreError,
};
pub use services::{GenerationError, GeneratorConfig, RoundGenerator};
pub use use_cases::{
    CheckRoundCompletionUseCase, ClosePositionCommand, ClosePositionUseCase, CompleteRoundResult,
    CompleteRoundUseCase, CompletionStatus, CreateRoomCommand, CreateRoomUseCase, GameStatus,
    GetGameStatusUseCase, GetLeaderboardUseCase, GetRoomUseCase, GetRoundViewUseCase,
    GetTopStocksUseCase, JoinRoomResult, JoinRoomUseCase, StartGameResult, StartGameUseCase,
    TradeCommand, TradeUseCase,
};
