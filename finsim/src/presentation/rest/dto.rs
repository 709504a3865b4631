use crate::application::{CompletionStatus, GameStatus, StockQuote};
use crate::domain::{Portfolio, RoundId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub code: String,
    pub rounds: u32,
    pub seconds_per_round: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub ticker: String,
    pub direction: String,
    pub amount: i64,
    pub round_index: usize,
    pub round_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionRequest {
    pub round_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TopStocksQuery {
    pub n: Option<usize>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PingResponse {}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub code: String,
    pub joined: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    pub first_round_id: RoundId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusResponse {
    pub game_code: String,
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_id: Option<RoundId>,
}

impl From<GameStatus> for GameStatusResponse {
    fn from(status: GameStatus) -> Self {
        GameStatusResponse {
            game_code: status.code.to_string(),
            started: status.started,
            round_id: status.round_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub ticker: String,
    pub price: Decimal,
}

impl From<StockQuote> for StockResponse {
    fn from(quote: StockQuote) -> Self {
        StockResponse {
            ticker: quote.ticker.to_string(),
            price: quote.last_close,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub portfolio: Portfolio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRoundResponse {
    pub ack: bool,
    pub round_id: RoundId,
    pub first_completion: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub released: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_round_id: Option<RoundId>,
    pub terminal: bool,
    pub remaining: usize,
}

impl From<CompletionStatus> for CompletionResponse {
    fn from(status: CompletionStatus) -> Self {
        CompletionResponse {
            released: status.released,
            next_round_id: status.next_round_id,
            terminal: status.terminal,
            remaining: status.remaining,
        }
    }
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub category: String,
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, category: impl Into<String>, msg: impl Into<String>) -> Self {
        ErrorResponse {
            code: code.into(),
            category: category.into(),
            msg: msg.into(),
        }
    }
}
