use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, header::AUTHORIZATION},
};
use std::sync::Arc;

use crate::application::{
    CheckRoundCompletionUseCase, ClosePositionCommand, ClosePositionUseCase, CompleteRoundUseCase,
    CreateRoomCommand, CreateRoomUseCase, GetGameStatusUseCase, GetLeaderboardUseCase,
    GetRoomUseCase, GetRoundViewUseCase, GetTopStocksUseCase, JoinRoomUseCase, StartGameUseCase,
    TradeCommand, TradeUseCase,
};
use crate::domain::{Leaderboard, RoomSummary, RoundView};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// GET /api/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {})
}

// ============================================================================
// Rooms
// ============================================================================

/// POST /api/rooms
pub async fn create_room(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let Json(req) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let use_case = CreateRoomUseCase::new(
        Arc::clone(&state.rooms),
        Arc::clone(&state.identity),
        Arc::clone(&state.clock),
        state.rules.max_rounds,
    );
    let code = use_case
        .execute(
            token,
            CreateRoomCommand {
                code: req.code,
                rounds: req.rounds,
                seconds_per_round: req.seconds_per_round,
                difficulty: req.difficulty,
            },
        )
        .await?;

    Ok(Json(CreateRoomResponse {
        code: code.to_string(),
    }))
}

/// GET /api/rooms/{code}
pub async fn get_room(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoomSummary>, ApiError> {
    let use_case = GetRoomUseCase::new(Arc::clone(&state.rooms));
    Ok(Json(use_case.execute(&code).await?))
}

/// POST /api/rooms/{code}/join
pub async fn join_room(
    headers: HeaderMap,
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<JoinRoomResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let use_case = JoinRoomUseCase::new(Arc::clone(&state.rooms), Arc::clone(&state.identity));
    let result = use_case.execute(token, &code).await?;

    Ok(Json(JoinRoomResponse {
        code: result.code.to_string(),
        joined: result.joined,
    }))
}

/// POST /api/rooms/{code}/start
pub async fn start_game(
    headers: HeaderMap,
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StartGameResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let use_case = StartGameUseCase::new(
        Arc::clone(&state.rooms),
        Arc::clone(&state.identity),
        Arc::clone(&state.generator),
        state.rules.starting_cash,
    );
    let result = use_case.execute(token, &code).await?;

    Ok(Json(StartGameResponse {
        first_round_id: result.first_round_id,
    }))
}

/// GET /api/rooms/{code}/status
pub async fn game_status(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameStatusResponse>, ApiError> {
    let use_case = GetGameStatusUseCase::new(Arc::clone(&state.rooms));
    Ok(Json(use_case.execute(&code).await?.into()))
}

/// GET /api/rooms/{code}/leaderboard
pub async fn leaderboard(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Leaderboard>, ApiError> {
    let use_case = GetLeaderboardUseCase::new(Arc::clone(&state.rooms));
    Ok(Json(use_case.execute(&code).await?))
}

// ============================================================================
// Market data
// ============================================================================

/// GET /api/stocks/top?n=
pub async fn top_stocks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopStocksQuery>, QueryRejection>,
) -> Result<Json<Vec<StockResponse>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::invalid_body(e.body_text()))?;
    let use_case = GetTopStocksUseCase::new(Arc::clone(&state.stock_feed));
    let quotes = use_case.execute(query.n).await?;
    Ok(Json(quotes.into_iter().map(StockResponse::from).collect()))
}

// ============================================================================
// Trading
// ============================================================================

/// POST /api/rooms/{code}/trades
pub async fn trade(
    headers: HeaderMap,
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let Json(req) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let use_case = TradeUseCase::new(Arc::clone(&state.rooms), Arc::clone(&state.identity));
    let portfolio = use_case
        .execute(
            token,
            TradeCommand {
                code,
                ticker: req.ticker,
                direction: req.direction,
                amount: req.amount,
                round_index: req.round_index,
                round_id: req.round_id,
            },
        )
        .await?;

    Ok(Json(PortfolioResponse { portfolio }))
}

/// POST /api/rooms/{code}/positions/{position_id}/close
pub async fn close_position(
    headers: HeaderMap,
    Path((code, position_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClosePositionRequest>, JsonRejection>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let Json(req) = payload.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let use_case =
        ClosePositionUseCase::new(Arc::clone(&state.rooms), Arc::clone(&state.identity));
    let portfolio = use_case
        .execute(
            token,
            ClosePositionCommand {
                code,
                position_id,
                round_id: req.round_id,
            },
        )
        .await?;

    Ok(Json(PortfolioResponse { portfolio }))
}

// ============================================================================
// Rounds
// ============================================================================

/// GET /api/rooms/{code}/rounds/{round_id}
pub async fn round_view(
    headers: HeaderMap,
    Path((code, round_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoundView>, ApiError> {
    let token = bearer_token(&headers)?;
    let use_case = GetRoundViewUseCase::new(Arc::clone(&state.rooms), Arc::clone(&state.identity));
    Ok(Json(use_case.execute(token, &code, &round_id).await?))
}

/// POST /api/rooms/{code}/rounds/{round_id}/complete
pub async fn complete_round(
    headers: HeaderMap,
    Path((code, round_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompleteRoundResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    let use_case =
        CompleteRoundUseCase::new(Arc::clone(&state.rooms), Arc::clone(&state.identity));
    let result = use_case.execute(token, &code, &round_id).await?;

    Ok(Json(CompleteRoundResponse {
        ack: true,
        round_id: result.round_id,
        first_completion: result.first_completion,
    }))
}

/// GET /api/rooms/{code}/rounds/{round_id}/completion
pub async fn round_completion(
    Path((code, round_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let use_case = CheckRoundCompletionUseCase::new(Arc::clone(&state.rooms));
    Ok(Json(use_case.execute(&code, &round_id).await?.into()))
}

// ============================================================================
// Helpers
// ============================================================================

/// Bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(ApiError::missing_token)
}
