use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::{IdentityVerifier, RoomGateway, RoundGenerator, StockFeed};
use crate::domain::Clock;

/// Game limits applied by the use cases
#[derive(Debug, Clone, Copy)]
pub struct GameRules {
    pub max_rounds: u32,
    pub starting_cash: Decimal,
}

/// Application state shared across handlers
pub struct AppState {
    pub rooms: Arc<dyn RoomGateway>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub stock_feed: Arc<dyn StockFeed>,
    pub generator: Arc<RoundGenerator>,
    pub clock: Arc<dyn Clock>,
    pub rules: GameRules,
}

impl AppState {
    pub fn new(
        rooms: Arc<dyn RoomGateway>,
        identity: Arc<dyn IdentityVerifier>,
        stock_feed: Arc<dyn StockFeed>,
        generator: Arc<RoundGenerator>,
        clock: Arc<dyn Clock>,
        rules: GameRules,
    ) -> Self {
        AppState {
            rooms,
            identity,
            stock_feed,
            generator,
            clock,
            rules,
        }
    }
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ping", get(handlers::ping))
        .route("/api/stocks/top", get(handlers::top_stocks))
        // Lobby
        .route("/api/rooms", post(handlers::create_room))
        .route("/api/rooms/{code}", get(handlers::get_room))
        .route("/api/rooms/{code}/join", post(handlers::join_room))
        .route("/api/rooms/{code}/start", post(handlers::start_game))
        .route("/api/rooms/{code}/status", get(handlers::game_status))
        .route("/api/rooms/{code}/leaderboard", get(handlers::leaderboard))
        // Play
        .route("/api/rooms/{code}/trades", post(handlers::trade))
        .route(
            "/api/rooms/{code}/positions/{position_id}/close",
            post(handlers::close_position),
        )
        .route(
            "/api/rooms/{code}/rounds/{round_id}",
            get(handlers::round_view),
        )
        .route(
            "/api/rooms/{code}/rounds/{round_id}/complete",
            post(handlers::complete_round),
        )
        .route(
            "/api/rooms/{code}/rounds/{round_id}/completion",
            get(handlers::round_completion),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Route table printed on startup
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/ping"),
    ("GET", "/api/stocks/top?n="),
    ("POST", "/api/rooms"),
    ("GET", "/api/rooms/{code}"),
    ("POST", "/api/rooms/{code}/join"),
    ("POST", "/api/rooms/{code}/start"),
    ("GET", "/api/rooms/{code}/status"),
    ("GET", "/api/rooms/{code}/leaderboard"),
    ("POST", "/api/rooms/{code}/trades"),
    ("POST", "/api/rooms/{code}/positions/{position_id}/close"),
    ("GET", "/api/rooms/{code}/rounds/{round_id}"),
    ("POST", "/api/rooms/{code}/rounds/{round_id}/complete"),
    ("GET", "/api/rooms/{code}/rounds/{round_id}/completion"),
];
