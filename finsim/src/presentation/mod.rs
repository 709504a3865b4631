pub mod rest;

pub use rest::{ApiError, AppState, GameRules, ROUTES, create_router};
