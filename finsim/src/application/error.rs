use super::ports::{AuthError, OracleError, StoreError};
use super::services::GenerationError;
use crate::domain::{GameCode, LedgerError, RoomError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`GameError`], stable across variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Validation,
    Auth,
    NotFound,
    Conflict,
    Upstream,
    InsufficientFunds,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Validation => "VALIDATION",
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::Conflict => "CONFLICT",
            ErrorCategory::Upstream => "UPSTREAM",
            ErrorCategory::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCategory::Internal => "INTERNAL",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Room not found: {0}")]
    RoomNotFound(GameCode),

    #[error("Room already exists: {0}")]
    DuplicateRoom(GameCode),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Room service unavailable: {0}")]
    Unavailable(String),
}

impl GameError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GameError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GameError::InvalidInput { .. } => ErrorCategory::Validation,
            GameError::Auth(AuthError::InvalidToken) => ErrorCategory::Auth,
            GameError::Auth(AuthError::Unavailable(_)) => ErrorCategory::Upstream,
            GameError::RoomNotFound(_) => ErrorCategory::NotFound,
            GameError::DuplicateRoom(_) => ErrorCategory::Conflict,
            GameError::Room(e) => room_category(e),
            GameError::Generation(_) | GameError::Oracle(_) => ErrorCategory::Upstream,
            GameError::Store(_) | GameError::Unavailable(_) => ErrorCategory::Internal,
        }
    }

    /// Machine-readable code, unique per failure kind
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidInput { .. } => "INVALID_INPUT",
            GameError::Auth(AuthError::InvalidToken) => "INVALID_TOKEN",
            GameError::Auth(AuthError::Unavailable(_)) => "IDENTITY_UNAVAILABLE",
            GameError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            GameError::DuplicateRoom(_) => "DUPLICATE_ROOM",
            GameError::Room(e) => match e {
                RoomError::InvalidConfig(_) => "INVALID_CONFIG",
                RoomError::NotAuthorized(_) => "NOT_AUTHORIZED",
                RoomError::Forbidden(_) => "FORBIDDEN",
                RoomError::AlreadyStarted => "ALREADY_STARTED",
                RoomError::StartInProgress => "START_IN_PROGRESS",
                RoomError::NotStarted => "NOT_STARTED",
                RoomError::RoundNotFound(_) => "ROUND_NOT_FOUND",
                RoomError::StaleRound { .. } => "STALE_ROUND",
                RoomError::TickerNotFound(_) => "TICKER_NOT_FOUND",
                RoomError::RoundCountMismatch { .. } => "ROUND_COUNT_MISMATCH",
                RoomError::Ledger(LedgerError::InvalidShares(_)) => "INVALID_SHARES",
                RoomError::Ledger(LedgerError::InsufficientFunds { .. }) => "INSUFFICIENT_FUNDS",
                RoomError::Ledger(LedgerError::PositionNotFound(_)) => "POSITION_NOT_FOUND",
                RoomError::Ledger(LedgerError::PortfolioNotFound(_)) => "PORTFOLIO_NOT_FOUND",
            },
            GameError::Generation(e) if e.is_timeout() => "UPSTREAM_TIMEOUT",
            GameError::Generation(_) | GameError::Oracle(_) => "UPSTREAM_FAILURE",
            GameError::Store(_) => "STORE_FAILURE",
            GameError::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Whether an upstream failure was a timeout rather than an error reply
    pub fn is_timeout(&self) -> bool {
        matches!(self, GameError::Generation(e) if e.is_timeout())
    }
}

fn room_category(error: &RoomError) -> ErrorCategory {
    match error {
        RoomError::InvalidConfig(_) => ErrorCategory::Validation,
        RoomError::NotAuthorized(_) | RoomError::Forbidden(_) => ErrorCategory::Auth,
        RoomError::AlreadyStarted
        | RoomError::StartInProgress
        | RoomError::NotStarted
        | RoomError::StaleRound { .. } => ErrorCategory::Conflict,
        RoomError::RoundNotFound(_) | RoomError::TickerNotFound(_) => ErrorCategory::NotFound,
        RoomError::RoundCountMismatch { .. } => ErrorCategory::Internal,
        RoomError::Ledger(e) => match e {
            LedgerError::InvalidShares(_) => ErrorCategory::Validation,
            LedgerError::InsufficientFunds { .. } => ErrorCategory::InsufficientFunds,
            LedgerError::PositionNotFound(_) | LedgerError::PortfolioNotFound(_) => {
                ErrorCategory::NotFound
            }
        },
    }
}

impl From<LedgerError> for GameError {
    fn from(e: LedgerError) -> Self {
        GameError::Room(RoomError::Ledger(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerId, RoundId};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_categories() {
        let code = GameCode::new("ROOM").unwrap();
        assert_eq!(
            GameError::invalid("code", "empty").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            GameError::from(AuthError::InvalidToken).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            GameError::from(RoomError::NotAuthorized(PlayerId::new("x"))).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            GameError::RoomNotFound(code.clone()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            GameError::DuplicateRoom(code).category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            GameError::from(RoomError::StaleRound {
                index: 1,
                round_id: RoundId::new("AAAAAA").unwrap()
            })
            .category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            GameError::from(LedgerError::InsufficientFunds {
                required: dec!(2),
                available: dec!(1)
            })
            .category(),
            ErrorCategory::InsufficientFunds
        );
        assert_eq!(
            GameError::Unavailable("shard".into()).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_timeout_code() {
        let err = GameError::from(GenerationError::Timeout {
            operation: "pricing",
            after: Duration::from_millis(10),
        });
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.code(), "UPSTREAM_TIMEOUT");
        assert!(err.is_timeout());

        let err = GameError::from(GenerationError::Oracle {
            operation: "news",
            source: OracleError::Unavailable("down".into()),
        });
        assert_eq!(err.code(), "UPSTREAM_FAILURE");
    }
}
