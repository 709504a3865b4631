use crate::domain::PlayerId;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired identity token")]
    InvalidToken,

    #[error("Identity service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves caller tokens to player identities
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token and return the player it belongs to
    async fn verify(&self, token: &str) -> Result<PlayerId, AuthError>;

    /// Name shown to other players in the room
    async fn display_name(&self, player: &PlayerId) -> String;
}
