use crate::application::ports::{AuthError, IdentityVerifier};
use crate::domain::PlayerId;
use crate::infrastructure::config::PlayerConfig;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Identity verifier backed by a fixed token table.
///
/// Tokens of the form `dev:<player>` are accepted as well when
/// `allow_dev_tokens` is on, so a local server can be used without setup.
pub struct StaticTokenVerifier {
    tokens: Arc<DashMap<String, PlayerId>>,
    names: Arc<DashMap<PlayerId, String>>,
    allow_dev_tokens: bool,
}

const DEV_TOKEN_PREFIX: &str = "dev:";

impl StaticTokenVerifier {
    pub fn new() -> Self {
        StaticTokenVerifier {
            tokens: Arc::new(DashMap::new()),
            names: Arc::new(DashMap::new()),
            allow_dev_tokens: false,
        }
    }

    pub fn with_dev_tokens(mut self, allow: bool) -> Self {
        self.allow_dev_tokens = allow;
        self
    }

    pub fn from_config(players: &[PlayerConfig]) -> Self {
        let verifier = Self::new();
        for p in players {
            verifier.register(&p.token, PlayerId::new(p.player_id.as_str()), &p.display_name);
        }
        verifier
    }

    pub fn register(&self, token: &str, player: PlayerId, display_name: &str) {
        if !display_name.is_empty() {
            self.names.insert(player.clone(), display_name.to_string());
        }
        self.tokens.insert(token.to_string(), player);
    }
}

impl Default for StaticTokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<PlayerId, AuthError> {
        if let Some(player) = self.tokens.get(token) {
            return Ok(player.value().clone());
        }
        match token.strip_prefix(DEV_TOKEN_PREFIX) {
            Some(player) if self.allow_dev_tokens && !player.is_empty() => {
                Ok(PlayerId::new(player))
            }
            _ => Err(AuthError::InvalidToken),
        }
    }

    async fn display_name(&self, player: &PlayerId) -> String {
        self.names
            .get(player)
            .map(|n| n.value().clone())
            .unwrap_or_else(|| player.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_tokens() {
        let verifier = StaticTokenVerifier::from_config(&[PlayerConfig {
            token: "secret".to_string(),
            player_id: "alice".to_string(),
            display_name: "Alice".to_string(),
        }]);

        let player = verifier.verify("secret").await.unwrap();
        assert_eq!(player, PlayerId::new("alice"));
        assert_eq!(verifier.display_name(&player).await, "Alice");
        assert_eq!(verifier.verify("nope").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_dev_tokens() {
        let strict = StaticTokenVerifier::new();
        assert_eq!(strict.verify("dev:bob").await, Err(AuthError::InvalidToken));

        let relaxed = StaticTokenVerifier::new().with_dev_tokens(true);
        let bob = relaxed.verify("dev:bob").await.unwrap();
        assert_eq!(bob.as_str(), "bob");
        assert_eq!(relaxed.display_name(&bob).await, "bob");
        assert_eq!(relaxed.verify("dev:").await, Err(AuthError::InvalidToken));
    }
}
