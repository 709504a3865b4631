use serde::{Deserialize, Serialize};
use std::fmt;

/// Player-chosen identifier of a room
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameCode(String);

impl GameCode {
    pub const MAX_LEN: usize = 32;

    pub fn new(value: impl Into<String>) -> Result<Self, &'static str> {
        let s: String = value.into();
        let s = s.trim();
        if s.is_empty() {
            return Err("Game code cannot be empty");
        }
        if s.len() > Self::MAX_LEN {
            return Err("Game code too long (max 32 chars)");
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err("Game code must be alphanumeric, '-' or '_'");
        }
        Ok(GameCode(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GameCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for GameCode {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        GameCode::new(value)
    }
}

impl TryFrom<String> for GameCode {
    type Error = &'static str;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        GameCode::new(value)
    }
}

impl From<GameCode> for String {
    fn from(code: GameCode) -> String {
        code.0
    }
}
