use serde::{Deserialize, Serialize};
use std::fmt;

/// Stock ticker symbol, stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(value: impl Into<String>) -> Result<Self, &'static str> {
        let s: String = value.into();
        if s.is_empty() {
            return Err("Ticker cannot be empty");
        }
        if s.len() > 10 {
            return Err("Ticker too long (max 10 chars)");
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
            return Err("Ticker must be alphanumeric");
        }
        Ok(Ticker(s.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Ticker {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ticker::new(value)
    }
}

impl TryFrom<String> for Ticker {
    type Error = &'static str;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> String {
        ticker.0
    }
}
