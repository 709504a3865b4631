use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters a round id is drawn from
pub const ROUND_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every round id
pub const ROUND_ID_LEN: usize = 6;

/// Six-character round code. Unique within a room's sequence only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoundId(String);

impl RoundId {
    pub fn new(value: impl Into<String>) -> Result<Self, &'static str> {
        let s: String = value.into();
        if s.len() != ROUND_ID_LEN {
            return Err("Round id must be 6 characters");
        }
        if !s.bytes().all(|b| ROUND_ID_ALPHABET.contains(&b)) {
            return Err("Round id must use uppercase letters and digits");
        }
        Ok(RoundId(s))
    }

    /// Draw a fresh id from the alphabet
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..ROUND_ID_LEN)
            .map(|_| ROUND_ID_ALPHABET[rng.gen_range(0..ROUND_ID_ALPHABET.len())] as char)
            .collect();
        RoundId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for RoundId {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RoundId::new(value)
    }
}

impl TryFrom<String> for RoundId {
    type Error = &'static str;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoundId::new(value)
    }
}

impl From<RoundId> for String {
    fn from(id: RoundId) -> String {
        id.0
    }
}
