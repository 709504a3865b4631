mod direction;
mod game_code;
mod player_id;
mod round_id;
mod ticker;

pub use direction::Direction;
pub use game_code::GameCode;
pub use player_id::PlayerId;
pub use round_id::{ROUND_ID_ALPHABET, ROUND_ID_LEN, RoundId};
pub use ticker::Ticker;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub type Timestamp = DateTime<Utc>;
pub type PositionId = Uuid;

/// Round a money amount or indicator to cents
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}
