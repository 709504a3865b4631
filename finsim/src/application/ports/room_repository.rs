use crate::domain::{GameCode, PlayerId, Room};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Room document not found: {0}")]
    Missing(GameCode),

    #[error("Corrupt room document {code}: {reason}")]
    Corrupt { code: GameCode, reason: String },
}

/// Set-like additions applied to a stored room without rewriting it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAppend {
    Player { id: PlayerId, name: String },
}

/// Durable storage of room documents keyed by game code
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn get(&self, code: &GameCode) -> Result<Option<Room>, StoreError>;

    /// Insert or replace the whole document
    async fn put(&self, room: &Room) -> Result<(), StoreError>;

    /// Append to the stored document; appending an existing element is a no-op
    async fn union_append(&self, code: &GameCode, record: RecordAppend) -> Result<(), StoreError>;

    async fn delete(&self, code: &GameCode) -> Result<(), StoreError>;
}
