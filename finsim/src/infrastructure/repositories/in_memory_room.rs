use crate::application::ports::{RecordAppend, RoomRepository, StoreError};
use crate::domain::{GameCode, Room};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory document store for rooms.
///
/// Rooms are kept as JSON documents so only persisted state survives a
/// round trip, the same as with a remote store.
pub struct InMemoryRoomRepository {
    documents: Arc<DashMap<GameCode, Value>>,
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        InMemoryRoomRepository {
            documents: Arc::new(DashMap::new()),
            reject_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every write fail with `Unavailable` until switched back
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes rejected".to_string()))
        } else {
            Ok(())
        }
    }

    fn decode(code: &GameCode, document: Value) -> Result<Room, StoreError> {
        serde_json::from_value(document).map_err(|e| StoreError::Corrupt {
            code: code.clone(),
            reason: e.to_string(),
        })
    }

    fn encode(room: &Room) -> Result<Value, StoreError> {
        serde_json::to_value(room).map_err(|e| StoreError::Corrupt {
            code: room.code.clone(),
            reason: e.to_string(),
        })
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryRoomRepository {
    fn clone(&self) -> Self {
        InMemoryRoomRepository {
            documents: Arc::clone(&self.documents),
            reject_writes: Arc::clone(&self.reject_writes),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get(&self, code: &GameCode) -> Result<Option<Room>, StoreError> {
        let document = self.documents.get(code).map(|d| d.value().clone());
        document.map(|d| Self::decode(code, d)).transpose()
    }

    async fn put(&self, room: &Room) -> Result<(), StoreError> {
        self.check_writable()?;
        let document = Self::encode(room)?;
        self.documents.insert(room.code.clone(), document);
        Ok(())
    }

    async fn union_append(&self, code: &GameCode, record: RecordAppend) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut entry = self
            .documents
            .get_mut(code)
            .ok_or_else(|| StoreError::Missing(code.clone()))?;

        let mut room = Self::decode(code, entry.value().clone())?;
        match record {
            RecordAppend::Player { id, name } => {
                room.join(id, name).map_err(|e| StoreError::Corrupt {
                    code: code.clone(),
                    reason: e.to_string(),
                })?;
            }
        }
        *entry.value_mut() = Self::encode(&room)?;
        Ok(())
    }

    async fn delete(&self, code: &GameCode) -> Result<(), StoreError> {
        self.check_writable()?;
        self.documents.remove(code);
        Ok(())
    }
}
