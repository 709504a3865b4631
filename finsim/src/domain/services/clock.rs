use crate::domain::value_objects::Timestamp;

/// Source of wall-clock time for room creation and idle tracking
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
