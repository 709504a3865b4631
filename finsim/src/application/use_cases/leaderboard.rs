use super::parse_code;
use crate::application::GameError;
use crate::application::ports::RoomGateway;
use crate::domain::Leaderboard;
use std::sync::Arc;

pub struct GetLeaderboardUseCase {
    rooms: Arc<dyn RoomGateway>,
}

impl GetLeaderboardUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, code: &str) -> Result<Leaderboard, GameError> {
        let code = parse_code(code)?;
        self.rooms.leaderboard(&code).await
    }
}
