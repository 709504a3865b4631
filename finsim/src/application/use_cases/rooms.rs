use super::parse_code;
use crate::application::GameError;
use crate::application::ports::{IdentityVerifier, RoomGateway};
use crate::domain::{Clock, Difficulty, GameCode, Room, RoomConfig, RoomSummary, RoundId};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateRoomCommand {
    pub code: String,
    pub rounds: u32,
    pub seconds_per_round: u32,
    pub difficulty: Option<String>,
}

pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
    clock: Arc<dyn Clock>,
    max_rounds: u32,
}

impl CreateRoomUseCase {
    pub fn new(
        rooms: Arc<dyn RoomGateway>,
        identity: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
        max_rounds: u32,
    ) -> Self {
        Self {
            rooms,
            identity,
            clock,
            max_rounds,
        }
    }

    pub async fn execute(&self, token: &str, command: CreateRoomCommand) -> Result<GameCode, GameError> {
        let owner = self.identity.verify(token).await?;
        let code = parse_code(&command.code)?;

        let difficulty = match command.difficulty.as_deref() {
            Some(d) => Difficulty::try_from(d).map_err(|e| GameError::invalid("difficulty", e))?,
            None => Difficulty::default(),
        };
        let config = RoomConfig {
            rounds: command.rounds,
            seconds_per_round: command.seconds_per_round,
            difficulty,
        };
        config.validate(self.max_rounds)?;

        let name = self.identity.display_name(&owner).await;
        let room = Room::new(code.clone(), config, owner.clone(), name, self.clock.now());
        self.rooms.create(room).await?;

        tracing::info!(code = %code, owner = %owner, "Room created");
        Ok(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRoomResult {
    pub code: GameCode,
    /// False when the player was already in the room
    pub joined: bool,
}

pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
}

impl JoinRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { rooms, identity }
    }

    pub async fn execute(&self, token: &str, code: &str) -> Result<JoinRoomResult, GameError> {
        let player = self.identity.verify(token).await?;
        let code = parse_code(code)?;
        let name = self.identity.display_name(&player).await;

        let joined = self.rooms.join(&code, player.clone(), name).await?;
        if joined {
            tracing::info!(code = %code, player = %player, "Player joined");
        }
        Ok(JoinRoomResult { code, joined })
    }
}

pub struct GetRoomUseCase {
    rooms: Arc<dyn RoomGateway>,
}

impl GetRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, code: &str) -> Result<RoomSummary, GameError> {
        let code = parse_code(code)?;
        self.rooms.summary(&code).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    pub code: GameCode,
    pub started: bool,
    /// First round of the game, once started
    pub round_id: Option<RoundId>,
}

pub struct GetGameStatusUseCase {
    rooms: Arc<dyn RoomGateway>,
}

impl GetGameStatusUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, code: &str) -> Result<GameStatus, GameError> {
        let code = parse_code(code)?;
        let summary = self.rooms.summary(&code).await?;
        Ok(GameStatus {
            code,
            started: summary.started,
            round_id: summary.first_round_id,
        })
    }
}
