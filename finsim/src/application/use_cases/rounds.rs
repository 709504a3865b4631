use super::{parse_code, parse_round_id};
use crate::application::GameError;
use crate::application::ports::{IdentityVerifier, RoomGateway};
use crate::domain::{Release, RoundId, RoundView};
use std::sync::Arc;

pub struct GetRoundViewUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
}

impl GetRoundViewUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { rooms, identity }
    }

    pub async fn execute(&self, token: &str, code: &str, round_id: &str) -> Result<RoundView, GameError> {
        let player = self.identity.verify(token).await?;
        let code = parse_code(code)?;
        let round_id = parse_round_id(round_id)?;
        self.rooms.round_view(&code, round_id, player).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteRoundResult {
    pub round_id: RoundId,
    /// False for a repeated completion
    pub first_completion: bool,
}

pub struct CompleteRoundUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
}

impl CompleteRoundUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { rooms, identity }
    }

    pub async fn execute(
        &self,
        token: &str,
        code: &str,
        round_id: &str,
    ) -> Result<CompleteRoundResult, GameError> {
        let player = self.identity.verify(token).await?;
        let code = parse_code(code)?;
        let round_id = parse_round_id(round_id)?;

        let first_completion = self
            .rooms
            .complete_round(&code, player.clone(), round_id.clone())
            .await?;
        if first_completion {
            tracing::debug!(code = %code, player = %player, round = %round_id, "Round completed");
        }
        Ok(CompleteRoundResult {
            round_id,
            first_completion,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStatus {
    pub released: bool,
    pub next_round_id: Option<RoundId>,
    pub terminal: bool,
    /// Players still to complete the round
    pub remaining: usize,
}

impl From<Release> for CompletionStatus {
    fn from(release: Release) -> Self {
        match release {
            Release::Pending { remaining, .. } => CompletionStatus {
                released: false,
                next_round_id: None,
                terminal: false,
                remaining,
            },
            Release::Next(next) => CompletionStatus {
                released: true,
                next_round_id: Some(next),
                terminal: false,
                remaining: 0,
            },
            Release::Terminal => CompletionStatus {
                released: true,
                next_round_id: None,
                terminal: true,
                remaining: 0,
            },
        }
    }
}

/// Poll target for clients waiting on the other players
pub struct CheckRoundCompletionUseCase {
    rooms: Arc<dyn RoomGateway>,
}

impl CheckRoundCompletionUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, code: &str, round_id: &str) -> Result<CompletionStatus, GameError> {
        let code = parse_code(code)?;
        let round_id = parse_round_id(round_id)?;
        Ok(self.rooms.check_release(&code, round_id).await?.into())
    }
}
