use super::parse_code;
use crate::application::GameError;
use crate::application::ports::{IdentityVerifier, RoomGateway};
use crate::application::services::RoundGenerator;
use crate::domain::{GameCode, PlayerId, RoundId};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartGameResult {
    pub code: GameCode,
    pub first_round_id: RoundId,
}

/// Owner-only transition from lobby to play.
///
/// The room is reserved first so concurrent starts fail fast, rounds are
/// generated outside the room's serialization boundary, and the reservation
/// is committed or released afterwards. A failed start leaves the room in
/// the lobby, ready to be started again.
pub struct StartGameUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
    generator: Arc<RoundGenerator>,
    starting_cash: Decimal,
}

impl StartGameUseCase {
    pub fn new(
        rooms: Arc<dyn RoomGateway>,
        identity: Arc<dyn IdentityVerifier>,
        generator: Arc<RoundGenerator>,
        starting_cash: Decimal,
    ) -> Self {
        Self {
            rooms,
            identity,
            generator,
            starting_cash,
        }
    }

    pub async fn execute(&self, token: &str, code: &str) -> Result<StartGameResult, GameError> {
        let requester = self.identity.verify(token).await?;
        let code = parse_code(code)?;

        // The reservation must always end in commit or abort, even if the
        // caller stops polling, so the sequence runs on its own task.
        let task = tokio::spawn(start_sequence(
            Arc::clone(&self.rooms),
            Arc::clone(&self.generator),
            code.clone(),
            requester,
            self.starting_cash,
        ));

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(code = %code, error = %e, "Start task failed");
                release(self.rooms.as_ref(), &code).await;
                Err(GameError::Unavailable(format!("start of {} did not finish", code)))
            }
        }
    }
}

async fn start_sequence(
    rooms: Arc<dyn RoomGateway>,
    generator: Arc<RoundGenerator>,
    code: GameCode,
    requester: PlayerId,
    starting_cash: Decimal,
) -> Result<StartGameResult, GameError> {
    let ticket = rooms.begin_start(&code, requester).await?;
    tracing::info!(
        code = %code,
        rounds = ticket.round_count,
        players = ticket.players,
        "Generating rounds"
    );

    let rounds = match generator.generate(ticket.round_count, None).await {
        Ok(rounds) => rounds,
        Err(e) => {
            tracing::warn!(code = %code, error = %e, "Round generation failed");
            release(rooms.as_ref(), &code).await;
            return Err(e.into());
        }
    };

    match rooms.commit_start(&code, rounds, starting_cash).await {
        Ok(first_round_id) => {
            tracing::info!(code = %code, first_round = %first_round_id, "Game started");
            Ok(StartGameResult {
                code,
                first_round_id,
            })
        }
        Err(e) => {
            tracing::error!(code = %code, error = %e, "Failed to commit game start");
            release(rooms.as_ref(), &code).await;
            Err(e)
        }
    }
}

async fn release(rooms: &dyn RoomGateway, code: &GameCode) {
    if let Err(e) = rooms.abort_start(code).await {
        tracing::error!(code = %code, error = %e, "Failed to release start reservation");
    }
}
