use super::{parse_code, parse_round_id};
use crate::application::GameError;
use crate::application::ports::{IdentityVerifier, RoomGateway};
use crate::domain::{Direction, Portfolio, PositionId, Ticker, TradeOrder};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TradeCommand {
    pub code: String,
    pub ticker: String,
    pub direction: String,
    /// Whole shares
    pub amount: i64,
    pub round_index: usize,
    pub round_id: String,
}

pub struct TradeUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
}

impl TradeUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { rooms, identity }
    }

    pub async fn execute(&self, token: &str, command: TradeCommand) -> Result<Portfolio, GameError> {
        let player = self.identity.verify(token).await?;
        let code = parse_code(&command.code)?;
        let ticker = Ticker::new(&command.ticker).map_err(|e| GameError::invalid("ticker", e))?;
        let direction = Direction::try_from(command.direction.as_str())
            .map_err(|e| GameError::invalid("direction", e))?;
        if command.amount <= 0 {
            return Err(GameError::invalid("amount", "must be a positive number of shares"));
        }
        let round_id = parse_round_id(&command.round_id)?;

        let order = TradeOrder {
            ticker: ticker.clone(),
            direction,
            shares: command.amount,
            round_index: command.round_index,
            round_id,
        };
        let portfolio = self.rooms.trade(&code, player.clone(), order).await?;

        tracing::debug!(
            code = %code,
            player = %player,
            ticker = %ticker,
            direction = %direction,
            shares = command.amount,
            "Trade executed"
        );
        Ok(portfolio)
    }
}

#[derive(Debug, Clone)]
pub struct ClosePositionCommand {
    pub code: String,
    pub position_id: String,
    pub round_id: String,
}

pub struct ClosePositionUseCase {
    rooms: Arc<dyn RoomGateway>,
    identity: Arc<dyn IdentityVerifier>,
}

impl ClosePositionUseCase {
    pub fn new(rooms: Arc<dyn RoomGateway>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { rooms, identity }
    }

    pub async fn execute(
        &self,
        token: &str,
        command: ClosePositionCommand,
    ) -> Result<Portfolio, GameError> {
        let player = self.identity.verify(token).await?;
        let code = parse_code(&command.code)?;
        let position_id = PositionId::parse_str(&command.position_id)
            .map_err(|e| GameError::invalid("positionId", e.to_string()))?;
        let round_id = parse_round_id(&command.round_id)?;

        let portfolio = self
            .rooms
            .close_position(&code, player.clone(), position_id, round_id)
            .await?;
        tracing::debug!(code = %code, player = %player, position = %position_id, "Position closed");
        Ok(portfolio)
    }
}
