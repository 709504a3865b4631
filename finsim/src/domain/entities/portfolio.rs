//! Player portfolio: cash, open positions and valuation history.

use crate::domain::value_objects::{Direction, PlayerId, PositionId, Ticker};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Share count must be positive, got {0}")]
    InvalidShares(i64),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Position not found: {0}")]
    PositionNotFound(PositionId),

    #[error("Portfolio not found for player {0}")]
    PortfolioNotFound(PlayerId),
}

/// One open stake in a ticker. Never merged with later trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub ticker: Ticker,
    pub entry_price: Decimal,
    /// Positive for long, negative for short
    pub shares: i64,
}

impl Position {
    pub fn is_short(&self) -> bool {
        self.shares < 0
    }

    /// Value of the position at `price`.
    ///
    /// Long: `price * shares`. Short: entry notional plus the mark-to-market
    /// result, `(entry - price) * |shares| + entry * |shares|`.
    pub fn valuation(&self, price: Decimal) -> Decimal {
        let size = Decimal::from(self.shares.unsigned_abs());
        if self.is_short() {
            (self.entry_price - price) * size + self.entry_price * size
        } else {
            price * size
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub owner: PlayerId,
    pub cash: Decimal,
    pub positions: Vec<Position>,
    /// Total valuations, seeded with the starting cash
    pub value_history: Vec<Decimal>,
}

impl Portfolio {
    pub fn new(owner: PlayerId, starting_cash: Decimal) -> Self {
        Self {
            owner,
            cash: starting_cash,
            positions: Vec::new(),
            value_history: vec![starting_cash],
        }
    }

    /// Open a new position.
    ///
    /// Cash is debited by `price * shares` in both directions. Only buys are
    /// checked against available cash.
    pub fn open(
        &mut self,
        ticker: Ticker,
        direction: Direction,
        shares: i64,
        price: Decimal,
    ) -> Result<Position, LedgerError> {
        if shares <= 0 {
            return Err(LedgerError::InvalidShares(shares));
        }

        let cost = price * Decimal::from(shares);
        if direction.is_buy() && self.cash - cost < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                required: cost,
                available: self.cash,
            });
        }

        self.cash -= cost;
        let position = Position {
            id: Uuid::new_v4(),
            ticker,
            entry_price: price,
            shares: shares * direction.sign(),
        };
        self.positions.push(position.clone());
        Ok(position)
    }

    /// Close a position at `current_price`, crediting its valuation to cash
    pub fn close(
        &mut self,
        position_id: PositionId,
        current_price: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let index = self
            .positions
            .iter()
            .position(|p| p.id == position_id)
            .ok_or(LedgerError::PositionNotFound(position_id))?;

        let position = self.positions.remove(index);
        let realized = position.valuation(current_price);
        self.cash += realized;
        Ok(realized)
    }

    pub fn position(&self, position_id: PositionId) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == position_id)
    }

    /// Cash plus every open position valued at the supplied prices.
    /// A ticker missing from `prices` is valued at its entry price.
    pub fn total_value(&self, prices: &HashMap<Ticker, Decimal>) -> Decimal {
        self.positions.iter().fold(self.cash, |acc, p| {
            let price = prices.get(&p.ticker).copied().unwrap_or(p.entry_price);
            acc + p.valuation(price)
        })
    }

    /// Record the current total value in the history and return it
    pub fn mark_to_market(&mut self, prices: &HashMap<Ticker, Decimal>) -> Decimal {
        let total = self.total_value(prices);
        self.value_history.push(total);
        total
    }

    pub fn latest_value(&self) -> Decimal {
        self.value_history.last().copied().unwrap_or(self.cash)
    }
}
