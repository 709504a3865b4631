//! Per-room collection of player portfolios.

use super::portfolio::{LedgerError, Portfolio, Position};
use crate::domain::value_objects::{Direction, PlayerId, PositionId, Ticker};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    portfolios: IndexMap<PlayerId, Portfolio>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// One fresh portfolio per player. Existing portfolios are replaced.
    pub fn initialize<'a>(
        &mut self,
        players: impl IntoIterator<Item = &'a PlayerId>,
        starting_cash: Decimal,
    ) {
        self.portfolios = players
            .into_iter()
            .map(|p| (p.clone(), Portfolio::new(p.clone(), starting_cash)))
            .collect();
    }

    pub fn open(
        &mut self,
        player: &PlayerId,
        ticker: Ticker,
        direction: Direction,
        shares: i64,
        price: Decimal,
    ) -> Result<Position, LedgerError> {
        self.portfolio_mut(player)?
            .open(ticker, direction, shares, price)
    }

    pub fn close(
        &mut self,
        player: &PlayerId,
        position_id: PositionId,
        current_price: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.portfolio_mut(player)?.close(position_id, current_price)
    }

    pub fn mark_to_market(
        &mut self,
        player: &PlayerId,
        prices: &HashMap<Ticker, Decimal>,
    ) -> Result<Decimal, LedgerError> {
        Ok(self.portfolio_mut(player)?.mark_to_market(prices))
    }

    pub fn portfolio(&self, player: &PlayerId) -> Result<&Portfolio, LedgerError> {
        self.portfolios
            .get(player)
            .ok_or_else(|| LedgerError::PortfolioNotFound(player.clone()))
    }

    fn portfolio_mut(&mut self, player: &PlayerId) -> Result<&mut Portfolio, LedgerError> {
        self.portfolios
            .get_mut(player)
            .ok_or_else(|| LedgerError::PortfolioNotFound(player.clone()))
    }

    pub fn portfolios(&self) -> impl Iterator<Item = &Portfolio> {
        self.portfolios.values()
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }
}
