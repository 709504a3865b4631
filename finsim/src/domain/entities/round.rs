//! Pre-generated market rounds.

use crate::domain::value_objects::{RoundId, Ticker};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// How one headline moved a price, as reported by the pricing oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineEffect {
    pub headline: String,
    pub sentiment: Sentiment,
    pub impact: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroIndicators {
    pub interest_rate: Decimal,
    pub inflation_rate: Decimal,
    pub gdp_growth_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub ticker: Ticker,
    pub price: Decimal,
    /// Headlines of this round; they drive the next round's price
    pub headlines: Vec<String>,
    /// Breakdown that produced `price`. Empty for the seed round.
    #[serde(default)]
    pub effects: Vec<HeadlineEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    pub stocks: Vec<StockSnapshot>,
    pub indicators: MacroIndicators,
    pub global_news: Vec<String>,
}

impl Round {
    pub fn stock(&self, ticker: &Ticker) -> Option<&StockSnapshot> {
        self.stocks.iter().find(|s| &s.ticker == ticker)
    }

    pub fn price_of(&self, ticker: &Ticker) -> Option<Decimal> {
        self.stock(ticker).map(|s| s.price)
    }

    pub fn prices(&self) -> HashMap<Ticker, Decimal> {
        self.stocks
            .iter()
            .map(|s| (s.ticker.clone(), s.price))
            .collect()
    }
}
