use super::OracleError;
use crate::domain::Ticker;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: Ticker,
    pub last_close: Decimal,
}

/// Source of real-world seed prices
#[async_trait]
pub trait StockFeed: Send + Sync {
    /// The `n` most prominent tickers with their last closing price
    async fn top_tickers(&self, n: usize) -> Result<Vec<StockQuote>, OracleError>;
}
