use super::OracleError;
use crate::domain::Ticker;
use async_trait::async_trait;

/// Synthetic news source
#[async_trait]
pub trait NewsOracle: Send + Sync {
    /// One to three headlines about `ticker`
    async fn headlines(&self, ticker: &Ticker) -> Result<Vec<String>, OracleError>;

    /// Market-wide news shown alongside every stock
    async fn market_headlines(&self) -> Result<Vec<String>, OracleError>;
}
