use super::OracleError;
use crate::domain::{HeadlineEffect, Ticker};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A new price together with the per-headline breakdown that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAssessment {
    pub new_price: Decimal,
    pub effects: Vec<HeadlineEffect>,
}

/// Turns a price and the headlines about it into the next price
#[async_trait]
pub trait PricingOracle: Send + Sync {
    async fn price(
        &self,
        ticker: &Ticker,
        current_price: Decimal,
        headlines: &[String],
    ) -> Result<PriceAssessment, OracleError>;
}
