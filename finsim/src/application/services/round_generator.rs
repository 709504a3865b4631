//! Round generation.
//!
//! The whole trajectory of a game is produced at start: a seed round priced
//! from the stock feed, then each following round priced by the pricing
//! oracle from the previous round's prices and headlines. Oracle calls for
//! the tickers of one round run concurrently; rounds are built in order.

use crate::application::ports::{NewsOracle, OracleError, PricingOracle, StockFeed};
use crate::domain::{MacroIndicators, Round, RoundId, StockSnapshot, Ticker, round2};
use futures_util::future::try_join_all;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Headlines kept per stock and round
pub const MAX_HEADLINES: usize = 3;

/// Floor applied to oracle prices
pub const MIN_PRICE: Decimal = dec!(0.01);

/// Indicator range for the seed round, in hundredths
const INDICATOR_SEED_CENTS: std::ops::RangeInclusive<i64> = 0..=500;

/// Per-round indicator drift, in hundredths
const INDICATOR_STEP_CENTS: std::ops::RangeInclusive<i64> = -50..=50;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Round count must be positive")]
    NoRounds,

    #[error("Stock feed returned no tickers")]
    EmptyFeed,

    #[error("News oracle returned no headlines for {0}")]
    NoHeadlines(Ticker),

    #[error("{operation} failed: {source}")]
    Oracle {
        operation: &'static str,
        source: OracleError,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl GenerationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout { .. })
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of tickers drawn from the stock feed for the seed round
    pub ticker_count: usize,
    /// Upper bound on every single oracle call
    pub oracle_timeout: Duration,
    /// Fixed seed for indicator draws and round ids
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ticker_count: 10,
            oracle_timeout: Duration::from_secs(20),
            seed: None,
        }
    }
}

pub struct RoundGenerator {
    stock_feed: Arc<dyn StockFeed>,
    pricing: Arc<dyn PricingOracle>,
    news: Arc<dyn NewsOracle>,
    config: GeneratorConfig,
    rng: Mutex<StdRng>,
}

impl RoundGenerator {
    pub fn new(
        stock_feed: Arc<dyn StockFeed>,
        pricing: Arc<dyn PricingOracle>,
        news: Arc<dyn NewsOracle>,
        config: GeneratorConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            stock_feed,
            pricing,
            news,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build `round_count` rounds. With `previous`, the first generated
    /// round continues from it instead of seeding from the stock feed.
    pub async fn generate(
        &self,
        round_count: usize,
        previous: Option<&Round>,
    ) -> Result<Vec<Round>, GenerationError> {
        if round_count == 0 {
            return Err(GenerationError::NoRounds);
        }

        let mut used_ids: HashSet<RoundId> = previous.map(|r| r.id.clone()).into_iter().collect();
        let mut rounds: Vec<Round> = Vec::with_capacity(round_count);

        for index in 0..round_count {
            let round = match rounds.last().or(previous) {
                None => self.seed_round(&mut used_ids).await?,
                Some(prior) => self.next_round(prior, &mut used_ids).await?,
            };
            tracing::debug!(index, round_id = %round.id, "Round generated");
            rounds.push(round);
        }

        Ok(rounds)
    }

    async fn seed_round(&self, used_ids: &mut HashSet<RoundId>) -> Result<Round, GenerationError> {
        let quotes = self
            .bounded(
                "stock feed",
                self.stock_feed.top_tickers(self.config.ticker_count),
            )
            .await?;
        if quotes.is_empty() {
            return Err(GenerationError::EmptyFeed);
        }

        let headlines =
            try_join_all(quotes.iter().map(|q| self.headlines_for(&q.ticker))).await?;
        let stocks = quotes
            .into_iter()
            .zip(headlines)
            .map(|(quote, headlines)| StockSnapshot {
                ticker: quote.ticker,
                price: quote.last_close,
                headlines,
                effects: Vec::new(),
            })
            .collect();

        let indicators = {
            let mut rng = self.rng.lock();
            MacroIndicators {
                interest_rate: cents(rng.gen_range(INDICATOR_SEED_CENTS)),
                inflation_rate: cents(rng.gen_range(INDICATOR_SEED_CENTS)),
                gdp_growth_rate: cents(rng.gen_range(INDICATOR_SEED_CENTS)),
            }
        };

        Ok(Round {
            id: self.fresh_id(used_ids),
            stocks,
            indicators,
            global_news: self.market_news().await?,
        })
    }

    async fn next_round(
        &self,
        prior: &Round,
        used_ids: &mut HashSet<RoundId>,
    ) -> Result<Round, GenerationError> {
        let stocks = try_join_all(prior.stocks.iter().map(|stock| async move {
            let assessment = self
                .bounded(
                    "pricing oracle",
                    self.pricing
                        .price(&stock.ticker, stock.price, &stock.headlines),
                )
                .await?;
            let headlines = self.headlines_for(&stock.ticker).await?;
            Ok::<_, GenerationError>(StockSnapshot {
                ticker: stock.ticker.clone(),
                price: round2(assessment.new_price).max(MIN_PRICE),
                headlines,
                effects: assessment.effects,
            })
        }))
        .await?;

        let indicators = {
            let mut rng = self.rng.lock();
            let prev = prior.indicators;
            MacroIndicators {
                interest_rate: round2(prev.interest_rate + cents(rng.gen_range(INDICATOR_STEP_CENTS))),
                inflation_rate: round2(
                    prev.inflation_rate + cents(rng.gen_range(INDICATOR_STEP_CENTS)),
                ),
                gdp_growth_rate: round2(
                    prev.gdp_growth_rate + cents(rng.gen_range(INDICATOR_STEP_CENTS)),
                ),
            }
        };

        Ok(Round {
            id: self.fresh_id(used_ids),
            stocks,
            indicators,
            global_news: self.market_news().await?,
        })
    }

    async fn headlines_for(&self, ticker: &Ticker) -> Result<Vec<String>, GenerationError> {
        let mut headlines = self
            .bounded("news oracle", self.news.headlines(ticker))
            .await?;
        if headlines.is_empty() {
            return Err(GenerationError::NoHeadlines(ticker.clone()));
        }
        headlines.truncate(MAX_HEADLINES);
        Ok(headlines)
    }

    async fn market_news(&self) -> Result<Vec<String>, GenerationError> {
        self.bounded("market news", self.news.market_headlines())
            .await
    }

    fn fresh_id(&self, used: &mut HashSet<RoundId>) -> RoundId {
        let mut rng = self.rng.lock();
        loop {
            let id = RoundId::random(&mut *rng);
            if used.insert(id.clone()) {
                return id;
            }
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, OracleError>>,
    ) -> Result<T, GenerationError> {
        let after = self.config.oracle_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result.map_err(|source| GenerationError::Oracle { operation, source }),
            Err(_) => {
                tracing::warn!(operation, ?after, "Oracle call timed out");
                Err(GenerationError::Timeout { operation, after })
            }
        }
    }
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}
