use crate::application::ports::{OracleError, StockFeed, StockQuote};
use crate::domain::Ticker;
use crate::infrastructure::config::{ConfigError, StockConfig};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Ten US large caps with representative closing prices
const DEFAULT_QUOTES: [(&str, Decimal); 10] = [
    ("AAPL", dec!(189.84)),
    ("MSFT", dec!(415.26)),
    ("NVDA", dec!(875.28)),
    ("AMZN", dec!(178.22)),
    ("GOOGL", dec!(155.49)),
    ("META", dec!(496.24)),
    ("BRK.B", dec!(408.79)),
    ("LLY", dec!(771.25)),
    ("TSLA", dec!(171.05)),
    ("JPM", dec!(198.48)),
];

/// Stock feed serving a fixed, ordered quote list
pub struct StaticStockFeed {
    quotes: Vec<StockQuote>,
}

impl StaticStockFeed {
    pub fn new(quotes: Vec<StockQuote>) -> Self {
        Self { quotes }
    }

    pub fn with_defaults() -> Self {
        let quotes = DEFAULT_QUOTES
            .iter()
            .filter_map(|(t, p)| {
                Ticker::new(*t).ok().map(|ticker| StockQuote {
                    ticker,
                    last_close: *p,
                })
            })
            .collect();
        Self { quotes }
    }

    /// Quotes from configuration, or the defaults when none are configured
    pub fn from_config(stocks: &[StockConfig]) -> Result<Self, ConfigError> {
        if stocks.is_empty() {
            return Ok(Self::with_defaults());
        }
        let quotes = stocks
            .iter()
            .map(|s| {
                let ticker = Ticker::new(s.ticker.as_str())
                    .map_err(|e| ConfigError::InvalidStock(format!("{}: {}", s.ticker, e)))?;
                if s.last_close <= Decimal::ZERO {
                    return Err(ConfigError::InvalidStock(format!(
                        "{}: last_close must be positive",
                        s.ticker
                    )));
                }
                Ok(StockQuote {
                    ticker,
                    last_close: s.last_close,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(quotes))
    }
}

impl Default for StaticStockFeed {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl StockFeed for StaticStockFeed {
    async fn top_tickers(&self, n: usize) -> Result<Vec<StockQuote>, OracleError> {
        if self.quotes.is_empty() {
            return Err(OracleError::Unavailable("no quotes configured".to_string()));
        }
        Ok(self.quotes.iter().take(n).cloned().collect())
    }
}
