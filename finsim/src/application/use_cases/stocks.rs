use crate::application::GameError;
use crate::application::ports::{StockFeed, StockQuote};
use std::sync::Arc;

pub const DEFAULT_TOP_STOCKS: usize = 10;
pub const MAX_TOP_STOCKS: usize = 50;

pub struct GetTopStocksUseCase {
    feed: Arc<dyn StockFeed>,
}

impl GetTopStocksUseCase {
    pub fn new(feed: Arc<dyn StockFeed>) -> Self {
        Self { feed }
    }

    pub async fn execute(&self, n: Option<usize>) -> Result<Vec<StockQuote>, GameError> {
        let n = n.unwrap_or(DEFAULT_TOP_STOCKS);
        if n == 0 || n > MAX_TOP_STOCKS {
            return Err(GameError::invalid(
                "n",
                format!("must be between 1 and {}", MAX_TOP_STOCKS),
            ));
        }
        Ok(self.feed.top_tickers(n).await?)
    }
}
