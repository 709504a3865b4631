use crate::application::ports::{NewsOracle, OracleError};
use crate::domain::Ticker;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const TICKER_TEMPLATES: &[&str] = &[
    "{} beats quarterly earnings estimates",
    "{} shares surge after analyst upgrade",
    "{} announces record buyback program",
    "{} wins major government contract",
    "{} expands into new international markets",
    "{} misses revenue guidance",
    "{} faces regulatory probe over data practices",
    "{} announces layoffs amid restructuring",
    "{} hit with patent lawsuit",
    "{} delays flagship product launch",
    "{} holds annual shareholder meeting",
    "{} appoints new chief financial officer",
    "{} completes previously announced acquisition",
];

const MARKET_TEMPLATES: &[&str] = &[
    "Central bank holds interest rates steady",
    "Inflation cools for third straight month",
    "Jobs report shows strong hiring",
    "Oil prices slump on supply glut",
    "Treasury yields climb as investors weigh rate path",
    "Consumer confidence dips to six-month low",
    "Manufacturing activity expands unexpectedly",
    "Trade talks stall between major economies",
];

/// News oracle filling fixed headline templates with the ticker
pub struct TemplateNewsOracle {
    rng: Mutex<StdRng>,
    market_count: usize,
}

impl TemplateNewsOracle {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            market_count: 2,
        }
    }
}

impl Default for TemplateNewsOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsOracle for TemplateNewsOracle {
    async fn headlines(&self, ticker: &Ticker) -> Result<Vec<String>, OracleError> {
        let mut rng = self.rng.lock();
        let count = rng.gen_range(1..=3);
        Ok(TICKER_TEMPLATES
            .choose_multiple(&mut *rng, count)
            .map(|t| t.replace("{}", ticker.as_str()))
            .collect())
    }

    async fn market_headlines(&self) -> Result<Vec<String>, OracleError> {
        let mut rng = self.rng.lock();
        Ok(MARKET_TEMPLATES
            .choose_multiple(&mut *rng, self.market_count)
            .map(|s| s.to_string())
            .collect())
    }
}
