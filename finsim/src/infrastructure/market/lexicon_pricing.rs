use crate::application::ports::{OracleError, PriceAssessment, PricingOracle};
use crate::domain::{HeadlineEffect, Sentiment, Ticker};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const POSITIVE_WORDS: &[&str] = &[
    "beats", "surge", "surges", "record", "growth", "upgrade", "upgraded", "rally", "soars",
    "expands", "strong", "wins", "approval", "breakthrough", "raises",
];

const NEGATIVE_WORDS: &[&str] = &[
    "misses", "plunge", "plunges", "lawsuit", "downgrade", "downgraded", "recall", "probe",
    "cuts", "weak", "losses", "slump", "delays", "fine", "layoffs",
];

/// Pricing oracle that scores headlines against a fixed keyword lexicon.
///
/// Every keyword hit moves the price by `step_pct` percent in the
/// direction of the word, capped at `max_pct` per headline.
pub struct LexiconPricingOracle {
    step_pct: Decimal,
    max_pct: Decimal,
}

impl LexiconPricingOracle {
    pub fn new(step_pct: Decimal, max_pct: Decimal) -> Self {
        Self { step_pct, max_pct }
    }

    fn score(&self, headline: &str) -> (Sentiment, Decimal) {
        let lower = headline.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let net = hits(&words, POSITIVE_WORDS) - hits(&words, NEGATIVE_WORDS);

        let pct = (self.step_pct * Decimal::from(net)).clamp(-self.max_pct, self.max_pct);
        let sentiment = match net {
            n if n > 0 => Sentiment::Positive,
            n if n < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        };
        (sentiment, pct)
    }
}

fn hits(words: &[&str], lexicon: &[&str]) -> i64 {
    words
        .iter()
        .filter(|w| lexicon.iter().any(|l| *l == **w))
        .count() as i64
}

impl Default for LexiconPricingOracle {
    fn default() -> Self {
        Self::new(dec!(1.5), dec!(5))
    }
}

#[async_trait]
impl PricingOracle for LexiconPricingOracle {
    async fn price(
        &self,
        ticker: &Ticker,
        current_price: Decimal,
        headlines: &[String],
    ) -> Result<PriceAssessment, OracleError> {
        if current_price <= Decimal::ZERO {
            return Err(OracleError::Malformed(format!(
                "non-positive price {} for {}",
                current_price, ticker
            )));
        }

        let effects: Vec<HeadlineEffect> = headlines
            .iter()
            .map(|headline| {
                let (sentiment, impact) = self.score(headline);
                HeadlineEffect {
                    headline: headline.clone(),
                    sentiment,
                    impact,
                }
            })
            .collect();

        let total_pct: Decimal = effects.iter().map(|e| e.impact).sum();
        let new_price = current_price * (Decimal::ONE + total_pct / dec!(100));

        Ok(PriceAssessment { new_price, effects })
    }
}
