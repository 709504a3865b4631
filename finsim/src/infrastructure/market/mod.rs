//! Network-free market collaborators for local play and tests.

mod lexicon_pricing;
mod static_feed;
mod template_news;

pub use lexicon_pricing::LexiconPricingOracle;
pub use static_feed::StaticStockFeed;
pub use template_news::TemplateNewsOracle;
