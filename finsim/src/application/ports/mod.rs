mod identity;
mod news_oracle;
mod oracle;
mod pricing_oracle;
mod room_gateway;
mod room_repository;
mod stock_feed;

pub use identity::{AuthError, IdentityVerifier};
pub use news_oracle::NewsOracle;
pub use oracle::OracleError;
pub use pricing_oracle::{PriceAssessment, PricingOracle};
pub use room_gateway::RoomGateway;
pub use room_repository::{RecordAppend, RoomRepository, StoreError};
pub use stock_feed::{StockFeed, StockQuote};
