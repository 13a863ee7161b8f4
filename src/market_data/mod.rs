pub mod series;
pub mod source;
pub mod yahoo;

// Re-export the core data types for convenient access (e.g. `use crate::market_data::OhlcvSeries`).
pub use series::{Bar, OhlcvSeries, SeriesBuilder};
pub use source::{CompanyInfo, MarketDataSource};
pub use yahoo::YahooClient;
