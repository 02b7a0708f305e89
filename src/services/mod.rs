//! External collaborators: market data and the symbol universe.

pub mod fetcher;
pub mod market_data;
pub mod rate_limit;
pub mod universe;
pub mod yahoo;

pub use fetcher::MarketDataFetcher;
pub use market_data::{InMemoryMarketDataProvider, MarketDataProvider};
pub use rate_limit::RatePacer;
pub use universe::{normalize_symbols, FileSymbolUniverse, StaticSymbolUniverse, SymbolUniverse};
pub use yahoo::YahooMarketDataProvider;
