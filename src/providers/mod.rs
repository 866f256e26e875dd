pub mod demo;
pub mod fallback;
pub mod market_api;
pub mod util;

pub use fallback::MarketDataService;
pub use market_api::MarketApiProvider;
