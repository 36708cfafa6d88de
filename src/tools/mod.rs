// Public module exports
pub mod market_data;
pub mod web_search;

pub use market_data::{AnalystRatings, CompanyNews, Fundamentals, MarketDataClient, StockQuote};
pub use web_search::WebSearch;
