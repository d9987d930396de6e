pub mod cache;
pub mod coingecko;
pub mod http_client_factory;
pub mod mock;
pub mod newsdata;
pub mod rate_limiter;
pub mod sentiment_analyzer;

pub use http_client_factory::HttpClientFactory;
