use thiserror::Error;

/// Errors raised inside the analysis pipeline.
///
/// These never escape the public entry point: `Analyzer::full_analysis`
/// maps any of them to the default analysis object.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Insufficient data for {symbol}: {got} points, need {need}")]
    InsufficientData {
        symbol: String,
        need: usize,
        got: usize,
    },

    #[error("Invalid series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("Computation failed in {stage}: {reason}")]
    Computation { stage: String, reason: String },
}

/// Errors related to market data and news connectivity.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request failed for {symbol}: {reason}")]
    RequestFailed { symbol: String, reason: String },

    #[error("Invalid response for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Service timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    #[error("Rate limit exceeded: retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },
}

/// Errors from featured-coin list management.
#[derive(Debug, Error)]
pub enum FeaturedCoinError {
    #[error("Maximum of {max} active coins allowed")]
    MaxActiveCoins { max: usize },

    #[error("Coin not found: {id}")]
    NotFound { id: String },
}
