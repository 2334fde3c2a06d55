use async_trait::async_trait;
use thiserror::Error;

/// One live quote as shown on a finance quote page. An unknown stock code
/// comes back with an empty name and no prices rather than an error; the
/// caller decides what that means.
#[derive(Debug, Clone, Default)]
pub struct MarketQuote {
    pub name: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub diff_price: Option<f64>,
    pub days_range: Option<f64>,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    async fn fetch_quote(&self, code: &str) -> Result<MarketQuote, MarketDataError>;
}
