use async_trait::async_trait;

use crate::external::market_data::{MarketDataError, MarketDataFetcher, MarketQuote};

/// Development stand-in for the live scrape: a stable base price per code
/// with a little daily jitter, no network.
pub struct MockMarketFetcher;

impl MockMarketFetcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataFetcher for MockMarketFetcher {
    async fn fetch_quote(&self, code: &str) -> Result<MarketQuote, MarketDataError> {
        // Mirror the live page's contract for unknown codes: empty name, no
        // prices.
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(MarketQuote::default());
        }

        let base = 10_000.0
            + (code.bytes().map(u64::from).sum::<u64>() % 90) as f64 * 1_000.0;
        let jitter = (rand::random::<f64>() - 0.5) * 0.04;
        let current = ((base * (1.0 + jitter)) / 100.0).round() * 100.0;

        Ok(MarketQuote {
            name: format!("MOCK-{code}"),
            current_price: Some(current),
            previous_close: Some(base),
            diff_price: Some((current - base).abs()),
            days_range: Some(((current - base).abs() / base * 100.0 * 100.0).round() / 100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_code_gets_plausible_quote() {
        let fetcher = MockMarketFetcher::new();
        let quote = fetcher.fetch_quote("005930").await.unwrap();

        assert_eq!(quote.name, "MOCK-005930");
        let current = quote.current_price.unwrap();
        let previous = quote.previous_close.unwrap();
        assert!(current > 0.0 && previous > 0.0);
        assert!((current - previous).abs() <= previous * 0.03);
    }

    #[tokio::test]
    async fn non_numeric_code_behaves_like_unknown() {
        let fetcher = MockMarketFetcher::new();
        let quote = fetcher.fetch_quote("samsung").await.unwrap();

        assert!(quote.name.is_empty());
        assert_eq!(quote.current_price, None);
    }

    #[tokio::test]
    async fn same_code_keeps_the_same_previous_close() {
        let fetcher = MockMarketFetcher::new();
        let first = fetcher.fetch_quote("005930").await.unwrap();
        let second = fetcher.fetch_quote("005930").await.unwrap();

        assert_eq!(first.previous_close, second.previous_close);
    }
}
