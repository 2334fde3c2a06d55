use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::external::market_data::{MarketDataError, MarketDataFetcher, MarketQuote};

const QUOTE_URL: &str = "https://finance.naver.com/item/sise.naver?code=";

// Selectors for the sise page. The previous close has no element id, so it
// is addressed through the first table of the quote section.
const NAME_SELECTOR: &str = "#middle > div.h_company > div.wrap_company > h2 > a";
const CURRENT_PRICE_SELECTOR: &str = "#_nowVal";
const DIFF_PRICE_SELECTOR: &str = "#_diff > span";
const DAYS_RANGE_SELECTOR: &str = "#_rate > span";
const PREVIOUS_CLOSE_SELECTOR: &str =
    "#content > div.section.inner_sub > div:nth-child(1) > table > tbody > tr:nth-child(3) > td:nth-child(4) > span";

/// Live-quote scraper for finance.naver.com. Prices on the page carry
/// thousands separators and direction glyphs; everything but digits, dot and
/// sign is stripped before parsing.
pub struct NaverFinanceFetcher {
    client: Client,
    numeric: Regex,
}

impl NaverFinanceFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            numeric: Regex::new(r"[^0-9.+\-]").expect("numeric cleanup pattern"),
        }
    }

    fn parse_number(&self, raw: &str) -> Option<f64> {
        let cleaned = self.numeric.replace_all(raw, "");
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse().ok()
    }

    fn select_text(document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    fn extract_quote(&self, html: &str) -> MarketQuote {
        let document = Html::parse_document(html);

        let name = Self::select_text(&document, NAME_SELECTOR).unwrap_or_default();
        let current_price = Self::select_text(&document, CURRENT_PRICE_SELECTOR)
            .and_then(|text| self.parse_number(&text));
        let previous_close = Self::select_text(&document, PREVIOUS_CLOSE_SELECTOR)
            .and_then(|text| self.parse_number(&text));
        let diff_price = Self::select_text(&document, DIFF_PRICE_SELECTOR)
            .and_then(|text| self.parse_number(&text));
        let days_range = Self::select_text(&document, DAYS_RANGE_SELECTOR)
            .and_then(|text| self.parse_number(&text));

        MarketQuote {
            name,
            current_price,
            previous_close,
            diff_price,
            days_range,
        }
    }
}

#[async_trait]
impl MarketDataFetcher for NaverFinanceFetcher {
    async fn fetch_quote(&self, code: &str) -> Result<MarketQuote, MarketDataError> {
        let url = format!("{QUOTE_URL}{code}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }

        // The page is served as EUC-KR; reqwest decodes from the charset in
        // the Content-Type header.
        let html = response
            .text()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        Ok(self.extract_quote(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
        <div id="middle"><div class="h_company"><div class="wrap_company">
            <h2><a href="/item/main.naver?code=005930">삼성전자</a></h2>
        </div></div></div>
        <em id="_nowVal">173,500</em>
        <em id="_diff"><span class="tah">4,500</span></em>
        <em id="_rate"><span class="tah">+2.66%</span></em>
        <div id="content"><div class="section inner_sub"><div>
            <table><tbody>
                <tr><td></td></tr>
                <tr><td></td></tr>
                <tr><td>a</td><td>b</td><td>c</td><td><span class="tah">169,000</span></td></tr>
            </tbody></table>
        </div></div></div>
        </body></html>
    "#;

    #[test]
    fn extracts_quote_fields_from_page() {
        let fetcher = NaverFinanceFetcher::new();
        let quote = fetcher.extract_quote(FIXTURE);

        assert_eq!(quote.name, "삼성전자");
        assert_eq!(quote.current_price, Some(173500.0));
        assert_eq!(quote.previous_close, Some(169000.0));
        assert_eq!(quote.diff_price, Some(4500.0));
        assert_eq!(quote.days_range, Some(2.66));
    }

    #[test]
    fn unknown_code_yields_empty_name() {
        let fetcher = NaverFinanceFetcher::new();
        let quote = fetcher.extract_quote("<html><body>검색 결과가 없습니다</body></html>");

        assert!(quote.name.is_empty());
        assert_eq!(quote.current_price, None);
        assert_eq!(quote.previous_close, None);
    }

    #[test]
    fn numeric_cleanup_strips_separators_and_glyphs() {
        let fetcher = NaverFinanceFetcher::new();

        assert_eq!(fetcher.parse_number("173,500"), Some(173500.0));
        assert_eq!(fetcher.parse_number("+2.66%"), Some(2.66));
        assert_eq!(fetcher.parse_number("상승 4,500"), Some(4500.0));
        assert_eq!(fetcher.parse_number(""), None);
        assert_eq!(fetcher.parse_number("보합"), None);
    }
}
