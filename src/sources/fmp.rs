//! Financial Modeling Prep data source
//!
//! The `historical-price-full` endpoint returns daily bars newest first:
//!
//! ```json
//! { "symbol": "AAPL", "historical": [ { "date": "2024-01-05", "open": 181.9, ... } ] }
//! ```

use crate::align::normalize_order;
use crate::error::{ChartError, Result};
use crate::types::{BenchmarkBar, PriceBar, Volume};
use chrono::NaiveDate;
use serde::Deserialize;

#[cfg(feature = "async")]
use reqwest::Client;
#[cfg(feature = "async")]
use std::time::Duration;

/// One entry of the `historical` array. Extra fields (adjClose, vwap, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalRow {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    historical: Vec<HistoricalRow>,
}

/// Parsed daily history for one symbol, ascending by date
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPrices {
    pub symbol: Option<String>,
    pub bars: Vec<PriceBar>,
}

impl HistoricalPrices {
    pub fn price_bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Close-only view for use as a benchmark series
    pub fn benchmark_bars(&self) -> Vec<BenchmarkBar> {
        self.bars
            .iter()
            .map(|bar| BenchmarkBar::new(bar.date, bar.close))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn to_volume(raw: Option<f64>) -> Option<Volume> {
    raw.filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as Volume)
}

impl TryFrom<HistoricalRow> for PriceBar {
    type Error = ChartError;

    fn try_from(row: HistoricalRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            ChartError::ParseError(format!("Date parse error '{}': {}", row.date, e))
        })?;
        Ok(PriceBar::new(
            date,
            row.open,
            row.high,
            row.low,
            row.close,
            to_volume(row.volume),
        ))
    }
}

/// Parse an FMP `historical-price-full` body into an ascending series.
/// A body without a `historical` key (FMP's answer for unknown symbols) yields no bars.
pub fn parse_historical(json: &str) -> Result<HistoricalPrices> {
    let response: HistoricalResponse = serde_json::from_str(json)?;

    let mut bars = response
        .historical
        .into_iter()
        .map(PriceBar::try_from)
        .collect::<Result<Vec<_>>>()?;

    // Sort by date (oldest first)
    normalize_order(&mut bars);

    Ok(HistoricalPrices {
        symbol: response.symbol,
        bars,
    })
}

/// Financial Modeling Prep REST source
#[cfg(feature = "async")]
pub struct FmpSource {
    base_url: String,
    api_key: String,
    client: Client,
}

#[cfg(feature = "async")]
impl FmpSource {
    /// Create a new FMP source against `base_url` (e.g. `https://financialmodelingprep.com/api/v3`)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChartError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &crate::config::HandlerConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_key.clone())
    }

    fn endpoint(&self, symbol: &str) -> String {
        format!("{}/historical-price-full/{}", self.base_url, symbol)
    }
}

#[cfg(feature = "async")]
impl super::PriceSource for FmpSource {
    async fn fetch_daily(&self, symbol: &str, from: NaiveDate) -> Result<HistoricalPrices> {
        let url = self.endpoint(symbol);
        let from = from.format("%Y-%m-%d").to_string();
        log::info!("Fetching {} daily history from {} (from={})", symbol, url, from);

        let params = [("apikey", self.api_key.as_str()), ("from", from.as_str())];
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ChartError::Http(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChartError::Http(format!(
                "FMP returned {} for {}",
                response.status(),
                symbol
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChartError::Http(format!("Failed to read response: {}", e)))?;

        let prices = parse_historical(&body)?;
        log::debug!("Parsed {} bars for {}", prices.bars.len(), symbol);
        if prices.is_empty() {
            log::warn!("FMP returned no history for {}", symbol);
        }
        Ok(prices)
    }

    fn name(&self) -> &str {
        "fmp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "symbol": "NVDA",
        "historical": [
            {"date": "2024-01-05", "open": 484.6, "high": 495.5, "low": 484.0, "close": 490.9,
             "adjClose": 490.9, "volume": 41456800.0, "label": "January 05, 24"},
            {"date": "2024-01-04", "open": 477.7, "high": 485.0, "low": 475.1, "close": 480.0,
             "volume": 30653500},
            {"date": "2024-01-03", "open": 474.9, "high": 481.8, "low": 473.2, "close": 475.6}
        ]
    }"#;

    #[test]
    fn test_parse_reverses_to_ascending() {
        let prices = parse_historical(SAMPLE).unwrap();
        assert_eq!(prices.symbol.as_deref(), Some("NVDA"));
        assert_eq!(prices.bars.len(), 3);
        assert_eq!(
            prices.bars[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert_eq!(prices.bars[2].close, 490.9);
        assert_eq!(prices.bars[2].volume, Some(41_456_800));
        assert_eq!(prices.bars[0].volume, None);
    }

    #[test]
    fn test_benchmark_view() {
        let prices = parse_historical(SAMPLE).unwrap();
        let bench = prices.benchmark_bars();
        assert_eq!(bench.len(), 3);
        assert_eq!(bench[1].close, 480.0);
    }

    #[test]
    fn test_missing_historical_is_empty() {
        let prices = parse_historical("{}").unwrap();
        assert!(prices.is_empty());
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let body = r#"{"historical": [
            {"date": "01/05/2024", "open": 1, "high": 1, "low": 1, "close": 1}
        ]}"#;
        assert!(matches!(
            parse_historical(body),
            Err(ChartError::ParseError(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_historical("not json"),
            Err(ChartError::SerdeError(_))
        ));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_fmp_source_creation() {
        let source = FmpSource::new("https://example.test/api/v3/", "test_key").unwrap();
        assert_eq!(
            source.endpoint("SPY"),
            "https://example.test/api/v3/historical-price-full/SPY"
        );
    }
}
