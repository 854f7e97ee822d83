//! Market data sources
//!
//! - FMP: Financial Modeling Prep daily history (`historical-price-full`)

pub mod fmp;

pub use fmp::{parse_historical, HistoricalPrices, HistoricalRow};
#[cfg(feature = "async")]
pub use fmp::FmpSource;

#[cfg(feature = "async")]
use crate::error::Result;
#[cfg(feature = "async")]
use chrono::NaiveDate;

/// Trait for daily price history providers
#[cfg(feature = "async")]
pub trait PriceSource: Send + Sync {
    /// Fetch daily bars for `symbol` from `from` up to the latest session
    fn fetch_daily(
        &self,
        symbol: &str,
        from: NaiveDate,
    ) -> impl std::future::Future<Output = Result<HistoricalPrices>> + Send;

    /// Get the source name
    fn name(&self) -> &str;
}
