//! Core types: daily bars, aligned rows and the prepared chart dataset

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price type (using f64 for precision)
pub type Price = f64;

/// Share volume
pub type Volume = u64;

/// Ticker symbol
pub type Symbol = String;

/// One calendar day of OHLCV data for the charted ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Option<Volume>,
}

impl PriceBar {
    /// Create a new bar
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Option<Volume>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get price range (high - low)
    pub fn range(&self) -> Price {
        self.high - self.low
    }
}

/// One calendar day of close-only data for the benchmark index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBar {
    pub date: NaiveDate,
    pub close: Price,
}

impl BenchmarkBar {
    pub fn new(date: NaiveDate, close: Price) -> Self {
        Self { date, close }
    }
}

/// A ticker bar joined with the benchmark close for the same date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Option<Volume>,
    pub benchmark_close: Price,
    /// ticker close / benchmark close
    pub rs_ratio: f64,
}

/// Absolute and percentage change between the two most recent closes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub abs_change: f64,
    pub pct_change: f64,
}

/// Padded value-axis range for the price panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub y_min: f64,
    pub y_max: f64,
}

/// Indicators computed over the full (unwindowed) ticker series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub sma: Vec<Option<f64>>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub adrp: f64,
    pub change: PriceChange,
}

/// Trailing rows handed to the renderer, with indicator slices row-aligned to `rows`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartWindow {
    pub rows: Vec<AlignedRow>,
    pub sma: Vec<Option<f64>>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub bounds: AxisBounds,
}

impl ChartWindow {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last charted dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Scalars the notifier formats into the chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSummary {
    pub symbol: Symbol,
    pub last_close: Price,
    pub abs_change: f64,
    pub pct_change: f64,
    pub adrp: f64,
}

/// Everything produced for one chart request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub window: ChartWindow,
    pub indicators: IndicatorSet,
    pub summary: ChartSummary,
}
