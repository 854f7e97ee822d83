//! Chart artifact rendering
//!
//! A renderer turns a prepared `ChartDataset` into bytes for the artifact
//! store. The bundled renderer writes the charted window as CSV.

use crate::error::{ChartError, Result};
use crate::types::ChartDataset;

/// An encoded chart artifact ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Trait for turning a chart dataset into an artifact
pub trait ChartRenderer: Send + Sync {
    fn render(&self, dataset: &ChartDataset) -> Result<RenderedChart>;
}

/// Writes one CSV line per charted day with the overlay columns alongside
#[derive(Debug, Clone, Default)]
pub struct CsvChartRenderer;

const HEADER: [&str; 11] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "benchmark_close",
    "rs_ratio",
    "sma",
    "ema_fast",
    "ema_slow",
];

impl CsvChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for CsvChartRenderer {
    fn render(&self, dataset: &ChartDataset) -> Result<RenderedChart> {
        let window = &dataset.window;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;

        for (i, row) in window.rows.iter().enumerate() {
            writer.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.open.to_string(),
                row.high.to_string(),
                row.low.to_string(),
                row.close.to_string(),
                row.volume.map(|v| v.to_string()).unwrap_or_default(),
                row.benchmark_close.to_string(),
                row.rs_ratio.to_string(),
                window.sma[i].map(|v| v.to_string()).unwrap_or_default(),
                window.ema_fast[i].to_string(),
                window.ema_slow[i].to_string(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ChartError::DataError(format!("Failed to flush CSV: {}", e)))?;

        Ok(RenderedChart {
            bytes,
            content_type: "text/csv",
            extension: "csv",
        })
    }
}
