//! Chart-data preparation: alignment, indicators, windowing and summary
//!
//! `prepare` is the one entry point the handler calls. It is pure: two price
//! series and a config in, a `ChartDataset` or a typed error out.

use crate::align::{align_series, is_ascending, normalize_order};
use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::types::{BenchmarkBar, ChartDataset, ChartSummary, IndicatorSet, PriceBar};
use crate::window::select_window_padded;
use std::borrow::Cow;

/// Build the chart dataset for `symbol` from its daily bars and the benchmark's closes
pub fn prepare(
    symbol: &str,
    ticker: &[PriceBar],
    benchmark: &[BenchmarkBar],
    config: &ChartConfig,
) -> Result<ChartDataset> {
    let ticker: Cow<'_, [PriceBar]> = if is_ascending(ticker) {
        Cow::Borrowed(ticker)
    } else {
        let mut sorted = ticker.to_vec();
        normalize_order(&mut sorted);
        Cow::Owned(sorted)
    };

    let aligned = align_series(&ticker, benchmark)?;
    let indicators = IndicatorSet::compute(&ticker, &config.indicators)?;

    let dates: Vec<_> = ticker.iter().map(|bar| bar.date).collect();
    let window = select_window_padded(
        &aligned,
        &dates,
        &indicators.sma,
        &indicators.ema_fast,
        &indicators.ema_slow,
        config.window.size,
        config.window.lower_padding,
        config.window.upper_padding,
    )?;

    let last_close = ticker
        .last()
        .map(|bar| bar.close)
        .ok_or(ChartError::InsufficientData {
            indicator: "last_close",
            required: 1,
            available: 0,
        })?;

    let summary = ChartSummary {
        symbol: symbol.to_string(),
        last_close,
        abs_change: indicators.change.abs_change,
        pct_change: indicators.change.pct_change,
        adrp: indicators.adrp,
    };

    Ok(ChartDataset {
        window,
        indicators,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn year_of_data(days: usize) -> (Vec<PriceBar>, Vec<BenchmarkBar>) {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let ticker = (0..days)
            .map(|i| {
                let c = 50.0 + (i % 7) as f64;
                PriceBar::new(
                    start + Duration::days(i as i64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    Some(10),
                )
            })
            .collect();
        let benchmark = (0..days)
            .map(|i| BenchmarkBar::new(start + Duration::days(i as i64), 400.0))
            .collect();
        (ticker, benchmark)
    }

    #[test]
    fn test_prepare_descending_ticker() {
        let (mut ticker, benchmark) = year_of_data(60);
        ticker.reverse();

        let dataset = prepare("ABC", &ticker, &benchmark, &ChartConfig::default()).unwrap();
        assert_eq!(dataset.window.len(), 60);
        assert_eq!(dataset.indicators.sma.len(), 60);
        assert_eq!(dataset.summary.symbol, "ABC");
        // day 59: 59 % 7 = 3
        assert_eq!(dataset.summary.last_close, 53.0);
    }

    #[test]
    fn test_prepare_too_short_for_adrp() {
        let (ticker, benchmark) = year_of_data(10);
        let result = prepare("ABC", &ticker, &benchmark, &ChartConfig::default());
        assert!(matches!(result, Err(ChartError::InsufficientData { .. })));
    }

    #[test]
    fn test_prepare_without_overlap() {
        let (ticker, _) = year_of_data(30);
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let benchmark = vec![BenchmarkBar::new(far, 400.0)];
        let result = prepare("ABC", &ticker, &benchmark, &ChartConfig::default());
        assert!(matches!(result, Err(ChartError::EmptyWindow)));
    }
}
