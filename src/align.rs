//! Date alignment of a ticker series against a benchmark series
//!
//! The join is an inner join on calendar date: ticker-only and benchmark-only
//! dates are dropped. Each surviving row carries the relative-strength ratio
//! `ticker close / benchmark close`.

use crate::error::{ChartError, Result};
use crate::types::{AlignedRow, BenchmarkBar, PriceBar};
use chrono::NaiveDate;
use hashbrown::HashMap;

/// Anything with a calendar date that can be put in ascending order
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for PriceBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for BenchmarkBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Sort a series ascending by date. Stable, so equal dates keep their input order.
pub fn normalize_order<T: Dated>(series: &mut [T]) {
    series.sort_by_key(|item| item.date());
}

/// True when the series is ascending (equal neighbours allowed)
pub fn is_ascending<T: Dated>(series: &[T]) -> bool {
    series.windows(2).all(|w| w[0].date() <= w[1].date())
}

/// Inner-join `ticker` and `benchmark` on date and compute the RS ratio.
///
/// Inputs may come in either order; output is strictly ascending by date.
/// When a date repeats inside one input, its last occurrence wins.
/// Returns an empty vector when the two series share no dates.
pub fn align_series(ticker: &[PriceBar], benchmark: &[BenchmarkBar]) -> Result<Vec<AlignedRow>> {
    let mut benchmark_sorted = benchmark.to_vec();
    normalize_order(&mut benchmark_sorted);

    let benchmark_close: HashMap<NaiveDate, f64> = benchmark_sorted
        .iter()
        .map(|bar| (bar.date, bar.close))
        .collect();

    let mut ticker_sorted = ticker.to_vec();
    normalize_order(&mut ticker_sorted);

    let mut rows = Vec::with_capacity(ticker_sorted.len().min(benchmark_close.len()));
    let mut iter = ticker_sorted.iter().peekable();

    while let Some(bar) = iter.next() {
        // skip to the last bar of a run of equal dates
        if iter.peek().is_some_and(|next| next.date == bar.date) {
            continue;
        }

        let Some(&bench) = benchmark_close.get(&bar.date) else {
            continue;
        };

        if bench == 0.0 {
            return Err(ChartError::DivisionByZero { date: bar.date });
        }

        rows.push(AlignedRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            benchmark_close: bench,
            rs_ratio: bar.close / bench,
        });
    }

    Ok(rows)
}
