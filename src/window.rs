//! Trailing window selection and axis bounds for the price panel

use crate::config::WindowConfig;
use crate::error::{ChartError, Result};
use crate::types::{AlignedRow, AxisBounds, ChartWindow};
use chrono::NaiveDate;
use hashbrown::HashMap;

impl AxisBounds {
    /// `lower_pad * min(low, close)` and `upper_pad * max(high, close)` over `rows`.
    /// Only ticker OHLC columns are considered.
    pub fn from_rows(rows: &[AlignedRow], lower_pad: f64, upper_pad: f64) -> Result<Self> {
        if rows.is_empty() {
            return Err(ChartError::EmptyWindow);
        }

        let (lowest, highest) = rows.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), row| (lo.min(row.low).min(row.close), hi.max(row.high).max(row.close)),
        );

        Ok(Self {
            y_min: lowest * lower_pad,
            y_max: highest * upper_pad,
        })
    }
}

/// Take the last `min(size, rows.len())` aligned rows and the matching indicator values.
///
/// `dates` is the ticker date column the indicator vectors are indexed by. Each
/// window row picks up the indicator entries for its own date, so the slices
/// stay row-aligned even when the join dropped ticker dates.
pub fn select_window(
    rows: &[AlignedRow],
    dates: &[NaiveDate],
    sma: &[Option<f64>],
    ema_fast: &[f64],
    ema_slow: &[f64],
    size: usize,
) -> Result<ChartWindow> {
    let padding = WindowConfig::default();
    select_window_padded(
        rows,
        dates,
        sma,
        ema_fast,
        ema_slow,
        size,
        padding.lower_padding,
        padding.upper_padding,
    )
}

/// `select_window` with explicit axis padding factors
#[allow(clippy::too_many_arguments)]
pub fn select_window_padded(
    rows: &[AlignedRow],
    dates: &[NaiveDate],
    sma: &[Option<f64>],
    ema_fast: &[f64],
    ema_slow: &[f64],
    size: usize,
    lower_pad: f64,
    upper_pad: f64,
) -> Result<ChartWindow> {
    if rows.is_empty() || size == 0 {
        return Err(ChartError::EmptyWindow);
    }

    if sma.len() != dates.len() || ema_fast.len() != dates.len() || ema_slow.len() != dates.len() {
        return Err(ChartError::DataError(format!(
            "Indicator lengths (sma {}, ema {}, ema {}) do not match {} ticker dates",
            sma.len(),
            ema_fast.len(),
            ema_slow.len(),
            dates.len()
        )));
    }

    let start = rows.len() - size.min(rows.len());
    let window_rows = &rows[start..];

    // later positions overwrite earlier ones for repeated dates
    let position: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();

    let mut window_sma = Vec::with_capacity(window_rows.len());
    let mut window_fast = Vec::with_capacity(window_rows.len());
    let mut window_slow = Vec::with_capacity(window_rows.len());

    for row in window_rows {
        let &i = position.get(&row.date).ok_or_else(|| {
            ChartError::DataError(format!("No indicator values for aligned date {}", row.date))
        })?;
        window_sma.push(sma[i]);
        window_fast.push(ema_fast[i]);
        window_slow.push(ema_slow[i]);
    }

    let bounds = AxisBounds::from_rows(window_rows, lower_pad, upper_pad)?;

    Ok(ChartWindow {
        rows: window_rows.to_vec(),
        sma: window_sma,
        ema_fast: window_fast,
        ema_slow: window_slow,
        bounds,
    })
}
