//! Technical indicators over a daily ticker series
//!
//! All functions here take the full ascending series, never a trailing
//! window, so that the moving averages are warmed up before the charted
//! range begins.

use crate::config::IndicatorConfig;
use crate::error::{ChartError, Result};
use crate::types::{IndicatorSet, PriceBar, PriceChange};
use statrs::statistics::Statistics;

fn closes(series: &[PriceBar]) -> Vec<f64> {
    series.iter().map(|bar| bar.close).collect()
}

/// Rolling mean of closes. Entries before `window - 1` are `None`.
/// A zero window yields all `None`.
pub fn sma(series: &[PriceBar], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; series.len()];
    }

    let closes = closes(series);
    (0..closes.len())
        .map(|i| {
            (i + 1 >= window)
                .then(|| closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// Exponential moving average of closes, `ema[0] = close[0]`, `alpha = 2 / (span + 1)`.
///
/// A zero span is treated as a span of 1, which reproduces the closes.
pub fn ema(series: &[PriceBar], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);

    series
        .iter()
        .scan(None, |prev: &mut Option<f64>, bar| {
            let value = match *prev {
                None => bar.close,
                Some(prev_ema) => alpha * bar.close + (1.0 - alpha) * prev_ema,
            };
            *prev = Some(value);
            Some(value)
        })
        .collect()
}

/// Average daily range over the last `n` bars as a percentage of the last close
pub fn adrp(series: &[PriceBar], n: usize) -> Result<f64> {
    if n == 0 || series.len() < n {
        return Err(ChartError::InsufficientData {
            indicator: "adrp",
            required: n.max(1),
            available: series.len(),
        });
    }

    let tail = &series[series.len() - n..];
    let average_range = tail.iter().map(PriceBar::range).mean();
    let last_close = tail[n - 1].close;

    Ok(average_range / last_close * 100.0)
}

/// Change between the two most recent closes, absolute and in percent of the prior close
pub fn change_last_two(series: &[PriceBar]) -> Result<PriceChange> {
    let [.., prev, last] = series else {
        return Err(ChartError::InsufficientData {
            indicator: "change_last_two",
            required: 2,
            available: series.len(),
        });
    };

    let abs_change = last.close - prev.close;
    Ok(PriceChange {
        abs_change,
        pct_change: abs_change / prev.close * 100.0,
    })
}

impl IndicatorSet {
    /// Compute every indicator the chart needs over the full ticker series
    pub fn compute(series: &[PriceBar], config: &IndicatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            sma: sma(series, config.sma_window),
            ema_fast: ema(series, config.ema_fast_span),
            ema_slow: ema(series, config.ema_slow_span),
            adrp: adrp(series, config.adrp_window)?,
            change: change_last_two(series)?,
        })
    }
}
