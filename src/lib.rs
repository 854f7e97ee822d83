//! # rusty_chartbot
//!
//! Chart-data preparation for a chat-command stock charting bot.
//!
//! A ticker's daily bars are inner-joined with a benchmark's closes to derive a
//! relative-strength ratio, moving averages and the average daily range are
//! computed over the full history, and the trailing window plus padded axis
//! bounds are handed to a renderer. The surrounding collaborators (FMP fetch,
//! artifact store, webhook) live in their own modules.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rusty_chartbot::prelude::*;
//!
//! # fn run(ticker: Vec<PriceBar>, spy: Vec<BenchmarkBar>) -> Result<()> {
//! let dataset = prepare("NVDA", &ticker, &spy, &ChartConfig::default())?;
//! println!("{:.2} ({:.2}%)", dataset.summary.last_close, dataset.summary.pct_change);
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod command;
pub mod config;
pub mod error;
#[cfg(feature = "async")]
pub mod handler;
pub mod indicators;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod store;
pub mod types;
pub mod window;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::align::align_series;
    pub use crate::config::{ChartConfig, HandlerConfig, IndicatorConfig, WindowConfig};
    pub use crate::error::{ChartError, Result};
    pub use crate::indicators::{adrp, change_last_two, ema, sma};
    pub use crate::pipeline::prepare;
    pub use crate::types::*;
    pub use crate::window::select_window;
}
