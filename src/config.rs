//! Configuration for chart preparation and for the request handler
//!
//! `ChartConfig` holds the indicator and window parameters and can be loaded
//! from TOML. `HandlerConfig` holds the credentials and endpoints the
//! collaborators need and is read from the environment.

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_OUTPUT_DIR: &str = "./charts-out";

/// Indicator windows and spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_window: usize,
    pub ema_fast_span: usize,
    pub ema_slow_span: usize,
    pub adrp_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_window: 50,
            ema_fast_span: 10,
            ema_slow_span: 21,
            adrp_window: 20,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("sma_window", self.sma_window),
            ("ema_fast_span", self.ema_fast_span),
            ("ema_slow_span", self.ema_slow_span),
            ("adrp_window", self.adrp_window),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ChartError::ConfigError(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Trailing window size and value-axis padding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub size: usize,
    pub lower_padding: f64,
    pub upper_padding: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: 120,
            lower_padding: 0.95,
            upper_padding: 1.05,
        }
    }
}

/// Everything `pipeline::prepare` needs besides the two price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub indicators: IndicatorConfig,
    pub window: WindowConfig,
    pub benchmark_symbol: String,
    /// Calendar days of history to request
    pub lookback_days: i64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            window: WindowConfig::default(),
            benchmark_symbol: "SPY".to_string(),
            lookback_days: 365,
        }
    }
}

impl ChartConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ChartConfig = toml::from_str(contents)
            .map_err(|e| ChartError::ConfigError(format!("Invalid chart config: {}", e)))?;
        config.indicators.validate()?;
        if config.lookback_days <= 0 {
            return Err(ChartError::ConfigError(
                "lookback_days must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Endpoints, credentials and output location for the collaborators
#[derive(Clone, PartialEq)]
pub struct HandlerConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub webhook_base_url: String,
    pub output_dir: PathBuf,
    /// Public URL the output directory is served under
    pub public_url_base: Option<String>,
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("webhook_base_url", &self.webhook_base_url)
            .field("output_dir", &self.output_dir)
            .field("public_url_base", &self.public_url_base)
            .finish()
    }
}

impl HandlerConfig {
    /// Read `FMP_API_KEY`, `CHART_BUCKET`, `CHART_PUBLIC_URL`, `FMP_BASE_URL` and
    /// `DISCORD_API_BASE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("FMP_API_KEY")
            .ok_or_else(|| ChartError::ConfigError("FMP_API_KEY is not set".to_string()))?;

        Ok(Self {
            api_base_url: non_empty("FMP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FMP_BASE_URL.to_string()),
            api_key,
            webhook_base_url: non_empty("DISCORD_API_BASE")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_BASE_URL.to_string()),
            output_dir: non_empty("CHART_BUCKET")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            public_url_base: non_empty("CHART_PUBLIC_URL"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.indicators.sma_window, 50);
        assert_eq!(config.indicators.ema_fast_span, 10);
        assert_eq!(config.indicators.ema_slow_span, 21);
        assert_eq!(config.indicators.adrp_window, 20);
        assert_eq!(config.window.size, 120);
        assert_eq!(config.benchmark_symbol, "SPY");
    }

    #[test]
    fn test_partial_toml() {
        let config = ChartConfig::from_toml_str(
            r#"
            benchmark_symbol = "QQQ"

            [window]
            size = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.benchmark_symbol, "QQQ");
        assert_eq!(config.window.size, 60);
        assert_eq!(config.window.lower_padding, 0.95);
        assert_eq!(config.indicators, IndicatorConfig::default());
    }

    #[test]
    fn test_zero_span_rejected() {
        let result = ChartConfig::from_toml_str("[indicators]\nema_fast_span = 0\n");
        assert!(matches!(result, Err(ChartError::ConfigError(_))));
    }

    #[test]
    fn test_handler_config_from_lookup() {
        let vars: HashMap<&str, &str> =
            [("FMP_API_KEY", "secret"), ("CHART_BUCKET", "/tmp/charts")].into();
        let lookup = |k: &str| vars.get(k).map(|v| v.to_string());
        let config = HandlerConfig::from_lookup(lookup).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_base_url, DEFAULT_FMP_BASE_URL);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/charts"));
        assert_eq!(config.public_url_base, None);
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_handler_config_public_url() {
        let vars: HashMap<&str, &str> = [
            ("FMP_API_KEY", "secret"),
            ("CHART_PUBLIC_URL", "https://charts.example.com"),
        ]
        .into();
        let lookup = |k: &str| vars.get(k).map(|v| v.to_string());
        let config = HandlerConfig::from_lookup(lookup).unwrap();

        assert_eq!(
            config.public_url_base.as_deref(),
            Some("https://charts.example.com")
        );
    }

    #[test]
    fn test_handler_config_requires_key() {
        let result = HandlerConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ChartError::ConfigError(_))));
    }
}
