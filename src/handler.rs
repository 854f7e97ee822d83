//! Request handler: one chat command in, one chart notification out
//!
//! parse command -> fetch ticker and benchmark -> prepare -> render -> store -> notify

use crate::command::ChartCommand;
use crate::config::{ChartConfig, HandlerConfig};
use crate::error::Result;
use crate::notify::{build_embed, Notifier, WebhookNotifier};
use crate::pipeline::prepare;
use crate::render::{ChartRenderer, CsvChartRenderer};
use crate::sources::{FmpSource, PriceSource};
use crate::store::{ChartStore, LocalChartStore};
use crate::types::ChartSummary;
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

/// Response returned to the invoking runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: "success".to_string(),
        }
    }
}

/// Outcome of a handled command, for callers that want more than the status
#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    /// Command had no symbol option; nothing was fetched
    Skipped,
    Charted {
        summary: ChartSummary,
        chart_url: String,
    },
}

pub struct ChartHandler<S, R, St, N> {
    source: S,
    renderer: R,
    store: St,
    notifier: N,
    config: ChartConfig,
}

impl ChartHandler<FmpSource, CsvChartRenderer, LocalChartStore, WebhookNotifier> {
    /// Handler wired to FMP, the CSV renderer, the local store and the webhook
    ///
    /// Embeds link to the stored chart. Without `public_url_base` that link is a
    /// `file://` path, which the chat client cannot fetch, so the embed shows no image.
    pub fn from_config(handler_config: &HandlerConfig, config: ChartConfig) -> Result<Self> {
        let mut store = LocalChartStore::new(handler_config.output_dir.clone());
        match &handler_config.public_url_base {
            Some(base) => store = store.with_public_base(base.clone()),
            None => log::warn!("CHART_PUBLIC_URL not set, chart links are local paths"),
        }

        Ok(Self::new(
            FmpSource::from_config(handler_config)?,
            CsvChartRenderer::new(),
            store,
            WebhookNotifier::new(handler_config.webhook_base_url.clone())?,
            config,
        ))
    }
}

impl<S, R, St, N> ChartHandler<S, R, St, N>
where
    S: PriceSource,
    R: ChartRenderer,
    St: ChartStore,
    N: Notifier,
{
    pub fn new(source: S, renderer: R, store: St, notifier: N, config: ChartConfig) -> Self {
        Self {
            source,
            renderer,
            store,
            notifier,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handle one SNS event
    pub async fn handle(&self, event_json: &str) -> Result<HandlerResponse> {
        let command = ChartCommand::from_sns_event(event_json)?;
        self.handle_command(&command, Utc::now().date_naive()).await?;
        Ok(HandlerResponse::success())
    }

    /// Handle a parsed command with history requested relative to `today`
    pub async fn handle_command(
        &self,
        command: &ChartCommand,
        today: NaiveDate,
    ) -> Result<HandleOutcome> {
        let Some(symbol) = command.symbol.as_deref() else {
            log::info!("Command '{}' has no symbol option, skipping", command.command_name);
            return Ok(HandleOutcome::Skipped);
        };

        let from = today - Duration::days(self.config.lookback_days);
        let benchmark_symbol = self.config.benchmark_symbol.as_str();

        let (ticker, benchmark) = tokio::try_join!(
            self.source.fetch_daily(symbol, from),
            self.source.fetch_daily(benchmark_symbol, from),
        )?;
        log::info!(
            "Fetched {} bars for {} and {} bars for {} from {}",
            ticker.bars.len(),
            symbol,
            benchmark.bars.len(),
            benchmark_symbol,
            self.source.name()
        );

        let dataset = match prepare(
            symbol,
            ticker.price_bars(),
            &benchmark.benchmark_bars(),
            &self.config,
        ) {
            Ok(dataset) => dataset,
            Err(e) => {
                if e.is_input_error() {
                    log::warn!("Cannot chart {}: {}", symbol, e);
                }
                return Err(e);
            }
        };

        let chart = self.renderer.render(&dataset)?;
        let chart_url = self.store.put(&chart)?;

        let embed = build_embed(&dataset.summary, &chart_url);
        self.notifier
            .send(&embed, &command.application_id, &command.token)
            .await?;

        Ok(HandleOutcome::Charted {
            summary: dataset.summary,
            chart_url,
        })
    }
}
