//! rusty-chartbot CLI - prepare daily charts from FMP history
//!
//! ## Example Usage
//!
//! ```bash
//! # Prepare a chart from saved FMP responses
//! rusty-chartbot prepare --ticker nvda.json --benchmark spy.json --symbol NVDA
//!
//! # Fetch live data (requires FMP_API_KEY)
//! rusty-chartbot fetch NVDA --out ./charts-out
//!
//! # Replay an SNS event through the full handler
//! rusty-chartbot handle --event event.json
//! ```

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rusty_chartbot::config::{ChartConfig, DEFAULT_OUTPUT_DIR};
use rusty_chartbot::notify::build_embed;
use rusty_chartbot::pipeline::prepare;
use rusty_chartbot::render::{ChartRenderer, CsvChartRenderer};
use rusty_chartbot::sources::parse_historical;
use rusty_chartbot::store::{ChartStore, LocalChartStore};
use rusty_chartbot::types::ChartDataset;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// rusty-chartbot: daily chart preparation against a benchmark
#[derive(Parser)]
#[command(name = "rusty-chartbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Daily stock chart preparation with RS line, moving averages and ADR%",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Chart configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare a chart from saved FMP JSON responses
    Prepare {
        /// Ticker history (historical-price-full JSON)
        #[arg(short = 't', long)]
        ticker: PathBuf,

        /// Benchmark history (historical-price-full JSON)
        #[arg(short = 'b', long)]
        benchmark: PathBuf,

        /// Symbol label; defaults to the symbol in the ticker file
        #[arg(short = 's', long)]
        symbol: Option<String>,

        /// Directory for the chart artifact
        #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,
    },

    /// Fetch live history from FMP and prepare a chart
    #[cfg(feature = "async")]
    Fetch {
        /// Ticker symbol
        #[arg(value_name = "SYMBOL")]
        symbol: String,

        /// Directory for the chart artifact
        #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,
    },

    /// Run the full handler on an SNS event file
    #[cfg(feature = "async")]
    Handle {
        /// SNS event JSON
        #[arg(short = 'e', long)]
        event: PathBuf,
    },

    /// Show version and effective configuration
    Info,
}

/// Explicit `--config` file, else `<home>/.rusty-chartbot/config.toml`, else defaults
fn load_config(path: Option<&Path>, home: Option<PathBuf>) -> anyhow::Result<ChartConfig> {
    if let Some(config_path) = path {
        return ChartConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()));
    }

    if let Some(home) = home {
        let default_config = home.join(".rusty-chartbot").join("config.toml");
        if default_config.exists() {
            match ChartConfig::from_file(&default_config) {
                Ok(config) => return Ok(config),
                Err(e) => eprintln!(
                    "{} Ignoring {}: {}",
                    "Warning:".yellow(),
                    default_config.display(),
                    e
                ),
            }
        }
    }

    Ok(ChartConfig::default())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), dirs::home_dir()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!(
            "{} v{}",
            "rusty-chartbot".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
    }

    let result = match cli.command {
        Commands::Prepare {
            ticker,
            benchmark,
            symbol,
            out,
        } => prepare_from_files(&ticker, &benchmark, symbol, &out, &config),

        #[cfg(feature = "async")]
        Commands::Fetch { symbol, out } => fetch_and_prepare(&symbol, &out, &config),

        #[cfg(feature = "async")]
        Commands::Handle { event } => handle_event(&event, config),

        Commands::Info => show_info(&config),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

#[cfg_attr(not(feature = "async"), allow(dead_code))]
fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.to_string());
    Ok(pb)
}

fn prepare_from_files(
    ticker_path: &Path,
    benchmark_path: &Path,
    symbol: Option<String>,
    out: &Path,
    config: &ChartConfig,
) -> anyhow::Result<()> {
    let ticker = parse_historical(
        &fs::read_to_string(ticker_path)
            .with_context(|| format!("Failed to read {}", ticker_path.display()))?,
    )?;
    let benchmark = parse_historical(
        &fs::read_to_string(benchmark_path)
            .with_context(|| format!("Failed to read {}", benchmark_path.display()))?,
    )?;

    let Some(symbol) = symbol.or(ticker.symbol.clone()) else {
        bail!("No symbol given and none found in {}", ticker_path.display());
    };

    let dataset = prepare(
        &symbol,
        ticker.price_bars(),
        &benchmark.benchmark_bars(),
        config,
    )?;
    store_and_report(&dataset, out)
}

#[cfg(feature = "async")]
fn fetch_and_prepare(symbol: &str, out: &Path, config: &ChartConfig) -> anyhow::Result<()> {
    use rusty_chartbot::config::HandlerConfig;
    use rusty_chartbot::sources::{FmpSource, PriceSource};

    let handler_config = HandlerConfig::from_env()?;
    let source = FmpSource::from_config(&handler_config)?;
    let symbol = symbol.trim().to_uppercase();
    let from = chrono::Utc::now().date_naive() - chrono::Duration::days(config.lookback_days);

    let pb = spinner(&format!(
        "Fetching {} and {} from FMP...",
        symbol, config.benchmark_symbol
    ))?;
    let runtime = tokio::runtime::Runtime::new()?;
    let (ticker, benchmark) = runtime.block_on(async {
        tokio::try_join!(
            source.fetch_daily(&symbol, from),
            source.fetch_daily(&config.benchmark_symbol, from),
        )
    })?;
    pb.finish_and_clear();

    let dataset = prepare(
        &symbol,
        ticker.price_bars(),
        &benchmark.benchmark_bars(),
        config,
    )?;
    store_and_report(&dataset, out)
}

#[cfg(feature = "async")]
fn handle_event(event_path: &Path, config: ChartConfig) -> anyhow::Result<()> {
    use rusty_chartbot::config::HandlerConfig;
    use rusty_chartbot::handler::ChartHandler;

    let event = fs::read_to_string(event_path)
        .with_context(|| format!("Failed to read {}", event_path.display()))?;
    let handler_config = HandlerConfig::from_env()?;
    let handler = ChartHandler::from_config(&handler_config, config)?;

    let pb = spinner("Handling chart command...")?;
    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(handler.handle(&event))?;
    pb.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn store_and_report(dataset: &ChartDataset, out: &Path) -> anyhow::Result<()> {
    let chart = CsvChartRenderer::new().render(dataset)?;
    let link = LocalChartStore::new(out).put(&chart)?;
    let embed = build_embed(&dataset.summary, &link);

    println!("{}", embed.title.green().bold());
    println!("{}", "=".repeat(embed.title.len()).green());
    for field in &embed.fields {
        println!("  {} {}", format!("{}:", field.name).bold(), field.value);
    }
    if let Some((first, last)) = dataset.window.date_range() {
        let count = dataset.window.len();
        println!("  {} {} rows, {} to {}", "Window:".bold(), count, first, last);
    }
    let (low, high) = (dataset.window.bounds.y_min, dataset.window.bounds.y_max);
    println!("  {} {:.2} - {:.2}", "Axis:".bold(), low, high);
    println!();
    println!("{} Chart written to {}", "✓".green().bold(), link);
    Ok(())
}

fn show_info(config: &ChartConfig) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "rusty-chartbot".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("{}", "Configuration".green().bold());
    println!("  {} {}", "Benchmark:".bold(), config.benchmark_symbol);
    println!("  {} {} days", "Lookback:".bold(), config.lookback_days);
    println!(
        "  {} SMA {}, EMA {}/{}, ADR% {}",
        "Indicators:".bold(),
        config.indicators.sma_window,
        config.indicators.ema_fast_span,
        config.indicators.ema_slow_span,
        config.indicators.adrp_window
    );
    println!(
        "  {} {} rows, padding {}/{}",
        "Window:".bold(),
        config.window.size,
        config.window.lower_padding,
        config.window.upper_padding
    );
    println!(
        "  {} {}",
        "Live fetch:".bold(),
        feature_status(cfg!(feature = "async"))
    );
    Ok(())
}

fn feature_status(enabled: bool) -> colored::ColoredString {
    if enabled {
        "enabled".green()
    } else {
        "disabled".yellow()
    }
}
