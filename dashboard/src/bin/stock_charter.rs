use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use market_data::cache::CachedFetcher;
use market_data::providers::yahoo_chart::YahooChartProvider;

use dashboard::app::{ChartError, ChartOutcome, run_chart};
use dashboard::batch::load_items;
use dashboard::chart::TextRenderer;
use dashboard::config::{ChartConfig, load_config};
use dashboard::logging::init_logging;
use dashboard::selection::resolve_selection;

#[derive(Parser)]
#[command(version, about = "Daily stock charts in the terminal")]
struct Cli {
    /// Path to the config file (stock_charter.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render a candlestick chart for one ticker
    Chart(ChartArgs),
    /// Print the configured watchlist
    Watchlist,
    /// Render charts for a batch of tickers
    Batch(BatchArgs),
}

#[derive(Args)]
struct ChartArgs {
    /// Watchlist label or vendor symbol (e.g. "AAPL" or "Apple")
    #[arg(long)]
    symbol: String,

    /// Range start, YYYY-MM-DD; defaults to one year before today
    #[arg(long)]
    start: Option<String>,

    /// Range end, YYYY-MM-DD; defaults to today
    #[arg(long)]
    end: Option<String>,

    /// Recent bars to tabulate under the chart
    #[arg(long, default_value_t = 5)]
    tail: usize,

    /// Hide the 5-day moving average overlay
    #[arg(long)]
    hide_ma5: bool,

    /// Hide the 20-day moving average overlay
    #[arg(long)]
    hide_ma20: bool,

    /// Hide the 120-day moving average overlay
    #[arg(long)]
    hide_ma120: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Source of batch items: file, stdin, or json
    #[arg(long, default_value = "stdin")]
    source: String,

    /// Path to a JSON file (source=file) or inline JSON (source=json)
    #[arg(long)]
    input: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Watchlist => {
            for (label, symbol) in &config.watchlist {
                println!("{symbol:<12} {label}");
            }
            Ok(())
        }
        Cmd::Chart(args) => chart_cmd(config, args).await,
        Cmd::Batch(args) => batch_cmd(config, args).await,
    }
}

fn build_fetcher(config: &ChartConfig) -> Result<CachedFetcher> {
    let provider = YahooChartProvider::with_config(config.fetch.provider_config())?;
    Ok(CachedFetcher::new(Box::new(provider)))
}

async fn chart_cmd(config: ChartConfig, args: ChartArgs) -> Result<()> {
    let today = Local::now().date_naive();
    let selection = match resolve_selection(
        &config.watchlist,
        &args.symbol,
        args.start.as_deref(),
        args.end.as_deref(),
        today,
    ) {
        Ok(selection) => selection,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut overlays = config.overlays.clone();
    for (window, hide) in [
        (5, args.hide_ma5),
        (20, args.hide_ma20),
        (120, args.hide_ma120),
    ] {
        if hide {
            for overlay in overlays.iter_mut().filter(|o| o.window == window) {
                overlay.enabled = false;
            }
        }
    }

    let fetcher = build_fetcher(&config)?;
    match run_chart(&fetcher, &selection, &overlays, args.tail, &TextRenderer).await {
        Ok(ChartOutcome::Rendered(text)) => print!("{text}"),
        Ok(ChartOutcome::NoData(selection)) => println!(
            "No data for {} between {} and {}. Try a different date range.",
            selection.symbol, selection.start, selection.end
        ),
        Err(ChartError::Provider(err)) => {
            eprintln!("Market data provider unavailable: {err}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn batch_cmd(config: ChartConfig, args: BatchArgs) -> Result<()> {
    let items = load_items(&args.source, args.input.as_deref())?;
    let fetcher = build_fetcher(&config)?;
    let today = Local::now().date_naive();

    let mut success_count = 0;
    let mut error_count = 0;

    for item in &items {
        let selection = match resolve_selection(
            &config.watchlist,
            &item.symbol,
            item.start.as_deref(),
            item.end.as_deref(),
            today,
        ) {
            Ok(selection) => selection,
            Err(err) => {
                eprintln!("ERROR: {} - {}", item.symbol, err);
                error_count += 1;
                continue;
            }
        };

        match run_chart(&fetcher, &selection, &config.overlays, 5, &TextRenderer).await {
            Ok(ChartOutcome::Rendered(text)) => {
                println!("{text}");
                success_count += 1;
            }
            Ok(ChartOutcome::NoData(selection)) => {
                println!(
                    "No data for {} between {} and {}. Try a different date range.",
                    selection.symbol, selection.start, selection.end
                );
                success_count += 1;
            }
            Err(err) => {
                eprintln!("ERROR: {} - {}", selection.symbol, err);
                error_count += 1;
            }
        }
    }

    // Summary goes to stderr so stdout stays machine-readable.
    eprintln!("SUMMARY: {success_count} succeeded, {error_count} failed");
    Ok(())
}
