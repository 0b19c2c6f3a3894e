use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ta_engine::data::{write_csv, write_json};
use ta_engine::frame::SYMBOL;
use ta_engine::{
    generate_multi_symbol_bars, generate_synthetic_bars, load_file, IndicatorParameters,
    IndicatorPipeline, Table,
};

#[derive(Parser, Debug)]
#[command(name = "ta-engine")]
#[command(version = "0.1.0")]
#[command(about = "Technical indicator engine for OHLCV tables", long_about = None)]
struct Args {
    /// Data file path (CSV/JSON). If not provided, uses synthetic data.
    #[arg(short = 'f', long)]
    data_file: Option<PathBuf>,

    /// Indicator parameters as JSON; omitted fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column to compute indicators within (e.g. symbol)
    #[arg(short, long)]
    group_by: Option<String>,

    /// Price column the single-series indicators read (default from config, else close)
    #[arg(long)]
    source: Option<String>,

    /// Number of days of synthetic data
    #[arg(short, long, default_value = "120")]
    days: usize,

    /// Comma-separated symbols for synthetic data; grouped by symbol
    #[arg(short, long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Initial price for synthetic data
    #[arg(long, default_value = "50.0")]
    initial_price: f64,

    /// Seed for synthetic data
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output format (json, csv)
    #[arg(short, long, default_value = "json")]
    output: String,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            IndicatorParameters::from_json(&json)?
        }
        None => IndicatorParameters::default(),
    };

    // Load or generate data
    let table = if let Some(path) = &args.data_file {
        info!(path = %path.display(), "loading data");
        load_file(path)?
    } else if args.symbols.is_empty() {
        info!(days = args.days, initial_price = args.initial_price, "generating synthetic data");
        Table::from_bars(&generate_synthetic_bars(args.days, args.initial_price, args.seed))
    } else {
        info!(days = args.days, symbols = ?args.symbols, "generating synthetic data");
        let symbols: Vec<&str> = args.symbols.iter().map(String::as_str).collect();
        if params.group_by.is_none() {
            params = params.with_group_by(SYMBOL);
        }
        Table::from_bars(&generate_multi_symbol_bars(
            &symbols,
            args.days,
            args.initial_price,
            args.seed,
        ))
    };

    if let Some(key) = &args.group_by {
        params = params.with_group_by(key.clone());
    }
    if let Some(source) = &args.source {
        params = params.with_source(source.clone());
    }

    let result = IndicatorPipeline::new(params).run(&table)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.output.as_str() {
        "json" => {
            write_json(&result, &mut out, args.pretty)?;
            writeln!(out)?;
        }
        "csv" => write_csv(&result, &mut out)?,
        other => bail!("Unknown output format: {}", other),
    }
    out.flush()?;

    Ok(())
}
