//! csv-mysql-import CLI - product CSV feed import into MySQL.

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use csv_mysql_import::{product, Config, ImportError, MysqlStore, StrategyKind};
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

use report::RunSummary;

#[derive(Parser)]
#[command(name = "csv-mysql-import")]
#[command(about = "Import a product CSV feed into MySQL")]
#[command(version)]
struct Cli {
    /// CSV file path
    file: PathBuf,

    /// Perform the database insert (default: validate and report only)
    #[arg(long)]
    execute: bool,

    /// Insert strategy: batch or each
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Records per multi-row statement (batch strategy)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Path to YAML configuration file [default: config.yaml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON run summary to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, ImportError> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, &cli.log_format);

    let started = Instant::now();

    println!("Work has been started...");
    println!("Looking for data file {} ...", cli.file.display());

    if !cli.file.exists() {
        eprintln!("Can not find CSV file!");
        return Ok(ExitCode::FAILURE);
    }

    println!("Data file has been found");

    // Config is optional for dry runs; --execute needs database credentials.
    let config = load_config(&cli)?;
    let strategy = cli
        .strategy
        .or_else(|| config.as_ref().map(|c| c.import.strategy))
        .unwrap_or(StrategyKind::Batch);
    let batch_size = cli
        .batch_size
        .or_else(|| config.as_ref().map(|c| c.import.batch_size))
        .unwrap_or(csv_mysql_import::DEFAULT_BATCH_SIZE);

    let pipeline = product::pipeline()
        .with_strategy(strategy)
        .with_batch_size(batch_size);

    println!("Reading CSV data...");

    let validation = pipeline.validate_file(&cli.file)?;

    println!(
        "{} rows detected. Validating CSV data...",
        validation.processed()
    );
    println!("Rows processed: {}", validation.processed());
    println!("Valid rows: {}", validation.valid().len());
    println!("Incorrect rows: {}", validation.invalid().len());
    println!("Skipped rows: {}", validation.skipped().len());

    if validation.valid().is_empty() {
        eprintln!("All lines are incorrect. Probably the whole CSV file is broken");
        return Ok(ExitCode::FAILURE);
    }

    let rules = product::rules();
    let headers: Vec<&str> = rules.fields().collect();

    if !validation.invalid().is_empty() {
        println!("\nIncorrect rows ({})", validation.invalid().len());
        println!("{}", report::record_table(&headers, validation.invalid()));
    }

    if !validation.skipped().is_empty() {
        println!("\nSkipped rows ({})", validation.skipped().len());
        println!("{}", report::record_table(&headers, validation.skipped()));
    }

    let mut failed_rows = None;

    if cli.execute {
        let Some(config) = &config else {
            return Err(ImportError::config(
                "--execute requires database configuration; pass --config or create config.yaml",
            ));
        };

        let mut store = MysqlStore::connect(&config.database).await?;

        println!(
            "\nInserting valid data to database via \"{}\" strategy...",
            strategy
        );

        let result = pipeline.persist(&mut store, validation.valid()).await?;

        println!("Data has been inserted/updated to database");

        if result.failed_count() > 0 {
            println!("\nFailed rows ({})", result.failed_count());
            println!("{}", report::record_table(&headers, result.failed()));
        }

        failed_rows = Some(result.failed_count());
        store.disconnect().await?;
    } else {
        info!("dry run, skipping database insert");
    }

    let duration_seconds = started.elapsed().as_secs_f64();
    println!("\nDuration: {:.2}s", duration_seconds);

    if cli.output_json {
        let summary = RunSummary {
            file: cli.file.display().to_string(),
            strategy: strategy.to_string(),
            executed: cli.execute,
            rows_processed: validation.processed(),
            valid_rows: validation.valid().len(),
            incorrect_rows: validation.invalid().len(),
            skipped_rows: validation.skipped().len(),
            failed_rows,
            duration_seconds,
        };
        println!("{}", summary.to_json()?);
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve configuration: an explicit --config path must load, the default
/// config.yaml is used when present, and --execute without either is an
/// error before any database work starts.
fn load_config(cli: &Cli) -> Result<Option<Config>, ImportError> {
    match &cli.config {
        Some(path) => Config::load(path).map(Some),
        None => {
            let default = Path::new("config.yaml");
            if default.exists() {
                Config::load(default).map(Some)
            } else if cli.execute {
                Err(ImportError::config(
                    "--execute requires database configuration; pass --config or create config.yaml",
                ))
            } else {
                Ok(None)
            }
        }
    }
}

fn setup_logging(verbose: u8, format: &str) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
