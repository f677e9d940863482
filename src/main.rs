//! CLI entry point for the quiz season ranker.
//!
//! Merges the Friday and Saturday division reports into one ranked season
//! table, and offers a couple of inspection commands for checking inputs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quiz_season_ranker::config::RankerConfig;
use quiz_season_ranker::error::RankerError;
use quiz_season_ranker::output::{print_json, print_pretty};
use quiz_season_ranker::source::DirectorySource;
use quiz_season_ranker::standings::division::parse_division;
use quiz_season_ranker::standings::pipeline;
use quiz_season_ranker::standings::types::{DuplicatePolicy, MAX_AVERAGE_PRECISION};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quiz_season_ranker")]
#[command(about = "Merge two days of quiz division reports into a ranked season table", long_about = None)]
struct Cli {
    /// JSON config file; values given on the command line take precedence
    #[arg(short, long, global = true, env = "QUIZ_RANKER_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Overrides {
    /// Directory containing the division reports
    #[arg(short, long, global = true)]
    input_dir: Option<PathBuf>,

    /// CSV file to write the ranked report to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Decimal places kept in the combined average
    #[arg(
        short,
        long,
        global = true,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_AVERAGE_PRECISION))
    )]
    precision: Option<u32>,

    /// Fail when a quizzer competed on only one of the two days
    #[arg(long, global = true, default_value_t = false)]
    require_both_days: bool,

    /// Fail when two divisions of the same day report the same quizzer
    #[arg(long, global = true, default_value_t = false)]
    reject_duplicates: bool,

    /// Add Friday/Saturday placement and round columns to the report
    #[arg(long, global = true, default_value_t = false)]
    detailed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge both days and write the ranked season report (the default)
    Rank,
    /// Parse a single division report and print its quizzer records as JSON
    Division {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text identifying the results tables; defaults to the configured locator
        #[arg(short, long)]
        locator: Option<String>,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<RankerError>().map_or(1, RankerError::exit_code);
            error!(error = %format!("{e:#}"), exit_code = code, "Run aborted");
            ExitCode::from(code)
        }
    }
}

/// Logging setup: colored stderr + JSON rolling log file
fn init_logging() -> WorkerGuard {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/quiz_season_ranker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quiz_season_ranker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

fn run(cli: Cli) -> Result<()> {
    let config = effective_config(cli.config.as_deref(), &cli.overrides)?;

    match cli.command.unwrap_or(Commands::Rank) {
        Commands::Rank => {
            info!(
                input_dir = %config.input_dir.display(),
                output = %config.output.display(),
                precision = config.average_precision,
                require_both_days = config.require_both_days,
                "Ranking season"
            );
            let source = DirectorySource::new(&config.input_dir, &config.extension);
            let summary = pipeline::run(&source, &config)
                .with_context(|| format!("season report {} not written", config.output.display()))?;
            print_pretty(&summary);
        }
        Commands::Division { file, locator } => {
            let markup = std::fs::read_to_string(&file).map_err(|source| {
                RankerError::SourceNotFound {
                    path: file.clone(),
                    source,
                }
            })?;
            let name = file
                .file_stem()
                .and_then(OsStr::to_str)
                .unwrap_or("division");
            let locator = locator.unwrap_or_else(|| config.locator.clone());

            let results = parse_division(name, &markup, &locator)?;
            info!(
                division = %results.division,
                rounds = results.rounds,
                quizzers = results.quizzers.len(),
                "Division parsed"
            );
            print_json(&results)?;
        }
        Commands::ShowConfig => {
            print_json(&config)?;
        }
    }

    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn effective_config(path: Option<&Path>, overrides: &Overrides) -> Result<RankerConfig> {
    let mut config = match path {
        Some(path) => RankerConfig::load(path)?,
        None => RankerConfig::default(),
    };

    if let Some(dir) = &overrides.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(output) = &overrides.output {
        config.output = output.clone();
    }
    if let Some(precision) = overrides.precision {
        config.average_precision = precision;
    }
    if overrides.require_both_days {
        config.require_both_days = true;
    }
    if overrides.reject_duplicates {
        config.duplicates = DuplicatePolicy::Reject;
    }
    if overrides.detailed {
        config.detailed = true;
    }

    config.validate().map_err(|reason| RankerError::Config {
        path: path.map_or_else(|| PathBuf::from("<command line>"), Path::to_path_buf),
        reason,
    })?;
    Ok(config)
}
