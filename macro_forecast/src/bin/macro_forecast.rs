//! # macro_forecast
//!
//! Command-line front end for the forecast and adjustment pipeline.

use clap::{Parser, Subcommand};
use macro_forecast::service::{GROWTH_FIELD, INFLATION_FIELD, INTEREST_FIELD};
use macro_forecast::{
    describe, AnalysisConfig, AnalysisRequest, ForecastError, Service, SourceFormat,
    SystemClock, UploadedFile,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "macro_forecast")]
#[command(about = "Forecast financial metrics and adjust them for macroeconomic assumptions", long_about = None)]
struct Cli {
    /// Configuration file (TOML); falls back to MACRO_FORECAST_CONFIG
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast, adjust and report on an uploaded table
    Analyze {
        /// Input file (CSV or PDF)
        #[arg(short, long)]
        input: PathBuf,

        /// Inflation rate in percent
        #[arg(long)]
        inflation_rate: Option<String>,

        /// Interest rate in percent
        #[arg(long)]
        interest_rate: Option<String>,

        /// Growth factor between 0 and 2
        #[arg(long)]
        growth_factor: Option<String>,
    },

    /// Export descriptive statistics and exploratory charts
    Describe {
        /// Input file (CSV or PDF)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macro_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match AnalysisConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Analyze {
            input,
            inflation_rate,
            interest_rate,
            growth_factor,
        } => run_analyze(
            config,
            &input,
            [
                (INFLATION_FIELD, inflation_rate),
                (INTEREST_FIELD, interest_rate),
                (GROWTH_FIELD, growth_factor),
            ],
        ),
        Commands::Describe { input } => run_describe(&config, &input),
    }
}

fn run_analyze(config: AnalysisConfig, input: &Path, fields: [(&str, Option<String>); 3]) -> ExitCode {
    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut request = AnalysisRequest::new().with_file(UploadedFile::new(filename, bytes));
    for (key, value) in fields {
        if let Some(value) = value {
            request = request.with_field(key, value);
        }
    }

    let response = Service::new(config).handle(&request);
    print_json(&response.body);

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_describe(config: &AnalysisConfig, input: &Path) -> ExitCode {
    let result = std::fs::read(input)
        .map_err(ForecastError::from)
        .and_then(|bytes| {
            let format = SourceFormat::from_filename(&input.to_string_lossy())?;
            describe(&bytes, format, config, &SystemClock)
        });

    match result {
        Ok(report) => {
            print_json(&json!({
                "run_id": report.run_id,
                "statistics_file": report.statistics_file,
                "visualizations": report.visualizations,
            }));
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_json(&json!({
                "error": e.to_string(),
                "status": e.status_code(),
            }));
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: cannot serialize response: {}", e),
    }
}
