//! # popcast
//!
//! Command-line interface for age-group population forecasting.

use clap::{Parser, Subcommand, ValueEnum};
use popcast_facade::prelude::*;
use popcast_facade::{golden_periods, YearWindow};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "popcast")]
#[command(about = "Population forecasting by age group", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit every model and rank them against the projection years
    Evaluate {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// First projection year (overrides detection)
        #[arg(long)]
        boundary: Option<i32>,

        /// First training year
        #[arg(long)]
        train_start: Option<i32>,

        /// Last training year
        #[arg(long)]
        train_end: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast one age group with one model over a year range
    Forecast {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Age group (young, working-age, elderly)
        #[arg(short, long)]
        target: TargetColumn,

        /// Model (knn, random-forest, polynomial)
        #[arg(short, long)]
        model: ModelKind,

        /// First forecast year
        #[arg(long)]
        from: i32,

        /// Last forecast year
        #[arg(long)]
        to: i32,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Headline statistics and golden-population periods
    Summary {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// First year of the range
        #[arg(long)]
        start: Option<i32>,

        /// Last year of the range
        #[arg(long)]
        end: Option<i32>,

        /// Minimum working-age share for a golden year
        #[arg(long)]
        threshold: Option<f64>,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> CliResult<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path).map_err(|e| e.to_string()),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_dataset(pipeline: &Pipeline, input: &Path) -> CliResult<Dataset> {
    let data = pipeline.load(input).map_err(|e| e.to_string())?;
    if data.is_empty() {
        return Err(format!("No usable rows in {}", input.display()));
    }
    Ok(data)
}

/// Write JSON to a file or stdout
fn write_json(value: &serde_json::Value, output: Option<&Path>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, value)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        info!(path = %path.display(), "results written");
    } else {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{}", text);
    }
    Ok(())
}

fn window(start: Option<i32>, end: Option<i32>) -> Option<YearWindow> {
    match (start, end) {
        (None, None) => None,
        (start, end) => Some(YearWindow::new(
            start.unwrap_or(i32::MIN),
            end.unwrap_or(i32::MAX),
        )),
    }
}

/// Run evaluate command
fn run_evaluate(
    input: PathBuf,
    config: Option<PathBuf>,
    boundary: Option<i32>,
    train_window: Option<YearWindow>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = load_config(config.as_deref())?;
    if let Some(year) = boundary {
        config.loader.boundary_year = Some(year);
    }
    if let Some(window) = train_window {
        config.training_window = Some(window);
    }

    let pipeline = Pipeline::new(config);
    let data = load_dataset(&pipeline, &input)?;
    if data.projection().is_empty() {
        warn!("dataset has no projection rows; every unit will be skipped (set --boundary)");
    }

    let report = pipeline.run(&data).map_err(|e| e.to_string())?;

    match format {
        OutputFormat::Table => {
            let text = report.to_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, text).map_err(|e| format!("Failed to write output: {}", e))?;
                    info!(path = %path.display(), "report written");
                }
                None => print!("{}", text),
            }
        }
        OutputFormat::Json => {
            let value = serde_json::to_value(&report).map_err(|e| e.to_string())?;
            write_json(&value, output.as_deref())?;
        }
    }

    Ok(())
}

/// Run forecast command
fn run_forecast(
    input: PathBuf,
    target: TargetColumn,
    model: ModelKind,
    from: i32,
    to: i32,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config(config.as_deref())?
        .with_kinds(vec![model])
        .with_targets(vec![target]);
    let pipeline = Pipeline::new(config);
    let data = load_dataset(&pipeline, &input)?;

    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    let years: Vec<i32> = (lo..=hi).collect();

    let set = pipeline.fit_target(&data, target).map_err(|e| e.to_string())?;
    let forecasts = set.forecast(model, target, &years).map_err(|e| e.to_string())?;

    let json = serde_json::json!({
        "model": model,
        "target": target,
        "years": years,
        "forecasts": forecasts,
    });
    write_json(&json, output.as_deref())
}

/// Run summary command
fn run_summary(
    input: PathBuf,
    start: Option<i32>,
    end: Option<i32>,
    threshold: Option<f64>,
    config: Option<PathBuf>,
) -> CliResult<()> {
    let config = load_config(config.as_deref())?;
    let threshold = threshold.unwrap_or(config.golden_threshold);
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(format!("Threshold must be in (0, 1], got {}", threshold));
    }

    let pipeline = Pipeline::new(config);
    let data = load_dataset(&pipeline, &input)?;
    let range = select(
        &data,
        start.unwrap_or(i32::MIN),
        end.unwrap_or(i32::MAX),
    );

    let summary = summarize(&range).ok_or_else(|| "Selected range is empty".to_string())?;
    let golden = golden_periods(&range, threshold);

    println!("Years: {}-{} ({} rows)", summary.first_year, summary.last_year, summary.years);
    println!(
        "Total: {:.1}M -> {:.1}M ({:+.1}M, {:+.1}%)",
        summary.start_total, summary.end_total, summary.change, summary.percent_change
    );
    println!("Age structure in {}:", summary.last_year);
    println!("  Young (0-14): {:.1}%", summary.end_shares.young * 100.0);
    println!("  Working (15-64): {:.1}%", summary.end_shares.working_age * 100.0);
    println!("  Elderly (65+): {:.1}%", summary.end_shares.elderly * 100.0);

    if golden.is_empty() {
        println!("No golden-population years at threshold {:.3}", threshold);
    } else {
        println!("Golden-population periods (working-age share >= {:.3}):", threshold);
        for span in golden {
            println!("  {}-{} ({} years)", span.start, span.end, span.len());
        }
    }

    Ok(())
}

fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popcast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            input,
            config,
            boundary,
            train_start,
            train_end,
            format,
            output,
        } => run_evaluate(
            input,
            config,
            boundary,
            window(train_start, train_end),
            format,
            output,
        ),

        Commands::Forecast {
            input,
            target,
            model,
            from,
            to,
            config,
            output,
        } => run_forecast(input, target, model, from, to, config, output),

        Commands::Summary {
            input,
            start,
            end,
            threshold,
            config,
        } => run_summary(input, start, end, threshold, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
