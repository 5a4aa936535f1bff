//! CLI entry point for the bike trip pipeline.
//!
//! Provides subcommands for exporting the cleaned trip set as JSON, computing
//! dashboard aggregates for a selection, listing the dashboard filter options,
//! and validating a station remap file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use bike_trips::{
    analyzers::filter::ALL,
    config,
    dashboard::{Dataset, Selection},
    fetch::load_source,
    output::{print_json, write_export},
};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_trips")]
#[command(about = "Clean, join and summarize bike share trips", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Trip CSV: path or URL
    #[arg(short, long, value_name = "FILE_OR_URL", default_value = "trip_data.csv")]
    trips: String,

    /// Station CSV: path or URL
    #[arg(short, long, value_name = "FILE_OR_URL", default_value = "station_data.csv")]
    stations: String,

    /// JSON file mapping deprecated station ids to their replacements
    #[arg(short, long)]
    remap: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and join the trips, then write the JSON export
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// JSON file to write
        #[arg(short, long, default_value = "trips_data.json")]
        output: PathBuf,

        /// Gzip compress the export (implied by a `.gz` extension)
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print the four dashboard aggregates for one selection
    Dashboard {
        #[command(flatten)]
        input: InputArgs,

        /// Year-month bucket, e.g. 2015-02
        #[arg(short, long, default_value = ALL)]
        month: String,

        /// Start station name
        #[arg(long, default_value = ALL)]
        start_station: String,

        /// End station name
        #[arg(long, default_value = ALL)]
        end_station: String,

        /// Emit all 24 hours, including hours without trips
        #[arg(long, default_value_t = false)]
        dense_hours: bool,
    },
    /// Print the dashboard filter options
    Options {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Validate a remap file and log its entries
    CheckRemap {
        /// Remap file; defaults to BIKE_TRIPS_REMAP_PATH or the built-in table
        #[arg(short, long)]
        remap: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = config::log_file_path();
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bike_trips.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            gzip,
        } => {
            let dataset = load_dataset(&input).await?;
            write_export(&output, dataset.trips(), gzip)?;
            info!(path = %output.display(), "Data processed and saved");
        }
        Commands::Dashboard {
            input,
            month,
            start_station,
            end_station,
            dense_hours,
        } => {
            let dataset = load_dataset(&input).await?;
            let selection = Selection {
                year_month: month,
                start_station,
                end_station,
            };

            let view = dataset.view(&selection);
            info!(
                year_month = %selection.year_month,
                start_station = %selection.start_station,
                end_station = %selection.end_station,
                matched = view.matched_trips,
                "Dashboard view computed"
            );

            if dense_hours {
                print_json(&view.with_dense_hours())?;
            } else {
                print_json(&view)?;
            }
        }
        Commands::Options { input } => {
            let dataset = load_dataset(&input).await?;
            print_json(&dataset.options())?;
        }
        Commands::CheckRemap { remap } => {
            let table = config::load_remap(remap.as_deref())?;
            for (from, to) in table.iter() {
                info!(from, to, "Remap entry");
            }
            info!(entries = table.len(), "Remap table is valid");
        }
    }

    Ok(())
}

fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}

/// Fetches both inputs and builds the read-only dataset once.
#[tracing::instrument(skip_all, fields(trips = %input.trips, stations = %input.stations))]
async fn load_dataset(input: &InputArgs) -> Result<Arc<Dataset>> {
    let remap = config::load_remap(input.remap.as_deref())?;

    let (trips_csv, stations_csv) =
        tokio::try_join!(load_source(&input.trips), load_source(&input.stations))?;

    Ok(Dataset::from_csv(&trips_csv, &stations_csv, &remap)?)
}
