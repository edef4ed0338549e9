//! Forecast CLI
//!
//! Geocodes a Bhutanese locality, loads the newest forecast table and prints
//! the point forecast report as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use forecast_common::{ForecastParam, NamedPlace, QueryPoint};
use forecast_grid::ForecastQuery;
use forecast_ingest::{load_dataset, DatasetSelection, LoadedDataset};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use forecast_cli::{
    build_report, CliConfig, LocationQuery, NominatimClient, OverpassClient, ReportRequest,
};

/// Forecast CLI
#[derive(Parser, Debug)]
#[command(name = "forecast-cli")]
#[command(about = "Point weather forecast for Bhutanese localities")]
struct Args {
    /// Locality, e.g. a village or neighbourhood
    #[arg(long, default_value = "Changzamtog")]
    locality: String,

    /// Gewog or thromde containing the locality
    #[arg(long, default_value = "Thimphu Thromde")]
    gewog: String,

    /// Dzongkhag containing the gewog
    #[arg(long, default_value = "Thimphu")]
    dzongkhag: String,

    /// Latitude; skips geocoding when given with --lon
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude; skips geocoding when given with --lat
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Parameter for the main series (temperature, precipitation, surface_runoff)
    #[arg(short, long)]
    param: Option<ForecastParam>,

    /// Radius for precipitation totals (km)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Hour offsets to report (default: all in the dataset)
    #[arg(long = "hour", value_delimiter = ',')]
    hours: Vec<u32>,

    /// Directory holding forecast CSV files
    #[arg(long, env = "FORECAST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Which CSV in the data directory to load (oldest, newest)
    #[arg(long, env = "FORECAST_DATASET_SELECTION")]
    dataset: Option<DatasetSelection>,

    /// Search radius for nearby places (metres)
    #[arg(long, default_value_t = 10_000)]
    places_radius_m: u32,

    /// Skip the nearby-places lookup
    #[arg(long)]
    no_places: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr so stdout carries only the report
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let mut config = CliConfig::from_env()?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(selection) = args.dataset {
        config.dataset_selection = selection;
    }
    info!(data_dir = %config.data_dir.display(), "Starting forecast CLI");

    let data_dir = config.data_dir.clone();
    let selection = config.dataset_selection;
    let loading = tokio::task::spawn_blocking(move || load_dataset(&data_dir, selection));

    let client = config.http_client().context("Failed to create HTTP client")?;

    let location = LocationQuery::new(&args.locality, &args.gewog, &args.dzongkhag);
    let (point, location_name) = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => (QueryPoint::new(lat, lon), None),
        _ => {
            let geocoder = NominatimClient::new(client.clone(), config.nominatim_url.clone());
            let point = geocoder
                .search(&location)
                .await
                .with_context(|| format!("Failed to geocode '{}'", location))?;
            match point {
                Some(point) => (point, Some(location.to_string())),
                None => bail!("Location not found: {}", location),
            }
        }
    };

    let places = if args.no_places {
        Vec::new()
    } else {
        nearby_places(&config, client, point, args.places_radius_m).await
    };

    let LoadedDataset { source, dataset } = loading
        .await
        .context("Dataset loading task failed")?
        .with_context(|| format!("Failed to load forecast data from {}", config.data_dir.display()))?;
    info!(source = %source.display(), "Using forecast table");

    let radius_km = args.radius_km.unwrap_or(config.grid.default_radius_km);
    let query = ForecastQuery::new(Arc::new(dataset), config.grid.clone())?;

    let request = ReportRequest {
        location_name,
        point,
        param: args.param,
        radius_km,
        time_offsets: args.hours,
        places,
    };
    let report = build_report(&query, &request).context("Failed to build forecast report")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

/// Place lookup failures degrade to an empty table.
async fn nearby_places(
    config: &CliConfig,
    client: reqwest::Client,
    point: QueryPoint,
    radius_m: u32,
) -> Vec<NamedPlace> {
    let overpass = OverpassClient::new(client, config.overpass_url.clone(), config.http_timeout_secs);
    match overpass.nearby(point, radius_m).await {
        Ok(places) => places,
        Err(e) => {
            warn!(error = %e, "Nearby place lookup failed");
            Vec::new()
        }
    }
}
