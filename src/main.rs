//! Ride Viewer command line front end.
//!
//! Imports a FIT file, optionally fuses a GPX track, prints the session
//! summary and writes the requested exports.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use ride_viewer::activity::{ActivityBundle, ActivityObserver, ActivityStore};
use ride_viewer::config::{load_config, ViewerConfig};
use ride_viewer::export::{export_to_path, ExportFormat};
use ride_viewer::geocode::{NominatimClient, TownCache};
use ride_viewer::import::{read_as, FileFormat};
use ride_viewer::view::route::{
    highlight_line, hover_details, route_line, window_for_click, GeoBounds,
};
use ride_viewer::view::{ChartSeries, SessionReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "View and fuse bicycle ride recordings", long_about = None)]
struct Cli {
    /// FIT activity file to import
    #[arg(value_hint = ValueHint::FilePath)]
    fit: PathBuf,

    /// GPX track whose positions and altitude replace the recorded ones
    #[arg(long, value_hint = ValueHint::FilePath)]
    gpx: Option<PathBuf>,

    /// Write the bundle as JSON to this file or directory
    #[arg(long, value_hint = ValueHint::AnyPath)]
    json: Option<PathBuf>,

    /// Write the samples as CSV to this file or directory
    #[arg(long, value_hint = ValueHint::AnyPath)]
    csv: Option<PathBuf>,

    /// Write both exports into the configured output directory
    #[arg(long)]
    export: bool,

    /// Print the route section around the sample nearest to LAT,LON
    #[arg(
        long,
        value_name = "LAT,LON",
        value_parser = parse_coordinate,
        allow_hyphen_values = true
    )]
    locate: Option<(f64, f64)>,

    /// Do not resolve start and end towns over the network
    #[arg(long)]
    offline: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

/// Logs the route extent whenever the published bundle changes.
struct RouteLogger;

impl ActivityObserver for RouteLogger {
    fn update(&mut self, bundle: Option<&ActivityBundle>) {
        let Some(bundle) = bundle else {
            tracing::debug!("No activity loaded");
            return;
        };
        let line = route_line(&bundle.samples);
        match GeoBounds::from_points(&line) {
            Some(bounds) => {
                let (lat, lon) = bounds.center();
                tracing::info!(
                    "Route with {} points centered at {:.5}, {:.5}",
                    line.len(),
                    lat,
                    lon
                );
            }
            None => tracing::info!("Activity has no route"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ride Viewer v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    let mut store = ActivityStore::new();
    store.subscribe(RouteLogger);

    let content = read_as(&cli.fit, FileFormat::Fit)?;
    store
        .import_fit(&content)
        .with_context(|| format!("failed to import {}", cli.fit.display()))?;

    if let Some(gpx_path) = &cli.gpx {
        let content = read_as(gpx_path, FileFormat::Gpx)?;
        store
            .fuse_gpx(&content)
            .with_context(|| format!("failed to fuse {}", gpx_path.display()))?;
    }

    let bundle = store.bundle().context("no activity loaded")?;

    let mut towns = if config.geocoding.enabled && !cli.offline {
        let mut client = NominatimClient::with_url(&config.geocoding.base_url);
        if let Some(agent) = &config.geocoding.user_agent {
            client = client.with_user_agent(agent);
        }
        TownCache::new(client)
    } else {
        TownCache::offline()
    };
    let start_town = towns.lookup(bundle.first_sample().and_then(|s| s.position())).await;
    let end_town = towns.lookup(bundle.last_sample().and_then(|s| s.position())).await;

    println!("{}", SessionReport::new(bundle, &start_town, &end_town));

    let series = ChartSeries::from_samples(&bundle.samples);
    println!(
        "Samples: {} ({} positioned), laps: {}",
        bundle.samples.len(),
        bundle.positioned_count(),
        bundle.laps.len()
    );
    if let Some((from, to)) = series.distance_range() {
        println!("Chart range: {:.2} - {:.2} km", from, to);
    }

    if let Some((lat, lon)) = cli.locate {
        let half_width = config.route.highlight_window_km;
        match window_for_click(&bundle.samples, lat, lon, half_width) {
            Some(window) => println!(
                "Section {:.2} - {:.2} km: {} route points",
                window.min,
                window.max,
                highlight_line(&bundle.samples, window).len()
            ),
            None => println!("No positioned samples near {:.5}, {:.5}", lat, lon),
        }
        for row in hover_details(&bundle.samples, lat, lon).unwrap_or_default() {
            println!("  {:<10} {}", row.label, row.value);
        }
    }

    write_exports(bundle, &cli, &config)?;

    Ok(())
}

fn parse_coordinate(value: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| "expected LAT,LON".to_string())?;
    let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let lon = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((lat, lon))
}

fn write_exports(bundle: &ActivityBundle, cli: &Cli, config: &ViewerConfig) -> Result<()> {
    let pretty = config.export.pretty_json;
    let default_dir = config
        .export
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut targets: Vec<(ExportFormat, &Path)> = Vec::new();
    if let Some(path) = &cli.json {
        targets.push((ExportFormat::Json, path.as_path()));
    } else if cli.export {
        targets.push((ExportFormat::Json, default_dir.as_path()));
    }
    if let Some(path) = &cli.csv {
        targets.push((ExportFormat::Csv, path.as_path()));
    } else if cli.export {
        targets.push((ExportFormat::Csv, default_dir.as_path()));
    }

    for (format, target) in targets {
        let written = export_to_path(bundle, format, target, pretty)
            .with_context(|| format!("failed to export {}", format))?;
        println!("Wrote {}", written.display());
    }

    Ok(())
}
