use crate::cli::args::{Cli, Commands, ExtentArg, OutputFormat};
use crate::config::Settings;
use crate::error::{MapError, Result};
use crate::models::{BoundingExtent, StationRecord};
use crate::readers::{ParsedStations, StationReader};
use crate::render::{raw_zoom, render_station_map, zoom_for_extent, RenderOptions};
use crate::tiles::{ClientIdentity, HttpTileSource, TileRange};
use crate::utils::constants::MAP_TICK_COUNT;
use crate::utils::coordinates::{format_latitude, format_longitude, linspace};
use crate::utils::filename::generate_default_map_filename;
use crate::utils::progress::ProgressReporter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn, Level};
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            input,
            output,
            tile_url,
            user_agent,
            seed,
            extent,
        } => {
            apply_overrides(&mut settings, input, &extent)?;
            if let Some(output) = output {
                settings.output = Some(output);
            }
            if let Some(tile_url) = tile_url {
                settings.tiles.url_template = tile_url;
            }
            if let Some(user_agent) = user_agent {
                settings.tiles.user_agent = user_agent;
            }
            if seed.is_some() {
                settings.labels.seed = seed;
            }

            render(&settings, cli.quiet)?;
        }

        Commands::Stations {
            input,
            format,
            within_extent,
            validate,
            extent,
        } => {
            apply_overrides(&mut settings, input, &extent)?;
            let parsed = StationReader::new().read_stations(&settings.input)?;

            let stations: Vec<&StationRecord> = if within_extent {
                parsed.within(&settings.extent).collect()
            } else {
                parsed.stations.iter().collect()
            };

            if validate {
                report_invalid(&stations);
            }

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stations)?),
                OutputFormat::Text => print_station_table(&parsed, &stations),
            }
        }

        Commands::Plan { extent } => {
            apply_overrides(&mut settings, None, &extent)?;
            print_plan(&settings.extent);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| MapError::Logging(e.to_string()))
}

fn apply_overrides(
    settings: &mut Settings,
    input: Option<PathBuf>,
    extent: &ExtentArg,
) -> Result<()> {
    if let Some(input) = input {
        settings.input = input;
    }
    if let Some(values) = &extent.extent {
        settings.extent = BoundingExtent::try_from(values.as_slice())?;
    }
    Ok(())
}

fn render(settings: &Settings, quiet: bool) -> Result<()> {
    let parsed = StationReader::new().read_stations(&settings.input)?;

    let output = settings
        .output
        .clone()
        .unwrap_or_else(generate_default_map_filename);
    let options = RenderOptions {
        extent: settings.extent,
        jitter_sigma: settings.labels.jitter_sigma,
        figure: settings.figure.clone(),
        ..RenderOptions::new(output)
    };

    let source = HttpTileSource::new(
        settings.tiles.url_template.clone(),
        ClientIdentity::new(settings.tiles.user_agent.clone()),
        settings.tiles.timeout(),
    )?;

    let mut rng = match settings.labels.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let tiles = TileRange::covering(&settings.extent, zoom_for_extent(&settings.extent));
    let progress = ProgressReporter::new(tiles.len() as u64, quiet);

    let summary = render_station_map(
        &parsed.stations,
        &source,
        &options,
        &mut rng,
        Some(&progress),
    )?;

    progress.finish(&format!(
        "Fetched {} tiles at zoom {}",
        summary.tiles, summary.zoom
    ));
    progress.println(&format!(
        "Plotted {} stations ({} labelled) to {}",
        summary.markers,
        summary.labels,
        summary.output.display()
    ));

    Ok(())
}

fn report_invalid(stations: &[&StationRecord]) {
    let mut invalid = 0;
    for station in stations {
        if let Err(errors) = station.validate() {
            invalid += 1;
            warn!(
                "Station '{}' ({}) has out-of-range values: {}",
                station.call_sign.trim(),
                station.name.trim(),
                errors
            );
        }
    }
    info!("{} of {} stations failed validation", invalid, stations.len());
}

fn print_station_table(parsed: &ParsedStations, stations: &[&StationRecord]) {
    println!("Columns: {}", parsed.layout.names().join(" "));
    println!(
        "{:<6} {:<32} {:>10} {:>11} {:>8}",
        "CALL", "NAME", "LAT", "LON", "ELEV"
    );
    for station in stations {
        println!(
            "{:<6} {:<32} {:>10.5} {:>11.5} {:>8.1}",
            station.call_sign.trim(),
            station.name.trim(),
            station.latitude,
            station.longitude,
            station.elevation
        );
    }
    println!("{} stations", stations.len());
}

fn print_plan(extent: &BoundingExtent) {
    let zoom = zoom_for_extent(extent);
    let range = TileRange::covering(extent, zoom);

    println!(
        "Extent: lon [{}, {}] lat [{}, {}]",
        extent.min_lon, extent.max_lon, extent.min_lat, extent.max_lat
    );
    println!(
        "Zoom: {} (raw {})",
        zoom,
        raw_zoom(extent.lon_span())
    );
    println!(
        "Tiles: {} ({} x {}), x {}..={}, y {}..={}",
        range.len(),
        range.columns(),
        range.rows(),
        range.min_x,
        range.max_x,
        range.min_y,
        range.max_y
    );

    let (lon_ticks, lat_ticks) = plan_ticks(extent);
    println!("Longitude ticks: {}", lon_ticks.join(" "));
    println!("Latitude ticks: {}", lat_ticks.join(" "));
}

/// Tick labels the map nominally carries: evenly spaced across each axis,
/// with the southernmost latitude tick dropped.
fn plan_ticks(extent: &BoundingExtent) -> (Vec<String>, Vec<String>) {
    let lon_ticks = linspace(extent.min_lon, extent.max_lon, MAP_TICK_COUNT)
        .into_iter()
        .map(format_longitude)
        .collect();
    let lat_ticks = linspace(extent.min_lat, extent.max_lat, MAP_TICK_COUNT)
        .into_iter()
        .skip(1)
        .map(format_latitude)
        .collect();
    (lon_ticks, lat_ticks)
}
