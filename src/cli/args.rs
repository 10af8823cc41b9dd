use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asos-station-map")]
#[command(about = "Plot ASOS weather stations over a map tile basemap")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: asos-map.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the basemap and render the annotated station map
    Render {
        #[arg(short, long, help = "Fixed-width station listing [default: asos-stations.txt]")]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output PNG path [default: output/asos-station-map-{YYMMDD}.png]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Tile URL template with {z}, {x} and {y} placeholders")]
        tile_url: Option<String>,

        #[arg(long, help = "User-Agent sent with tile requests")]
        user_agent: Option<String>,

        #[arg(long, help = "Seed for label jitter, for reproducible output")]
        seed: Option<u64>,

        #[command(flatten)]
        extent: ExtentArg,
    },

    /// Parse the station listing and print the stations
    Stations {
        #[arg(short, long, help = "Fixed-width station listing [default: asos-stations.txt]")]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(long, help = "Only stations strictly inside the map extent")]
        within_extent: bool,

        #[arg(long, help = "Warn about stations with out-of-range values")]
        validate: bool,

        #[command(flatten)]
        extent: ExtentArg,
    },

    /// Show the zoom level and tile block for the map extent, without fetching
    Plan {
        #[command(flatten)]
        extent: ExtentArg,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExtentArg {
    #[arg(
        long,
        num_args = 4,
        allow_negative_numbers = true,
        value_names = ["MIN_LON", "MAX_LON", "MIN_LAT", "MAX_LAT"],
        help = "Map extent in degrees [default: New York City]"
    )]
    pub extent: Option<Vec<f64>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
