use asos_station_map::cli::{run, Cli};
use asos_station_map::error::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
