pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{format_latitude, format_longitude, parse_coordinate};
pub use filename::generate_default_map_filename;
pub use progress::ProgressReporter;
