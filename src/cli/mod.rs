pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExtentArg, OutputFormat};
pub use commands::run;
