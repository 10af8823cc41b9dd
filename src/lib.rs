pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod readers;
pub mod render;
pub mod tiles;
pub mod utils;

pub use error::{MapError, Result};
