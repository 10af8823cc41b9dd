use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid column layout: {0}")]
    Layout(String),

    #[error("Row {row}: invalid {field} value '{value}'")]
    FieldParse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid bounding extent: {0}")]
    InvalidExtent(String),

    #[error("Tile request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tile server returned {status} for {url}")]
    TileStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Plotting error: {0}")]
    Plot(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup error: {0}")]
    Logging(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for MapError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        MapError::Plot(err.to_string())
    }
}
