use crate::error::Result;
use crate::models::BoundingExtent;
use crate::render::FigureSettings;
use crate::utils::constants::{
    CONFIG_FILE, DEFAULT_LABEL_JITTER, DEFAULT_TILE_URL, DEFAULT_USER_AGENT, STATIONS_FILE,
};
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variables are read as `ASOS_MAP__<SECTION>__<KEY>`,
/// e.g. `ASOS_MAP__TILES__USER_AGENT`.
pub const ENV_PREFIX: &str = "ASOS_MAP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSettings {
    pub url_template: String,
    pub user_agent: String,
    /// Request timeout; unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl TileSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub jitter_sigma: f64,
    pub seed: Option<u64>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            jitter_sigma: DEFAULT_LABEL_JITTER,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub extent: BoundingExtent,
    pub tiles: TileSettings,
    pub labels: LabelSettings,
    pub figure: FigureSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(STATIONS_FILE),
            output: None,
            extent: BoundingExtent::nyc(),
            tiles: TileSettings::default(),
            labels: LabelSettings::default(),
            figure: FigureSettings::default(),
        }
    }
}

impl Settings {
    /// Layer defaults, a config file and `ASOS_MAP__*` environment variables.
    ///
    /// An explicit `path` must exist; otherwise `asos-map.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(CONFIG_FILE)).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}
