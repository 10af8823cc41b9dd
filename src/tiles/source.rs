use crate::error::{MapError, Result};
use crate::tiles::coords::TileCoords;
use crate::utils::constants::DEFAULT_USER_AGENT;
use image::RgbImage;
use reqwest::blocking::{Client, Request};
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::debug;

/// Anything that can produce a decoded basemap tile.
pub trait TileSource {
    fn fetch_tile(&self, coords: &TileCoords) -> Result<RgbImage>;
}

/// Client identity announced to the tile server.
///
/// Some tile servers reject requests that look scripted, so requests carry a
/// conventional desktop client string instead of a library default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: String,
}

impl ClientIdentity {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

/// Blocking HTTP tile source. One GET per tile, no retries, no caching.
pub struct HttpTileSource {
    client: Client,
    url_template: String,
    identity: ClientIdentity,
}

impl HttpTileSource {
    /// Build a source with its own client. `timeout: None` waits indefinitely.
    pub fn new(
        url_template: impl Into<String>,
        identity: ClientIdentity,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url_template, identity))
    }

    /// Use an existing client. The identity header is still set per request.
    pub fn with_client(
        client: Client,
        url_template: impl Into<String>,
        identity: ClientIdentity,
    ) -> Self {
        Self {
            client,
            url_template: url_template.into(),
            identity,
        }
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn build_request(&self, coords: &TileCoords) -> Result<Request> {
        let url = coords.url(&self.url_template);
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, self.identity.user_agent.as_str())
            .build()?;
        Ok(request)
    }
}

impl TileSource for HttpTileSource {
    fn fetch_tile(&self, coords: &TileCoords) -> Result<RgbImage> {
        let request = self.build_request(coords)?;
        let url = request.url().to_string();
        debug!("Fetching tile {} from {}", coords, url);

        let response = self.client.execute(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::TileStatus { status, url });
        }

        let bytes = response.bytes()?;
        let tile = image::load_from_memory(&bytes)?.to_rgb8();
        debug!(
            "Decoded tile {} ({} bytes, {}x{})",
            coords,
            bytes.len(),
            tile.width(),
            tile.height()
        );
        Ok(tile)
    }
}
