//! Where basemap tiles come from

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::TileConfig;
use crate::error::{Error, Result};
use super::grid::TileId;

/// Provider of encoded raster tiles
pub trait TileSource {
    /// Returns the encoded (PNG/JPEG) bytes of one tile
    fn fetch(&self, tile: TileId) -> Result<Vec<u8>>;

    /// Credit line to print on figures using these tiles
    fn attribution(&self) -> &str {
        ""
    }
}

/// Tile server reached over HTTP through a `{z}/{x}/{y}` URL template
#[derive(Clone, Debug)]
pub struct HttpTileSource {
    client: Client,
    url: String,
    attribution: String,
}

impl HttpTileSource {
    pub fn new(config: &TileConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(HttpTileSource {
            client,
            url: config.url.to_owned(),
            attribution: config.attribution.to_owned(),
        })
    }

    /// Fills the URL template for one tile
    pub fn tile_url(&self, tile: TileId) -> String {
        self.url
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

impl TileSource for HttpTileSource {
    fn fetch(&self, tile: TileId) -> Result<Vec<u8>> {
        let url = self.tile_url(tile);
        debug!("GET {}", url);

        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::TileFetch(format!("{}: HTTP {}", url, status)));
        }

        Ok(resp.bytes()?.to_vec())
    }

    fn attribution(&self) -> &str {
        &self.attribution
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    const USER_AGENT: &str = "trackmap-test/1.0";

    fn setup(server: &MockServer) -> HttpTileSource {
        let config = TileConfig {
            url: format!("{}/{{z}}/{{x}}/{{y}}.png", server.base_url()),
            user_agent: USER_AGENT.to_string(),
            ..TileConfig::default()
        };
        HttpTileSource::new(&config).unwrap()
    }

    #[test]
    fn test_tile_url() {
        let source = HttpTileSource::new(&TileConfig::default()).unwrap();
        assert_eq!(
            source.tile_url(TileId::new(12, 2212, 1387)),
            "https://tile.openstreetmap.org/12/2212/1387.png"
        );
        assert_eq!(source.attribution(), crate::config::OSM_ATTRIBUTION);
    }

    #[test]
    fn test_fetch_ok() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/3/4/2.png")
                .header("user-agent", USER_AGENT);
            then.status(200)
                .header("content-type", "image/png")
                .body([0x89u8, b'P', b'N', b'G']);
        });

        let source = setup(&server);
        let data = source.fetch(TileId::new(3, 4, 2)).unwrap();
        m.assert();
        assert_eq!(data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_fetch_http_error() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/19/1/1.png");
            then.status(404);
        });

        let source = setup(&server);
        let result = source.fetch(TileId::new(19, 1, 1));
        m.assert();
        assert!(matches!(result, Err(Error::TileFetch(_))));
    }
}
