//! Runtime configuration
//!
//! Every field has a default, so an absent or partial JSON file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Dimensions, Region};

/// OpenStreetMap standard ("Mapnik") raster tiles
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution required by the OpenStreetMap tile usage policy
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rows outside this region are dropped
    pub region: Region,
    /// Tracks with fewer accepted points are not rendered
    pub min_points: usize,
    /// Number of leading rows echoed to the log
    pub preview_rows: usize,
    /// Input file extension, without the dot
    pub extension: String,
    /// Where figures are written; defaults to the input directory
    pub output_dir: Option<PathBuf>,
    pub figure: FigureConfig,
    pub tiles: TileConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            min_points: 1000,
            preview_rows: 5,
            extension: "csv".to_string(),
            output_dir: None,
            figure: FigureConfig::default(),
            tiles: TileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub size: Dimensions,
    /// Marker radius in pixels
    pub marker_size: u32,
    /// Marker opacity in [0, 1]
    pub alpha: f64,
    /// Draw title, axis descriptions, grid and attribution
    pub annotate: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            size: Dimensions::new(1000, 1000),
            marker_size: 1,
            alpha: 0.6,
            annotate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url: String,
    pub user_agent: String,
    pub attribution: String,
    /// Upper bound on tiles fetched for one figure
    pub max_tiles: usize,
    /// Tiles kept in memory across files
    pub cache_tiles: usize,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url: OSM_TILE_URL.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_tiles: 64,
            cache_tiles: 256,
        }
    }
}

impl Config {
    /// Loads the configuration from a JSON file, or the defaults when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                let data = fs::read_to_string(path)?;
                serde_json::from_str(&data)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if !self.region.is_valid() {
            return Err(Error::Config(format!("inverted region {:?}", self.region)));
        }
        if self.figure.size.width == 0 || self.figure.size.height == 0 {
            return Err(Error::Config("figure size must be non-zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.figure.alpha) {
            return Err(Error::Config(format!("alpha {} outside [0, 1]", self.figure.alpha)));
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tiles.url.contains(placeholder) {
                return Err(Error::Config(format!("tile url lacks {}", placeholder)));
            }
        }
        if self.tiles.max_tiles == 0 {
            return Err(Error::Config("max_tiles must be at least 1".to_string()));
        }
        if self.extension.is_empty() {
            return Err(Error::Config("extension must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.region, Region::CZECH_REPUBLIC);
        assert_eq!(config.min_points, 1000);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.figure.marker_size, 1);
        assert_eq!(config.tiles.url, OSM_TILE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_none() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"min_points": 10, "region": {{"lon_min": 5.0, "lon_max": 10.0, "lat_min": 45.0, "lat_max": 48.0}}}}"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.min_points, 10);
        assert_eq!(config.region, Region::new(5.0, 10.0, 45.0, 48.0));
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.figure, FigureConfig::default());
    }

    #[test]
    fn test_load_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(Config::load(Some(file.path())), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_region() {
        let mut config = Config::default();
        config.region = Region::new(18.9, 12.0, 48.5, 51.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_url_without_placeholders() {
        let mut config = Config::default();
        config.tiles.url = "https://tiles.example.com/{z}/{x}.png".to_string();
        assert!(config.validate().is_err());
    }
}
