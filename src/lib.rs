//! trackmap - plot GPS tracks over an OpenStreetMap basemap
//!
//! Reads `Longitude`/`Latitude` columns from CSV files, keeps the points inside
//! a configured region, reprojects them to Web Mercator and draws them over
//! raster tiles at a zoom level picked from the track's extent.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use trackmap::{Config, HttpTileSource, Renderer, RenderOutcome, TrackReader};
//!
//! let config = Config::default();
//! let reader = TrackReader::new(config.region, config.preview_rows);
//! let renderer = Renderer::new(HttpTileSource::new(&config.tiles)?, &config, "figures")?;
//!
//! let path = Path::new("ride.csv");
//! let track = reader.read_path(path)?;
//! if let RenderOutcome::Rendered(summary) = renderer.render(&track, path)? {
//!     println!("zoom {} -> {}", summary.zoom, summary.output.display());
//! }
//! # Ok::<(), trackmap::Error>(())
//! ```

pub mod basemap;
pub mod bounds;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod projection;
pub mod reader;
pub mod render;
pub mod tiles;
pub mod types;
pub mod zoom;

pub use bounds::calculate_bounds;
pub use config::Config;
pub use driver::{discover, BatchReport, Driver};
pub use error::{Error, Result};
pub use projection::{Coordinate, Transformer};
pub use reader::{Track, TrackReader};
pub use render::{RenderOutcome, RenderSummary, Renderer, SkipReason};
pub use tiles::{HttpTileSource, TileCache, TileSource};
pub use types::{BoundingBox, Dimensions, Extent, Region};
pub use zoom::estimate_zoom;
