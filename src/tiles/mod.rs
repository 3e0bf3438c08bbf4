//! Raster basemap tiles: addressing, fetching, caching and decoding

pub mod cache;
pub mod decode;
pub mod grid;
pub mod source;

pub use cache::{CacheStats, TileCache};
pub use decode::{decode, RgbTile, TileFormat};
pub use grid::{TileId, TileRange, TILE_SIZE};
pub use source::{HttpTileSource, TileSource};

#[cfg(test)]
pub(crate) mod stub;
