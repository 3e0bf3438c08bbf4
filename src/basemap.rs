//! Basemap raster assembled from web tiles
//!
//! The tiles covering an [`Extent`] are fetched once, then sampled
//! nearest-neighbour into a buffer with exactly the pixel size of the plotting
//! area, so the raster lines up with the axis limits of the figure.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::projection::Coordinate;
use crate::tiles::grid::global_pixel;
use crate::tiles::{decode, RgbTile, TileCache, TileId, TileRange, TileSource, TILE_SIZE};
use crate::types::{Dimensions, Extent};

/// Affine mapping between raster pixels and Web Mercator metres
///
/// Holds [a, b, c, d, e, f] where:
/// geo_x = a + b * pixel_x + c * pixel_y
/// geo_y = d + e * pixel_x + f * pixel_y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// North-up transform stretching `size` pixels over `extent`
    pub fn for_extent(extent: &Extent, size: Dimensions) -> Self {
        let scale_x = extent.width() / size.width as f64;
        let scale_y = extent.height() / size.height as f64;
        GeoTransform([extent.min_x, scale_x, 0.0, extent.max_y, 0.0, -scale_y])
    }

    /// Converts (fractional) pixel coordinates to metres
    pub fn pixel_to_geo(&self, pixel_x: f64, pixel_y: f64) -> Coordinate {
        let t = &self.0;
        Coordinate::new(
            t[0] + t[1] * pixel_x + t[2] * pixel_y,
            t[3] + t[4] * pixel_x + t[5] * pixel_y,
        )
    }

    /// Converts metres to pixel coordinates, `None` for a degenerate transform
    pub fn geo_to_pixel(&self, geo: Coordinate) -> Option<(f64, f64)> {
        let t = &self.0;
        let det = t[1] * t[5] - t[2] * t[4];
        if det.abs() < 1e-10 {
            return None;
        }

        let dx = geo.x - t[0];
        let dy = geo.y - t[3];

        Some(((t[5] * dx - t[2] * dy) / det, (-t[4] * dx + t[1] * dy) / det))
    }
}

/// RGB raster of the map under a figure
#[derive(Debug, Clone)]
pub struct Basemap {
    /// Zoom the tiles were fetched at
    pub zoom: u8,
    /// Number of tiles used
    pub tiles: usize,
    pub size: Dimensions,
    /// Tightly packed RGB rows, `size.width * size.height * 3` bytes
    pub pixels: Vec<u8>,
}

/// Lowers `zoom` until the tiles covering `extent` number at most `max_tiles`
pub fn fit_zoom(extent: &Extent, zoom: u8, max_tiles: usize) -> u8 {
    let mut zoom = zoom;
    while zoom > 0 && TileRange::covering(extent, zoom).count() > max_tiles {
        zoom -= 1;
    }
    zoom
}

/// Fetches tiles through the cache and builds basemaps
pub struct BasemapLoader<'a, S: TileSource + ?Sized> {
    source: &'a S,
    cache: &'a TileCache,
    max_tiles: usize,
}

impl<'a, S: TileSource + ?Sized> BasemapLoader<'a, S> {
    pub fn new(source: &'a S, cache: &'a TileCache, max_tiles: usize) -> Self {
        Self { source, cache, max_tiles }
    }

    /// Builds the basemap for `extent`, `size` pixels large, at `zoom` or the
    /// closest lower zoom within the tile budget
    pub fn load(&self, extent: &Extent, zoom: u8, size: Dimensions) -> Result<Basemap> {
        let fitted = fit_zoom(extent, zoom, self.max_tiles);
        if fitted != zoom {
            warn!(
                "Zoom {} needs more than {} tiles, using zoom {}",
                zoom, self.max_tiles, fitted
            );
        }

        let range = TileRange::covering(extent, fitted);
        debug!("Basemap at zoom {}: {} tiles", fitted, range.count());

        let mut tiles = HashMap::with_capacity(range.count());
        for id in range.iter() {
            tiles.insert(id, self.tile(id)?);
        }

        let pixels = sample(&tiles, extent, fitted, size);

        Ok(Basemap {
            zoom: fitted,
            tiles: tiles.len(),
            size,
            pixels,
        })
    }

    fn tile(&self, id: TileId) -> Result<Arc<RgbTile>> {
        if let Some(tile) = self.cache.get(id) {
            return Ok(tile);
        }

        let data = self.source.fetch(id)?;
        let tile = decode(&data)?;
        Ok(self.cache.put(id, tile))
    }
}

fn sample(tiles: &HashMap<TileId, Arc<RgbTile>>, extent: &Extent, zoom: u8, size: Dimensions) -> Vec<u8> {
    let transform = GeoTransform::for_extent(extent, size);
    let tile_size = TILE_SIZE as f64;
    let mut pixels = vec![255u8; size.pixel_count() as usize * 3];

    for row in 0..size.height {
        for col in 0..size.width {
            let geo = transform.pixel_to_geo(col as f64 + 0.5, row as f64 + 0.5);
            let (gx, gy) = global_pixel(geo, zoom);
            if gx < 0.0 || gy < 0.0 {
                continue;
            }

            let (tx, ty) = ((gx / tile_size) as u32, (gy / tile_size) as u32);
            let Some(tile) = tiles.get(&TileId::new(zoom, tx, ty)) else {
                continue;
            };

            // providers may serve 512px "retina" tiles for the same address
            let fx = (gx - tx as f64 * tile_size) / tile_size;
            let fy = (gy - ty as f64 * tile_size) / tile_size;
            let px = ((fx * tile.width as f64) as u32).min(tile.width - 1);
            let py = ((fy * tile.height as f64) as u32).min(tile.height - 1);

            let i = ((row * size.width + col) * 3) as usize;
            pixels[i..i + 3].copy_from_slice(&tile.pixel(px, py));
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::stub::StubTileSource;

    fn around_origin(half: f64) -> Extent {
        Extent { min_x: -half, min_y: -half, max_x: half, max_y: half }
    }

    fn pixel(basemap: &Basemap, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * basemap.size.width + x) * 3) as usize;
        [basemap.pixels[i], basemap.pixels[i + 1], basemap.pixels[i + 2]]
    }

    #[test]
    fn test_geo_transform() {
        let extent = Extent { min_x: 100.0, min_y: 0.0, max_x: 200.0, max_y: 50.0 };
        let transform = GeoTransform::for_extent(&extent, Dimensions::new(10, 5));

        assert_eq!(transform.pixel_to_geo(0.0, 0.0), Coordinate::new(100.0, 50.0));
        assert_eq!(transform.pixel_to_geo(10.0, 5.0), Coordinate::new(200.0, 0.0));

        let (px, py) = transform.geo_to_pixel(Coordinate::new(150.0, 25.0)).unwrap();
        assert!((px - 5.0).abs() < 1e-9);
        assert!((py - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_zoom() {
        let extent = around_origin(1000.0);
        assert_eq!(fit_zoom(&extent, 1, 4), 1);
        assert_eq!(fit_zoom(&extent, 1, 3), 0);
        assert_eq!(fit_zoom(&extent, 0, 1), 0);
    }

    #[test]
    fn test_tiles_align_with_extent() {
        let source = StubTileSource::default();
        let cache = TileCache::new(16);
        let loader = BasemapLoader::new(&source, &cache, 16);

        let basemap = loader.load(&around_origin(1000.0), 1, Dimensions::new(4, 4)).unwrap();

        assert_eq!(basemap.zoom, 1);
        assert_eq!(basemap.tiles, 4);
        assert_eq!(basemap.pixels.len(), 4 * 4 * 3);
        assert_eq!(pixel(&basemap, 0, 0), StubTileSource::color(TileId::new(1, 0, 0)));
        assert_eq!(pixel(&basemap, 3, 0), StubTileSource::color(TileId::new(1, 1, 0)));
        assert_eq!(pixel(&basemap, 0, 3), StubTileSource::color(TileId::new(1, 0, 1)));
        assert_eq!(pixel(&basemap, 3, 3), StubTileSource::color(TileId::new(1, 1, 1)));
    }

    #[test]
    fn test_cache_avoids_refetch() {
        let source = StubTileSource::default();
        let cache = TileCache::new(16);
        let loader = BasemapLoader::new(&source, &cache, 16);

        loader.load(&around_origin(1000.0), 1, Dimensions::new(8, 8)).unwrap();
        loader.load(&around_origin(500.0), 1, Dimensions::new(8, 8)).unwrap();

        assert_eq!(source.requested().len(), 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_zoom_lowered_to_budget() {
        let source = StubTileSource::default();
        let cache = TileCache::new(16);
        let loader = BasemapLoader::new(&source, &cache, 2);

        let basemap = loader.load(&around_origin(1000.0), 1, Dimensions::new(4, 4)).unwrap();

        assert_eq!(basemap.zoom, 0);
        assert_eq!(source.requested(), vec![TileId::new(0, 0, 0)]);
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let source = StubTileSource::offline();
        let cache = TileCache::new(16);
        let loader = BasemapLoader::new(&source, &cache, 16);

        let result = loader.load(&around_origin(1000.0), 1, Dimensions::new(4, 4));
        assert!(matches!(result, Err(crate::error::Error::TileFetch(_))));
        assert!(cache.is_empty());
    }
}
