//! Slippy-map tile addressing on the Web Mercator pyramid

use std::fmt;

use crate::projection::Coordinate;
use crate::types::Extent;

/// Half the equatorial circumference of the Web Mercator sphere, in metres
pub const HALF_CIRCUMFERENCE: f64 = 20_037_508.342_789_244;

/// Edge length of a raster tile in pixels
pub const TILE_SIZE: u32 = 256;

/// Address of one tile in the pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Width of one tile in metres at `zoom`
pub fn tile_span(zoom: u8) -> f64 {
    2.0 * HALF_CIRCUMFERENCE / tiles_per_axis(zoom) as f64
}

/// Converts Web Mercator metres to pixel coordinates of the whole world at `zoom`.
///
/// The origin is the north-west corner of the world, y grows southwards.
pub fn global_pixel(coord: Coordinate, zoom: u8) -> (f64, f64) {
    let world = TILE_SIZE as f64 * tiles_per_axis(zoom) as f64;
    let px = (coord.x + HALF_CIRCUMFERENCE) / (2.0 * HALF_CIRCUMFERENCE) * world;
    let py = (HALF_CIRCUMFERENCE - coord.y) / (2.0 * HALF_CIRCUMFERENCE) * world;
    (px, py)
}

/// Inclusive rectangle of tiles at one zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub z: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Smallest range of tiles whose union covers `extent`
    pub fn covering(extent: &Extent, zoom: u8) -> Self {
        let last = tiles_per_axis(zoom) - 1;
        let index = |p: f64| ((p / TILE_SIZE as f64).floor().max(0.0) as u32).min(last);

        let (left, top) = global_pixel(Coordinate::new(extent.min_x, extent.max_y), zoom);
        let (right, bottom) = global_pixel(Coordinate::new(extent.max_x, extent.min_y), zoom);

        Self {
            z: zoom,
            min_x: index(left),
            max_x: index(right),
            min_y: index(top),
            max_y: index(bottom),
        }
    }

    pub fn columns(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn rows(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Tiles in row-major order, north to south
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| TileId::new(self.z, x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRAGUE: Coordinate = Coordinate { x: 1_605_311.660_052, y: 6_461_536.801_597 };

    #[test]
    fn test_tile_span() {
        assert_eq!(tile_span(0), 2.0 * HALF_CIRCUMFERENCE);
        assert!((tile_span(19) - 76.437_028).abs() < 1e-5);
    }

    #[test]
    fn test_global_pixel_corners() {
        let (x, y) = global_pixel(Coordinate::new(-HALF_CIRCUMFERENCE, HALF_CIRCUMFERENCE), 3);
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = global_pixel(Coordinate::new(0.0, 0.0), 1);
        assert_eq!((x, y), (256.0, 256.0));
    }

    #[test]
    fn test_whole_world_at_zoom_zero() {
        let world = Extent {
            min_x: -HALF_CIRCUMFERENCE,
            min_y: -HALF_CIRCUMFERENCE,
            max_x: HALF_CIRCUMFERENCE,
            max_y: HALF_CIRCUMFERENCE,
        };
        let range = TileRange::covering(&world, 0);
        assert_eq!(range.count(), 1);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![TileId::new(0, 0, 0)]);
    }

    #[test]
    fn test_prague_tile() {
        let extent = Extent::from_corners(PRAGUE, PRAGUE);
        let range = TileRange::covering(&extent, 12);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![TileId::new(12, 2212, 1387)]);
    }

    #[test]
    fn test_range_around_origin() {
        let extent = Extent { min_x: -1000.0, min_y: -1000.0, max_x: 1000.0, max_y: 1000.0 };
        let range = TileRange::covering(&extent, 1);
        assert_eq!(range.columns(), 2);
        assert_eq!(range.rows(), 2);

        let tiles: Vec<_> = range.iter().collect();
        assert_eq!(
            tiles,
            vec![TileId::new(1, 0, 0), TileId::new(1, 1, 0), TileId::new(1, 0, 1), TileId::new(1, 1, 1)]
        );
    }

    #[test]
    fn test_range_is_clamped_to_pyramid() {
        let extent = Extent {
            min_x: -3.0 * HALF_CIRCUMFERENCE,
            min_y: -3.0 * HALF_CIRCUMFERENCE,
            max_x: 3.0 * HALF_CIRCUMFERENCE,
            max_y: 3.0 * HALF_CIRCUMFERENCE,
        };
        let range = TileRange::covering(&extent, 2);
        assert_eq!((range.min_x, range.max_x, range.min_y, range.max_y), (0, 3, 0, 3));
        assert_eq!(range.count(), 16);
    }

    #[test]
    fn test_tile_id_display() {
        assert_eq!(TileId::new(12, 2212, 1387).to_string(), "12/2212/1387");
    }
}
