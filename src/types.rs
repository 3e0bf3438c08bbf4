//! Core data types for trackmap

use serde::{Deserialize, Serialize};

use crate::projection::Coordinate;

/// Geographic filter applied to every row read from a CSV file (WGS84 degrees, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Region {
    /// Bounding box of the Czech Republic
    pub const CZECH_REPUBLIC: Region = Region {
        lon_min: 12.0,
        lon_max: 18.9,
        lat_min: 48.5,
        lat_max: 51.5,
    };

    /// Creates a new region
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self { lon_min, lon_max, lat_min, lat_max }
    }

    /// Returns whether the longitude/latitude pair lies inside the region
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.lon_min..=self.lon_max).contains(&lon) && (self.lat_min..=self.lat_max).contains(&lat)
    }

    /// Returns whether min <= max holds on both axes
    pub fn is_valid(&self) -> bool {
        self.lon_min <= self.lon_max && self.lat_min <= self.lat_max
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::CZECH_REPUBLIC
    }
}

/// Minimal enclosing rectangle of a set of WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self { min_lon, max_lon, min_lat, max_lat }
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// South-west corner as a (lon, lat) coordinate
    pub fn lower_left(&self) -> Coordinate {
        Coordinate::from_lonlat(self.min_lon, self.min_lat)
    }

    /// North-east corner as a (lon, lat) coordinate
    pub fn upper_right(&self) -> Coordinate {
        Coordinate::from_lonlat(self.max_lon, self.max_lat)
    }
}

/// Visible window of a figure in Web Mercator metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Builds the extent spanned by two corner coordinates, in any order
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Widens any axis narrower than `min_span` symmetrically around its centre
    pub fn ensure_min_span(self, min_span: f64) -> Self {
        let (min_x, max_x) = widen(self.min_x, self.max_x, min_span);
        let (min_y, max_y) = widen(self.min_y, self.max_y, min_span);
        Self { min_x, min_y, max_x, max_y }
    }
}

fn widen(min: f64, max: f64, span: f64) -> (f64, f64) {
    if max - min >= span {
        return (min, max);
    }
    let center = (min + max) / 2.0;
    (center - span / 2.0, center + span / 2.0)
}

/// Represents figure dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Creates new dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the total number of pixels
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Largest size with the aspect ratio `width / height` of the extent that fits inside self
    pub fn fit_aspect(&self, extent: &Extent) -> Dimensions {
        let (w, h) = (self.width as f64, self.height as f64);
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return *self;
        }

        let ratio = extent.width() / extent.height();
        if w / h > ratio {
            Dimensions::new(((h * ratio).round() as u32).max(1), self.height)
        } else {
            Dimensions::new(self.width, ((w / ratio).round() as u32).max(1))
        }
    }
}
