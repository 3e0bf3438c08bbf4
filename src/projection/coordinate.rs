/// Represents a 2D coordinate in either WGS84 degrees or Web Mercator metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new 2D coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a coordinate from longitude/latitude in degrees (WGS84)
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat)
    }

    /// Longitude, for coordinates in WGS84
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude, for coordinates in WGS84
    pub fn lat(&self) -> f64 {
        self.y
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
