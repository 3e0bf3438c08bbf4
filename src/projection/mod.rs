//! Coordinate types and WGS84 -> Web Mercator reprojection

mod coordinate;
mod transformer;

pub use coordinate::Coordinate;
pub use transformer::Transformer;

/// EPSG codes used by the pipeline
pub mod epsg {
    /// Geographic longitude/latitude in degrees
    pub const WGS84: u16 = 4326;
    /// Spherical mercator used by web tile providers
    pub const WEB_MERCATOR: u16 = 3857;
}
