use crate::error::{Error, Result};
use crate::projection::coordinate::Coordinate;
use crate::projection::epsg;
use proj::Proj;

/// PROJ pipeline equivalent to EPSG:4326 -> EPSG:3857 with longitude first.
/// Spelled out so no `proj.db` lookup is needed at runtime.
const WGS84_TO_WEB_MERCATOR: &str = "+proj=pipeline \
    +step +proj=unitconvert +xy_in=deg +xy_out=rad \
    +step +proj=webmerc +lat_0=0 +lon_0=0 +x_0=0 +y_0=0 +ellps=WGS84";

/// Transforms coordinates between two coordinate reference systems
pub struct Transformer {
    proj: Proj,
    source_epsg: u16,
    target_epsg: u16,
}

impl Transformer {
    /// Creates the WGS84 (lon, lat degrees) -> Web Mercator (metres) transformer
    pub fn web_mercator() -> Result<Self> {
        let proj = Proj::new(WGS84_TO_WEB_MERCATOR)
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;

        Ok(Self {
            proj,
            source_epsg: epsg::WGS84,
            target_epsg: epsg::WEB_MERCATOR,
        })
    }

    /// Transforms a coordinate from source to target CRS
    pub fn transform(&self, coord: Coordinate) -> Result<Coordinate> {
        let result = self.proj.convert((coord.x, coord.y))
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        Ok(Coordinate::new(result.0, result.1))
    }

    /// Transforms multiple coordinates in bulk, preserving order
    pub fn transform_many(&self, coords: &[Coordinate]) -> Result<Vec<Coordinate>> {
        coords.iter()
            .map(|&coord| self.transform(coord))
            .collect()
    }

    /// EPSG code of the input coordinates
    pub fn source_epsg(&self) -> u16 {
        self.source_epsg
    }

    /// EPSG code of the output coordinates
    pub fn target_epsg(&self) -> u16 {
        self.target_epsg
    }
}
