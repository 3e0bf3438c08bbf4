//! Bounding box of a coordinate set

use crate::projection::Coordinate;
use crate::types::BoundingBox;

/// Per-axis minimum and maximum of WGS84 points, or `None` for an empty slice
pub fn calculate_bounds(points: &[Coordinate]) -> Option<BoundingBox> {
    let first = points.first()?;
    let init = BoundingBox::new(first.lon(), first.lon(), first.lat(), first.lat());

    Some(points[1..].iter().fold(init, |bbox, p| BoundingBox {
        min_lon: bbox.min_lon.min(p.lon()),
        max_lon: bbox.max_lon.max(p.lon()),
        min_lat: bbox.min_lat.min(p.lat()),
        max_lat: bbox.max_lat.max(p.lat()),
    }))
}
