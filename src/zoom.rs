//! Basemap zoom heuristic

use crate::types::BoundingBox;

/// Lowest tile pyramid level
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom served by the OpenStreetMap tile servers
pub const MAX_ZOOM: u8 = 19;

/// Zoom level at which a one-degree box fills the figure
const BASE_ZOOM: f64 = 12.0;

/// Picks a zoom level that frames the bounding box reasonably.
///
/// Each doubling of the larger span lowers the zoom by one. A box of zero
/// size (a single repeated point) gets the highest zoom.
pub fn estimate_zoom(bbox: &BoundingBox) -> u8 {
    let lon_span = bbox.lon_span();
    let lat_span = bbox.lat_span();

    if lon_span == 0.0 && lat_span == 0.0 {
        return MAX_ZOOM;
    }

    let zoom = (BASE_ZOOM - lon_span.max(lat_span).log2()).floor();
    zoom.clamp(MIN_ZOOM as f64, MAX_ZOOM as f64) as u8
}
