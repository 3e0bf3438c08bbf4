//! In-process tile source for tests

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use super::grid::TileId;
use super::source::TileSource;

/// Encodes a solid-colour PNG, the way tile servers serve them
pub(crate) fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
        writer.write_image_data(&data).unwrap();
    }
    out
}

/// Serves 256x256 tiles coloured after their column and row, recording every request
#[derive(Clone, Default)]
pub(crate) struct StubTileSource {
    pub requests: Arc<Mutex<Vec<TileId>>>,
    pub offline: bool,
}

impl StubTileSource {
    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    pub fn requested(&self) -> Vec<TileId> {
        self.requests.lock().unwrap().clone()
    }

    pub fn color(tile: TileId) -> [u8; 3] {
        [(tile.x % 2) as u8 * 100, (tile.y % 2) as u8 * 100, 0]
    }
}

impl TileSource for StubTileSource {
    fn fetch(&self, tile: TileId) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(tile);
        if self.offline {
            return Err(Error::TileFetch(format!("{}: connection refused", tile)));
        }
        Ok(solid_png(256, 256, Self::color(tile)))
    }

    fn attribution(&self) -> &str {
        "stub"
    }
}
