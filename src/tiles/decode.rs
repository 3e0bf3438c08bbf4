//! PNG and JPEG tile decoding to RGB8

use crate::error::{Error, Result};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// Encodings served by raster tile providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFormat {
    Png,
    Jpeg,
}

impl TileFormat {
    /// Detects the encoding from the leading magic bytes
    pub fn detect(data: &[u8]) -> Result<Self> {
        if data.starts_with(&PNG_MAGIC) {
            Ok(TileFormat::Png)
        } else if data.starts_with(&JPEG_MAGIC) {
            Ok(TileFormat::Jpeg)
        } else {
            Err(Error::TileDecode("unrecognised image format".to_string()))
        }
    }

    /// Returns the name of this format
    pub fn name(&self) -> &'static str {
        match self {
            TileFormat::Png => "PNG",
            TileFormat::Jpeg => "JPEG",
        }
    }
}

/// Decoded tile, tightly packed RGB rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbTile {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbTile {
    /// Returns the pixel at (x, y); callers keep coordinates inside the tile
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * self.width + x) * 3) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Number of bytes held by the tile
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Decodes an encoded tile into RGB8
pub fn decode(data: &[u8]) -> Result<RgbTile> {
    match TileFormat::detect(data)? {
        TileFormat::Png => decode_png(data),
        TileFormat::Jpeg => decode_jpeg(data),
    }
}

fn decode_png(data: &[u8]) -> Result<RgbTile> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info()
        .map_err(|e| Error::TileDecode(format!("PNG error: {}", e)))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)
        .map_err(|e| Error::TileDecode(format!("PNG error: {}", e)))?;
    buf.truncate(info.buffer_size());

    let rgb = match info.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf.chunks_exact(4).flat_map(|p| over_white([p[0], p[1], p[2]], p[3])).collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| over_white([p[0]; 3], p[1])).collect(),
        png::ColorType::Indexed => {
            return Err(Error::TileDecode("PNG palette was not expanded".to_string()));
        }
    };

    Ok(RgbTile { width: info.width, height: info.height, data: rgb })
}

/// Composites a pixel over a white background
fn over_white(rgb: [u8; 3], alpha: u8) -> [u8; 3] {
    let a = alpha as u32;
    rgb.map(|c| ((c as u32 * a + 255 * (255 - a)) / 255) as u8)
}

fn decode_jpeg(data: &[u8]) -> Result<RgbTile> {
    let mut decoder = jpeg_decoder::Decoder::new(data);

    let pixels = decoder.decode()
        .map_err(|e| Error::TileDecode(format!("JPEG error: {}", e)))?;
    let info = decoder.info()
        .ok_or_else(|| Error::TileDecode("JPEG header missing".to_string()))?;

    let rgb = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        other => {
            return Err(Error::TileDecode(format!("unsupported JPEG pixel format {:?}", other)));
        }
    };

    Ok(RgbTile { width: info.width as u32, height: info.height as u32, data: rgb })
}
