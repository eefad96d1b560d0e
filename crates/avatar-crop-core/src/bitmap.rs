//! Fixed-size RGBA raster produced by the render engine.

use crate::encode::{self, EncodeError};

/// A rendered RGBA bitmap.
///
/// Pixels are straight (non-premultiplied) RGBA8 in row-major order, which is
/// the layout a browser `ImageData` expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(width, height, vec![0u8; width as usize * height as usize * 4])
    }

    /// RGBA value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Alpha channel value at `(x, y)`; zero outside the bitmap.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).map_or(0, |px| px[3])
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Encode as PNG bytes (alpha preserved).
    pub fn to_png(&self) -> Result<Vec<u8>, EncodeError> {
        encode::encode_png(&self.pixels, self.width, self.height)
    }

    /// Encode as a `data:image/png;base64,...` URL, the same shape a canvas
    /// `toDataURL()` call produces.
    pub fn to_png_data_url(&self) -> Result<String, EncodeError> {
        self.to_png().map(|png| encode::png_data_url(&png))
    }
}
