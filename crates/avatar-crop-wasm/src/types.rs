//! WASM-compatible wrapper types for rendered bitmaps.

use avatar_crop_core::Bitmap;
use wasm_bindgen::prelude::*;

/// A rendered RGBA bitmap for JavaScript.
///
/// `pixels()` returns straight RGBA bytes that can be wrapped directly in an
/// `ImageData` and painted with `putImageData`.
#[wasm_bindgen]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter, js_name = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This copies the pixel data into JavaScript memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Encode as a `data:image/png;base64,...` URL.
    #[wasm_bindgen(js_name = toDataUrl)]
    pub fn to_data_url(&self) -> Result<String, JsValue> {
        self.inner
            .to_png_data_url()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsBitmap {
    pub(crate) fn from_bitmap(inner: Bitmap) -> Self {
        Self { inner }
    }
}
