//! Preview export encoding.
//!
//! Rendered bitmaps carry transparency outside the crop circle, so previews are
//! exported as PNG, either as raw bytes or as a base64 data URL that can be
//! dropped straight into an `<img src>`.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::encode::{encode_png, png_data_url};
//!
//! let pixels = vec![128u8; 64 * 64 * 4];
//! let png = encode_png(&pixels, 64, 64).unwrap();
//! let url = png_data_url(&png);
//! ```

mod png;

pub use png::{encode_png, png_data_url, EncodeError, PNG_DATA_URL_PREFIX};
