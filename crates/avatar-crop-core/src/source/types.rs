//! Core types for resolving image sources.

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not in a recognized or enabled raster format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The format was recognized but the data is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded to zero width or height.
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Where an image comes from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Raw bytes of a file the user picked or dropped.
    File(&'a [u8]),
    /// A default asset compiled into the host, e.g. via `include_bytes!`.
    Bundled(&'static [u8]),
}

impl<'a> ImageSource<'a> {
    /// The raw bytes behind this source.
    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            ImageSource::File(bytes) => bytes,
            ImageSource::Bundled(bytes) => bytes,
        }
    }

    /// Short label used in log output.
    pub fn label(&self) -> &'static str {
        match self {
            ImageSource::File(_) => "file",
            ImageSource::Bundled(_) => "bundled",
        }
    }
}

/// A decoded image with RGBA pixel data.
///
/// Pixels are shared behind an `Arc`, so cloning a handle is cheap and never
/// copies pixel data. A handle is immutable; choosing a new image replaces it.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pixels: Arc<RgbaImage>,
}

impl ImageHandle {
    /// Wrap already-decoded RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::EmptyImage` if either dimension is zero.
    pub fn from_rgba(img: RgbaImage) -> Result<Self, DecodeError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(DecodeError::EmptyImage);
        }
        Ok(Self {
            pixels: Arc::new(img),
        })
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Borrow the decoded pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether both handles point at the same decoded image.
    pub fn same_image(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
