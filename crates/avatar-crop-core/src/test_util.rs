//! Shared fixtures for unit tests.

use image::{Rgba, RgbaImage};

use crate::source::ImageHandle;

/// Image filled with a single color.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> ImageHandle {
    ImageHandle::from_rgba(RgbaImage::from_pixel(width, height, Rgba(rgba))).unwrap()
}

/// Image split into four colored quadrants: top-left red, top-right green,
/// bottom-left blue, bottom-right white.
pub fn quadrant_image(width: u32, height: u32) -> ImageHandle {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        match (x < width / 2, y < height / 2) {
            (true, true) => Rgba([255, 0, 0, 255]),
            (false, true) => Rgba([0, 255, 0, 255]),
            (true, false) => Rgba([0, 0, 255, 255]),
            (false, false) => Rgba([255, 255, 255, 255]),
        }
    });
    ImageHandle::from_rgba(img).unwrap()
}
