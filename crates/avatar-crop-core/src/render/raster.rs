//! Resampling of the source image into a frame-sized RGBA buffer.
//!
//! Every output pixel is computed from its center point, mapped back into the
//! image through the [`Placement`]. The computation is pure f64 arithmetic
//! over the inputs, so identical inputs always produce identical bytes.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::geometry::Placement;

/// Sampling filter used when rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sampling {
    /// Nearest neighbor (fastest, blocky when zoomed in).
    Nearest,
    /// Bilinear interpolation in premultiplied alpha.
    #[default]
    Bilinear,
}

/// Rasterize `image` into a `width x height` RGBA buffer.
///
/// Output pixels whose centers fall outside the placed image are transparent.
pub fn rasterize(
    image: &RgbaImage,
    placement: &Placement,
    width: u32,
    height: u32,
    sampling: Sampling,
) -> Vec<u8> {
    let (img_w, img_h) = (image.width() as f64, image.height() as f64);
    let mut output = vec![0u8; width as usize * height as usize * 4];

    for y in 0..height {
        let row_start = y as usize * width as usize * 4;
        for x in 0..width {
            let (u, v) = placement.to_image(x as f64 + 0.5, y as f64 + 0.5);
            if u < 0.0 || v < 0.0 || u >= img_w || v >= img_h {
                continue;
            }

            let px = match sampling {
                Sampling::Nearest => sample_nearest(image, u, v),
                Sampling::Bilinear => sample_bilinear(image, u, v),
            };

            let idx = row_start + x as usize * 4;
            output[idx..idx + 4].copy_from_slice(&px);
        }
    }

    output
}

#[inline]
fn sample_nearest(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let x = (u.floor() as u32).min(image.width() - 1);
    let y = (v.floor() as u32).min(image.height() - 1);
    image.get_pixel(x, y).0
}

/// Bilinear sample with clamp-to-edge, weighting color by alpha so that
/// transparent neighbors don't bleed their (meaningless) color in.
fn sample_bilinear(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let max_x = image.width() as i64 - 1;
    let max_y = image.height() as i64 - 1;

    // Shift so integer coordinates are pixel centers
    let x = u - 0.5;
    let y = v - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let ix0 = (x0 as i64).clamp(0, max_x) as u32;
    let ix1 = (x0 as i64 + 1).clamp(0, max_x) as u32;
    let iy0 = (y0 as i64).clamp(0, max_y) as u32;
    let iy1 = (y0 as i64 + 1).clamp(0, max_y) as u32;

    let taps = [
        (ix0, iy0, (1.0 - fx) * (1.0 - fy)),
        (ix1, iy0, fx * (1.0 - fy)),
        (ix0, iy1, (1.0 - fx) * fy),
        (ix1, iy1, fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (ix, iy, weight) in taps {
        let p = image.get_pixel(ix, iy).0;
        let a = p[3] as f64 * weight;
        acc[0] += p[0] as f64 * a;
        acc[1] += p[1] as f64 * a;
        acc[2] += p[2] as f64 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return [0, 0, 0, 0];
    }

    [
        to_channel(acc[0] / acc[3]),
        to_channel(acc[1] / acc[3]),
        to_channel(acc[2] / acc[3]),
        to_channel(acc[3]),
    ]
}

#[inline]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
