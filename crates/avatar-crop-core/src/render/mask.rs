//! Circular crop mask and the dimming overlay used by the editable view.
//!
//! The mask is a hard-edged circle with a one-pixel anti-aliased band just
//! inside the boundary. Pixels whose centers fall outside the circle are
//! cleared to fully transparent.

use super::FrameSize;

/// Circle in bitmap pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMask {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl CircleMask {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius: radius.max(0.0),
        }
    }

    /// The crop circle of a frame whose top-left corner sits at `(origin, origin)`
    /// in the target bitmap. The radius is half the frame's shorter side.
    pub fn for_frame(frame: FrameSize, origin: u32) -> Self {
        let (w, h) = (frame.width as f64, frame.height as f64);
        Self::new(
            origin as f64 + w / 2.0,
            origin as f64 + h / 2.0,
            w.min(h) / 2.0,
        )
    }

    /// Fraction of pixel `(x, y)` that lies inside the circle, from 0.0 to 1.0.
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> f64 {
        let dx = x as f64 + 0.5 - self.center_x;
        let dy = y as f64 + 0.5 - self.center_y;
        let dist = (dx * dx + dy * dy).sqrt();
        (self.radius - dist).clamp(0.0, 1.0)
    }

    /// Whether the center of pixel `(x, y)` lies inside the circle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.coverage(x, y) > 0.0
    }

    /// Multiply alpha by coverage; pixels with no coverage become `[0, 0, 0, 0]`.
    pub fn apply(&self, pixels: &mut [u8], width: u32, height: u32) {
        for y in 0..height {
            for x in 0..width {
                let idx = (y as usize * width as usize + x as usize) * 4;
                let px = &mut pixels[idx..idx + 4];
                let cov = self.coverage(x, y);

                if cov <= 0.0 {
                    px.fill(0);
                } else if cov < 1.0 {
                    px[3] = (px[3] as f64 * cov).round() as u8;
                }
            }
        }
    }

    /// Composite `color` over everything outside the circle, proportionally to
    /// how much of each pixel lies outside.
    pub fn dim_outside(&self, pixels: &mut [u8], width: u32, height: u32, color: [u8; 4]) {
        let overlay_alpha = color[3] as f64 / 255.0;
        if overlay_alpha <= 0.0 {
            return;
        }

        for y in 0..height {
            for x in 0..width {
                let outside = 1.0 - self.coverage(x, y);
                if outside <= 0.0 {
                    continue;
                }

                let idx = (y as usize * width as usize + x as usize) * 4;
                let px: &mut [u8] = &mut pixels[idx..idx + 4];
                blend_over(px, color, overlay_alpha * outside);
            }
        }
    }
}

/// Straight-alpha "source over" of `color` at opacity `alpha` onto `dst`.
fn blend_over(dst: &mut [u8], color: [u8; 4], alpha: f64) {
    let dst_alpha = dst[3] as f64 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        dst.fill(0);
        return;
    }

    for c in 0..3 {
        let v = (color[c] as f64 * alpha + dst[c] as f64 * dst_alpha * (1.0 - alpha)) / out_alpha;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
