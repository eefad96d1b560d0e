//! Placement math: where the scaled image sits relative to the frame.
//!
//! # Coordinate System
//!
//! - Frame coordinates are pixels, origin at the frame's top-left corner
//! - Pixel `(x, y)` covers `[x, x + 1) x [y, y + 1)`; its center is `(x + 0.5, y + 0.5)`
//! - Image coordinates use the same convention in source pixels

use crate::state::NormalizedPosition;

use super::FrameSize;

/// Scale at which the image's shorter side (relative to the frame aspect)
/// exactly fills the frame, so the image covers it with no gaps.
pub fn fit_scale(image_width: u32, image_height: u32, frame: FrameSize) -> f64 {
    let sx = frame.width as f64 / image_width.max(1) as f64;
    let sy = frame.height as f64 / image_height.max(1) as f64;
    sx.max(sy)
}

/// Clamp `position` to the range in which the scaled image still covers the
/// whole frame. Inside that range `keep_covered` placement is a no-op.
pub fn covered_position(
    (image_width, image_height): (u32, u32),
    position: NormalizedPosition,
    zoom: f64,
    frame: FrameSize,
) -> NormalizedPosition {
    let scale = fit_scale(image_width, image_height, frame) * zoom;
    let half_x = frame.width as f64 / (2.0 * image_width.max(1) as f64 * scale);
    let half_y = frame.height as f64 / (2.0 * image_height.max(1) as f64 * scale);

    NormalizedPosition::new(
        position.x.max(half_x).min(1.0 - half_x),
        position.y.max(half_y).min(1.0 - half_y),
    )
}

/// Resolved transform from image pixels to frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Effective scale: fit scale multiplied by the user zoom.
    pub scale: f64,
    /// Frame x of the image's left edge.
    pub left: f64,
    /// Frame y of the image's top edge.
    pub top: f64,
}

impl Placement {
    /// Place an image so that its focal point lands on the frame center.
    ///
    /// With `keep_covered`, the offset is additionally clamped so the scaled
    /// image never leaves part of the frame uncovered.
    pub fn new(
        (image_width, image_height): (u32, u32),
        position: NormalizedPosition,
        zoom: f64,
        frame: FrameSize,
        keep_covered: bool,
    ) -> Self {
        let scale = fit_scale(image_width, image_height, frame) * zoom;
        let scaled_w = image_width as f64 * scale;
        let scaled_h = image_height as f64 * scale;
        let (fw, fh) = (frame.width as f64, frame.height as f64);

        let mut left = fw / 2.0 - position.x * scaled_w;
        let mut top = fh / 2.0 - position.y * scaled_h;

        if keep_covered {
            // max/min rather than clamp: rounding can push the lower bound past 0
            left = left.max(fw - scaled_w).min(0.0);
            top = top.max(fh - scaled_h).min(0.0);
        }

        Self { scale, left, top }
    }

    /// Shift the placement, e.g. to account for a border around the frame.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..self
        }
    }

    /// Map a frame point to image coordinates.
    #[inline]
    pub fn to_image(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.left) / self.scale, (y - self.top) / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize {
        width: 200,
        height: 200,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Inverse of `Placement::to_image`.
    fn to_frame(p: &Placement, x: f64, y: f64) -> (f64, f64) {
        (x * p.scale + p.left, y * p.scale + p.top)
    }

    #[test]
    fn test_fit_scale_landscape() {
        // Shorter side (height 100) must fill 200
        assert!(approx(fit_scale(400, 100, FRAME), 2.0));
    }

    #[test]
    fn test_fit_scale_portrait() {
        assert!(approx(fit_scale(50, 400, FRAME), 4.0));
    }

    #[test]
    fn test_fit_scale_non_square_frame() {
        let frame = FrameSize::new(300, 100);
        // Square image must cover the wide frame: 300 / 100
        assert!(approx(fit_scale(100, 100, frame), 3.0));
    }

    #[test]
    fn test_centered_placement() {
        let p = Placement::new((400, 100), NormalizedPosition::CENTER, 1.0, FRAME, false);
        // Scaled to 800x200, centered horizontally
        assert!(approx(p.scale, 2.0));
        assert!(approx(p.left, -300.0));
        assert!(approx(p.top, 0.0));
    }

    #[test]
    fn test_focal_point_lands_on_center() {
        let pos = NormalizedPosition::new(0.3, 0.7);
        let p = Placement::new((120, 90), pos, 1.5, FRAME, false);

        let (fx, fy) = to_frame(&p, 0.3 * 120.0, 0.7 * 90.0);
        assert!(approx(fx, 100.0));
        assert!(approx(fy, 100.0));
    }

    #[test]
    fn test_zoom_multiplies_fit() {
        let p1 = Placement::new((100, 100), NormalizedPosition::CENTER, 1.0, FRAME, false);
        let p2 = Placement::new((100, 100), NormalizedPosition::CENTER, 2.0, FRAME, false);
        assert!(approx(p2.scale, p1.scale * 2.0));
    }

    #[test]
    fn test_keep_covered_clamps_edge_focus() {
        // Focal point at the left edge would leave the left half of the frame empty
        let pos = NormalizedPosition::new(0.0, 0.5);
        let free = Placement::new((400, 100), pos, 1.0, FRAME, false);
        let covered = Placement::new((400, 100), pos, 1.0, FRAME, true);

        assert!(approx(free.left, 100.0));
        assert!(approx(covered.left, 0.0));
        assert!(approx(covered.top, 0.0));
    }

    #[test]
    fn test_keep_covered_right_edge() {
        let pos = NormalizedPosition::new(1.0, 0.5);
        let covered = Placement::new((400, 100), pos, 1.0, FRAME, true);
        // Scaled width 800: right edge must stay at frame width
        assert!(approx(covered.left, 200.0 - 800.0));
    }

    #[test]
    fn test_covered_position_limits() {
        // 400x100 at fit 2: scaled 800x200, so x may range over [0.125, 0.875]
        let pos = covered_position((400, 100), NormalizedPosition::new(0.0, 0.9), 1.0, FRAME);
        assert!(approx(pos.x, 0.125));
        assert!(approx(pos.y, 0.5));

        let inside = NormalizedPosition::new(0.3, 0.5);
        assert_eq!(covered_position((400, 100), inside, 1.0, FRAME), inside);
    }

    #[test]
    fn test_covered_position_is_placement_noop() {
        let pos = covered_position((120, 90), NormalizedPosition::new(0.95, 0.02), 1.4, FRAME);
        let free = Placement::new((120, 90), pos, 1.4, FRAME, false);
        let covered = Placement::new((120, 90), pos, 1.4, FRAME, true);
        assert!(approx(free.left, covered.left));
        assert!(approx(free.top, covered.top));
    }

    #[test]
    fn test_round_trip_mapping() {
        let p = Placement::new((64, 48), NormalizedPosition::new(0.4, 0.6), 1.3, FRAME, false);
        let (ix, iy) = p.to_image(37.0, 151.0);
        let (fx, fy) = to_frame(&p, ix, iy);
        assert!(approx(fx, 37.0));
        assert!(approx(fy, 151.0));
    }

    #[test]
    fn test_translated() {
        let p = Placement::new((100, 100), NormalizedPosition::CENTER, 1.0, FRAME, false);
        let t = p.translated(25.0, 10.0);
        assert!(approx(t.left, p.left + 25.0));
        assert!(approx(t.top, p.top + 10.0));
        assert!(approx(t.scale, p.scale));
    }
}
