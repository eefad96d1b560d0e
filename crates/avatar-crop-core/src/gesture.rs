//! Pointer drag to focal-point math.
//!
//! A drag moves the visible image with the pointer, which means the focal
//! point moves the opposite way. The delta is inversely proportional to the
//! zoom: at scale 2 the same pointer travel moves the focal point half as far.

use crate::render::{fit_scale, FrameSize};
use crate::state::{NormalizedPosition, ScaleLimits};

/// Pointer movement in view pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PointerDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Change of the normalized focal point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PositionDelta {
    /// Offset `position` by this delta, clamped to the unit square.
    pub fn apply(self, position: NormalizedPosition) -> NormalizedPosition {
        NormalizedPosition::new(position.x + self.dx, position.y + self.dy)
    }
}

/// Focal-point delta for a pointer drag, measured in frame extents.
///
/// Dragging the full frame width at scale 1 moves the focal point by one
/// whole unit.
pub fn drag_delta(pointer: PointerDelta, frame: FrameSize, scale: f64) -> PositionDelta {
    let scale = sanitize_scale(scale);
    PositionDelta {
        dx: -pointer.dx / (frame.width.max(1) as f64 * scale),
        dy: -pointer.dy / (frame.height.max(1) as f64 * scale),
    }
}

/// Focal-point delta measured against the scaled image instead of the frame,
/// so the image point under the pointer stays under the pointer.
pub fn drag_delta_for_image(
    pointer: PointerDelta,
    frame: FrameSize,
    scale: f64,
    (image_width, image_height): (u32, u32),
) -> PositionDelta {
    let effective = fit_scale(image_width, image_height, frame) * sanitize_scale(scale);
    PositionDelta {
        dx: -pointer.dx / (image_width.max(1) as f64 * effective),
        dy: -pointer.dy / (image_height.max(1) as f64 * effective),
    }
}

#[inline]
fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        ScaleLimits::FLOOR
    } else {
        scale.max(ScaleLimits::FLOOR)
    }
}
