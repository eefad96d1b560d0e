//! Transform/render engine.
//!
//! Turns an [`EditorState`] into pixels. Two outputs share the same placement
//! math:
//!
//! - [`render`]: the cropped result at frame size, circularly masked. This is
//!   what the debounced preview shows and what gets exported.
//! - [`render_editor_view`]: the editable canvas, a frame plus a border in which
//!   the whole image stays visible but everything outside the crop circle is
//!   dimmed.
//!
//! # Pipeline
//!
//! 1. Fit scale: the image's shorter side fills the frame at zoom 1
//! 2. Offset: the focal point lands on the frame center
//! 3. Rasterize (nearest or bilinear, deterministic)
//! 4. Circular mask (radius = half the frame's shorter side)

mod geometry;
mod mask;
mod raster;

pub use geometry::{covered_position, fit_scale, Placement};
pub use mask::CircleMask;
pub use raster::{rasterize, Sampling};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::state::EditorState;

/// Errors raised by the render engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The state has no decoded image yet.
    #[error("Image is not decoded yet")]
    NotReady,

    /// The requested frame has no pixels.
    #[error("Invalid frame: width ({width}) and height ({height}) must be non-zero")]
    InvalidFrame { width: u32, height: u32 },
}

/// Crop frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.is_empty() {
            return Err(RenderError::InvalidFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Knobs that don't change the render contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub sampling: Sampling,
    /// Clamp the framing so the scaled image always covers the whole frame.
    pub keep_covered: bool,
}

/// Appearance of the editable canvas around the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewStyle {
    /// Border width in pixels on every side of the frame.
    pub border: u32,
    /// RGBA color blended over everything outside the crop circle.
    pub overlay: [u8; 4],
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            border: 25,
            overlay: [0, 0, 0, 128],
        }
    }
}

/// Render the circular crop of `state` at `frame` size with default options.
pub fn render(state: &EditorState, frame: FrameSize) -> Result<Bitmap, RenderError> {
    render_with(state, frame, RenderOptions::default())
}

/// Render the circular crop of `state` at `frame` size.
///
/// # Errors
///
/// `RenderError::NotReady` if the image is still pending,
/// `RenderError::InvalidFrame` for a zero-sized frame.
pub fn render_with(
    state: &EditorState,
    frame: FrameSize,
    options: RenderOptions,
) -> Result<Bitmap, RenderError> {
    frame.validate()?;
    let image = state.image().ok_or(RenderError::NotReady)?;

    let placement = Placement::new(
        image.dimensions(),
        state.position(),
        state.scale(),
        frame,
        options.keep_covered,
    );

    let mut pixels = rasterize(
        image.pixels(),
        &placement,
        frame.width,
        frame.height,
        options.sampling,
    );
    CircleMask::for_frame(frame, 0).apply(&mut pixels, frame.width, frame.height);

    Ok(Bitmap::new(frame.width, frame.height, pixels))
}

/// Render the editable canvas: the frame plus `style.border` pixels on each
/// side, with the image placed exactly as in [`render`] and the area outside
/// the crop circle dimmed.
pub fn render_editor_view(
    state: &EditorState,
    frame: FrameSize,
    style: ViewStyle,
    options: RenderOptions,
) -> Result<Bitmap, RenderError> {
    frame.validate()?;
    let image = state.image().ok_or(RenderError::NotReady)?;

    let overflow = RenderError::InvalidFrame {
        width: frame.width,
        height: frame.height,
    };
    let (width, height) = style
        .border
        .checked_mul(2)
        .and_then(|b| Some((frame.width.checked_add(b)?, frame.height.checked_add(b)?)))
        .ok_or(overflow)?;
    let border = style.border as f64;

    let placement = Placement::new(
        image.dimensions(),
        state.position(),
        state.scale(),
        frame,
        options.keep_covered,
    )
    .translated(border, border);

    let mut pixels = rasterize(image.pixels(), &placement, width, height, options.sampling);
    CircleMask::for_frame(frame, style.border).dim_outside(&mut pixels, width, height, style.overlay);

    Ok(Bitmap::new(width, height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NormalizedPosition;
    use crate::test_util::{quadrant_image, solid_image};

    const FRAME: FrameSize = FrameSize::new(40, 40);

    fn ready(width: u32, height: u32) -> EditorState {
        EditorState::default().with_image(quadrant_image(width, height))
    }

    #[test]
    fn test_render_not_ready() {
        let result = render(&EditorState::default(), FRAME);
        assert_eq!(result.unwrap_err(), RenderError::NotReady);
    }

    #[test]
    fn test_render_invalid_frame() {
        let result = render(&ready(10, 10), FrameSize::new(0, 10));
        assert!(matches!(result, Err(RenderError::InvalidFrame { .. })));
    }

    #[test]
    fn test_render_fixed_size() {
        let bmp = render(&ready(300, 120), FRAME).unwrap();
        assert_eq!((bmp.width, bmp.height), (40, 40));
        assert_eq!(bmp.byte_size(), 40 * 40 * 4);
    }

    #[test]
    fn test_render_masks_corners() {
        let state = EditorState::default().with_image(solid_image(50, 50, [10, 200, 30, 255]));
        let bmp = render(&state, FRAME).unwrap();

        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39)] {
            assert_eq!(bmp.pixel(x, y), Some([0, 0, 0, 0]), "corner ({x}, {y})");
        }
        assert_eq!(bmp.pixel(20, 20), Some([10, 200, 30, 255]));
    }

    #[test]
    fn test_render_deterministic() {
        let state = ready(123, 77)
            .with_scale(1.37)
            .with_position(NormalizedPosition::new(0.42, 0.61));

        let a = render(&state, FRAME).unwrap();
        let b = render(&state, FRAME).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_render_focal_point_at_center() {
        // Quadrants: TL red, TR green, BL blue, BR white
        let state = ready(100, 100)
            .with_scale(2.0)
            .with_position(NormalizedPosition::new(0.25, 0.25));
        let bmp = render(&state, FRAME).unwrap();
        assert_eq!(bmp.pixel(20, 20), Some([255, 0, 0, 255]));

        let state = state.with_position(NormalizedPosition::new(0.75, 0.75));
        let bmp = render(&state, FRAME).unwrap();
        assert_eq!(bmp.pixel(20, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_render_edge_focus_leaves_gap() {
        let state = ready(100, 100).with_position(NormalizedPosition::new(0.0, 0.5));
        let bmp = render(&state, FRAME).unwrap();
        // Left half of the frame is not covered by the image
        assert_eq!(bmp.alpha(5, 20), 0);
        assert_eq!(bmp.alpha(30, 20), 255);
    }

    #[test]
    fn test_render_keep_covered_fills_frame() {
        let state = ready(100, 100).with_position(NormalizedPosition::new(0.0, 0.5));
        let options = RenderOptions {
            keep_covered: true,
            ..Default::default()
        };
        let bmp = render_with(&state, FRAME, options).unwrap();
        assert_eq!(bmp.alpha(5, 20), 255);
    }

    #[test]
    fn test_render_nearest_vs_bilinear_same_size() {
        let state = ready(33, 17).with_scale(1.9);
        let nearest = render_with(
            &state,
            FRAME,
            RenderOptions {
                sampling: Sampling::Nearest,
                ..Default::default()
            },
        )
        .unwrap();
        let bilinear = render(&state, FRAME).unwrap();
        assert_eq!(nearest.byte_size(), bilinear.byte_size());
    }

    #[test]
    fn test_editor_view_size_and_dimming() {
        // At zoom 2 the scaled image extends past the frame into the border
        let state = EditorState::default()
            .with_image(solid_image(80, 80, [200, 200, 200, 255]))
            .with_scale(2.0);
        let style = ViewStyle {
            border: 10,
            overlay: [0, 0, 0, 128],
        };
        let view = render_editor_view(&state, FRAME, style, RenderOptions::default()).unwrap();

        assert_eq!((view.width, view.height), (60, 60));
        // Inside the circle: untouched image
        assert_eq!(view.pixel(30, 30), Some([200, 200, 200, 255]));
        // In the border: image still visible, dimmed
        assert_eq!(view.pixel(2, 2), Some([100, 100, 100, 255]));
    }

    #[test]
    fn test_editor_view_matches_crop_inside_circle() {
        let state = ready(80, 40)
            .with_scale(1.25)
            .with_position(NormalizedPosition::new(0.375, 0.625));
        let style = ViewStyle::default();
        let crop = render(&state, FRAME).unwrap();
        let view = render_editor_view(&state, FRAME, style, RenderOptions::default()).unwrap();

        let b = style.border;
        assert_eq!(crop.pixel(20, 20), view.pixel(20 + b, 20 + b));
    }

    #[test]
    fn test_editor_view_border_overflow_rejected() {
        let style = ViewStyle {
            border: u32::MAX / 2,
            ..Default::default()
        };
        let result = render_editor_view(&ready(10, 10), FRAME, style, RenderOptions::default());
        assert_eq!(
            result.unwrap_err(),
            RenderError::InvalidFrame {
                width: 40,
                height: 40
            }
        );
    }

    #[test]
    fn test_editor_view_not_ready() {
        let result = render_editor_view(
            &EditorState::default(),
            FRAME,
            ViewStyle::default(),
            RenderOptions::default(),
        );
        assert_eq!(result.unwrap_err(), RenderError::NotReady);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::state::NormalizedPosition;
    use crate::test_util::quadrant_image;
    use proptest::prelude::*;

    fn framing_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
        (0.0f64..=1.0, 0.0f64..=1.0, 1.0f64..=2.0)
    }

    proptest! {
        /// Property: output is always exactly frame-sized.
        #[test]
        fn prop_output_is_frame_sized(
            (img_w, img_h) in (1u32..=64, 1u32..=64),
            (frame_w, frame_h) in (1u32..=48, 1u32..=48),
            (x, y, scale) in framing_strategy(),
        ) {
            let state = EditorState::default()
                .with_image(quadrant_image(img_w, img_h))
                .with_position(NormalizedPosition::new(x, y))
                .with_scale(scale);
            let bmp = render(&state, FrameSize::new(frame_w, frame_h)).unwrap();

            prop_assert_eq!(bmp.width, frame_w);
            prop_assert_eq!(bmp.height, frame_h);
            prop_assert_eq!(bmp.pixels.len(), (frame_w * frame_h * 4) as usize);
        }

        /// Property: nothing outside the crop circle is visible.
        #[test]
        fn prop_outside_circle_transparent(
            (img_w, img_h) in (1u32..=64, 1u32..=64),
            (x, y, scale) in framing_strategy(),
        ) {
            let frame = FrameSize::new(32, 24);
            let state = EditorState::default()
                .with_image(quadrant_image(img_w, img_h))
                .with_position(NormalizedPosition::new(x, y))
                .with_scale(scale);
            let bmp = render(&state, frame).unwrap();
            let mask = CircleMask::for_frame(frame, 0);

            for py in 0..frame.height {
                for px in 0..frame.width {
                    if !mask.contains(px, py) {
                        prop_assert_eq!(bmp.pixel(px, py), Some([0, 0, 0, 0]));
                    }
                }
            }
        }

        /// Property: rendering is deterministic.
        #[test]
        fn prop_render_deterministic(
            (img_w, img_h) in (1u32..=64, 1u32..=64),
            (x, y, scale) in framing_strategy(),
        ) {
            let state = EditorState::default()
                .with_image(quadrant_image(img_w, img_h))
                .with_position(NormalizedPosition::new(x, y))
                .with_scale(scale);
            let frame = FrameSize::new(24, 24);

            prop_assert_eq!(render(&state, frame).unwrap(), render(&state, frame).unwrap());
        }

        /// Property: with keep_covered, the whole circle is opaque for opaque images.
        #[test]
        fn prop_keep_covered_no_gaps(
            (img_w, img_h) in (4u32..=64, 4u32..=64),
            (x, y, scale) in framing_strategy(),
        ) {
            let frame = FrameSize::new(24, 24);
            let state = EditorState::default()
                .with_image(quadrant_image(img_w, img_h))
                .with_position(NormalizedPosition::new(x, y))
                .with_scale(scale);
            let options = RenderOptions { keep_covered: true, ..Default::default() };
            let bmp = render_with(&state, frame, options).unwrap();
            let mask = CircleMask::for_frame(frame, 0);

            for py in 0..frame.height {
                for px in 0..frame.width {
                    if mask.coverage(px, py) >= 1.0 {
                        prop_assert_eq!(bmp.alpha(px, py), 255);
                    }
                }
            }
        }
    }
}
