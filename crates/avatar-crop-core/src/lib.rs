//! Avatar Crop Core - circular avatar cropping
//!
//! This crate provides the engine behind an interactive avatar editor: image
//! source resolution, an immutable crop state, the transform/render pipeline
//! with its circular mask, a debounced preview scheduler and drag math.
//!
//! # Module Structure
//!
//! - `source` - Decode files or bundled assets into an `ImageHandle`
//! - `state` - `EditorState` and its pure transitions
//! - `render` - Cover fit, focal-point placement, rasterization, circle mask
//! - `preview` - Trailing-edge debounce of preview renders over a `Clock`
//! - `gesture` - Pointer drag to focal-point delta
//! - `editor` - `AvatarEditor`, tying the above together per instance
//! - `config` - `EditorConfig` defaults and validation
//! - `encode` - PNG and data URL export

pub mod bitmap;
pub mod config;
pub mod editor;
pub mod encode;
pub mod gesture;
pub mod preview;
pub mod render;
pub mod source;
pub mod state;

#[cfg(test)]
pub(crate) mod test_util;

pub use bitmap::Bitmap;
pub use config::{ConfigError, EditorConfig};
pub use editor::{AvatarEditor, PreviewListener};
pub use gesture::{drag_delta, drag_delta_for_image, PointerDelta, PositionDelta};
pub use preview::{Clock, ManualClock, PreviewScheduler};
pub use render::{render, render_editor_view, render_with, FrameSize, RenderError, RenderOptions};
pub use source::{DecodeError, ImageHandle, ImageSource};
pub use state::{EditorState, NormalizedPosition, ScaleLimits};
