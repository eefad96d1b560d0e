//! Avatar Crop WASM - WebAssembly bindings for the avatar editor
//!
//! This crate exposes `avatar-crop-core` to the browser as an `AvatarEditor`
//! class. Each instance owns its own state and preview timer, so several
//! editors can live on one page.
//!
//! # Module Structure
//!
//! - `editor` - The `AvatarEditor` class (gestures, rendering, preview)
//! - `types` - `JsBitmap`, a rendered RGBA bitmap
//! - `clock` - `Date.now()` time source for the preview debounce
//!
//! # Usage
//!
//! ```typescript
//! import init, { AvatarEditor } from '@avatar-crop/wasm';
//!
//! await init();
//!
//! const editor = new AvatarEditor();
//! editor.loadImage(new Uint8Array(await file.arrayBuffer()));
//! const canvas = editor.renderCanvas();
//! console.log(`Canvas ${canvas.width}x${canvas.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod clock;
mod editor;
mod types;

pub use clock::JsClock;
pub use editor::JsAvatarEditor;
pub use types::JsBitmap;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
