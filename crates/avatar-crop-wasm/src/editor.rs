//! Editor bindings.
//!
//! Exposes one [`AvatarEditor`](avatar_crop_core::AvatarEditor) per JavaScript
//! object. A new editor starts with the bundled default avatar. The editor arms
//! its own `setTimeout` after every change, so `onPreviewReady` fires once
//! input has been quiet for the debounce window without any help from the page.
//!
//! # Example
//!
//! ```typescript
//! import { AvatarEditor } from '@avatar-crop/wasm';
//!
//! const editor = new AvatarEditor({ frameWidth: 231, frameHeight: 231 });
//! editor.onPreviewReady((url) => { previewImg.src = url; });
//!
//! editor.loadImage(new Uint8Array(await file.arrayBuffer()));
//! editor.setScale(1.4);
//!
//! const canvas = editor.renderCanvas();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(canvas.pixels()), canvas.width), 0, 0);
//!
//! // When the editor leaves the page
//! editor.teardown();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use avatar_crop_core::{
    AvatarEditor, Bitmap, EditorConfig, ImageSource, NormalizedPosition, PointerDelta,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

use crate::clock::JsClock;
use crate::types::JsBitmap;

/// Image shown until the user picks one.
pub(crate) static DEFAULT_AVATAR: &[u8] = include_bytes!("../assets/default-avatar.png");

/// State shared between the JS object and its timer callback.
struct Shared {
    editor: RefCell<AvatarEditor<JsClock>>,
    listener: RefCell<Option<js_sys::Function>>,
    /// Handle of the armed `setTimeout`, if any.
    timer: Cell<Option<i32>>,
    on_timer: RefCell<Option<Closure<dyn FnMut()>>>,
}

#[wasm_bindgen(js_name = AvatarEditor)]
pub struct JsAvatarEditor {
    shared: Rc<Shared>,
}

#[wasm_bindgen(js_class = AvatarEditor)]
impl JsAvatarEditor {
    /// Create an editor from an optional config object, showing the default
    /// avatar.
    ///
    /// Missing fields take their defaults (231x231 frame, 25 px border,
    /// zoom 1 to 2, 100 ms preview debounce).
    ///
    /// # Errors
    ///
    /// Returns an error if the object has the wrong shape or the values are
    /// invalid (zero or oversized canvas, zero debounce, inverted zoom range).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsAvatarEditor, JsValue> {
        let config = parse_config(config)?;
        let mut editor = AvatarEditor::new(config, JsClock::new()).map_err(to_js_error)?;
        editor.load_bundled(DEFAULT_AVATAR).map_err(to_js_error)?;

        let shared = Rc::new(Shared {
            editor: RefCell::new(editor),
            listener: RefCell::new(None),
            timer: Cell::new(None),
            on_timer: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let on_timer = Closure::<dyn FnMut()>::new(move || {
            if let Some(shared) = weak.upgrade() {
                fire(&shared);
            }
        });
        *shared.on_timer.borrow_mut() = Some(on_timer);

        arm(&shared);
        Ok(Self { shared })
    }

    /// Decode file bytes and make them the current image.
    ///
    /// On failure the previous image stays in place and a warning is written
    /// to the console.
    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let result = self
            .shared
            .editor
            .borrow_mut()
            .set_image(ImageSource::File(bytes));
        match result {
            Ok(()) => {
                arm(&self.shared);
                Ok(())
            }
            Err(e) => {
                let err = to_js_error(e);
                console::warn_2(&JsValue::from_str("avatar image rejected:"), &err);
                Err(err)
            }
        }
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, scale: f64) {
        self.shared.editor.borrow_mut().set_scale(scale);
        arm(&self.shared);
    }

    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.shared
            .editor
            .borrow_mut()
            .set_position(NormalizedPosition::new(x, y));
        arm(&self.shared);
    }

    /// Move the image by a pointer delta in canvas pixels.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.shared.editor.borrow_mut().drag(PointerDelta::new(dx, dy));
        arm(&self.shared);
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.shared.editor.borrow().state().scale()
    }

    #[wasm_bindgen(getter, js_name = positionX)]
    pub fn position_x(&self) -> f64 {
        self.shared.editor.borrow().state().position().x
    }

    #[wasm_bindgen(getter, js_name = positionY)]
    pub fn position_y(&self) -> f64 {
        self.shared.editor.borrow().state().position().y
    }

    /// Whether an image has been decoded.
    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.shared.editor.borrow().state().is_ready()
    }

    /// Render the editable canvas: frame plus border, outside the circle dimmed.
    #[wasm_bindgen(js_name = renderCanvas)]
    pub fn render_canvas(&self) -> Result<JsBitmap, JsValue> {
        self.shared
            .editor
            .borrow()
            .render_canvas()
            .map(JsBitmap::from_bitmap)
            .map_err(to_js_error)
    }

    /// Render the circular crop immediately, without waiting for the debounce.
    #[wasm_bindgen(js_name = renderCrop)]
    pub fn render_crop(&self) -> Result<JsBitmap, JsValue> {
        self.shared
            .editor
            .borrow()
            .render_crop()
            .map(JsBitmap::from_bitmap)
            .map_err(to_js_error)
    }

    /// Render a due preview now instead of waiting for the timer. Returns true
    /// when a new preview was rendered (and delivered to `onPreviewReady`).
    pub fn poll(&mut self) -> bool {
        fire(&self.shared)
    }

    /// Milliseconds until the pending preview renders, or `undefined` when no
    /// preview is pending.
    #[wasm_bindgen(js_name = msUntilPreview)]
    pub fn ms_until_preview(&self) -> Option<f64> {
        self.shared
            .editor
            .borrow()
            .time_until_preview()
            .map(|wait| wait.as_secs_f64() * 1000.0)
    }

    /// Register `callback(dataUrl)` for completed previews, replacing any
    /// previous callback. The editor's own timer invokes it; the page does not
    /// need to schedule anything.
    #[wasm_bindgen(js_name = onPreviewReady)]
    pub fn on_preview_ready(&mut self, callback: js_sys::Function) {
        *self.shared.listener.borrow_mut() = Some(callback);
    }

    /// The latest preview as a PNG data URL, or `undefined` before the first one.
    #[wasm_bindgen(js_name = previewDataUrl)]
    pub fn preview_data_url(&self) -> Result<Option<String>, JsValue> {
        self.shared
            .editor
            .borrow()
            .preview()
            .map(Bitmap::to_png_data_url)
            .transpose()
            .map_err(to_js_error)
    }

    /// Cancel any pending preview and release the callback. Call when the
    /// editor leaves the page.
    pub fn teardown(&mut self) {
        disarm(&self.shared);
        self.shared.editor.borrow_mut().teardown();
        *self.shared.listener.borrow_mut() = None;
    }
}

impl JsAvatarEditor {
    #[cfg(all(test, target_arch = "wasm32"))]
    fn timer_armed(&self) -> bool {
        self.shared.timer.get().is_some()
    }
}

impl Drop for JsAvatarEditor {
    fn drop(&mut self) {
        // The callback closure dies with `Shared`; a later timeout would call a freed closure
        disarm(&self.shared);
    }
}

/// Timer callback: render the preview if due, hand it to the page, and re-arm
/// if something is still pending.
fn fire(shared: &Shared) -> bool {
    shared.timer.set(None);

    let rendered = shared.editor.borrow_mut().poll();
    if rendered {
        deliver(shared);
    }
    arm(shared);
    rendered
}

/// Call the page's listener with the latest preview. No borrow is held while
/// JavaScript runs, so the listener may call back into the editor.
fn deliver(shared: &Shared) {
    let Some(listener) = shared.listener.borrow().clone() else {
        return;
    };
    let url = shared
        .editor
        .borrow()
        .preview()
        .map(Bitmap::to_png_data_url)
        .transpose();

    let delivered = match url {
        Ok(Some(url)) => listener
            .call1(&JsValue::NULL, &JsValue::from_str(&url))
            .map(|_| ()),
        Ok(None) => Ok(()),
        Err(e) => Err(to_js_error(e)),
    };
    if let Err(err) = delivered {
        console::warn_2(&JsValue::from_str("avatar preview callback failed:"), &err);
    }
}

/// (Re)arm the timer for the pending preview, replacing any earlier one.
fn arm(shared: &Shared) {
    disarm(shared);

    let Some(wait) = shared.editor.borrow().time_until_preview() else {
        return;
    };
    // No window in workers; callers there drive `poll` themselves
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_timer = shared.on_timer.borrow();
    let Some(on_timer) = on_timer.as_ref() else {
        return;
    };

    let ms = (wait.as_secs_f64() * 1000.0).ceil().min(i32::MAX as f64) as i32;
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(on_timer.as_ref().unchecked_ref(), ms)
    {
        Ok(handle) => shared.timer.set(Some(handle)),
        Err(err) => console::warn_2(&JsValue::from_str("avatar preview timer failed:"), &err),
    }
}

fn disarm(shared: &Shared) {
    if let Some(handle) = shared.timer.take() {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle);
        }
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_config(config: JsValue) -> Result<EditorConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        Ok(EditorConfig::default())
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid editor config: {e}")))
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use avatar_crop_core::encode::encode_png;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 251) as u8, 64, 192, 255])
            .collect();
        encode_png(&pixels, width, height).unwrap()
    }

    fn small_config() -> JsValue {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"frameWidth".into(), &JsValue::from(40)).unwrap();
        js_sys::Reflect::set(&obj, &"frameHeight".into(), &JsValue::from(40)).unwrap();
        js_sys::Reflect::set(&obj, &"border".into(), &JsValue::from(5)).unwrap();
        obj.into()
    }

    #[wasm_bindgen_test]
    fn test_starts_with_default_avatar() {
        let editor = JsAvatarEditor::new(JsValue::UNDEFINED).unwrap();
        assert!(editor.is_ready());
        assert_eq!(editor.scale(), 1.0);
        assert_eq!(editor.position_x(), 0.5);
        assert_eq!(editor.render_crop().unwrap().width(), 231);
    }

    #[wasm_bindgen_test]
    fn test_partial_config_object() {
        let mut editor = JsAvatarEditor::new(small_config()).unwrap();
        editor.load_image(&make_test_png(30, 20)).unwrap();

        let canvas = editor.render_canvas().unwrap();
        assert_eq!(canvas.width(), 50);
        assert_eq!(canvas.height(), 50);
        assert_eq!(editor.render_crop().unwrap().width(), 40);
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_rejected() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"debounceMs".into(), &JsValue::from(0)).unwrap();
        assert!(JsAvatarEditor::new(obj.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_oversized_border_rejected() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"border".into(), &JsValue::from(3_000_000_000u32)).unwrap();
        assert!(JsAvatarEditor::new(obj.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_load_invalid_bytes_keeps_image() {
        let mut editor = JsAvatarEditor::new(small_config()).unwrap();
        editor.load_image(&make_test_png(8, 8)).unwrap();

        assert!(editor.load_image(b"not an image").is_err());
        assert!(editor.is_ready());
        assert_eq!(editor.render_crop().unwrap().width(), 40);
    }

    #[wasm_bindgen_test]
    fn test_gestures_clamp() {
        let mut editor = JsAvatarEditor::new(JsValue::UNDEFINED).unwrap();
        editor.set_scale(5.0);
        assert_eq!(editor.scale(), 2.0);

        editor.set_position(-1.0, 2.0);
        assert_eq!(editor.position_x(), 0.0);
        assert_eq!(editor.position_y(), 1.0);
    }

    #[wasm_bindgen_test]
    fn test_gesture_arms_own_timer() {
        let mut editor = JsAvatarEditor::new(small_config()).unwrap();
        assert!(editor.timer_armed());

        editor.set_scale(1.5);
        assert!(editor.timer_armed());
        let wait = editor.ms_until_preview().unwrap();
        assert!(wait <= 100.0);
        assert_eq!(editor.preview_data_url().unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_teardown_clears_timer() {
        let mut editor = JsAvatarEditor::new(small_config()).unwrap();
        editor.drag(4.0, 0.0);
        assert!(editor.timer_armed());

        editor.teardown();
        assert!(!editor.timer_armed());
        assert!(editor.ms_until_preview().is_none());
        assert!(!editor.poll());

        editor.set_scale(1.8);
        assert!(!editor.timer_armed());
    }
}
