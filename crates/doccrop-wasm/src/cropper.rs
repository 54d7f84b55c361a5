//! WASM bindings for the interactive cropper.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsCropper({ maxDisplayWidth: 800, maxDisplayHeight: 600 });
//! // Listeners run from a microtask after the call that raised the event.
//! cropper.subscribe((event) => {
//!   if (event.type === 'redraw') {
//!     const frame = cropper.frame();
//!     if (frame) ctx.putImageData(new ImageData(
//!       new Uint8ClampedArray(frame.rgba()), frame.width, frame.height), 0, 0);
//!   }
//! });
//!
//! const ticket = cropper.begin_load(file.name, file.type);
//! cropper.finish_load(ticket, new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.onmousedown = (e) => cropper.begin_drag(e.offsetX, e.offsetY);
//! canvas.onmousemove = (e) => cropper.update_drag(e.offsetX, e.offsetY);
//! canvas.onmouseup = () => cropper.end_drag();
//!
//! const cropped = cropper.apply_crop();
//! const text = await Tesseract.recognize(cropped.data_url(), 'eng');
//! ```

use doccrop_core::cropper::{Cropper, CropperEvent, ListenerId, LoadOutcome, LoadTicket};
use doccrop_core::config::CropperConfig;
use doccrop_core::transform::{CropRect, Point};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{JsDecodedImage, JsEncodedImage};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = queueMicrotask)]
    fn queue_microtask(task: &JsValue);
}

/// Event payload handed to JavaScript listeners.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum JsEvent {
    StateChanged { state: &'static str },
    SelectionChanged { selection: Option<CropRect> },
    Redraw,
    Rejected { message: String },
}

impl From<&CropperEvent> for JsEvent {
    fn from(event: &CropperEvent) -> Self {
        match event {
            CropperEvent::StateChanged(state) => JsEvent::StateChanged {
                state: state.as_str(),
            },
            CropperEvent::SelectionChanged(selection) => JsEvent::SelectionChanged {
                selection: *selection,
            },
            CropperEvent::Redraw => JsEvent::Redraw,
            CropperEvent::Rejected(error) => JsEvent::Rejected {
                message: error.to_string(),
            },
        }
    }
}

/// Ticket for a load started with `begin_load`.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation() as f64
    }
}

#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper,
    listeners: Vec<(u32, ListenerId)>,
    next_listener: u32,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper. `config` is an optional object with any of
    /// `maxDisplayWidth`, `maxDisplayHeight`, `displayFilter`,
    /// `outlineColor`, `outlineWidth`, `outputFormat`, `jpegQuality`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?
        };
        JsCropper::with_config(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current state: `empty`, `decoding`, `loaded`, `cropping`, `cropped`
    /// or `passThrough`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// Load a file whose bytes are already in hand. Returns `image`,
    /// `document` or `superseded`.
    pub fn load(&mut self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<String, JsValue> {
        let ticket = self
            .inner
            .begin_load(name, mime_type)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.finish(ticket, bytes)
    }

    pub fn begin_load(&mut self, name: &str, mime_type: &str) -> Result<JsLoadTicket, JsValue> {
        self.inner
            .begin_load(name, mime_type)
            .map(|inner| JsLoadTicket { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn finish_load(&mut self, ticket: &JsLoadTicket, bytes: Vec<u8>) -> Result<String, JsValue> {
        self.finish(ticket.inner, bytes)
    }

    pub fn discard(&mut self) {
        self.inner.discard();
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .begin_drag(Point::new(x, y))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
        self.inner.update_drag(Point::new(x, y))
    }

    pub fn end_drag(&mut self) {
        self.inner.end_drag();
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Crop the selection and return the re-encoded result.
    pub fn apply_crop(&mut self) -> Result<JsEncodedImage, JsValue> {
        self.inner
            .apply_crop()
            .map(|cropped| JsEncodedImage::from_encoded(cropped.encoded.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset_to_original(&mut self) -> Result<(), JsValue> {
        self.inner
            .reset_to_original()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Display raster with the selection outline, or `undefined`.
    pub fn frame(&self) -> Option<JsDecodedImage> {
        self.inner.frame().map(JsDecodedImage::from_decoded)
    }

    /// Image for local OCR: the crop if present, otherwise the whole source.
    pub fn output(&self) -> Result<JsEncodedImage, JsValue> {
        self.inner
            .output()
            .map(JsEncodedImage::from_encoded)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Bytes of the upload as received, for remote OCR.
    pub fn original_file_bytes(&self) -> Option<Vec<u8>> {
        self.inner.original_file().map(|file| file.bytes.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn original_file_name(&self) -> Option<String> {
        self.inner.original_file().map(|file| file.name.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn original_file_type(&self) -> Option<String> {
        self.inner.original_file().map(|file| file.mime_type.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> Option<u32> {
        self.inner.projection().map(|p| p.display_width)
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> Option<u32> {
        self.inner.projection().map(|p| p.display_height)
    }

    /// Current projection as `{scale, sourceWidth, ...}`, or `null`.
    pub fn projection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.projection()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current selection as `{x, y, w, h}` in display pixels, or `null`.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.selection()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Register `callback(event)`; returns an id for `unsubscribe`.
    ///
    /// Events are delivered in order from a microtask once the method that
    /// raised them has returned, so a listener may call back into this
    /// cropper (`frame()` on `redraw`). Events raised before `unsubscribe`
    /// are still delivered.
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(move |event| {
            match to_js(&JsEvent::from(event)) {
                Ok(payload) => deliver_later(callback.clone(), payload),
                Err(e) => log::warn!("could not serialize cropper event: {}", e),
            }
        });
        self.track(id)
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        match self.listeners.iter().position(|(js_id, _)| *js_id == id) {
            Some(index) => {
                let (_, listener) = self.listeners.remove(index);
                self.inner.unsubscribe(listener)
            }
            None => false,
        }
    }
}

impl JsCropper {
    pub(crate) fn with_config(config: CropperConfig) -> Result<Self, doccrop_core::CropError> {
        Ok(Self {
            inner: Cropper::new(config)?,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    fn track(&mut self, listener: ListenerId) -> u32 {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn finish(&mut self, ticket: LoadTicket, bytes: Vec<u8>) -> Result<String, JsValue> {
        self.inner
            .finish_load(ticket, bytes)
            .map(|outcome| outcome_name(outcome).to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Call `callback(payload)` after the current wasm call has unwound and
/// released its borrow of the cropper.
fn deliver_later(callback: js_sys::Function, payload: JsValue) {
    let task = Closure::once_into_js(move || {
        if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
            log::warn!("cropper listener threw: {:?}", e);
        }
    });
    queue_microtask(&task);
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn outcome_name(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Image { .. } => "image",
        LoadOutcome::Document => "document",
        LoadOutcome::Superseded => "superseded",
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_undefined_config() {
        let cropper = JsCropper::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(cropper.state(), "empty");
    }

    #[wasm_bindgen_test]
    fn test_new_with_partial_config() {
        let config = js_sys::JSON::parse(r#"{"maxDisplayWidth": 320, "outputFormat": "jpeg"}"#)
            .unwrap();
        assert!(JsCropper::new(config).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_new_rejects_zero_bounds() {
        let config = js_sys::JSON::parse(r#"{"maxDisplayHeight": 0}"#).unwrap();
        assert!(JsCropper::new(config).is_err());
    }

    #[wasm_bindgen_test]
    fn test_unsupported_file_is_error() {
        let mut cropper = JsCropper::new(JsValue::NULL).unwrap();
        assert!(cropper.load("a.txt", "text/plain", vec![1, 2, 3]).is_err());
        assert_eq!(cropper.state(), "empty");
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        doccrop_core::encode::encode_png(&vec![90u8; (width * height * 3) as usize], width, height)
            .unwrap()
    }

    /// Let queued listener deliveries run.
    async fn settle() {
        JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL))
            .await
            .unwrap();
    }

    fn event_type(event: &JsValue) -> Option<String> {
        js_sys::Reflect::get(event, &JsValue::from_str("type"))
            .ok()
            .and_then(|value| value.as_string())
    }

    #[wasm_bindgen_test]
    async fn test_subscribe_receives_events() {
        let mut cropper = JsCropper::new(JsValue::NULL).unwrap();
        let seen = js_sys::Array::new();
        let sink = seen.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            sink.push(&event);
        });
        let function: js_sys::Function = closure.as_ref().clone().into();
        closure.forget();

        let id = cropper.subscribe(function);
        let _ = cropper.begin_drag(1.0, 1.0);
        // Delivery waits for the call to return
        assert_eq!(seen.length(), 0);
        settle().await;
        assert_eq!(seen.length(), 1);
        assert_eq!(event_type(&seen.get(0)).as_deref(), Some("rejected"));

        assert!(cropper.unsubscribe(id));
        assert!(!cropper.unsubscribe(id));
        let _ = cropper.begin_drag(1.0, 1.0);
        settle().await;
        assert_eq!(seen.length(), 1);
    }

    #[wasm_bindgen_test]
    async fn test_redraw_listener_can_read_frame() {
        let cropper = Rc::new(RefCell::new(
            JsCropper::with_config(CropperConfig {
                max_display_width: 40,
                max_display_height: 30,
                ..CropperConfig::default()
            })
            .unwrap(),
        ));
        cropper
            .borrow_mut()
            .load("a.png", "image/png", png(80, 60))
            .unwrap();

        let frames = Rc::new(RefCell::new(Vec::new()));
        let (owner, sink) = (Rc::clone(&cropper), Rc::clone(&frames));
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if event_type(&event).as_deref() == Some("redraw") {
                // A busy cropper shows up as None here
                let width = owner
                    .try_borrow()
                    .ok()
                    .and_then(|cropper| cropper.frame())
                    .map(|frame| frame.width());
                sink.borrow_mut().push(width);
            }
        });
        let function: js_sys::Function = closure.as_ref().clone().into();
        closure.forget();
        cropper.borrow_mut().subscribe(function);

        cropper.borrow_mut().begin_drag(5.0, 5.0).unwrap();
        assert!(cropper.borrow_mut().update_drag(15.0, 10.0));
        assert!(frames.borrow().is_empty());

        settle().await;
        assert_eq!(*frames.borrow(), vec![Some(40), Some(40)]);
    }

    #[wasm_bindgen_test]
    fn test_selection_null_when_empty() {
        let cropper = JsCropper::new(JsValue::NULL).unwrap();
        assert!(cropper.selection().unwrap().is_null());
    }
}
