//! Browser bindings
//!
//! The page owns the websocket and the DOM. It hands every frame to
//! [`WasmView`] as JSON and gets the resulting view events back as JSON.

use wasm_bindgen::prelude::*;

use crate::feed::{FeedFrame, FeedRequest, GameInfo};
use crate::settings::Settings;
use crate::view::{BroadcastView, ViewEvent};

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn events_json(events: &[ViewEvent]) -> Result<String, JsError> {
    serde_json::to_string(events).map_err(js_err)
}

fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

fn request_json(request: Option<FeedRequest>) -> Result<Option<String>, JsError> {
    request.map(|r| r.encode()).transpose().map_err(js_err)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Broadcast board starting...");
}

#[wasm_bindgen]
pub struct WasmView {
    view: BroadcastView,
}

#[wasm_bindgen]
impl WasmView {
    /// Build a view from the settings stored in LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmView {
        WasmView {
            view: BroadcastView::new(Settings::load()),
        }
    }

    /// Returns the request to send, or undefined
    #[wasm_bindgen(js_name = selectGame)]
    pub fn select_game(&mut self, game_json: &str) -> Result<Option<String>, JsError> {
        let game: GameInfo = serde_json::from_str(game_json).map_err(js_err)?;
        request_json(self.view.select_game(&game))
    }

    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&mut self, frame_json: &str) -> Result<String, JsError> {
        let frame = FeedFrame::decode(frame_json).map_err(js_err)?;
        let events = self.view.on_frame_at(frame, now_ms());
        events_json(&events)
    }

    #[wasm_bindgen(js_name = selectPly)]
    pub fn select_ply(&mut self, ply: usize) -> Result<String, JsError> {
        events_json(&self.view.select_ply(ply))
    }

    #[wasm_bindgen(js_name = moveCursor)]
    pub fn move_cursor(&mut self, delta: i32) -> Result<String, JsError> {
        events_json(&self.view.move_cursor(delta as isize))
    }

    #[wasm_bindgen(js_name = setFlipped)]
    pub fn set_flipped(&mut self, flipped: bool) -> Result<String, JsError> {
        let event = self.view.set_flipped(flipped);
        self.view.settings().save();
        events_json(&[event])
    }

    /// Replace the settings with a preset by name ("current" / "legacy")
    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&mut self, name: &str) -> Result<String, JsError> {
        let preset = crate::ArrowPreset::from_str(name)
            .ok_or_else(|| JsError::new(&format!("Unknown preset: {name}")))?;
        let mut settings = self.view.settings().clone();
        settings.apply_preset(preset);
        settings.save();
        events_json(&[self.view.apply_settings(settings)])
    }

    #[wasm_bindgen(js_name = previewVariation)]
    pub fn preview_variation(
        &self,
        variation_idx: usize,
        upto_ply: usize,
    ) -> Result<String, JsError> {
        let preview = self
            .view
            .preview_variation(variation_idx, upto_ply)
            .map_err(js_err)?;
        serde_json::to_string(&preview).map_err(js_err)
    }

    #[wasm_bindgen(js_name = clockDisplay)]
    pub fn clock_display(&self) -> Result<Option<String>, JsError> {
        self.view
            .clock_display(now_ms())
            .map(|c| serde_json::to_string(&c))
            .transpose()
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = legendLen)]
    pub fn legend_len(&self) -> usize {
        self.view.legend_len()
    }

    #[wasm_bindgen(js_name = onDisconnect)]
    pub fn on_disconnect(&mut self) {
        self.view.on_disconnect();
    }

    #[wasm_bindgen(js_name = onReconnect)]
    pub fn on_reconnect(&self) -> Result<Option<String>, JsError> {
        request_json(self.view.on_reconnect())
    }
}

impl Default for WasmView {
    fn default() -> Self {
        Self::new()
    }
}
