//! Browser bindings
//!
//! The page owns the canvas, the microphone request and the animation frame
//! loop. It calls `tick` once per frame and draws from `snapshot_json`.

use wasm_bindgen::prelude::*;

use crate::audio::{AnalyserVolume, VolumeSource};
use crate::settings::{BridgeKind, MovementMode, Settings};
use crate::sim::{AudioStatus, DebugSnapshot, GameSession, TickInput, tick};
use crate::tuning::Tuning;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Voice Runner starting...");
}

/// Game instance driven from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    source: Option<AnalyserVolume>,
    /// One-shot inputs collected between frames
    input: TickInput,
    last_debug: DebugSnapshot,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        let session = GameSession::new(Settings::load(), Tuning::default()).map_err(js_error)?;
        Ok(Self {
            session,
            source: None,
            input: TickInput::default(),
            last_debug: DebugSnapshot::default(),
        })
    }

    /// Create with custom tuning JSON
    pub fn with_tuning(json: &str) -> Result<WebGame, JsValue> {
        let tuning = Tuning::from_json(json).map_err(js_error)?;
        let session = GameSession::new(Settings::load(), tuning).map_err(js_error)?;
        Ok(Self {
            session,
            source: None,
            input: TickInput::default(),
            last_debug: DebugSnapshot::default(),
        })
    }

    /// Report the microphone request outcome ("granted", "denied", "bypassed")
    pub fn audio_ready(&mut self, status: &str) -> Result<bool, JsValue> {
        let status = AudioStatus::from_str(status)
            .ok_or_else(|| js_error(format!("unknown audio status '{status}'")))?;
        Ok(self.session.audio_ready(status).is_some())
    }

    /// Use a Web Audio analyser as the volume source
    pub fn attach_analyser(&mut self, analyser: web_sys::AnalyserNode) {
        self.source = Some(AnalyserVolume::new(analyser));
        log::info!("Analyser attached");
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn jump(&mut self) {
        self.input.jump = true;
    }

    pub fn step_forward(&mut self) {
        self.input.step_forward = true;
    }

    /// Advance one frame; returns the tick's events as JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        self.input.volume = if self.session.audio.has_input() {
            self.source.as_mut().map(|s| s.sample_volume())
        } else {
            None
        };
        let input = std::mem::take(&mut self.input);
        let result = tick(&mut self.session, &input);
        self.last_debug = result.debug;
        serde_json::to_string(&result.events).map_err(js_error)
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) -> bool {
        let changed = self.session.set_sensitivity(sensitivity);
        if changed {
            self.session.settings().save();
        }
        changed
    }

    /// "walkAndJump" or "moveOnly"
    pub fn set_movement_mode(&mut self, mode: &str) -> Result<bool, JsValue> {
        let movement_mode = MovementMode::from_str(mode)
            .ok_or_else(|| js_error(format!("unknown movement mode '{mode}'")))?;
        self.apply(Settings {
            movement_mode,
            ..self.session.settings().clone()
        })
    }

    /// "simple" or "falling"
    pub fn set_bridge_kind(&mut self, kind: &str) -> Result<bool, JsValue> {
        let bridge_kind = BridgeKind::from_str(kind)
            .ok_or_else(|| js_error(format!("unknown bridge kind '{kind}'")))?;
        self.apply(Settings {
            bridge_kind,
            ..self.session.settings().clone()
        })
    }

    pub fn phase(&self) -> String {
        self.session.phase.as_str().to_string()
    }

    pub fn score(&self) -> f32 {
        self.session.score
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(js_error)
    }

    pub fn debug_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.last_debug).map_err(js_error)
    }
}

impl WebGame {
    fn apply(&mut self, settings: Settings) -> Result<bool, JsValue> {
        let applied = self.session.apply_settings(settings).map_err(js_error)?;
        if applied {
            self.session.settings().save();
        }
        Ok(applied)
    }
}
