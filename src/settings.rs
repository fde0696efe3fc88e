//! Player settings and engine policy
//!
//! Persisted separately from tuning in LocalStorage. Only editable while the
//! runner is not mid-run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Lowest sensitivity (threshold is highest)
pub const SENSITIVITY_MIN: f32 = 5.0;
/// Highest sensitivity (threshold is lowest)
pub const SENSITIVITY_MAX: f32 = 100.0;

/// How volume translates into movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MovementMode {
    /// Soft sounds walk, loud sounds jump forward
    #[default]
    WalkAndJump,
    /// Any sound above threshold moves forward proportionally to volume
    MoveOnly,
}

impl MovementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementMode::WalkAndJump => "WalkAndJump",
            MovementMode::MoveOnly => "MoveOnly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walkandjump" | "walk" | "walk-jump" => Some(MovementMode::WalkAndJump),
            "moveonly" | "move" | "move-only" => Some(MovementMode::MoveOnly),
            _ => None,
        }
    }
}

/// Which bridge the level generator builds before the final stretch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BridgeKind {
    /// Post plus planks that materialize while the runner waits on the post
    #[default]
    Simple,
    /// Planks that wiggle and drop shortly after being stood on
    Falling,
}

impl BridgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeKind::Simple => "Simple",
            BridgeKind::Falling => "Falling",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simple" => Some(BridgeKind::Simple),
            "falling" => Some(BridgeKind::Falling),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Microphone sensitivity (SENSITIVITY_MIN..=SENSITIVITY_MAX)
    pub sensitivity: f32,
    /// Volume-to-movement policy
    pub movement_mode: MovementMode,
    /// Bridge variant in the generated level
    pub bridge_kind: BridgeKind,
    /// RNG seed for shuriken jitter and confetti
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Threshold of 30
            sensitivity: 75.0,
            movement_mode: MovementMode::WalkAndJump,
            bridge_kind: BridgeKind::Simple,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Update sensitivity, clamped to the slider range
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = if sensitivity.is_finite() {
            sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
        } else {
            Self::default().sensitivity
        };
    }

    /// Volume above which sound counts as detected
    ///
    /// Mirrors the sensitivity slider: the more sensitive, the lower the bar.
    pub fn effective_threshold(&self) -> f32 {
        let s = self.sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
        SENSITIVITY_MIN + SENSITIVITY_MAX - s
    }

    /// Extra volume above the threshold needed for a jump
    pub fn jump_offset(&self, tuning: &Tuning) -> f32 {
        self.effective_threshold() * tuning.jump_offset_ratio
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        if !settings.sensitivity.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "sensitivity",
                value: settings.sensitivity,
            });
        }
        settings.set_sensitivity(settings.sensitivity);
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "voice_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
