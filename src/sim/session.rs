//! Game session and state machine
//!
//! The session owns the whole world. The caller keeps it and drives it one
//! tick at a time; everything a renderer needs comes out of [`GameSession::snapshot`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::level::{START_GROUND_Y, generate_level};
use super::physics::Thresholds;
use super::state::{
    Actor, AudioStatus, BridgeState, Camera, Confetti, GameEvent, GamePhase, LevelElement,
};
use crate::error::LevelError;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Read-only view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: f32,
    pub actor: &'a Actor,
    pub camera: Camera,
    pub level: &'a [LevelElement],
    pub confetti: &'a [Confetti],
}

/// A single player's game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Distance score, frozen once the run ends
    pub score: f32,
    pub actor: Actor,
    pub camera: Camera,
    /// Level elements in scan order
    pub level: Vec<LevelElement>,
    pub bridge: BridgeState,
    pub confetti: Vec<Confetti>,
    pub audio: AudioStatus,
    /// Ticks since the session was created
    pub time_ticks: u64,

    pub(crate) settings: Settings,
    pub(crate) tuning: Tuning,
    /// Pristine copy of the generated level
    level_template: Vec<LevelElement>,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create a session waiting for audio
    pub fn new(settings: Settings, tuning: Tuning) -> Result<Self, LevelError> {
        let level_template = generate_level(settings.bridge_kind)?;
        let mut session = Self {
            phase: GamePhase::Loading,
            score: 0.0,
            actor: Actor::at_start(START_GROUND_Y),
            camera: Camera::default(),
            level: Vec::new(),
            bridge: BridgeState::default(),
            confetti: Vec::new(),
            audio: AudioStatus::Pending,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            tuning,
            level_template,
        };
        session.reset();
        Ok(session)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Volume thresholds for the current settings
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(&self.settings, &self.tuning)
    }

    /// Rebuild the world from the level template
    ///
    /// Leaves `phase`, `audio` and the tick counter alone.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.level = self.level_template.clone();
        self.actor = Actor::at_start(START_GROUND_Y);
        self.camera = Camera::default();
        self.bridge = BridgeState::default();
        self.confetti.clear();
        self.score = 0.0;
        log::debug!("Session reset ({} elements)", self.level.len());
    }

    /// The audio subsystem reported
    pub fn audio_ready(&mut self, status: AudioStatus) -> Option<GameEvent> {
        if self.phase != GamePhase::Loading {
            log::debug!("Ignoring late audio status {:?}", status);
            return None;
        }

        match status {
            AudioStatus::Pending => {
                log::debug!("Audio request still pending");
                return None;
            }
            AudioStatus::Granted => log::info!("Microphone ready"),
            AudioStatus::Denied => {
                log::warn!("Microphone unavailable, use click or space to jump")
            }
            AudioStatus::Bypassed => log::info!("Playing without audio"),
        }
        self.audio = status;
        self.phase = GamePhase::Ready;
        Some(GameEvent::AudioReady(status))
    }

    /// Begin a new run; returns false when the current phase can't start one
    pub fn start(&mut self) -> bool {
        if !self.phase.can_start() {
            return false;
        }
        self.reset();
        self.phase = GamePhase::Playing;
        log::info!("Run started");
        true
    }

    /// Change sensitivity (ignored mid-run)
    pub fn set_sensitivity(&mut self, sensitivity: f32) -> bool {
        if self.phase == GamePhase::Playing {
            log::info!("Sensitivity can't change during a run");
            return false;
        }
        self.settings.set_sensitivity(sensitivity);
        log::info!(
            "Sensitivity {} (threshold {})",
            self.settings.sensitivity,
            self.settings.effective_threshold()
        );
        true
    }

    /// Replace all settings (ignored mid-run)
    ///
    /// Regenerates the level when the bridge kind changes.
    pub fn apply_settings(&mut self, mut settings: Settings) -> Result<bool, LevelError> {
        if self.phase == GamePhase::Playing {
            log::info!("Settings can't change during a run");
            return Ok(false);
        }

        settings.set_sensitivity(settings.sensitivity);
        if settings.bridge_kind != self.settings.bridge_kind {
            self.level_template = generate_level(settings.bridge_kind)?;
        }
        self.settings = settings;
        self.reset();
        log::info!(
            "Settings applied: mode={} bridge={}",
            self.settings.movement_mode.as_str(),
            self.settings.bridge_kind.as_str()
        );
        Ok(true)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            actor: &self.actor,
            camera: self.camera,
            level: &self.level,
            confetti: &self.confetti,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BridgeKind;

    fn session() -> GameSession {
        GameSession::new(Settings::default(), Tuning::default()).expect("level")
    }

    #[test]
    fn test_new_session_is_loading() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Loading);
        assert_eq!(s.audio, AudioStatus::Pending);
        assert!(s.actor.on_ground);
        assert_eq!(s.actor.y, START_GROUND_Y - s.actor.height);
        assert!(!s.level.is_empty());
    }

    #[test]
    fn test_audio_ready_transitions_once() {
        let mut s = session();
        assert!(!s.start());
        assert_eq!(s.audio_ready(AudioStatus::Pending), None);
        assert_eq!(s.phase, GamePhase::Loading);
        assert!(!s.start());
        assert_eq!(
            s.audio_ready(AudioStatus::Denied),
            Some(GameEvent::AudioReady(AudioStatus::Denied))
        );
        assert_eq!(s.phase, GamePhase::Ready);
        assert_eq!(s.audio_ready(AudioStatus::Granted), None);
        assert_eq!(s.audio, AudioStatus::Denied);
    }

    #[test]
    fn test_start_resets_world() {
        let mut s = session();
        s.audio_ready(AudioStatus::Bypassed);
        s.actor.world_x = 900.0;
        s.camera.x = 500.0;
        s.score = 8.0;
        s.level.clear();
        s.phase = GamePhase::GameOver;

        assert!(s.start());
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.actor.world_x, 100.0);
        assert_eq!(s.camera.x, 0.0);
        assert_eq!(s.score, 0.0);
        assert!(!s.level.is_empty());
        // Not from Playing
        assert!(!s.start());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut a = session();
        a.reset();
        let first = format!("{:?}", a.snapshot());
        a.reset();
        assert_eq!(format!("{:?}", a.snapshot()), first);

        let b = session();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_settings_locked_while_playing() {
        let mut s = session();
        s.audio_ready(AudioStatus::Granted);
        assert!(s.set_sensitivity(90.0));
        assert_eq!(s.settings().effective_threshold(), 15.0);

        s.start();
        assert!(!s.set_sensitivity(10.0));
        assert_eq!(s.settings().sensitivity, 90.0);
        let changed = Settings {
            bridge_kind: BridgeKind::Falling,
            ..Settings::default()
        };
        assert_eq!(s.apply_settings(changed), Ok(false));
    }

    #[test]
    fn test_bridge_kind_regenerates_level() {
        let mut s = session();
        s.audio_ready(AudioStatus::Granted);
        let falling = Settings {
            bridge_kind: BridgeKind::Falling,
            ..Settings::default()
        };
        assert_eq!(s.apply_settings(falling), Ok(true));
        assert!(
            s.level
                .iter()
                .any(|e| matches!(e, LevelElement::FallingBridgeStructure(_)))
        );
        assert!(
            !s.level
                .iter()
                .any(|e| matches!(e, LevelElement::BridgeStructure(_)))
        );
    }
}
