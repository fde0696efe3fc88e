//! Voice Runner - a sound-driven side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Simulation engine (physics, camera, collisions, game state)
//! - `audio`: Volume sources feeding the simulation
//! - `settings`: Player preferences (sensitivity, movement mode, bridge kind)
//! - `tuning`: Data-driven game balance
//! - `error`: Level and configuration errors

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::VolumeSource;
pub use error::{ConfigError, LevelError};
pub use settings::{BridgeKind, MovementMode, Settings};
pub use tuning::Tuning;

/// World and viewport constants
pub mod consts {
    /// Viewport dimensions (world units == pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Water strip at the bottom of the viewport
    pub const WATER_HEIGHT: f32 = 50.0;
    /// Top edge of the water (feet at or below this line drown)
    pub const WATER_LINE: f32 = CANVAS_HEIGHT - WATER_HEIGHT;

    /// Runner body
    pub const ACTOR_WIDTH: f32 = 50.0;
    pub const ACTOR_HEIGHT: f32 = 40.0;
    /// Where the runner starts in the world
    pub const ACTOR_START_X: f32 = 100.0;

    /// Spike triangle bounding box (sits on top of its platform)
    pub const SPIKE_SIZE: f32 = 30.0;

    /// Shuriken bounding box
    pub const SHURIKEN_SIZE: f32 = 30.0;
    /// Highest a randomly placed shuriken can fly
    pub const SHURIKEN_MIN_Y: f32 = 50.0;

    /// Confetti pieces spawned on a win
    pub const CONFETTI_COUNT: usize = 100;

    /// Score units per world unit travelled
    pub const SCORE_DIVISOR: f32 = 100.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Normalize `value` into [0, 1] over `[lo, hi]`
///
/// A degenerate range (hi <= lo) saturates to 1 for anything above `lo`.
#[inline]
pub fn normalize_clamped(value: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= f32::EPSILON {
        return if value > lo { 1.0 } else { 0.0 };
    }
    ((value - lo) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(-6.0, -16.0, 0.0), -6.0);
        assert_eq!(lerp(-6.0, -16.0, 1.0), -16.0);
        assert_eq!(lerp(2.0, 8.0, 0.5), 5.0);
    }

    #[test]
    fn test_normalize_clamped() {
        assert_eq!(normalize_clamped(50.0, 50.0, 100.0), 0.0);
        assert_eq!(normalize_clamped(75.0, 50.0, 100.0), 0.5);
        assert_eq!(normalize_clamped(250.0, 50.0, 100.0), 1.0);
        assert_eq!(normalize_clamped(10.0, 50.0, 100.0), 0.0);
        // Degenerate range
        assert_eq!(normalize_clamped(120.0, 110.0, 100.0), 1.0);
        assert_eq!(normalize_clamped(100.0, 110.0, 100.0), 0.0);
    }
}
