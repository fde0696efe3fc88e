//! Data-driven game balance
//!
//! Every physics and timing constant the engine uses lives here so it can be
//! tweaked from JSON without touching simulation code. Defaults reproduce the
//! intended feel of the game at 60 frames per second.

use serde::{Deserialize, Serialize};

use crate::consts::CANVAS_WIDTH;
use crate::error::ConfigError;

/// Physics, movement and timing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Softest jump velocity (negative is up)
    pub min_jump_strength: f32,
    /// Loudest jump velocity
    pub max_jump_strength: f32,
    /// Walk hop is `min_jump_strength / hop_divisor`
    pub hop_divisor: f32,

    // === Horizontal movement ===
    /// Forward step per tick on a walk-level sound
    pub walk_speed: f32,
    /// Forward step per tick on a jump-level sound
    pub jump_forward_speed: f32,
    /// Move-only mode: forward step at the threshold
    pub min_move_distance: f32,
    /// Move-only mode: forward step at full volume
    pub max_move_distance: f32,

    // === Sound mapping ===
    /// Volume that maps to a full-strength jump
    pub max_expected_volume: f32,
    /// Jump activation offset as a fraction of the walk threshold
    pub jump_offset_ratio: f32,

    // === Camera ===
    /// Screen x the camera tries to keep the runner at
    pub camera_follow_offset: f32,
    /// Fraction of the remaining distance closed per tick
    pub camera_smoothing: f32,

    // === Collision ===
    /// Extra band below a platform top that still counts as landing
    pub landing_tolerance: f32,

    // === Shurikens ===
    /// Spawn window extends this far beyond both viewport edges
    pub shuriken_spawn_margin: f32,
    /// Deactivate once this far past the left edge
    pub shuriken_despawn_margin: f32,
    /// Rotation added per tick (radians)
    pub shuriken_rotation_step: f32,
    /// Spawn x jitter (+/-)
    pub shuriken_jitter: f32,
    /// Leftward speed is `walk_speed + bonus + rand * variance`
    pub shuriken_speed_bonus: f32,
    pub shuriken_speed_variance: f32,

    // === Falling bridge ===
    /// Ticks a plank wiggles before it drops
    pub wiggle_ticks: u32,

    // === Animation ===
    pub anim_step_airborne: f32,
    pub anim_step_walking: f32,
    pub anim_step_idle: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            min_jump_strength: -6.0,
            max_jump_strength: -16.0,
            hop_divisor: 3.0,

            walk_speed: 3.0,
            jump_forward_speed: 4.0,
            min_move_distance: 2.0,
            max_move_distance: 8.0,

            max_expected_volume: 100.0,
            // 20 above the default threshold of 30
            jump_offset_ratio: 2.0 / 3.0,

            camera_follow_offset: CANVAS_WIDTH / 3.0,
            camera_smoothing: 0.1,

            landing_tolerance: 20.0,

            shuriken_spawn_margin: 100.0,
            shuriken_despawn_margin: 50.0,
            shuriken_rotation_step: 0.2,
            shuriken_jitter: 50.0,
            shuriken_speed_bonus: 2.0,
            shuriken_speed_variance: 3.0,

            wiggle_ticks: 30,

            anim_step_airborne: 0.4,
            anim_step_walking: 0.25,
            anim_step_idle: 0.05,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields fall back to defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("hop_divisor", self.hop_divisor),
            ("max_expected_volume", self.max_expected_volume),
            ("camera_smoothing", self.camera_smoothing),
            // Zero lets a falling runner sink through every surface
            ("landing_tolerance", self.landing_tolerance),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("walk_speed", self.walk_speed),
            ("jump_forward_speed", self.jump_forward_speed),
            ("min_move_distance", self.min_move_distance),
            ("max_move_distance", self.max_move_distance),
            ("jump_offset_ratio", self.jump_offset_ratio),
            ("camera_follow_offset", self.camera_follow_offset),
            ("shuriken_spawn_margin", self.shuriken_spawn_margin),
            ("shuriken_despawn_margin", self.shuriken_despawn_margin),
            ("shuriken_jitter", self.shuriken_jitter),
            ("shuriken_speed_bonus", self.shuriken_speed_bonus),
            ("shuriken_speed_variance", self.shuriken_speed_variance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        // Jumps go up (negative y)
        for (field, value) in [
            ("min_jump_strength", self.min_jump_strength),
            ("max_jump_strength", self.max_jump_strength),
        ] {
            if !(value.is_finite() && value <= 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.camera_smoothing > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "camera_smoothing",
                value: self.camera_smoothing,
            });
        }

        if self.wiggle_ticks == 0 {
            return Err(ConfigError::OutOfRange {
                field: "wiggle_ticks",
                value: 0.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.8, "wiggle_ticks": 10 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.wiggle_ticks, 10);
        assert_eq!(tuning.walk_speed, Tuning::default().walk_speed);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "gravity", .. }));

        let err = Tuning::from_json(r#"{ "camera_smoothing": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "camera_smoothing", .. }));

        let err = Tuning::from_json(r#"{ "max_jump_strength": 4.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_jump_strength", .. }));
    }

    #[test]
    fn test_from_json_rejects_zero_landing_tolerance() {
        let err = Tuning::from_json(r#"{ "landing_tolerance": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "landing_tolerance", .. }));
        assert!(Tuning::from_json(r#"{ "landing_tolerance": 5.0 }"#).is_ok());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
