//! Runner physics and sound-to-motion mapping
//!
//! Volume itself (not its rate of change) drives movement: a sustained loud
//! tone keeps the runner moving and re-jumps every time it touches ground.

use serde::{Deserialize, Serialize};

use super::state::Actor;
use crate::settings::{MovementMode, Settings};
use crate::tuning::Tuning;
use crate::{lerp, normalize_clamped};

/// What the volume sample meant this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoundInput {
    /// At or below threshold
    #[default]
    Idle,
    /// Above threshold, below jump activation
    Walk,
    /// Above jump activation
    Jump,
}

/// Volume levels separating idle, walk and jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Sound is detected above this
    pub walk: f32,
    /// Jumps start above this
    pub jump: f32,
}

impl Thresholds {
    pub fn new(settings: &Settings, tuning: &Tuning) -> Self {
        let walk = settings.effective_threshold();
        Self {
            walk,
            jump: walk + settings.jump_offset(tuning),
        }
    }

    #[inline]
    pub fn detects(&self, volume: f32) -> bool {
        volume > self.walk
    }

    /// Classify a walk-and-jump sample (first match wins)
    pub fn classify(&self, volume: f32) -> SoundInput {
        if volume > self.jump {
            SoundInput::Jump
        } else if volume > self.walk {
            SoundInput::Walk
        } else {
            SoundInput::Idle
        }
    }
}

/// Result of mapping input onto the runner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub input: SoundInput,
    /// Upward velocity assigned this tick, if any
    pub launched_vy: Option<f32>,
}

/// Gravity step; returns whether the runner was grounded before it
///
/// `on_ground` is cleared here and only set again by a landing.
pub fn integrate_gravity(actor: &mut Actor, tuning: &Tuning) -> bool {
    let was_grounded = actor.on_ground;
    actor.vy += tuning.gravity;
    actor.y += actor.vy;
    actor.on_ground = false;
    was_grounded
}

/// Apply one volume sample
pub fn apply_sound(
    actor: &mut Actor,
    volume: f32,
    was_grounded: bool,
    thresholds: &Thresholds,
    mode: MovementMode,
    tuning: &Tuning,
) -> Motion {
    match mode {
        MovementMode::WalkAndJump => walk_and_jump(actor, volume, was_grounded, thresholds, tuning),
        MovementMode::MoveOnly => move_only(actor, volume, was_grounded, thresholds, tuning),
    }
}

fn walk_and_jump(
    actor: &mut Actor,
    volume: f32,
    was_grounded: bool,
    thresholds: &Thresholds,
    tuning: &Tuning,
) -> Motion {
    let input = thresholds.classify(volume);
    let mut launched_vy = None;

    match input {
        SoundInput::Jump => {
            if was_grounded {
                let n = normalize_clamped(volume, thresholds.jump, tuning.max_expected_volume);
                actor.vy = lerp(tuning.min_jump_strength, tuning.max_jump_strength, n);
                launched_vy = Some(actor.vy);
            }
            actor.world_x += tuning.jump_forward_speed;
        }
        SoundInput::Walk => {
            if was_grounded {
                // Small hop so walking reads as movement
                actor.vy = tuning.min_jump_strength / tuning.hop_divisor;
                launched_vy = Some(actor.vy);
            }
            actor.world_x += tuning.walk_speed;
        }
        SoundInput::Idle => {}
    }

    Motion { input, launched_vy }
}

fn move_only(
    actor: &mut Actor,
    volume: f32,
    was_grounded: bool,
    thresholds: &Thresholds,
    tuning: &Tuning,
) -> Motion {
    if !thresholds.detects(volume) {
        return Motion::default();
    }

    let n = normalize_clamped(volume, thresholds.walk, tuning.max_expected_volume);
    actor.world_x += lerp(tuning.min_move_distance, tuning.max_move_distance, n);

    let mut launched_vy = None;
    if was_grounded {
        actor.vy = lerp(tuning.min_jump_strength, tuning.max_jump_strength, n);
        launched_vy = Some(actor.vy);
    }

    Motion {
        input: if n > 0.5 { SoundInput::Jump } else { SoundInput::Walk },
        launched_vy,
    }
}

/// Apply click/key input
///
/// Never stacks on a sound-driven launch: at most one upward velocity
/// assignment happens per tick.
pub fn apply_discrete(
    actor: &mut Actor,
    jump: bool,
    step_forward: bool,
    was_grounded: bool,
    motion: &mut Motion,
    mode: MovementMode,
    tuning: &Tuning,
) {
    match mode {
        MovementMode::WalkAndJump => {
            if jump && was_grounded && motion.launched_vy.is_none() {
                actor.vy = tuning.min_jump_strength;
                motion.launched_vy = Some(actor.vy);
            }
            if step_forward {
                actor.world_x += tuning.walk_speed;
            }
        }
        MovementMode::MoveOnly => {
            // A press is a medium step plus a medium jump
            if jump || step_forward {
                actor.world_x += (tuning.min_move_distance + tuning.max_move_distance) / 2.0;
            }
            if jump && was_grounded && motion.launched_vy.is_none() {
                actor.vy = (tuning.min_jump_strength + tuning.max_jump_strength) / 2.0;
                motion.launched_vy = Some(actor.vy);
            }
        }
    }
}

/// Record the tick's horizontal movement and advance the animation phase
pub fn advance_animation(actor: &mut Actor, world_x_before: f32, tuning: &Tuning) {
    actor.last_move_x = actor.world_x - world_x_before;

    let step = if !actor.on_ground {
        tuning.anim_step_airborne
    } else if actor.last_move_x > 0.0 {
        tuning.anim_step_walking
    } else {
        tuning.anim_step_idle
    };
    actor.anim_phase = (actor.anim_phase + step).rem_euclid(std::f32::consts::TAU);
}
