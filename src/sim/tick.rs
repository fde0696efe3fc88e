//! Fixed timestep simulation tick
//!
//! One call per frame. Order within a playing tick:
//! gravity, input, camera, collision scan, animation, lifecycle, terminal
//! checks, score.

use serde::Serialize;

use super::camera;
use super::collision::{self, Outcome};
use super::lifecycle;
use super::physics::{self, SoundInput};
use super::session::GameSession;
use super::state::{GameEvent, GamePhase};
use crate::audio::sanitize_volume;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Volume sample; `None` when no audio is available
    pub volume: Option<f32>,
    /// Manual jump (click/tap/space)
    pub jump: bool,
    /// Manual step forward (keyboard)
    pub step_forward: bool,
    /// Start or restart a run
    pub start: bool,
}

/// Per-tick telemetry for overlays and logs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub tick: u64,
    pub volume: f32,
    pub threshold: f32,
    pub jump_threshold: f32,
    pub input: SoundInput,
    pub was_grounded: bool,
    pub on_ground: bool,
    pub vy: f32,
    pub world_x: f32,
    pub camera_x: f32,
    pub elements: usize,
    pub armed_bridge: Option<u32>,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickResult {
    pub events: Vec<GameEvent>,
    pub debug: DebugSnapshot,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput) -> TickResult {
    let mut events = Vec::new();
    session.time_ticks += 1;

    if input.start && session.start() {
        events.push(GameEvent::Started);
    }

    let volume = sanitize_volume(input.volume.unwrap_or(0.0));
    let thresholds = session.thresholds();
    let mut debug = DebugSnapshot {
        tick: session.time_ticks,
        volume,
        threshold: thresholds.walk,
        jump_threshold: thresholds.jump,
        ..Default::default()
    };

    match session.phase {
        GamePhase::Playing => {}
        GamePhase::Won => {
            // Cosmetic only
            lifecycle::update_confetti(&mut session.confetti, &mut session.rng);
            return finish(session, events, debug);
        }
        GamePhase::Loading | GamePhase::Ready | GamePhase::GameOver => {
            return finish(session, events, debug);
        }
    }

    let tuning = &session.tuning;
    let mode = session.settings.movement_mode;
    let actor = &mut session.actor;
    let world_x_before = actor.world_x;

    // Physics and input
    let was_grounded = physics::integrate_gravity(actor, tuning);
    let mut motion = physics::apply_sound(actor, volume, was_grounded, &thresholds, mode, tuning);
    physics::apply_discrete(
        actor,
        input.jump,
        input.step_forward,
        was_grounded,
        &mut motion,
        mode,
        tuning,
    );
    if let Some(vy) = motion.launched_vy {
        events.push(GameEvent::Jumped { vy });
    }
    debug.input = motion.input;
    debug.was_grounded = was_grounded;

    camera::follow(&mut session.camera, actor, tuning);

    // Collision and triggers
    let res = collision::resolve(
        actor,
        &session.camera,
        &mut session.level,
        &mut session.bridge,
        thresholds.detects(volume),
        tuning,
        &mut session.rng,
    );
    if res.touched_surface && !was_grounded {
        events.push(GameEvent::Landed);
    }
    events.extend(res.events);

    // Animation reads the post-landing ground state
    physics::advance_animation(actor, world_x_before, tuning);

    // Lifecycle
    lifecycle::append_spawned(&mut session.level, res.spawned);
    events.extend(lifecycle::advance_falling_bridges(&mut session.level, tuning));
    lifecycle::purge_inactive(&mut session.level);

    // Terminal decisions
    let outcome = res.outcome.or_else(|| {
        collision::terminal_checks(&mut session.actor, res.touched_surface).map(Outcome::Died)
    });
    match outcome {
        Some(Outcome::Died(cause)) => {
            session.phase = GamePhase::GameOver;
            events.push(GameEvent::Died(cause));
            log::info!(
                "Game over ({:?}) at x={:.0}, score {:.0}",
                cause,
                session.actor.world_x,
                session.score
            );
        }
        Some(Outcome::Won) => {
            session.phase = GamePhase::Won;
            session.confetti = lifecycle::spawn_confetti(&mut session.rng);
            events.push(GameEvent::Won);
            events.push(GameEvent::ConfettiSpawned {
                count: session.confetti.len(),
            });
            log::info!("Finish reached, score {:.0}", session.score);
        }
        None => {
            session.score = session.actor.world_x / SCORE_DIVISOR;
        }
    }

    log::trace!(
        "tick {} v={:.1} x={:.1} y={:.1} vy={:.2} ground={}",
        session.time_ticks,
        volume,
        session.actor.world_x,
        session.actor.y,
        session.actor.vy,
        session.actor.on_ground
    );

    finish(session, events, debug)
}

fn finish(session: &GameSession, events: Vec<GameEvent>, mut debug: DebugSnapshot) -> TickResult {
    debug.on_ground = session.actor.on_ground;
    debug.vy = session.actor.vy;
    debug.world_x = session.actor.world_x;
    debug.camera_x = session.camera.x;
    debug.elements = session.level.len();
    debug.armed_bridge = session.bridge.armed_bridge;
    TickResult { events, debug }
}
