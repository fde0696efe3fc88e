//! Dynamic element lifecycle
//!
//! Second phase of a tick: spawns queued by the resolver are appended,
//! falling-bridge planks advance through their states and dead shurikens are
//! dropped. Also owns the cosmetic confetti burst.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Confetti, GameEvent, LevelElement, PlankState};
use crate::consts::*;
use crate::tuning::Tuning;

/// Sway phase advance per tick
const CONFETTI_SWAY_STEP: f32 = 0.05;

/// Append elements spawned during the scan
///
/// They land at the end of the sequence, so the resolver first sees them on
/// the next tick.
pub fn append_spawned(level: &mut Vec<LevelElement>, spawned: Vec<LevelElement>) {
    level.extend(spawned);
}

/// Step every falling-bridge plank
pub fn advance_falling_bridges(level: &mut [LevelElement], tuning: &Tuning) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for element in level.iter_mut() {
        let LevelElement::FallingBridgeStructure(bridge) = element else {
            continue;
        };

        for (index, plank) in bridge.planks.iter_mut().enumerate() {
            plank.state = match plank.state {
                PlankState::Wiggling { ticks_left } if ticks_left <= 1 => {
                    events.push(GameEvent::PlankFalling { index });
                    log::debug!("Plank {} falling", index);
                    PlankState::Falling {
                        drop: 0.0,
                        fall_vy: 0.0,
                    }
                }
                PlankState::Wiggling { ticks_left } => PlankState::Wiggling {
                    ticks_left: ticks_left - 1,
                },
                PlankState::Falling { drop, fall_vy } => {
                    let fall_vy = fall_vy + tuning.gravity;
                    let drop = drop + fall_vy;
                    if plank.rect.y + drop > CANVAS_HEIGHT {
                        PlankState::Fallen
                    } else {
                        PlankState::Falling { drop, fall_vy }
                    }
                }
                state @ (PlankState::Stable | PlankState::Fallen) => state,
            };
        }
    }

    events
}

/// Drop shurikens that left the screen
pub fn purge_inactive(level: &mut Vec<LevelElement>) {
    level.retain(|element| !matches!(element, LevelElement::ShurikenActive(s) if !s.active));
}

/// Spawn the win burst
pub fn spawn_confetti<R: Rng>(rng: &mut R) -> Vec<Confetti> {
    (0..CONFETTI_COUNT)
        .map(|_| Confetti {
            pos: Vec2::new(
                rng.random::<f32>() * CANVAS_WIDTH,
                -rng.random::<f32>() * CANVAS_HEIGHT,
            ),
            size: rng.random_range(5.0..10.0),
            speed_y: rng.random_range(2.0..5.0),
            hue: rng.random::<f32>() * 360.0,
            sway: rng.random_range(-1.0..1.0),
            sway_phase: rng.random::<f32>() * TAU,
        })
        .collect()
}

/// Fall and sway; pieces that leave the bottom come back in above the top
pub fn update_confetti<R: Rng>(confetti: &mut [Confetti], rng: &mut R) {
    for piece in confetti.iter_mut() {
        piece.pos.y += piece.speed_y;
        piece.sway_phase += CONFETTI_SWAY_STEP;
        piece.pos.x += piece.sway_phase.sin() * piece.sway;

        if piece.pos.y > CANVAS_HEIGHT {
            piece.pos.y = -rng.random::<f32>() * 100.0 - 20.0;
            piece.pos.x = rng.random::<f32>() * CANVAS_WIDTH;
        }
    }
}
