//! Collision and trigger resolution
//!
//! Runs once per tick after physics and camera. Elements are visited in
//! level order; all comparisons happen in view space (world x minus camera x).
//! Anything spawned during the scan is returned to the caller instead of being
//! pushed into the level, so it is first visited on the next tick.

use rand::Rng;

use super::geometry::Rect;
use super::state::{
    ActivePlank, Actor, BridgeState, Camera, DeathCause, GameEvent, LevelElement, PlankState,
    Shuriken,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Terminal decision for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Died(DeathCause),
    Won,
}

/// What the scan found
#[derive(Debug, Default)]
pub struct Resolution {
    /// First terminal decision in level order
    pub outcome: Option<Outcome>,
    /// Whether any surface supported the runner this tick
    pub touched_surface: bool,
    /// Elements to append after the scan
    pub spawned: Vec<LevelElement>,
    pub events: Vec<GameEvent>,
}

impl Resolution {
    /// Record a terminal outcome unless one was already decided
    fn decide(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    #[inline]
    fn decided(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Land the runner on `surface` (view space) if it is coming down onto it
///
/// Landing needs horizontal overlap, the feet past the top edge but within
/// the tolerance band, and a non-negative vertical velocity, which rules out
/// catching a platform from below or while rising through it.
pub fn try_land(actor: &mut Actor, camera: &Camera, surface: &Rect, tuning: &Tuning) -> bool {
    let body = actor.view_rect(camera);
    let feet = body.bottom();
    let band = actor.vy.max(0.0) + tuning.landing_tolerance;
    let in_band = feet > surface.y && feet < surface.y + band;

    if body.overlaps_x(surface) && in_band && actor.vy >= 0.0 {
        actor.y = surface.y - actor.height;
        actor.vy = 0.0;
        actor.on_ground = true;
        true
    } else {
        false
    }
}

/// Land on `surface` unless an earlier element already supported the runner
///
/// The first surface in level order wins the landing for the tick.
fn land_first(
    res: &mut Resolution,
    actor: &mut Actor,
    camera: &Camera,
    surface: &Rect,
    tuning: &Tuning,
) -> bool {
    if res.touched_surface {
        return false;
    }
    res.touched_surface = try_land(actor, camera, surface, tuning);
    res.touched_surface
}

/// Scan the level once
pub fn resolve<R: Rng>(
    actor: &mut Actor,
    camera: &Camera,
    level: &mut [LevelElement],
    bridge_state: &mut BridgeState,
    sound_detected: bool,
    tuning: &Tuning,
    rng: &mut R,
) -> Resolution {
    let mut res = Resolution::default();
    let dx = -camera.x;

    for element in level.iter_mut() {
        match element {
            LevelElement::Platform(platform) => {
                let rect = platform.rect.shifted_x(dx);
                if land_first(&mut res, actor, camera, &rect, tuning) {
                    bridge_state.armed_bridge = None;
                }
                if let Some(spike) = platform.spike_rect() {
                    let hit = actor.view_rect(camera).overlaps(&spike.shifted_x(dx));
                    if hit && !res.decided() {
                        log::debug!("Spike hit at world x={}", spike.x);
                        res.decide(Outcome::Died(DeathCause::Spike));
                    }
                }
            }

            LevelElement::BridgePost(post) => {
                let rect = post.rect.shifted_x(dx);
                if land_first(&mut res, actor, camera, &rect, tuning) {
                    if bridge_state.armed_bridge != Some(post.bridge_id) {
                        log::debug!("Bridge {} armed", post.bridge_id);
                    }
                    bridge_state.armed_bridge = Some(post.bridge_id);
                }
            }

            LevelElement::BridgePlankActive(plank) => {
                let rect = plank.rect.shifted_x(dx);
                if land_first(&mut res, actor, camera, &rect, tuning) {
                    bridge_state.armed_bridge = None;
                }
            }

            LevelElement::FallingBridgeStructure(bridge) => {
                for (index, plank) in bridge.planks.iter_mut().enumerate() {
                    if !plank.supports() {
                        continue;
                    }
                    let rect = plank.current_rect().shifted_x(dx);
                    if land_first(&mut res, actor, camera, &rect, tuning) {
                        bridge_state.armed_bridge = None;
                        if plank.state == PlankState::Stable {
                            plank.state = PlankState::Wiggling {
                                ticks_left: tuning.wiggle_ticks,
                            };
                            res.events.push(GameEvent::PlankWiggling { index });
                        }
                    }
                }
            }

            LevelElement::ShurikenSpawner(spawner) => {
                if spawner.spawned {
                    continue;
                }
                let view_x = camera.to_view(spawner.x);
                let margin = tuning.shuriken_spawn_margin;
                if view_x > -margin && view_x < CANVAS_WIDTH + margin {
                    let jitter = tuning.shuriken_jitter;
                    let world_x = spawner.x + rng.random_range(-jitter..=jitter);
                    let y = match spawner.y_offset {
                        Some(y) => y,
                        None => SHURIKEN_MIN_Y + rng.random::<f32>() * (CANVAS_HEIGHT / 2.0),
                    };
                    let speed = tuning.walk_speed
                        + tuning.shuriken_speed_bonus
                        + rng.random::<f32>() * tuning.shuriken_speed_variance;

                    res.spawned.push(LevelElement::ShurikenActive(Shuriken {
                        world_x,
                        y,
                        size: SHURIKEN_SIZE,
                        speed_x_world: -speed,
                        rotation: 0.0,
                        active: true,
                    }));
                    res.events.push(GameEvent::ShurikenSpawned { world_x });
                    spawner.spawned = true;
                    log::debug!("Shuriken spawned at world x={:.1} y={:.1}", world_x, y);
                }
            }

            LevelElement::ShurikenActive(shuriken) => {
                if !shuriken.active {
                    continue;
                }
                shuriken.world_x += shuriken.speed_x_world;
                shuriken.rotation += tuning.shuriken_rotation_step;

                let rect = shuriken.view_rect(camera);
                if rect.right() < -tuning.shuriken_despawn_margin {
                    shuriken.active = false;
                }
                if !res.decided() && actor.view_rect(camera).overlaps(&rect) {
                    res.decide(Outcome::Died(DeathCause::Shuriken));
                }
            }

            LevelElement::BridgeStructure(bridge) => {
                let armed = bridge_state.armed_bridge == Some(bridge.id);
                if armed && !bridge.is_complete() && (sound_detected || actor.on_ground) {
                    if let Some(rect) = bridge.next_plank_rect() {
                        let index = bridge.active_planks;
                        res.spawned.push(LevelElement::BridgePlankActive(ActivePlank {
                            rect,
                            bridge_id: bridge.id,
                            index,
                        }));
                        bridge.active_planks += 1;
                        res.events.push(GameEvent::PlankActivated {
                            bridge_id: bridge.id,
                            index,
                        });
                    }
                }
            }

            LevelElement::FinishLine(rect) => {
                if !res.decided() && actor.view_rect(camera).overlaps(&rect.shifted_x(dx)) {
                    res.decide(Outcome::Won);
                }
            }

            LevelElement::Gap { .. } | LevelElement::WarningSign { .. } => {}
        }
    }

    res
}

/// Checks after the scan: water and falling out of the world
pub fn terminal_checks(actor: &mut Actor, touched_surface: bool) -> Option<DeathCause> {
    if actor.feet() >= WATER_LINE {
        return Some(DeathCause::Water);
    }
    if actor.y > CANVAS_HEIGHT + actor.height {
        return Some(DeathCause::OutOfBounds);
    }
    if !touched_surface && actor.y < WATER_LINE - actor.height {
        actor.on_ground = false;
    }
    None
}
