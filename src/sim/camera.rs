//! Camera follow
//!
//! Exponential-decay follow: each tick the camera closes a fixed fraction of
//! the distance to where it wants to be, so it converges over several ticks
//! rather than snapping.

use super::state::{Actor, Camera};
use crate::tuning::Tuning;

/// Camera x that would put the runner at the follow offset
#[inline]
pub fn desired_x(actor: &Actor, tuning: &Tuning) -> f32 {
    actor.world_x - tuning.camera_follow_offset
}

/// Move the camera one step toward the runner
pub fn follow(camera: &mut Camera, actor: &Actor, tuning: &Tuning) {
    let desired = desired_x(actor, tuning);
    camera.x += (desired - camera.x) * tuning.camera_smoothing;
    if camera.x < 0.0 {
        camera.x = 0.0;
    }
}
