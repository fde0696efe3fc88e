//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (level order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod geometry;
pub mod level;
pub mod lifecycle;
pub mod physics;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::Outcome;
pub use geometry::Rect;
pub use level::{START_GROUND_Y, generate_level, validate_level};
pub use physics::{SoundInput, Thresholds};
pub use session::{GameSession, Snapshot};
pub use state::{
    Actor, AudioStatus, BridgeState, Camera, Confetti, DeathCause, GameEvent, GamePhase,
    LevelElement, PlankState,
};
pub use tick::{DebugSnapshot, TickInput, TickResult, tick};
