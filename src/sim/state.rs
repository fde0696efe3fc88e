//! Simulation types
//!
//! Everything the renderer reads lives here: the runner, the camera, the level
//! elements and cosmetic particles. Mutation happens only inside a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the audio subsystem to report
    Loading,
    /// Audio resolved, waiting for the start signal
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended by a hazard or the water
    GameOver,
    /// Finish line reached
    Won,
}

impl GamePhase {
    /// Phases from which a start signal begins a new run
    pub fn can_start(&self) -> bool {
        matches!(self, GamePhase::Ready | GamePhase::GameOver | GamePhase::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Loading => "loading",
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
            GamePhase::Won => "won",
        }
    }
}

/// Outcome of the microphone permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioStatus {
    /// No answer yet
    Pending,
    /// Microphone (or another live source) available
    Granted,
    /// Permission denied or capture failed
    Denied,
    /// Audio skipped on purpose (discrete input only)
    Bypassed,
}

impl AudioStatus {
    /// Whether volume samples can be expected
    pub fn has_input(&self) -> bool {
        matches!(self, AudioStatus::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioStatus::Pending => "pending",
            AudioStatus::Granted => "granted",
            AudioStatus::Denied => "denied",
            AudioStatus::Bypassed => "bypassed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AudioStatus::Pending),
            "granted" => Some(AudioStatus::Granted),
            "denied" => Some(AudioStatus::Denied),
            "bypassed" => Some(AudioStatus::Bypassed),
            _ => None,
        }
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Left edge in world coordinates
    pub world_x: f32,
    /// Top edge (screen space, y down)
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// True only in a tick where a supporting surface was detected
    pub on_ground: bool,
    /// Wing/leg animation phase, wrapped to [0, 2π)
    pub anim_phase: f32,
    /// Horizontal distance covered during the last tick
    pub last_move_x: f32,
}

impl Actor {
    /// Runner standing on the start platform
    pub fn at_start(ground_y: f32) -> Self {
        Self {
            world_x: ACTOR_START_X,
            y: ground_y - ACTOR_HEIGHT,
            vy: 0.0,
            width: ACTOR_WIDTH,
            height: ACTOR_HEIGHT,
            on_ground: true,
            anim_phase: 0.0,
            last_move_x: 0.0,
        }
    }

    /// Bounding box in view space
    pub fn view_rect(&self, camera: &Camera) -> Rect {
        Rect::new(camera.to_view(self.world_x), self.y, self.width, self.height)
    }

    /// Bottom edge
    #[inline]
    pub fn feet(&self) -> f32 {
        self.y + self.height
    }
}

/// Horizontal camera offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World x shown at the left edge of the viewport (never negative)
    pub x: f32,
}

impl Camera {
    /// World x -> view x
    #[inline]
    pub fn to_view(&self, world_x: f32) -> f32 {
        world_x - self.x
    }
}

/// A solid platform, optionally carrying a spike on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Spike position relative to the platform's left edge
    pub spike_offset_x: Option<f32>,
}

impl Platform {
    /// World-space spike bounding box, if the platform has one
    pub fn spike_rect(&self) -> Option<Rect> {
        self.spike_offset_x.map(|offset| {
            Rect::new(
                self.rect.x + offset,
                self.rect.y - SPIKE_SIZE,
                SPIKE_SIZE,
                SPIKE_SIZE,
            )
        })
    }
}

/// The post a bridge grows from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgePost {
    pub rect: Rect,
    /// Bridge armed by standing on this post
    pub bridge_id: u32,
}

/// Plank layout relative to its bridge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlankDef {
    pub rel_x: f32,
    pub y_offset: f32,
    pub width: f32,
    pub height: f32,
}

/// A bridge that builds itself one plank at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStructure {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub planks: Vec<PlankDef>,
    /// Planks materialized so far
    pub active_planks: usize,
}

impl BridgeStructure {
    pub fn is_complete(&self) -> bool {
        self.active_planks >= self.planks.len()
    }

    /// World rect of the next plank to materialize
    pub fn next_plank_rect(&self) -> Option<Rect> {
        self.planks.get(self.active_planks).map(|p| {
            Rect::new(self.x + p.rel_x, self.y + p.y_offset, p.width, p.height)
        })
    }
}

/// A materialized bridge plank (static platform)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlank {
    pub rect: Rect,
    pub bridge_id: u32,
    /// Index within the bridge's plank list
    pub index: usize,
}

/// Lifecycle of a falling-bridge plank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlankState {
    /// Solid, untouched
    Stable,
    /// Stood on; drops when the countdown runs out
    Wiggling { ticks_left: u32 },
    /// Dropping out of the level
    Falling { drop: f32, fall_vy: f32 },
    /// Below the viewport, permanently inert
    Fallen,
}

/// A plank of a falling bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingPlank {
    /// Resting position in world space
    pub rect: Rect,
    pub state: PlankState,
}

impl FallingPlank {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            state: PlankState::Stable,
        }
    }

    /// Whether the runner can land on it
    pub fn supports(&self) -> bool {
        matches!(self.state, PlankState::Stable | PlankState::Wiggling { .. })
    }

    /// Current world rect including the drop
    pub fn current_rect(&self) -> Rect {
        match self.state {
            PlankState::Falling { drop, .. } => self.rect.shifted_y(drop),
            _ => self.rect,
        }
    }
}

/// A bridge whose planks give way shortly after being stood on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingBridge {
    pub x: f32,
    pub planks: Vec<FallingPlank>,
}

/// One-shot shuriken trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShurikenSpawner {
    pub x: f32,
    /// Fixed spawn height; random when `None`
    pub y_offset: Option<f32>,
    pub spawned: bool,
}

/// A flying shuriken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shuriken {
    pub world_x: f32,
    pub y: f32,
    pub size: f32,
    /// World-space horizontal speed (negative, moving left)
    pub speed_x_world: f32,
    pub rotation: f32,
    pub active: bool,
}

impl Shuriken {
    pub fn view_rect(&self, camera: &Camera) -> Rect {
        Rect::new(camera.to_view(self.world_x), self.y, self.size, self.size)
    }
}

/// A level element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelElement {
    Platform(Platform),
    /// Empty space between elements, only used to advance the layout cursor
    Gap { width: f32 },
    BridgePost(BridgePost),
    BridgeStructure(BridgeStructure),
    BridgePlankActive(ActivePlank),
    FallingBridgeStructure(FallingBridge),
    ShurikenSpawner(ShurikenSpawner),
    ShurikenActive(Shuriken),
    /// Decorative sign ahead of danger
    WarningSign { x: f32, y: f32 },
    FinishLine(Rect),
}

impl LevelElement {
    /// Short name for logs and errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            LevelElement::Platform(_) => "platform",
            LevelElement::Gap { .. } => "gap",
            LevelElement::BridgePost(_) => "bridge post",
            LevelElement::BridgeStructure(_) => "bridge structure",
            LevelElement::BridgePlankActive(_) => "bridge plank",
            LevelElement::FallingBridgeStructure(_) => "falling bridge",
            LevelElement::ShurikenSpawner(_) => "shuriken spawner",
            LevelElement::ShurikenActive(_) => "shuriken",
            LevelElement::WarningSign { .. } => "warning sign",
            LevelElement::FinishLine(_) => "finish line",
        }
    }

    /// Elements created during play rather than by the generator
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            LevelElement::ShurikenActive(_) | LevelElement::BridgePlankActive(_)
        )
    }
}

/// Which bridge (if any) the runner is standing on the post of
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeState {
    pub armed_bridge: Option<u32>,
}

/// A confetti piece (cosmetic, after a win)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confetti {
    pub pos: Vec2,
    pub size: f32,
    pub speed_y: f32,
    /// Hue in degrees
    pub hue: f32,
    pub sway: f32,
    pub sway_phase: f32,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Spike,
    Shuriken,
    Water,
    OutOfBounds,
}

/// Notable things that happened during a tick or transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AudioReady(AudioStatus),
    Started,
    Landed,
    Jumped { vy: f32 },
    ShurikenSpawned { world_x: f32 },
    PlankActivated { bridge_id: u32, index: usize },
    PlankWiggling { index: usize },
    PlankFalling { index: usize },
    Died(DeathCause),
    Won,
    ConfettiSpawned { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startable_phases() {
        assert!(!GamePhase::Loading.can_start());
        assert!(GamePhase::Ready.can_start());
        assert!(!GamePhase::Playing.can_start());
        assert!(GamePhase::GameOver.can_start());
        assert!(GamePhase::Won.can_start());
    }

    #[test]
    fn test_audio_status_names() {
        for status in [
            AudioStatus::Pending,
            AudioStatus::Granted,
            AudioStatus::Denied,
            AudioStatus::Bypassed,
        ] {
            assert_eq!(AudioStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(AudioStatus::from_str("maybe"), None);
    }

    #[test]
    fn test_spike_sits_on_platform() {
        let platform = Platform {
            rect: Rect::new(520.0, 500.0, 250.0, 100.0),
            spike_offset_x: Some(100.0),
        };
        assert_eq!(
            platform.spike_rect(),
            Some(Rect::new(620.0, 470.0, 30.0, 30.0))
        );
    }

    #[test]
    fn test_plank_support_by_state() {
        let mut plank = FallingPlank::new(Rect::new(0.0, 400.0, 150.0, 30.0));
        assert!(plank.supports());
        plank.state = PlankState::Wiggling { ticks_left: 4 };
        assert!(plank.supports());
        plank.state = PlankState::Falling {
            drop: 12.0,
            fall_vy: 3.0,
        };
        assert!(!plank.supports());
        assert_eq!(plank.current_rect().y, 412.0);
        plank.state = PlankState::Fallen;
        assert!(!plank.supports());
    }

    #[test]
    fn test_bridge_structure_progress() {
        let mut bridge = BridgeStructure {
            id: 0,
            x: 1000.0,
            y: 400.0,
            planks: vec![
                PlankDef {
                    rel_x: 60.0,
                    y_offset: 0.0,
                    width: 150.0,
                    height: 30.0,
                };
                2
            ],
            active_planks: 0,
        };
        assert_eq!(
            bridge.next_plank_rect(),
            Some(Rect::new(1060.0, 400.0, 150.0, 30.0))
        );
        bridge.active_planks = 2;
        assert!(bridge.is_complete());
        assert_eq!(bridge.next_plank_rect(), None);
    }
}
