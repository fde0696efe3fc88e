//! Level generation
//!
//! The level is a fixed hand-tuned course. Generation is deterministic: the
//! same bridge kind always yields the same element sequence, with every
//! one-shot flag fresh (spawners unconsumed, bridges unbuilt, planks stable).

use super::geometry::Rect;
use super::state::{
    BridgePost, BridgeStructure, FallingBridge, FallingPlank, LevelElement, PlankDef, Platform,
    ShurikenSpawner,
};
use crate::consts::*;
use crate::error::{LevelError, Result};
use crate::settings::BridgeKind;

/// Top of the start platform (the runner spawns standing on it)
pub const START_GROUND_Y: f32 = CANVAS_HEIGHT - 100.0;

/// Bridge geometry shared by both bridge kinds
const BRIDGE_POST_WIDTH: f32 = 60.0;
const BRIDGE_POST_HEIGHT: f32 = 200.0;
const BRIDGE_PLANK_COUNT: usize = 3;
const BRIDGE_PLANK_WIDTH: f32 = 150.0;
const BRIDGE_PLANK_HEIGHT: f32 = 30.0;
const BRIDGE_PLANK_SPACING: f32 = 20.0;

/// Lays elements out left to right with a moving cursor
struct LevelBuilder {
    elements: Vec<LevelElement>,
    cursor: f32,
    last_platform_x: f32,
    next_bridge_id: u32,
}

impl LevelBuilder {
    fn new() -> Self {
        Self {
            elements: Vec::with_capacity(32),
            cursor: 0.0,
            last_platform_x: 0.0,
            next_bridge_id: 0,
        }
    }

    /// Platform rising `height` from the bottom of the canvas
    fn platform(&mut self, width: f32, height: f32) -> &mut Self {
        self.platform_inner(width, height, None)
    }

    fn spiked_platform(&mut self, width: f32, height: f32, spike_offset_x: f32) -> &mut Self {
        self.platform_inner(width, height, Some(spike_offset_x))
    }

    fn platform_inner(&mut self, width: f32, height: f32, spike: Option<f32>) -> &mut Self {
        self.elements.push(LevelElement::Platform(Platform {
            rect: Rect::new(self.cursor, CANVAS_HEIGHT - height, width, height),
            spike_offset_x: spike,
        }));
        self.last_platform_x = self.cursor;
        self.cursor += width;
        self
    }

    fn gap(&mut self, width: f32) -> &mut Self {
        self.elements.push(LevelElement::Gap { width });
        self.cursor += width;
        self
    }

    /// Shuriken trigger `offset` into the most recent platform
    fn shuriken_spawner(&mut self, offset: f32) -> &mut Self {
        self.elements.push(LevelElement::ShurikenSpawner(ShurikenSpawner {
            x: self.last_platform_x + offset,
            y_offset: None,
            spawned: false,
        }));
        self
    }

    /// Sign at the cursor, `height` above the bottom of the canvas
    fn warning_sign(&mut self, height: f32) -> &mut Self {
        self.elements.push(LevelElement::WarningSign {
            x: self.cursor,
            y: CANVAS_HEIGHT - height,
        });
        self
    }

    fn plank_defs() -> Vec<PlankDef> {
        (0..BRIDGE_PLANK_COUNT)
            .map(|i| PlankDef {
                rel_x: i as f32 * (BRIDGE_PLANK_WIDTH + BRIDGE_PLANK_SPACING),
                y_offset: 0.0,
                width: BRIDGE_PLANK_WIDTH,
                height: BRIDGE_PLANK_HEIGHT,
            })
            .collect()
    }

    fn span(planks: &[PlankDef]) -> f32 {
        planks
            .iter()
            .map(|p| p.rel_x + p.width)
            .fold(0.0, f32::max)
    }

    /// Post followed by planks that build while the runner waits on it
    fn simple_bridge(&mut self) -> &mut Self {
        let id = self.next_bridge_id;
        self.next_bridge_id += 1;

        let x = self.cursor;
        let y = CANVAS_HEIGHT - BRIDGE_POST_HEIGHT;
        self.elements.push(LevelElement::BridgePost(BridgePost {
            rect: Rect::new(x, y, BRIDGE_POST_WIDTH, BRIDGE_POST_HEIGHT),
            bridge_id: id,
        }));

        // Planks start where the post ends
        let planks: Vec<PlankDef> = Self::plank_defs()
            .into_iter()
            .map(|p| PlankDef {
                rel_x: p.rel_x + BRIDGE_POST_WIDTH,
                ..p
            })
            .collect();
        let span = Self::span(&planks);
        self.elements.push(LevelElement::BridgeStructure(BridgeStructure {
            id,
            x,
            y,
            planks,
            active_planks: 0,
        }));
        self.cursor += span;
        self
    }

    /// Planks that give way once stood on
    fn falling_bridge(&mut self) -> &mut Self {
        let x = self.cursor;
        let y = CANVAS_HEIGHT - BRIDGE_POST_HEIGHT;
        let defs = Self::plank_defs();
        let span = Self::span(&defs);
        let planks = defs
            .iter()
            .map(|p| FallingPlank::new(Rect::new(x + p.rel_x, y + p.y_offset, p.width, p.height)))
            .collect();
        let bridge = FallingBridge { x, planks };
        self.elements.push(LevelElement::FallingBridgeStructure(bridge));
        self.cursor += span;
        self
    }

    fn finish_line(&mut self, width: f32, height: f32) -> &mut Self {
        self.elements.push(LevelElement::FinishLine(Rect::new(
            self.cursor,
            CANVAS_HEIGHT - height,
            width,
            height,
        )));
        self.cursor += width;
        self
    }

    fn build(&mut self) -> Result<Vec<LevelElement>> {
        let elements = std::mem::take(&mut self.elements);
        validate_level(&elements)?;
        Ok(elements)
    }
}

/// Generate the course
pub fn generate_level(bridge: BridgeKind) -> Result<Vec<LevelElement>> {
    let mut b = LevelBuilder::new();

    // Start platform is wide enough to stand on at ACTOR_START_X
    b.platform(ACTOR_START_X + 300.0, 100.0)
        .gap(120.0)
        .spiked_platform(250.0, 100.0, 100.0)
        .gap(100.0)
        .platform(200.0, 150.0)
        .gap(150.0)
        .platform(300.0, 100.0)
        .gap(80.0)
        .platform(80.0, 250.0)
        .gap(180.0)
        .platform(80.0, 200.0)
        .gap(100.0)
        .platform(400.0, 100.0)
        .shuriken_spawner(200.0)
        .gap(100.0)
        .warning_sign(300.0)
        .platform(150.0, 100.0)
        .gap(80.0);

    match bridge {
        BridgeKind::Simple => b.simple_bridge(),
        BridgeKind::Falling => b.falling_bridge(),
    };

    b.gap(80.0)
        .platform(300.0, 100.0)
        .gap(100.0)
        .finish_line(50.0, 150.0);

    let elements = b.build()?;
    log::debug!(
        "Generated level: {} elements, bridge={}",
        elements.len(),
        bridge.as_str()
    );
    Ok(elements)
}

/// Check a layout for malformed elements
pub fn validate_level(elements: &[LevelElement]) -> Result<()> {
    fn check(kind: &'static str, rect: &Rect) -> Result<()> {
        if rect.is_well_formed() {
            Ok(())
        } else {
            Err(LevelError::InvalidDimension {
                kind,
                x: rect.x,
                width: rect.width,
                height: rect.height,
            })
        }
    }

    for element in elements {
        let kind = element.kind_name();
        match element {
            LevelElement::Platform(p) => {
                check(kind, &p.rect)?;
                if let Some(spike) = p.spike_rect() {
                    check(kind, &spike)?;
                }
            }
            LevelElement::Gap { width } => {
                if !(width.is_finite() && *width >= 0.0) {
                    return Err(LevelError::InvalidDimension {
                        kind,
                        x: 0.0,
                        width: *width,
                        height: 0.0,
                    });
                }
            }
            LevelElement::BridgePost(post) => check(kind, &post.rect)?,
            LevelElement::BridgeStructure(bridge) => {
                if bridge.planks.is_empty() {
                    return Err(LevelError::EmptyBridge { x: bridge.x });
                }
                for p in &bridge.planks {
                    check(kind, &Rect::new(bridge.x + p.rel_x, bridge.y, p.width, p.height))?;
                }
            }
            LevelElement::BridgePlankActive(plank) => check(kind, &plank.rect)?,
            LevelElement::FallingBridgeStructure(bridge) => {
                if bridge.planks.is_empty() {
                    return Err(LevelError::EmptyBridge { x: bridge.x });
                }
                for p in &bridge.planks {
                    check(kind, &p.rect)?;
                }
            }
            LevelElement::ShurikenActive(s) => {
                check(kind, &Rect::new(s.world_x, s.y, s.size, s.size))?;
            }
            LevelElement::FinishLine(rect) => check(kind, rect)?,
            LevelElement::ShurikenSpawner(_) | LevelElement::WarningSign { .. } => {}
        }
    }

    let start_supported = elements.iter().any(|e| match e {
        LevelElement::Platform(p) => {
            p.rect.x <= ACTOR_START_X
                && p.rect.right() >= ACTOR_START_X + ACTOR_WIDTH
                && p.rect.y == START_GROUND_Y
        }
        _ => false,
    });
    if !start_supported {
        return Err(LevelError::UnsupportedStart { x: ACTOR_START_X });
    }

    Ok(())
}
