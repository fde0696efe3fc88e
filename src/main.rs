//! Voice Runner entry point
//!
//! The browser build is driven from JavaScript through `voice_runner::web`.
//! Natively this runs a headless demo: a scripted volume pattern plays
//! through the engine and the outcome is logged.

#[cfg(not(target_arch = "wasm32"))]
use voice_runner::audio::{ScriptedVolume, VolumeSource};
#[cfg(not(target_arch = "wasm32"))]
use voice_runner::sim::{AudioStatus, GameEvent, GamePhase, GameSession, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use voice_runner::{BridgeKind, MovementMode, Settings, Tuning};

/// Give up after this many ticks (about a minute at 60 fps)
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Voice Runner (native) starting...");

    // Usage: voice-runner [walk|move] [simple|falling]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = Settings::default();
    if let Some(mode) = args.first().and_then(|s| MovementMode::from_str(s)) {
        settings.movement_mode = mode;
    }
    if let Some(kind) = args.get(1).and_then(|s| BridgeKind::from_str(s)) {
        settings.bridge_kind = kind;
    }

    let mut session = match GameSession::new(settings, Tuning::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Level generation failed: {}", e);
            std::process::exit(1);
        }
    };

    // Quiet, a couple of shouts, then steady humming with the odd yell
    let mut source =
        ScriptedVolume::from_runs(&[(0.0, 20), (45.0, 40), (90.0, 6), (40.0, 30), (70.0, 4)])
            .looping();

    session.audio_ready(AudioStatus::Bypassed);
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    while session.time_ticks < MAX_TICKS {
        input.volume = Some(source.sample_volume());
        let result = tick(&mut session, &input);
        input.start = false;

        for event in &result.events {
            match event {
                GameEvent::Jumped { .. } | GameEvent::Landed => log::trace!("{:?}", event),
                _ => log::info!("tick {}: {:?}", session.time_ticks, event),
            }
        }

        if matches!(session.phase, GamePhase::GameOver | GamePhase::Won) {
            break;
        }
    }

    log::info!(
        "Finished in phase {} after {} ticks, score {:.1} (x={:.0})",
        session.phase.as_str(),
        session.time_ticks,
        session.score,
        session.actor.world_x
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is voice_runner::web::init, this is just to satisfy the compiler
}
