//! End-to-end scenarios driven through the public tick API

use proptest::prelude::*;
use voice_runner::consts::*;
use voice_runner::sim::{
    AudioStatus, DeathCause, GameEvent, GamePhase, GameSession, LevelElement, PlankState, Rect,
    TickInput, tick,
};
use voice_runner::{BridgeKind, Settings, Tuning};

fn playing_with(settings: Settings) -> GameSession {
    let mut session = GameSession::new(settings, Tuning::default()).expect("level");
    session.audio_ready(AudioStatus::Granted);
    assert!(session.start());
    session
}

fn playing() -> GameSession {
    playing_with(Settings::default())
}

fn volume(v: f32) -> TickInput {
    TickInput {
        volume: Some(v),
        ..Default::default()
    }
}

fn silence() -> TickInput {
    TickInput::default()
}

/// Stand the runner on top of `surface` at `offset` from its left edge
fn stand_on(session: &mut GameSession, surface: Rect, offset: f32) {
    session.actor.world_x = surface.x + offset;
    session.actor.y = surface.y - session.actor.height;
    session.actor.vy = 0.0;
    session.actor.on_ground = true;
}

fn find_rect(session: &GameSession, pick: impl Fn(&LevelElement) -> Option<Rect>) -> Rect {
    session.level.iter().find_map(pick).expect("element")
}

fn count_planks(session: &GameSession) -> usize {
    session
        .level
        .iter()
        .filter(|e| matches!(e, LevelElement::BridgePlankActive(_)))
        .count()
}

#[test]
fn test_continuous_loud_input_jumps_once_per_grounded_tick() {
    let mut session = playing();
    let mut jumps = 0;
    let mut grounded_ticks = 0;

    for _ in 0..80 {
        let x_before = session.actor.world_x;
        let result = tick(&mut session, &volume(100.0));
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.actor.world_x - x_before, 4.0);

        let launched = result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Jumped { .. }))
            .count();
        assert!(launched <= 1);
        if result.debug.was_grounded {
            grounded_ticks += 1;
            assert_eq!(launched, 1);
        } else {
            assert_eq!(launched, 0);
        }
        jumps += launched;
    }

    // Launch, land back on the start platform, launch again
    assert_eq!(jumps, grounded_ticks);
    assert!(jumps >= 2);
}

#[test]
fn test_landing_is_stable() {
    let mut session = playing();
    for _ in 0..100 {
        tick(&mut session, &silence());
        assert_eq!(session.actor.y, 460.0);
        assert_eq!(session.actor.vy, 0.0);
        assert!(session.actor.on_ground);
    }
}

#[test]
fn test_camera_settles_behind_runner() {
    let mut session = playing();
    stand_on(&mut session, Rect::new(0.0, 500.0, 400.0, 100.0), 340.0);

    for _ in 0..200 {
        tick(&mut session, &silence());
        assert!(session.camera.x >= 0.0);
    }
    let desired = session.actor.world_x - CANVAS_WIDTH / 3.0;
    assert!((session.camera.x - desired).abs() < 0.01);
}

#[test]
fn test_restart_matches_fresh_run() {
    let fresh = playing();

    let mut session = playing();
    for _ in 0..50 {
        tick(&mut session, &volume(100.0));
    }
    // Drop into the first gap
    session.actor.world_x = 450.0;
    session.actor.y = 300.0;
    for _ in 0..200 {
        tick(&mut session, &silence());
        if session.phase != GamePhase::Playing {
            break;
        }
    }
    assert_eq!(session.phase, GamePhase::GameOver);

    let result = tick(
        &mut session,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );
    assert!(result.events.contains(&GameEvent::Started));
    // The restart tick also simulated one step
    let mut expected = fresh.clone();
    tick(&mut expected, &silence());
    assert_eq!(session.snapshot(), expected.snapshot());
}

#[test]
fn test_spike_ends_run_with_frozen_score() {
    let mut session = playing();
    let spiked = find_rect(&session, |e| match e {
        LevelElement::Platform(p) if p.spike_offset_x.is_some() => Some(p.rect),
        _ => None,
    });
    assert_eq!(spiked.x, 520.0);
    stand_on(&mut session, spiked, 40.0);

    let mut last_score = session.score;
    for _ in 0..20 {
        let result = tick(&mut session, &volume(40.0));
        if session.phase == GamePhase::GameOver {
            assert_eq!(result.events.last(), Some(&GameEvent::Died(DeathCause::Spike)));
            assert_eq!(session.score, last_score);
            assert!(session.score < session.actor.world_x / SCORE_DIVISOR);
            return;
        }
        last_score = session.score;
    }
    panic!("runner walked through the spike");
}

#[test]
fn test_finish_line_spawns_one_confetti_burst() {
    let mut session = playing();
    let finish = find_rect(&session, |e| match e {
        LevelElement::FinishLine(r) => Some(*r),
        _ => None,
    });
    session.actor.world_x = finish.x;
    session.actor.y = 460.0;
    session.actor.on_ground = false;

    let result = tick(&mut session, &silence());
    assert_eq!(session.phase, GamePhase::Won);
    assert!(result.events.contains(&GameEvent::Won));
    assert_eq!(
        result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ConfettiSpawned { .. }))
            .count(),
        1
    );
    assert_eq!(session.confetti.len(), CONFETTI_COUNT);

    // Only the confetti moves afterwards
    let actor = session.actor.clone();
    let score = session.score;
    let first_y = session.confetti[0].pos.y;
    for _ in 0..10 {
        let result = tick(&mut session, &volume(100.0));
        assert!(result.events.is_empty());
    }
    assert_eq!(session.actor, actor);
    assert_eq!(session.score, score);
    assert_eq!(session.confetti.len(), CONFETTI_COUNT);
    assert_ne!(session.confetti[0].pos.y, first_y);
}

#[test]
fn test_falling_bridge_drops_runner() {
    let mut session = playing_with(Settings {
        bridge_kind: BridgeKind::Falling,
        ..Settings::default()
    });
    let plank = find_rect(&session, |e| match e {
        LevelElement::FallingBridgeStructure(b) => Some(b.planks[0].rect),
        _ => None,
    });
    stand_on(&mut session, plank, 10.0);
    let wiggle_ticks = session.tuning().wiggle_ticks as usize;

    let result = tick(&mut session, &silence());
    assert!(result.events.contains(&GameEvent::PlankWiggling { index: 0 }));

    let mut fell_at = None;
    for n in 2..=200 {
        let result = tick(&mut session, &silence());
        if result.events.contains(&GameEvent::PlankFalling { index: 0 }) {
            fell_at = Some(n);
        }
        if fell_at.is_none() {
            assert!(session.actor.on_ground, "still standing at tick {n}");
        }
        if session.phase == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(fell_at, Some(wiggle_ticks));
    assert_eq!(session.phase, GamePhase::GameOver);
    assert!(session.actor.feet() >= WATER_LINE);

    let state = session.level.iter().find_map(|e| match e {
        LevelElement::FallingBridgeStructure(b) => Some(b.planks[0].state),
        _ => None,
    });
    assert!(matches!(
        state,
        Some(PlankState::Falling { .. } | PlankState::Fallen)
    ));
}

#[test]
fn test_bridge_builds_one_plank_per_tick() {
    let mut session = playing();
    for _ in 0..10 {
        tick(&mut session, &silence());
    }
    // Not armed from the start platform
    assert_eq!(count_planks(&session), 0);

    let post = find_rect(&session, |e| match e {
        LevelElement::BridgePost(p) => Some(p.rect),
        _ => None,
    });
    stand_on(&mut session, post, 5.0);

    let mut counts = Vec::new();
    for _ in 0..5 {
        let result = tick(&mut session, &silence());
        assert_eq!(result.debug.armed_bridge, Some(0));
        counts.push(count_planks(&session));
    }
    assert_eq!(counts, vec![1, 2, 3, 3, 3]);
}

#[test]
fn test_shuriken_spawns_once_and_is_purged() {
    let mut session = playing();
    let spawner_x = session
        .level
        .iter()
        .find_map(|e| match e {
            LevelElement::ShurikenSpawner(s) => Some(s.x),
            _ => None,
        })
        .expect("spawner");
    let ground = find_rect(&session, |e| match e {
        LevelElement::Platform(p) if p.rect.x <= spawner_x && p.rect.right() > spawner_x => {
            Some(p.rect)
        }
        _ => None,
    });
    stand_on(&mut session, ground, 10.0);

    let mut spawned = 0;
    let mut seen_active = false;
    for _ in 0..300 {
        let result = tick(&mut session, &silence());
        spawned += result
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ShurikenSpawned { .. }))
            .count();
        seen_active |= session
            .level
            .iter()
            .any(|e| matches!(e, LevelElement::ShurikenActive(_)));
        assert_eq!(session.phase, GamePhase::Playing);
    }

    assert_eq!(spawned, 1);
    assert!(seen_active);
    assert!(
        !session
            .level
            .iter()
            .any(|e| matches!(e, LevelElement::ShurikenActive(_)))
    );
}

#[test]
fn test_denied_audio_still_playable() {
    let mut session = GameSession::new(Settings::default(), Tuning::default()).expect("level");
    session.audio_ready(AudioStatus::Denied);
    assert!(session.start());
    let result = tick(
        &mut session,
        &TickInput {
            volume: None,
            jump: true,
            ..Default::default()
        },
    );
    assert_eq!(result.events, vec![GameEvent::Jumped { vy: -6.0 }]);
}

proptest! {
    #[test]
    fn prop_gravity_until_landing(height in 0.0f32..400.0, offset in 0.0f32..340.0) {
        let mut session = playing();
        session.actor.world_x = offset;
        session.actor.y = 460.0 - height;
        session.actor.on_ground = false;

        let mut last_vy = session.actor.vy;
        for _ in 0..200 {
            tick(&mut session, &silence());
            if session.actor.on_ground {
                prop_assert_eq!(session.actor.y, 460.0);
                break;
            }
            prop_assert!(session.actor.vy > last_vy);
            last_vy = session.actor.vy;
        }
        prop_assert!(session.actor.on_ground);
    }
}
