// tests/transition_tests.rs

use tile_world::{
    AssetCatalog, DrawCall, GameManager, InputState, LevelError, RecordingBackend, Renderer,
    WorldConfig, FADE_MIN_ALPHA,
};

const GRID: &str = "1 1 1 1\n1 1 1 1\n1 1 1 1\n1 1 1 1\n";

// With a 4x4 grid a 1x1 portal at cell (1, 1) is anchored at about
// (19.64, 11.01): its envelope spans x 17.28..21.99 and y 7.71..11.01.
// The same portal at cell (0, 1) is anchored at x 6.375: x 5.61..7.14.
fn game(levels: &[(&str, &str)]) -> GameManager {
    let config = WorldConfig {
        grid_resolution: 4,
        ..Default::default()
    };
    let mut game = GameManager::new(config, AssetCatalog::builtin("null.png"));
    for (id, objects) in levels {
        game.add_level_from_str(id, &format!("{GRID}{objects}"))
            .expect("level should parse");
    }
    game
}

fn renderer() -> Renderer<RecordingBackend> {
    Renderer::new(RecordingBackend::new(), "null.png")
}

fn idle() -> InputState {
    InputState::default()
}

#[test]
fn entering_an_envelope_switches_level_and_moves_player() {
    let mut g = game(&[
        ("a", "P door.png 1 1 1 1 b 30.0 30.0\n"),
        ("b", ""),
    ]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 9.0);

    let report = g.frame(0.01, idle(), &mut r);
    let arrival = report.arrival.expect("portal should trigger");
    assert_eq!((arrival.from, arrival.to, arrival.portal), (0, 1, 0));
    assert_eq!(g.current_index(), 1);
    assert_eq!((g.player().x, g.player().y), (30.0, 30.0));
    assert!(g.transition().is_transitioning());
}

#[test]
fn player_outside_envelope_stays_put() {
    let mut g = game(&[
        ("a", "P door.png 1 1 1 1 b 30.0 30.0\n"),
        ("b", ""),
    ]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 7.0);

    let report = g.frame(0.01, idle(), &mut r);
    assert!(report.arrival.is_none());
    assert_eq!(g.current_index(), 0);
}

#[test]
fn fade_is_drawn_and_input_frozen_for_the_full_duration() {
    let mut g = game(&[
        ("a", "P door.png 1 1 1 1 b 30.0 30.0\n"),
        ("b", ""),
    ]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 9.0);
    g.frame(0.01, idle(), &mut r);

    let right = InputState {
        right: true,
        ..Default::default()
    };
    r.backend_mut().clear_calls();
    g.frame(0.5, right, &mut r);
    match r.backend().calls.last() {
        Some(DrawCall::Fade { alpha, .. }) => assert!(*alpha >= FADE_MIN_ALPHA),
        other => panic!("expected fade overlay, got {other:?}"),
    }
    assert_eq!(g.player().x, 30.0);

    r.backend_mut().clear_calls();
    g.frame(0.6, right, &mut r);
    assert!(!g.transition().is_transitioning());
    assert!(!matches!(r.backend().calls.last(), Some(DrawCall::Fade { .. })));
    assert!(g.player().x > 30.0);
}

#[test]
fn fade_keeps_the_screen_covered_until_it_ends() {
    let mut g = game(&[
        ("a", "P door.png 1 1 1 1 b 30.0 30.0\n"),
        ("b", ""),
    ]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 9.0);
    assert!(g.frame(0.01, idle(), &mut r).arrival.is_some());

    // Every frame drawn after the switch, up to the end of the fade.
    let mut alphas = Vec::new();
    for _ in 0..5 {
        r.backend_mut().clear_calls();
        g.frame(0.19, idle(), &mut r);
        match r.backend().calls.last() {
            Some(DrawCall::Fade { alpha, .. }) => alphas.push(*alpha),
            other => panic!("expected fade overlay, got {other:?}"),
        }
    }
    assert!(alphas.iter().all(|a| *a >= FADE_MIN_ALPHA && *a <= 1.0), "{alphas:?}");
    assert!(alphas.windows(2).all(|w| w[1] <= w[0]), "{alphas:?}");
}

#[test]
fn unknown_destination_is_reported_once_and_changes_nothing() {
    let mut g = game(&[("a", "P door.png 1 1 1 1 nowhere 30.0 30.0\n")]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 9.0);

    let report = g.frame(0.01, idle(), &mut r);
    assert!(report.arrival.is_none());
    match report.integrity_error {
        Some(LevelError::UnknownDestination { destination, .. }) => {
            assert_eq!(destination, "nowhere")
        }
        other => panic!("expected UnknownDestination, got {other:?}"),
    }
    assert_eq!(g.current_index(), 0);
    assert_eq!((g.player().x, g.player().y), (19.0, 9.0));
    assert!(!g.transition().is_transitioning());

    let again = g.frame(0.01, idle(), &mut r);
    assert!(again.integrity_error.is_none());
}

#[test]
fn arriving_inside_another_envelope_does_not_bounce_back() {
    let mut g = game(&[
        ("a", "P door.png 1 1 1 1 b 6.0 9.0\n"),
        ("b", "P door.png 0 1 1 1 a 19.0 9.0\n"),
    ]);
    let mut r = renderer();
    g.player_mut().set_position(19.0, 9.0);

    assert!(g.frame(0.01, idle(), &mut r).arrival.is_some());
    assert_eq!(g.current_index(), 1);

    // Fade over, still standing in b's envelope.
    let report = g.frame(1.5, idle(), &mut r);
    assert!(!g.transition().is_transitioning());
    assert!(report.arrival.is_none());
    assert_eq!(g.current_index(), 1);

    // Step out, then back in.
    g.player_mut().set_position(30.0, 30.0);
    assert!(g.frame(0.01, idle(), &mut r).arrival.is_none());
    g.player_mut().set_position(6.0, 9.0);
    let back = g.frame(0.01, idle(), &mut r).arrival.expect("re-armed portal");
    assert_eq!(back.to, 0);
    assert_eq!((g.player().x, g.player().y), (19.0, 9.0));
}
