use living_room::{
    audio::{self, SilentTrack},
    input::{Action, CHAIR_X_MAX, Controller, move_chair},
    readout,
    state::{CameraState, ChairOffset, PartyMode, SceneState, TvChannel},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use winit::keyboard::KeyCode;

use crate::common::test_utils::{RecordingReadout, RecordingTrack, approx_eq};

mod common;

const STEP: f32 = 0.1;
const SLACK: f32 = 1e-3;

fn assert_chair_in_bounds(chair: ChairOffset, history: &[Action]) {
    let ChairOffset { x, z } = chair;
    assert!(x >= -2.0 - SLACK, "x={x} after {history:?}");
    assert!(x <= CHAIR_X_MAX + STEP + SLACK, "x={x} after {history:?}");
    assert!((-0.7 - SLACK..=4.1 + SLACK).contains(&z), "z={z} after {history:?}");
    if x > STEP + SLACK {
        assert!(
            (1.5 - STEP - SLACK..=3.4 + SLACK).contains(&z),
            "chair left the corridor at x={x} z={z} after {history:?}"
        );
    }
}

#[test]
fn chair_never_leaves_its_bounds() {
    let moves = [
        Action::ChairXPlus,
        Action::ChairXMinus,
        Action::ChairZPlus,
        Action::ChairZMinus,
    ];
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut chair = ChairOffset::default();
        let mut history = Vec::new();
        for _ in 0..2_000 {
            let action = moves[rng.gen_range(0..moves.len())];
            history.push(action);
            chair = move_chair(chair, action, STEP);
            assert_chair_in_bounds(chair, &history[history.len().saturating_sub(12)..]);
        }
    }
}

#[test]
fn chair_keys_stay_in_bounds_through_the_controller() {
    let keys = [
        KeyCode::Equal,
        KeyCode::NumpadAdd,
        KeyCode::Minus,
        KeyCode::Digit9,
        KeyCode::Digit0,
        KeyCode::KeyW,
        KeyCode::ArrowLeft,
    ];
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = SilentTrack::new("track");
    let mut state = SceneState::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5_000 {
        let key = keys[rng.gen_range(0..keys.len())];
        assert!(controller.handle_key(&mut state, key, &mut track));
        assert_chair_in_bounds(state.chair, &[]);
    }
}

#[test]
fn x_moves_are_blocked_outside_the_corridor() {
    let ahead = ChairOffset { x: 0.5, z: 1.4 };
    assert_eq!(move_chair(ahead, Action::ChairXPlus, STEP), ahead);
    let ahead = ChairOffset { x: 0.5, z: 3.35 };
    assert_eq!(move_chair(ahead, Action::ChairXPlus, STEP), ahead);

    // At or behind zero the chair may always advance once.
    let behind = ChairOffset { x: -0.5, z: 0.0 };
    assert!(approx_eq(move_chair(behind, Action::ChairXPlus, STEP).x, -0.4, 1e-6));

    let at_limit = ChairOffset { x: CHAIR_X_MAX, z: 2.0 };
    assert_eq!(move_chair(at_limit, Action::ChairXPlus, STEP), at_limit);

    let back = ChairOffset { x: -1.95, z: 0.0 };
    assert_eq!(move_chair(back, Action::ChairXMinus, STEP), back);
}

#[test]
fn z_moves_are_blocked_at_the_corridor_edges() {
    let inside = ChairOffset { x: 0.5, z: 1.55 };
    assert_eq!(move_chair(inside, Action::ChairZMinus, STEP), inside);
    let inside = ChairOffset { x: 0.5, z: 1.7 };
    assert!(approx_eq(move_chair(inside, Action::ChairZMinus, STEP).z, 1.6, 1e-6));
    let inside = ChairOffset { x: 0.5, z: 3.35 };
    assert_eq!(move_chair(inside, Action::ChairZPlus, STEP), inside);

    let free = ChairOffset { x: 0.0, z: 4.05 };
    assert_eq!(move_chair(free, Action::ChairZPlus, STEP), free);
    let free = ChairOffset { x: 0.0, z: -0.65 };
    assert_eq!(move_chair(free, Action::ChairZMinus, STEP), free);
    let free = ChairOffset { x: 0.0, z: 1.0 };
    assert!(approx_eq(move_chair(free, Action::ChairZMinus, STEP).z, 0.9, 1e-6));
}

#[test]
fn party_off_pauses_and_rewinds_the_track() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = RecordingTrack::new();
    let mut state = SceneState::new();

    assert!(controller.handle_key(&mut state, KeyCode::KeyP, &mut track));
    assert_eq!(state.party, PartyMode::On);
    assert!(track.playing);
    track.advance(12.5);
    assert!(track.position > 0.0);

    assert!(controller.handle_key(&mut state, KeyCode::KeyP, &mut track));
    assert_eq!(state.party, PartyMode::Off);
    assert!(!track.playing);
    assert_eq!(track.position, 0.0);
    assert_eq!(track.calls, ["play", "pause", "rewind"]);
}

#[test]
fn stopping_rewinds_after_pausing() {
    let mut track = RecordingTrack::new();
    audio::start(&mut track);
    audio::stop(&mut track);
    assert_eq!(track.calls, ["play", "pause", "rewind"]);
}

#[test]
fn channel_keys_select_the_palette_index() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = RecordingTrack::new();
    let mut state = SceneState::new();
    for (key, channel) in [
        (KeyCode::Digit3, TvChannel::Simpsons),
        (KeyCode::Digit1, TvChannel::Static),
        (KeyCode::Digit4, TvChannel::Yoda),
        (KeyCode::Digit2, TvChannel::Gru),
    ] {
        controller.handle_key(&mut state, key, &mut track);
        assert_eq!(state.channel, channel);
        assert_eq!(TvChannel::ALL[channel.index()], channel);
    }
    assert!(track.calls.is_empty());
}

#[test]
fn movement_keys_use_their_steps() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = RecordingTrack::new();
    let mut state = SceneState::new();
    for key in [KeyCode::ArrowUp, KeyCode::ArrowRight, KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyX] {
        controller.handle_key(&mut state, key, &mut track);
    }
    let camera = state.camera;
    assert!(approx_eq(camera.ly, -2.0, 1e-6));
    assert!(approx_eq(camera.lx, 2.0, 1e-6));
    assert!(approx_eq(camera.ez, 0.2, 1e-6));
    assert!(approx_eq(camera.ex, 0.2, 1e-6));
    assert!(approx_eq(camera.ey, -0.2, 1e-6));
    assert_eq!(camera.lz, 0.0);
}

#[test]
fn unmapped_keys_change_nothing() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = RecordingTrack::new();
    let mut state = SceneState::new();
    for key in [KeyCode::KeyQ, KeyCode::Space, KeyCode::Digit5, KeyCode::Escape] {
        assert!(!controller.handle_key(&mut state, key, &mut track));
    }
    assert_eq!(state, SceneState::new());
    assert!(track.calls.is_empty());
}

#[test]
fn readout_shows_one_decimal() {
    let camera = CameraState {
        ex: 0.2,
        ey: -0.4,
        ez: 1.0,
        lx: 4.0,
        ly: -2.0,
        lz: 0.0,
    };
    assert_eq!(
        readout::format(&camera),
        "Eye position: (0.2, -0.4, 1.0) Looking at: (4.0, -2.0, 0.0)"
    );
}

#[test]
fn every_key_press_refreshes_the_readout() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = RecordingTrack::new();
    let mut readout = RecordingReadout::default();
    let mut state = SceneState::new();

    assert!(controller.key_pressed(&mut state, KeyCode::KeyW, &mut track, &mut readout));
    assert!(!controller.key_pressed(&mut state, KeyCode::KeyQ, &mut track, &mut readout));
    assert!(!controller.key_pressed(&mut state, KeyCode::Escape, &mut track, &mut readout));

    assert_eq!(readout.shown.len(), 3);
    let expected = readout::format(&state.camera);
    assert!(readout.shown.iter().all(|text| *text == expected));
    assert_eq!(expected, "Eye position: (0.0, 0.0, 0.2) Looking at: (0.0, 0.0, 0.0)");
}

#[test]
fn silent_track_follows_party_mode() {
    let controller = Controller::new(0.2, 2.0, STEP);
    let mut track = SilentTrack::new("funkytown.mp3");
    let mut state = SceneState::new();
    assert!(!track.is_playing());

    controller.handle_key(&mut state, KeyCode::KeyP, &mut track);
    assert!(track.is_playing());
    controller.handle_key(&mut state, KeyCode::KeyP, &mut track);
    assert!(!track.is_playing());
}
