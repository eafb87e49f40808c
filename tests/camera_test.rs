use cgmath::{Deg, Matrix, Matrix4, SquareMatrix, Vector4};
use living_room::{
    audio::SilentTrack,
    camera::{Composer, NormalSource, Projection, camera_model, normal_matrix},
    config::Config,
    input::{Action, Controller},
    state::{CameraState, SceneState},
};

use crate::common::test_utils::{EPSILON, approx_eq, frame};

mod common;

#[test]
fn perspective_diagonal_follows_the_standard_formula() {
    let config = Config::default();
    let focal = 1.0 / (55.0f32 / 2.0).to_radians().tan();
    for (width, height) in [(800, 600), (1920, 1080), (600, 800), (1000, 1000), (2560, 1080)] {
        let projection = Projection::new(width, height, config.fovy, config.znear, config.zfar);
        let aspect = width as f32 / height as f32;
        let matrix = projection.calc_matrix();
        assert!(
            approx_eq(matrix[0][0], focal / aspect, EPSILON),
            "x scale {} for aspect {aspect}",
            matrix[0][0]
        );
        assert!(approx_eq(matrix[1][1], focal, EPSILON));
    }
}

#[test]
fn resize_updates_the_aspect() {
    let mut projection = Projection::new(800, 600, Deg(55.0), 0.1, 100.0);
    projection.resize(1200, 300);
    assert!(approx_eq(projection.aspect(), 4.0, EPSILON));
    // A zero height never divides by zero.
    projection.resize(10, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn looking_back_and_forth_returns_to_the_start() {
    let controller = Controller::new(0.2, 2.0, 0.1);
    let mut track = SilentTrack::new("track");
    let mut state = SceneState::new();
    let start = state.camera;

    for (there, back) in [
        (Action::LookRight, Action::LookLeft),
        (Action::LookUp, Action::LookDown),
        (Action::Forward, Action::Backward),
        (Action::Left, Action::Right),
        (Action::Up, Action::Down),
    ] {
        for _ in 0..37 {
            controller.apply(&mut state, there, &mut track);
        }
        for _ in 0..37 {
            controller.apply(&mut state, back, &mut track);
        }
    }

    let end = state.camera;
    for (a, b) in [
        (start.lx, end.lx),
        (start.ly, end.ly),
        (start.ex, end.ex),
        (start.ey, end.ey),
        (start.ez, end.ez),
    ] {
        assert!(approx_eq(a, b, EPSILON), "{a} != {b}");
    }
}

#[test]
fn resting_camera_has_identity_model() {
    let model = camera_model(&CameraState::default());
    assert_eq!(model, Matrix4::identity());
}

#[test]
fn rotation_pivots_around_the_eye() {
    // translate(-e) * R * translate(e) * translate(e) sends -2e to -e for any rotation.
    for (lx, ly) in [(0.0, 0.0), (30.0, 0.0), (90.0, -14.0), (-122.0, 46.0)] {
        let camera = CameraState {
            ex: 1.4,
            ey: 0.0,
            ez: -0.6,
            lx,
            ly,
            lz: 0.0,
        };
        let moved = camera_model(&camera) * Vector4::new(-2.0 * camera.ex, 0.0, -2.0 * camera.ez, 1.0);
        assert!(approx_eq(moved.x, -camera.ex, EPSILON), "{moved:?}");
        assert!(approx_eq(moved.y, 0.0, EPSILON), "{moved:?}");
        assert!(approx_eq(moved.z, -camera.ez, EPSILON), "{moved:?}");
    }
}

#[test]
fn normal_matrix_defaults_to_identity() {
    let camera = CameraState {
        lx: 40.0,
        ly: 12.0,
        ..CameraState::default()
    };
    let transforms = frame(&camera);
    let identity = Matrix4::<f32>::identity();
    for col in 0..4 {
        for row in 0..4 {
            assert!(approx_eq(transforms.normal[col][row], identity[col][row], EPSILON));
        }
    }
    assert_ne!(transforms.model, identity);
}

#[test]
fn composed_normal_matrix_is_the_inverse_transpose() {
    let config = Config::default();
    let projection = Projection::new(800, 600, config.fovy, config.znear, config.zfar);
    let composer = Composer::new(projection, config.view).with_normal_source(NormalSource::Composed);
    let camera = CameraState {
        ex: 0.4,
        ey: -0.2,
        ez: 1.0,
        lx: 20.0,
        ly: -6.0,
        lz: 0.0,
    };
    let transforms = composer.compose(&camera);
    let expected = transforms.model.invert().unwrap().transpose();
    for col in 0..4 {
        for row in 0..4 {
            assert!(approx_eq(transforms.normal[col][row], expected[col][row], EPSILON));
        }
    }
}

#[test]
fn singular_model_falls_back_to_identity_normals() {
    let flat = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
    assert_eq!(normal_matrix(&flat), Matrix4::identity());
}

#[test]
fn placements_leave_the_base_model_untouched() {
    let camera = CameraState {
        ex: 0.6,
        lx: 10.0,
        ..CameraState::default()
    };
    let transforms = frame(&camera);
    let base = transforms.model;
    let local = Matrix4::from_translation([0.0, -1.4, 0.0].into());
    let placed = transforms.placed(&local);
    assert_eq!(placed, base * local);
    assert_eq!(transforms.model, base);
}

#[test]
fn view_is_fixed_whatever_the_input() {
    let view = frame(&CameraState::default()).view;
    let moved = frame(&CameraState {
        ex: 3.0,
        ey: 1.0,
        ez: -2.0,
        lx: 90.0,
        ly: 45.0,
        lz: 0.0,
    })
    .view;
    assert_eq!(view, moved);
}
