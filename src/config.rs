//! Runtime configuration.
//!
//! Every tunable of the living room lives in [`Config`]. The defaults reproduce the
//! scene as it was authored; `from_env` only lets the asset root move around on
//! native targets.

use cgmath::{Deg, Point3, Vector3};

/// Environment variable that overrides [`Config::asset_root`] on native targets.
pub const ASSET_ROOT_VAR: &str = "LIVING_ROOM_ASSETS";

#[derive(Clone, Debug)]
pub struct Config {
    /// Id of the `<canvas>` the scene draws into (wasm only).
    pub canvas_id: String,
    /// Id of the element that receives the coordinate readout (wasm only).
    pub readout_id: String,
    /// Directory (native) or URL path segment (wasm) all assets are resolved against.
    pub asset_root: String,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Translation applied to the eye per W/A/S/D/Z/X press.
    pub eye_step: f32,
    /// Yaw/pitch change in degrees per arrow press.
    pub look_step: f32,
    /// Chair translation per +/-/0/9 press.
    pub chair_step: f32,
    pub clear_colour: wgpu::Color,
    pub view: FixedView,
    pub light: LightConfig,
    /// Looping track played while party mode is on.
    pub party_track: String,
}

/// The eye/target/up triple of the view matrix. Input moves the model matrix, never this.
#[derive(Clone, Copy, Debug)]
pub struct FixedView {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub ambient: [f32; 3],
    pub party_colours: Vec<[f32; 3]>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_id: "wglCanvas".to_string(),
            readout_id: "coordinates".to_string(),
            asset_root: "assets".to_string(),
            fovy: Deg(55.0),
            znear: 0.1,
            zfar: 100.0,
            eye_step: 0.2,
            look_step: 2.0,
            chair_step: 0.1,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            view: FixedView {
                eye: Point3::new(10.0, 2.0, 10.0),
                target: Point3::new(0.0, 2.0, 0.0),
                up: Vector3::unit_y(),
            },
            light: LightConfig::default(),
            party_track: "funkytown.mp3".to_string(),
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [4.1, 3.25, 4.1],
            colour: [1.0, 1.0, 1.0],
            ambient: [0.2, 0.2, 0.2],
            party_colours: vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 0.0, 1.0],
            ],
        }
    }
}

impl Config {
    /// Defaults, with the asset root taken from [`ASSET_ROOT_VAR`] when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(root) = std::env::var(ASSET_ROOT_VAR) {
            if !root.is_empty() {
                log::info!("Loading assets from {root}");
                config.asset_root = root;
            }
        }
        config
    }
}
