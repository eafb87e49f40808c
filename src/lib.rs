//! living-room
//!
//! A hand-authored living room (sofa, television, pictures, a table and four chairs)
//! rendered with wgpu, natively and in the browser through WebGL. The camera is moved
//! with the keyboard, the TV can switch channels, one chair can be pushed around and
//! party mode turns the light into a disco.
//!
//! High-level modules
//! - `camera`: projection, the fixed view and the per-frame model/normal matrices
//! - `config`: every tunable of the room
//! - `context`: central GPU and window context that owns device/queue/pipeline
//! - `data_structures`: the shared geometry table, texture registry and GPU textures
//! - `flow`: the event loop, frame callback and keyboard callback
//! - `input`: the key map and the chair bounds
//! - `pipelines`: the shader pair and the light uniform
//! - `render`: recorded draw commands replayed onto a render pass
//! - `resources`: asset loading
//! - `scene`: the living room content
//! - `sequencer`: walks the registry and issues the draws
//! - `state`: the scene parameters shared by input and rendering
//!
//! `audio` and `readout` are the two small collaborators of the input controller.
//!
//! # Assets
//!
//! Images and the party track are not part of the crate. They are read from the asset
//! root, `assets/` next to the working directory by default (override it with
//! `LIVING_ROOM_ASSETS` on native builds). In the browser they are fetched from
//! `<origin>/assets/`. The expected files are:
//!
//! ```text
//! assets/
//!   static.jpg gru.jpg simpsons.jpg yoda.jpg      TV channels 1-4
//!   floor.png wall1.png wallpaper.jpg ceiling.png  room shell
//!   lightshade.png                                 ceiling light
//!   sofa.jpg wood.jpeg                             sofa, chairs and sofa feet
//!   border.jpg                                     TV frame
//!   frame.jpeg picture1.jpg                        large picture
//!   frame2.jpg dino.jpg picture2.jpg peppers.png dolphins.jpg
//!                                                  the four small pictures
//!   table.png                                      table
//!   funkytown.mp3                                  party mode track
//! ```
//!
//! A missing, undecodable or oversized image is logged at `warn` and its object keeps
//! the blue placeholder texture. When `assets/` exists at build time it is also copied into `OUT_DIR` for
//! packaging.

pub mod audio;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod readout;
pub mod render;
pub mod resources;
pub mod scene;
pub mod sequencer;
pub mod state;

pub use config::Config;
pub use flow::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run(Config::from_env()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
