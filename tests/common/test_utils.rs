use std::ops::Range;

use living_room::{
    audio::PartyTrack,
    camera::{Composer, FrameTransforms, Projection},
    config::Config,
    data_structures::{geometry::RUN_LEN, registry::TextureId},
    readout::Readout,
    render::DrawTarget,
    state::CameraState,
};

pub const EPSILON: f32 = 1e-4;

pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

/// Frame transforms for an 800x600 surface with the default configuration.
pub fn frame(camera: &CameraState) -> FrameTransforms {
    let config = Config::default();
    let projection = Projection::new(800, 600, config.fovy, config.znear, config.zfar);
    Composer::new(projection, config.view).compose(camera)
}

/// One draw call as seen by the index buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub texture: Option<TextureId>,
    pub model_slot: Option<usize>,
    pub indices: Range<u32>,
}

/// Stands in for the GPU index buffer: checks every draw against its length and
/// remembers the furthest run any draw reached.
#[derive(Debug)]
pub struct MockIndexBuffer {
    pub len: u32,
    pub draws: Vec<Draw>,
    pub models: Vec<cgmath::Matrix4<f32>>,
    pub out_of_bounds: Vec<Range<u32>>,
    bound: Option<TextureId>,
}

impl MockIndexBuffer {
    pub fn new(len: u32) -> Self {
        Self {
            len,
            draws: Vec::new(),
            models: Vec::new(),
            out_of_bounds: Vec::new(),
            bound: None,
        }
    }

    /// Runs reached by the furthest draw.
    pub fn cursor(&self) -> u32 {
        self.draws
            .iter()
            .map(|draw| draw.indices.end)
            .max()
            .unwrap_or(0)
            / RUN_LEN
    }

    /// The draws that touched run `run`.
    pub fn draws_of_run(&self, run: u32) -> Vec<&Draw> {
        let first_index = run * RUN_LEN;
        self.draws
            .iter()
            .filter(|draw| draw.indices.contains(&first_index))
            .collect()
    }
}

impl DrawTarget for MockIndexBuffer {
    fn set_model(&mut self, model: cgmath::Matrix4<f32>) {
        self.models.push(model);
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.bound = Some(texture);
    }

    fn draw_indexed(&mut self, indices: Range<u32>) {
        if indices.end > self.len || indices.start >= indices.end {
            self.out_of_bounds.push(indices.clone());
        }
        self.draws.push(Draw {
            texture: self.bound,
            model_slot: self.models.len().checked_sub(1),
            indices,
        });
    }
}

/// A track with a playback clock, recording every transport call.
#[derive(Debug, Default)]
pub struct RecordingTrack {
    pub calls: Vec<&'static str>,
    pub playing: bool,
    pub position: f64,
}

impl RecordingTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets time pass while the track is playing.
    pub fn advance(&mut self, seconds: f64) {
        if self.playing {
            self.position += seconds;
        }
    }
}

impl PartyTrack for RecordingTrack {
    fn play(&mut self) {
        self.calls.push("play");
        self.playing = true;
    }

    fn pause(&mut self) {
        self.calls.push("pause");
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.calls.push("rewind");
        self.position = 0.0;
    }
}

/// Collects every readout text instead of showing it.
#[derive(Debug, Default)]
pub struct RecordingReadout {
    pub shown: Vec<String>,
}

impl Readout for RecordingReadout {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}
