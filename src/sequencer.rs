//! The draw sequencer.
//!
//! Walks the texture registry in order and issues the draws for each entry, advancing
//! a run cursor through the shared index buffer as it goes. After a full traversal the
//! cursor must sit exactly at the end of the geometry table, otherwise an entry's run
//! count disagrees with the geometry that was authored for it.

use anyhow::ensure;
use cgmath::{Matrix4, Vector3};

use crate::{
    camera::FrameTransforms,
    data_structures::{
        geometry::{RUN_LEN, Span},
        registry::{Entry, TextureRegistry},
    },
    render::DrawTarget,
    state::{ChairOffset, SceneState},
};

/// Translation that moves the chair by its offset in its own frame.
pub fn chair_transform(chair: ChairOffset) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(chair.x, 0.0, chair.x))
        * Matrix4::from_translation(Vector3::new(chair.z, 0.0, -chair.z))
}

#[derive(Debug, Default)]
pub struct DrawSequencer {
    cursor: u32,
}

impl DrawSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs consumed so far.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Draws every placement of `entry` over the same runs, then consumes them.
    pub fn draw_entry(
        &mut self,
        registry: &TextureRegistry,
        entry: &Entry,
        frame: &FrameTransforms,
        state: &SceneState,
        target: &mut dyn DrawTarget,
    ) {
        let first = self.cursor;
        let runs = entry.span.runs();
        for placement in &entry.placements {
            let mut model = frame.placed(&placement.local);
            if placement.follows_chair {
                model = model * chair_transform(state.chair);
            }
            target.set_model(model);
            target.bind_texture(registry.resolve(entry, placement, state.channel));
            match entry.span {
                Span::Quads(_) => {
                    for run in first..first + runs {
                        target.draw_indexed(run * RUN_LEN..(run + 1) * RUN_LEN);
                    }
                }
                Span::Fan { .. } => {
                    target.draw_indexed(first * RUN_LEN..(first + runs) * RUN_LEN);
                }
            }
        }
        self.cursor += runs;
    }
}

/// One full traversal of `registry`. Returns the number of runs consumed, which must
/// equal `total_runs`.
pub fn sequence(
    registry: &TextureRegistry,
    frame: &FrameTransforms,
    state: &SceneState,
    target: &mut dyn DrawTarget,
    total_runs: u32,
) -> anyhow::Result<u32> {
    let mut sequencer = DrawSequencer::new();
    for entry in registry.entries() {
        sequencer.draw_entry(registry, entry, frame, state, target);
    }
    ensure!(
        sequencer.cursor() == total_runs,
        "draw sequence consumed {} runs but the geometry table holds {}",
        sequencer.cursor(),
        total_runs
    );
    Ok(sequencer.cursor())
}
