//! The texture registry: which texture each object is drawn with, how many runs of the
//! shared index buffer it covers, and where it is placed.
//!
//! Entries are kept in draw order. The registry never changes after startup; the TV
//! screen carries [`TextureSlot::Channel`] and is re-resolved on every draw against the
//! current channel instead of having its handle swapped.

use cgmath::{Matrix4, SquareMatrix};

use crate::{data_structures::geometry::Span, state::TvChannel};

/// Index into the registry's asset list and, at runtime, into the GPU texture store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlot {
    Static(TextureId),
    /// Whatever the TV channel selector points at.
    Channel,
}

/// One drawing of an entry's runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Applied after the camera model matrix.
    pub local: Matrix4<f32>,
    /// Whether the chair offset is applied after `local`.
    pub follows_chair: bool,
    /// Replaces the entry's texture for this placement only.
    pub texture: Option<TextureId>,
}

impl Placement {
    pub fn at(local: Matrix4<f32>) -> Self {
        Self {
            local,
            follows_chair: false,
            texture: None,
        }
    }

    pub fn base() -> Self {
        Self::at(Matrix4::identity())
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn following_chair(mut self) -> Self {
        self.follows_chair = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub label: &'static str,
    pub slot: TextureSlot,
    pub span: Span,
    /// Never empty; the runs are drawn once per placement but consumed once.
    pub placements: Vec<Placement>,
}

impl Entry {
    pub fn new(label: &'static str, slot: TextureSlot, span: Span) -> Self {
        Self {
            label,
            slot,
            span,
            placements: vec![Placement::base()],
        }
    }

    pub fn placed(mut self, placements: Vec<Placement>) -> Self {
        if !placements.is_empty() {
            self.placements = placements;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureRegistry {
    assets: Vec<String>,
    entries: Vec<Entry>,
    channels: [TextureId; 4],
}

impl TextureRegistry {
    /// Creates the registry with the four channel pictures as its first textures.
    pub fn new(channel_assets: [&str; 4]) -> Self {
        let mut registry = Self {
            assets: Vec::new(),
            entries: Vec::new(),
            channels: [TextureId(0); 4],
        };
        let channels = channel_assets.map(|asset| registry.texture(asset));
        registry.channels = channels;
        registry
    }

    /// Registers an asset and returns its id. Registering an asset twice returns the
    /// first id.
    pub fn texture(&mut self, asset: &str) -> TextureId {
        match self.assets.iter().position(|known| known == asset) {
            Some(index) => TextureId(index),
            None => {
                self.assets.push(asset.to_string());
                TextureId(self.assets.len() - 1)
            }
        }
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn channels(&self) -> [TextureId; 4] {
        self.channels
    }

    /// The texture a placement of `entry` is drawn with on `channel`.
    pub fn resolve(&self, entry: &Entry, placement: &Placement, channel: TvChannel) -> TextureId {
        if let Some(texture) = placement.texture {
            return texture;
        }
        match entry.slot {
            TextureSlot::Static(texture) => texture,
            TextureSlot::Channel => self.channels[channel.index()],
        }
    }

    /// Sum of the run counts of all entries.
    pub fn runs(&self) -> u32 {
        self.entries.iter().map(|entry| entry.span.runs()).sum()
    }

    /// Number of model matrices one traversal produces.
    pub fn placement_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.placements.len()).sum()
    }
}
