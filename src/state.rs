//! The scene parameter block.
//!
//! [`SceneState`] is the only mutable state shared between the keyboard callback and
//! the frame callback. Both receive it by `&mut`/`&` from the application handler, so
//! a key press is fully applied before the next frame reads it.

/// Eye offset and look angles driven by the movement and arrow keys.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraState {
    pub ex: f32,
    pub ey: f32,
    pub ez: f32,
    /// Yaw in degrees.
    pub lx: f32,
    /// Pitch in degrees.
    pub ly: f32,
    /// Kept for the readout; no key changes it.
    pub lz: f32,
}

/// One of the four pictures the TV can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TvChannel {
    #[default]
    Static,
    Gru,
    Simpsons,
    Yoda,
}

impl TvChannel {
    pub const ALL: [TvChannel; 4] = [
        TvChannel::Static,
        TvChannel::Gru,
        TvChannel::Simpsons,
        TvChannel::Yoda,
    ];

    /// Position in the channel palette.
    pub fn index(self) -> usize {
        match self {
            TvChannel::Static => 0,
            TvChannel::Gru => 1,
            TvChannel::Simpsons => 2,
            TvChannel::Yoda => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartyMode {
    #[default]
    Off,
    On,
}

impl PartyMode {
    pub fn toggled(self) -> Self {
        match self {
            PartyMode::Off => PartyMode::On,
            PartyMode::On => PartyMode::Off,
        }
    }

    pub fn is_on(self) -> bool {
        self == PartyMode::On
    }
}

/// Offset of the movable chair along its two local axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChairOffset {
    pub x: f32,
    pub z: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneState {
    pub camera: CameraState,
    pub channel: TvChannel,
    pub party: PartyMode,
    pub chair: ChairOffset,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }
}
