//! Keyboard input.
//!
//! A finite map from physical keys to one mutation of the [`SceneState`]. Keys are
//! matched by physical position, so the layout of the user's keyboard does not matter.
//!
//! | Key               | Effect                                        |
//! |-------------------|-----------------------------------------------|
//! | Up/Down           | pitch by the look step                        |
//! | Left/Right        | yaw by the look step                          |
//! | W/S, A/D          | eye forward/back, strafe                      |
//! | Z/X               | eye elevation                                 |
//! | P                 | toggle party mode (lights + looping track)    |
//! | 1-4               | TV channel                                    |
//! | + / -             | chair along x, within its bounds              |
//! | 9 / 0             | chair along z, within its bounds              |

use winit::keyboard::KeyCode;

use crate::{
    audio::{self, PartyTrack},
    config::Config,
    readout::{self, Readout},
    state::{ChairOffset, SceneState, TvChannel},
};

/// Everything a key press can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    ToggleParty,
    Channel(TvChannel),
    ChairXPlus,
    ChairXMinus,
    ChairZPlus,
    ChairZMinus,
}

impl Action {
    pub fn from_key(key: KeyCode) -> Option<Action> {
        let action = match key {
            KeyCode::ArrowUp => Action::LookUp,
            KeyCode::ArrowDown => Action::LookDown,
            KeyCode::ArrowLeft => Action::LookLeft,
            KeyCode::ArrowRight => Action::LookRight,
            KeyCode::KeyW => Action::Forward,
            KeyCode::KeyS => Action::Backward,
            KeyCode::KeyA => Action::Left,
            KeyCode::KeyD => Action::Right,
            KeyCode::KeyX => Action::Up,
            KeyCode::KeyZ => Action::Down,
            KeyCode::KeyP => Action::ToggleParty,
            KeyCode::Digit1 => Action::Channel(TvChannel::Static),
            KeyCode::Digit2 => Action::Channel(TvChannel::Gru),
            KeyCode::Digit3 => Action::Channel(TvChannel::Simpsons),
            KeyCode::Digit4 => Action::Channel(TvChannel::Yoda),
            KeyCode::Equal | KeyCode::NumpadAdd => Action::ChairXPlus,
            KeyCode::Minus | KeyCode::NumpadSubtract => Action::ChairXMinus,
            KeyCode::Digit9 => Action::ChairZPlus,
            KeyCode::Digit0 => Action::ChairZMinus,
            _ => return None,
        };
        Some(action)
    }
}

/// Applies actions to the scene state with the configured step sizes.
#[derive(Clone, Copy, Debug)]
pub struct Controller {
    eye_step: f32,
    look_step: f32,
    chair_step: f32,
}

impl Controller {
    pub fn new(eye_step: f32, look_step: f32, chair_step: f32) -> Self {
        Self {
            eye_step,
            look_step,
            chair_step,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.eye_step, config.look_step, config.chair_step)
    }

    /// Maps `key` and applies it. Returns `false` for unmapped keys.
    pub fn handle_key(&self, state: &mut SceneState, key: KeyCode, track: &mut dyn PartyTrack) -> bool {
        match Action::from_key(key) {
            Some(action) => {
                self.apply(state, action, track);
                true
            }
            None => false,
        }
    }

    /// Handles one key press and refreshes the readout, whether or not the key is mapped.
    pub fn key_pressed(
        &self,
        state: &mut SceneState,
        key: KeyCode,
        track: &mut dyn PartyTrack,
        readout: &mut dyn Readout,
    ) -> bool {
        let handled = self.handle_key(state, key, track);
        readout::refresh(readout, &state.camera);
        handled
    }

    pub fn apply(&self, state: &mut SceneState, action: Action, track: &mut dyn PartyTrack) {
        let camera = &mut state.camera;
        match action {
            // Screen-space conventions: "up" lowers the pitch value, forward raises z.
            Action::LookUp => camera.ly -= self.look_step,
            Action::LookDown => camera.ly += self.look_step,
            Action::LookRight => camera.lx += self.look_step,
            Action::LookLeft => camera.lx -= self.look_step,
            Action::Forward => camera.ez += self.eye_step,
            Action::Backward => camera.ez -= self.eye_step,
            Action::Left => camera.ex += self.eye_step,
            Action::Right => camera.ex -= self.eye_step,
            Action::Up => camera.ey -= self.eye_step,
            Action::Down => camera.ey += self.eye_step,
            Action::ToggleParty => {
                state.party = state.party.toggled();
                if state.party.is_on() {
                    audio::start(track);
                } else {
                    audio::stop(track);
                }
                log::debug!("party mode {:?}", state.party);
            }
            Action::Channel(channel) => {
                state.channel = channel;
                log::debug!("tv channel {:?}", channel);
            }
            Action::ChairXPlus
            | Action::ChairXMinus
            | Action::ChairZPlus
            | Action::ChairZMinus => {
                state.chair = move_chair(state.chair, action, self.chair_step);
                log::debug!("chair offset x={:.2} z={:.2}", state.chair.x, state.chair.z);
            }
        }
    }
}

/// Furthest the chair may slide along x inside the free corridor.
pub const CHAIR_X_MAX: f32 = 2.4;

/// One chair step, or no movement if the step is blocked.
///
/// The chair sits beside the table. Along x it may only advance past zero while z is
/// inside the free corridor between the table and the sofa; along z it may not enter
/// that corridor's edges while it is advanced past zero.
pub fn move_chair(chair: ChairOffset, action: Action, step: f32) -> ChairOffset {
    let ChairOffset { x, z } = chair;
    let mut next = chair;
    match action {
        Action::ChairXPlus => {
            let blocked = (z < 1.5 && x > 0.0) || (z > 3.3 && x > 0.0) || x >= CHAIR_X_MAX;
            if !blocked {
                next.x += step;
            }
        }
        Action::ChairXMinus => {
            if x > -1.9 {
                next.x -= step;
            }
        }
        Action::ChairZMinus => {
            if !(z < -0.6 || (x > 0.0 && z < 1.6)) {
                next.z -= step;
            }
        }
        Action::ChairZPlus => {
            if !(z > 4.0 || (x > 0.0 && z > 3.3)) {
                next.z += step;
            }
        }
        _ => {}
    }
    next
}

