//! On-screen coordinate readout.
//!
//! Shows the eye offset and look angles after every key press. The browser build
//! writes into the readout element next to the canvas; native builds use the window
//! title.

use winit::window::Window;

use crate::state::CameraState;

pub fn format(camera: &CameraState) -> String {
    format!(
        "Eye position: ({:.1}, {:.1}, {:.1}) Looking at: ({:.1}, {:.1}, {:.1})",
        camera.ex, camera.ey, camera.ez, camera.lx, camera.ly, camera.lz
    )
}

/// Where the readout text goes.
pub trait Readout {
    fn show(&mut self, text: &str);
}

/// The readout element on the page, or the window title on native builds.
pub struct WindowReadout<'a> {
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    window: &'a Window,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    readout_id: &'a str,
}

impl<'a> WindowReadout<'a> {
    pub fn new(window: &'a Window, readout_id: &'a str) -> Self {
        Self { window, readout_id }
    }
}

impl Readout for WindowReadout<'_> {
    #[cfg(not(target_arch = "wasm32"))]
    fn show(&mut self, text: &str) {
        self.window.set_title(text);
    }

    #[cfg(target_arch = "wasm32")]
    fn show(&mut self, text: &str) {
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(self.readout_id));
        match element {
            Some(element) => element.set_text_content(Some(text)),
            None => log::debug!("no #{} element, skipping readout", self.readout_id),
        }
    }
}

pub fn refresh(readout: &mut dyn Readout, camera: &CameraState) {
    readout.show(&format(camera));
}
