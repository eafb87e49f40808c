//! The party-mode soundtrack.
//!
//! Party mode starts a looping track and stopping it pauses the track *and* rewinds it,
//! so the next party starts from the beginning. In the browser the track is an
//! `HtmlAudioElement`; native builds have no audio backend and keep only the
//! transport state.

/// A loopable track with a transport.
pub trait PartyTrack {
    fn play(&mut self);
    fn pause(&mut self);
    /// Moves the playback position back to zero.
    fn rewind(&mut self);
}

/// Starts the track for a party that just began.
pub fn start(track: &mut dyn PartyTrack) {
    track.play();
}

/// Stops the track for a party that just ended.
pub fn stop(track: &mut dyn PartyTrack) {
    track.pause();
    track.rewind();
}

/// Transport state without an output device.
#[derive(Debug, Default)]
pub struct SilentTrack {
    name: String,
    playing: bool,
}

impl SilentTrack {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PartyTrack for SilentTrack {
    fn play(&mut self) {
        log::info!("party track {} playing (no audio output on this platform)", self.name);
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn rewind(&mut self) {
        log::debug!("party track {} rewound", self.name);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlTrack;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::PartyTrack;

    /// A looping `<audio>` element that is never attached to the document.
    pub struct HtmlTrack {
        element: web_sys::HtmlAudioElement,
    }

    impl HtmlTrack {
        pub fn new(url: &str) -> anyhow::Result<Self> {
            let element = web_sys::HtmlAudioElement::new_with_src(url)
                .map_err(|e| anyhow::anyhow!("cannot create audio element for {url}: {e:?}"))?;
            element.set_loop(true);
            Ok(Self { element })
        }
    }

    impl PartyTrack for HtmlTrack {
        fn play(&mut self) {
            // Autoplay policies may reject the promise; the party lights still run.
            if let Err(e) = self.element.play() {
                log::warn!("party track refused to play: {e:?}");
            }
        }

        fn pause(&mut self) {
            if let Err(e) = self.element.pause() {
                log::warn!("party track refused to pause: {e:?}");
            }
        }

        fn rewind(&mut self) {
            self.element.set_current_time(0.0);
        }
    }
}
