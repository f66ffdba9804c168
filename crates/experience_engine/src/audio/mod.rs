//! Audio system
//!
//! The audio engine itself (decoding, mixing, output) is an external
//! collaborator reached through [`backend::AudioBackend`]. Entities own
//! [`SoundHandle`]s, each wrapping one loaded source.

pub mod backend;
mod sound;

pub use sound::{SoundHandle, SoundOptions};

use backend::{AudioBackend, SilentBackend};
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Audio errors
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// Backend has not been initialized
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Backend failed to initialize
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Source id does not correspond to a loaded source
    #[error("Unknown audio source")]
    UnknownSource,

    /// Source file could not be opened or decoded
    #[error("Failed to load audio source: {0}")]
    LoadFailed(String),

    /// Playback could not be started
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Shared handle to the audio backend
///
/// Cloning yields another handle to the same backend. Single-threaded.
#[derive(Clone)]
pub struct AudioEngine {
    backend: Rc<RefCell<dyn AudioBackend>>,
}

impl AudioEngine {
    /// Wrap a backend
    pub fn new<B: AudioBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Rc::new(RefCell::new(backend)),
        }
    }

    /// Engine backed by a [`SilentBackend`]
    pub fn silent() -> Self {
        Self::new(SilentBackend::new())
    }

    /// Best available engine for this build
    ///
    /// Uses the rodio output device when the `rodio` feature is enabled and a
    /// device opens; otherwise falls back to a silent backend.
    pub fn platform_default() -> Self {
        #[cfg(feature = "rodio")]
        {
            let mut rodio = backend::rodio_backend::RodioBackend::new();
            match rodio.initialize() {
                Ok(()) => return Self::new(rodio),
                Err(e) => log::warn!("Falling back to silent audio: {}", e),
            }
        }
        Self::silent()
    }

    /// Mutable access to the backend
    pub fn backend(&self) -> RefMut<'_, dyn AudioBackend> {
        self.backend.borrow_mut()
    }

    /// Per-frame housekeeping (drop finished voices)
    pub fn update(&self) {
        self.backend.borrow_mut().update();
    }
}

impl fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEngine")
            .field("backend", &self.backend.borrow().name())
            .finish()
    }
}
