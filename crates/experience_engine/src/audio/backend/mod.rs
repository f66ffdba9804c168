//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries.
//!
//! # Threading
//! NOT Send + Sync: the experience runs a single update thread.

#[cfg(feature = "rodio")]
pub mod rodio_backend;

use crate::audio::AudioError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Identifies a source loaded into a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId {
    /// Unique identifier for the source
    pub id: u32,
    /// Generation counter for handle validation
    pub generation: u32,
}

impl SourceId {
    /// Create a new source id
    pub fn new(id: u32, generation: u32) -> Self {
        Self { id, generation }
    }
}

/// Audio backend trait for platform abstraction
pub trait AudioBackend {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Load a source from a file path
    fn load(&mut self, path: &Path, looping: bool, volume: f32) -> Result<SourceId, AudioError>;

    /// Start playing a loaded source
    fn play(&mut self, id: SourceId) -> Result<(), AudioError>;

    /// Stop every playing instance of a source
    fn stop(&mut self, id: SourceId) -> Result<(), AudioError>;

    /// Set volume of a source (0.0 to 1.0)
    fn set_volume(&mut self, id: SourceId, volume: f32) -> Result<(), AudioError>;

    /// Release a source; unknown ids are ignored
    fn release(&mut self, id: SourceId);

    /// Check if a source has an audible instance
    fn is_playing(&self, id: SourceId) -> bool;

    /// Update the backend (cleanup finished sounds, etc.)
    fn update(&mut self) {}
}

/// Counters recorded by a [`SilentBackend`] for one source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceStats {
    /// Path the source was loaded from
    pub path: PathBuf,
    /// Loop flag at load time
    pub looping: bool,
    /// Last volume set
    pub volume: f32,
    /// Number of play calls
    pub plays: u32,
    /// Number of stop calls
    pub stops: u32,
    /// Whether the source has been released
    pub released: bool,
}

/// Shared view of what a [`SilentBackend`] was asked to do
pub type SilentStats = Rc<RefCell<HashMap<SourceId, SourceStats>>>;

/// Backend that produces no sound and records every call
///
/// Used for headless runs and as the test double for the audio engine.
#[derive(Debug, Default)]
pub struct SilentBackend {
    stats: SilentStats,
    playing: HashMap<SourceId, bool>,
    next_id: u32,
}

impl SilentBackend {
    /// Create a new silent backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded call counters
    pub fn stats(&self) -> SilentStats {
        Rc::clone(&self.stats)
    }

    fn check(&self, id: SourceId) -> Result<(), AudioError> {
        match self.stats.borrow().get(&id) {
            Some(stats) if !stats.released => Ok(()),
            _ => Err(AudioError::UnknownSource),
        }
    }
}

impl AudioBackend for SilentBackend {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn load(&mut self, path: &Path, looping: bool, volume: f32) -> Result<SourceId, AudioError> {
        let id = SourceId::new(self.next_id, 0);
        self.next_id = self.next_id.wrapping_add(1);
        self.stats.borrow_mut().insert(
            id,
            SourceStats {
                path: path.to_path_buf(),
                looping,
                volume,
                ..SourceStats::default()
            },
        );
        Ok(id)
    }

    fn play(&mut self, id: SourceId) -> Result<(), AudioError> {
        self.check(id)?;
        if let Some(stats) = self.stats.borrow_mut().get_mut(&id) {
            stats.plays += 1;
        }
        self.playing.insert(id, true);
        Ok(())
    }

    fn stop(&mut self, id: SourceId) -> Result<(), AudioError> {
        self.check(id)?;
        if let Some(stats) = self.stats.borrow_mut().get_mut(&id) {
            stats.stops += 1;
        }
        self.playing.insert(id, false);
        Ok(())
    }

    fn set_volume(&mut self, id: SourceId, volume: f32) -> Result<(), AudioError> {
        self.check(id)?;
        if let Some(stats) = self.stats.borrow_mut().get_mut(&id) {
            stats.volume = volume;
        }
        Ok(())
    }

    fn release(&mut self, id: SourceId) {
        if let Some(stats) = self.stats.borrow_mut().get_mut(&id) {
            stats.released = true;
        }
        self.playing.remove(&id);
    }

    fn is_playing(&self, id: SourceId) -> bool {
        self.playing.get(&id).copied().unwrap_or(false)
    }
}
