//! Sound effect handle owned by an entity

use super::backend::SourceId;
use super::AudioEngine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Playback options for a sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundOptions {
    /// Restart automatically when the clip ends
    pub looping: bool,
    /// Initial volume (0.0 to 1.0)
    pub volume: f32,
}

impl Default for SoundOptions {
    fn default() -> Self {
        Self {
            looping: false,
            volume: 0.1,
        }
    }
}

/// Thin handle over one loaded audio source
///
/// Releases the underlying source when dropped.
#[derive(Debug)]
pub struct SoundHandle {
    source: PathBuf,
    looping: bool,
    volume: f32,
    playing: bool,
    id: Option<SourceId>,
    engine: AudioEngine,
}

impl SoundHandle {
    /// Load `path` into the audio engine
    ///
    /// A source that fails to load yields an inert handle: every call on it
    /// is a logged no-op.
    pub fn new(engine: &AudioEngine, path: impl AsRef<Path>, options: SoundOptions) -> Self {
        let source = path.as_ref().to_path_buf();
        let volume = options.volume.clamp(0.0, 1.0);
        let id = match engine.backend().load(&source, options.looping, volume) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Sound '{}' unavailable: {}", source.display(), e);
                None
            }
        };
        Self {
            source,
            looping: options.looping,
            volume,
            playing: false,
            id,
            engine: engine.clone(),
        }
    }

    /// Start playback
    pub fn play(&mut self) {
        let Some(id) = self.id else {
            log::warn!("Cannot play '{}': source not loaded", self.source.display());
            return;
        };
        match self.engine.backend().play(id) {
            Ok(()) => self.playing = true,
            Err(e) => log::warn!("Failed to play '{}': {}", self.source.display(), e),
        }
    }

    /// Stop playback
    pub fn stop(&mut self) {
        self.playing = false;
        let Some(id) = self.id else {
            return;
        };
        if let Err(e) = self.engine.backend().stop(id) {
            log::warn!("Failed to stop '{}': {}", self.source.display(), e);
        }
    }

    /// Set volume, clamped to `[0.0, 1.0]`
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let Some(id) = self.id else {
            return;
        };
        if let Err(e) = self.engine.backend().set_volume(id, self.volume) {
            log::warn!("Failed to set volume on '{}': {}", self.source.display(), e);
        }
    }

    /// Current volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether `play` succeeded more recently than `stop`
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Loop flag
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Source path
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Backend id, `None` when the source failed to load or was released
    pub fn source_id(&self) -> Option<SourceId> {
        self.id
    }

    /// Stop and free the underlying source; idempotent
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            let mut backend = self.engine.backend();
            let _ = backend.stop(id);
            backend.release(id);
        }
        self.playing = false;
    }
}

impl Drop for SoundHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::SilentBackend;

    #[test]
    fn test_volume_is_clamped() {
        let engine = AudioEngine::silent();
        let mut sound = SoundHandle::new(&engine, "a.ogg", SoundOptions { looping: false, volume: 4.0 });
        assert_eq!(sound.volume(), 1.0);
        sound.set_volume(-1.0);
        assert_eq!(sound.volume(), 0.0);
        sound.set_volume(0.3);
        assert_eq!(sound.volume(), 0.3);
    }

    #[test]
    fn test_default_options_match_quiet_effects() {
        let options = SoundOptions::default();
        assert!(!options.looping);
        assert_eq!(options.volume, 0.1);
    }

    #[test]
    fn test_play_stop_toggle_flag_and_reach_backend() {
        let backend = SilentBackend::new();
        let stats = backend.stats();
        let engine = AudioEngine::new(backend);
        let mut sound = SoundHandle::new(&engine, "audio/bark.ogg", SoundOptions::default());
        let id = sound.source_id().unwrap();

        sound.play();
        assert!(sound.is_playing());
        sound.stop();
        assert!(!sound.is_playing());

        let recorded = stats.borrow()[&id].clone();
        assert_eq!(recorded.plays, 1);
        assert_eq!(recorded.stops, 1);
    }

    #[test]
    fn test_drop_releases_source() {
        let backend = SilentBackend::new();
        let stats = backend.stats();
        let engine = AudioEngine::new(backend);
        let id = {
            let sound = SoundHandle::new(&engine, "loop.ogg", SoundOptions { looping: true, volume: 0.5 });
            sound.source_id().unwrap()
        };
        assert!(stats.borrow()[&id].released);
        assert!(stats.borrow()[&id].looping);
    }

    #[test]
    fn test_released_handle_is_inert() {
        let engine = AudioEngine::silent();
        let mut sound = SoundHandle::new(&engine, "a.ogg", SoundOptions::default());
        sound.play();
        sound.release();
        sound.release();
        assert!(!sound.is_playing());
        sound.play();
        assert!(!sound.is_playing());
    }
}
