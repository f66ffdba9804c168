//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Enabled with the `rodio` cargo feature.
//!
//! # Example
//!
//! ```no_run
//! use experience_engine::audio::backend::AudioBackend;
//! use experience_engine::audio::backend::rodio_backend::RodioBackend;
//! use std::path::Path;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize().unwrap();
//!
//! let id = backend.load(Path::new("audio/menuChange.ogg"), false, 0.1).unwrap();
//! backend.play(id).unwrap();
//! backend.shutdown();
//! ```

use super::{AudioBackend, SourceId};
use crate::audio::AudioError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A loaded source and its live voices
struct LoadedSource {
    path: PathBuf,
    looping: bool,
    volume: f32,
    voices: Vec<Sink>,
}

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Loaded sources
    sources: HashMap<SourceId, LoadedSource>,
    /// Next source ID for handle generation
    next_id: u32,
}

impl RodioBackend {
    /// Create a new, uninitialized Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            sources: HashMap::new(),
            next_id: 0,
        }
    }

    /// Open the default output device
    pub fn initialize(&mut self) -> Result<(), AudioError> {
        if self.stream_handle.is_some() {
            return Ok(());
        }

        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    /// Check if backend is initialized
    pub fn is_initialized(&self) -> bool {
        self.stream_handle.is_some()
    }

    /// Stop every voice and close the output device
    pub fn shutdown(&mut self) {
        if !self.is_initialized() {
            return;
        }
        for source in self.sources.values_mut() {
            for voice in source.voices.drain(..) {
                voice.stop();
            }
        }
        self.stream_handle = None;
        self._output_stream = None;
        log::info!("Rodio audio backend shutdown");
    }

    fn next_id(&mut self) -> SourceId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SourceId::new(id, 0)
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
        let file = File::open(path)
            .map_err(|e| AudioError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| AudioError::LoadFailed(format!("{}: {}", path.display(), e)))
    }
}

impl AudioBackend for RodioBackend {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn load(&mut self, path: &Path, looping: bool, volume: f32) -> Result<SourceId, AudioError> {
        // Decode once up front so a bad file is reported at registration time
        Self::decode(path)?;
        let id = self.next_id();
        self.sources.insert(
            id,
            LoadedSource {
                path: path.to_path_buf(),
                looping,
                volume,
                voices: Vec::new(),
            },
        );
        Ok(id)
    }

    fn play(&mut self, id: SourceId) -> Result<(), AudioError> {
        let stream_handle = self.stream_handle.as_ref().ok_or(AudioError::BackendNotInitialized)?;
        let source = self.sources.get_mut(&id).ok_or(AudioError::UnknownSource)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        let decoded = Self::decode(&source.path)?;
        if source.looping {
            sink.append(decoded.repeat_infinite());
        } else {
            sink.append(decoded);
        }
        sink.set_volume(source.volume);
        source.voices.push(sink);
        Ok(())
    }

    fn stop(&mut self, id: SourceId) -> Result<(), AudioError> {
        let source = self.sources.get_mut(&id).ok_or(AudioError::UnknownSource)?;
        for voice in source.voices.drain(..) {
            voice.stop();
        }
        Ok(())
    }

    fn set_volume(&mut self, id: SourceId, volume: f32) -> Result<(), AudioError> {
        let source = self.sources.get_mut(&id).ok_or(AudioError::UnknownSource)?;
        source.volume = volume;
        for voice in &source.voices {
            voice.set_volume(volume);
        }
        Ok(())
    }

    fn release(&mut self, id: SourceId) {
        if let Some(mut source) = self.sources.remove(&id) {
            for voice in source.voices.drain(..) {
                voice.stop();
            }
        }
    }

    fn is_playing(&self, id: SourceId) -> bool {
        self.sources
            .get(&id)
            .is_some_and(|source| source.voices.iter().any(|voice| !voice.is_paused() && !voice.empty()))
    }

    fn update(&mut self) {
        // Remove finished voices
        for source in self.sources.values_mut() {
            source.voices.retain(|voice| !voice.empty());
        }
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}
