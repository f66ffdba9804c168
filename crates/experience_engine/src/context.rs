//! Shared services handed to every entity
//!
//! One [`Context`] is built per [`crate::experience::Experience`] and cloned
//! into the entities it creates. There is no process-wide instance.

use crate::assets::ResourceTable;
use crate::audio::AudioEngine;
use crate::scene::{SharedSceneGraph, SimpleSceneGraph};
use std::fmt;
use std::rc::Rc;

/// Scene graph, resource table and audio engine of one experience
#[derive(Clone)]
pub struct Context {
    /// Scene the entities attach to
    pub scene: SharedSceneGraph,
    /// Loaded resources
    pub resources: Rc<ResourceTable>,
    /// Audio engine sounds are loaded into
    pub audio: AudioEngine,
}

impl Context {
    /// Bundle the services
    pub fn new(scene: SharedSceneGraph, resources: Rc<ResourceTable>, audio: AudioEngine) -> Self {
        Self {
            scene,
            resources,
            audio,
        }
    }

    /// In-memory scene, empty resource table and silent audio
    pub fn headless() -> Self {
        Self::new(
            SimpleSceneGraph::new().into_shared(),
            Rc::new(ResourceTable::default()),
            AudioEngine::silent(),
        )
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scene_nodes", &self.scene.borrow().len())
            .field("resources", &self.resources)
            .field("audio", &self.audio)
            .finish()
    }
}
