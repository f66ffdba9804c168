//! Asset resources
//!
//! Decoding (GLTF, textures, audio) belongs to an external [`AssetLoader`].
//! The core only keeps the loaded results in a [`ResourceTable`] keyed by
//! symbolic name and waits for its one-time `ready` notification.

mod resource_table;

pub use resource_table::ResourceTable;

use crate::scene::Aabb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Asset errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// IO error while reading an asset or manifest
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Named resource is not in the table
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Loader could not produce the resource
    #[error("Failed to load '{name}': {reason}")]
    LoadFailed {
        /// Source name
        name: String,
        /// Loader message
        reason: String,
    },

    /// Data was malformed
    #[error("Invalid asset data: {0}")]
    InvalidData(String),
}

/// Kind of source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    /// GLTF model with optional animation clips
    GltfModel,
    /// Single texture
    Texture,
    /// Six-face cube texture
    CubeTexture,
    /// Audio file
    Audio,
}

/// One entry of the asset source list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Symbolic name used for lookups
    pub name: String,
    /// Source kind
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// File path(s)
    pub path: PathBuf,
}

/// One named, loopable motion clip
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name as authored
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
}

impl AnimationClip {
    /// Create a clip description
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Loaded model bundle: scene description plus animation clips
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResource {
    /// Root node name
    pub scene_name: String,
    /// Local-space bounds of the whole model
    pub bounds: Aabb,
    /// Number of meshes
    pub mesh_count: usize,
    /// Animation clips in authoring order
    pub animations: Vec<AnimationClip>,
}

/// A loaded resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Model bundle
    Model(ModelResource),
    /// Texture reference
    Texture {
        /// Path the texture came from
        path: PathBuf,
    },
    /// Audio reference
    Audio {
        /// Path the audio came from
        path: PathBuf,
    },
}

impl Resource {
    /// The model bundle, if this is one
    pub fn as_model(&self) -> Option<&ModelResource> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// External collaborator that decodes a source
pub trait AssetLoader {
    /// Load one source
    fn load(&mut self, source: &SourceDescriptor) -> Result<Resource, AssetError>;
}
