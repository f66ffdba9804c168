//! RON asset manifest
//!
//! Stands in for GLTF decoding: each model entry describes what the decoder
//! would report (bounds, mesh count, animation clips).

use experience_engine::assets::{AnimationClip, AssetError, AssetLoader, ModelResource, Resource, SourceDescriptor, SourceKind};
use experience_engine::foundation::math::Vec3;
use experience_engine::scene::Aabb;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct ClipEntry {
    name: String,
    duration: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelEntry {
    scene: String,
    min: [f32; 3],
    max: [f32; 3],
    mesh_count: usize,
    #[serde(default)]
    animations: Vec<ClipEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    models: HashMap<String, ModelEntry>,
}

/// Loader answering model sources from a manifest
#[derive(Debug, Default)]
pub struct ManifestLoader {
    manifest: Manifest,
}

impl ManifestLoader {
    /// Read a manifest file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&contents)
    }

    /// Parse manifest text
    pub fn parse(contents: &str) -> Result<Self, AssetError> {
        let manifest = ron::from_str(contents).map_err(|e| AssetError::InvalidData(e.to_string()))?;
        Ok(Self { manifest })
    }
}

impl AssetLoader for ManifestLoader {
    fn load(&mut self, source: &SourceDescriptor) -> Result<Resource, AssetError> {
        match source.kind {
            SourceKind::GltfModel => {
                let entry = self
                    .manifest
                    .models
                    .get(&source.name)
                    .ok_or_else(|| AssetError::NotFound(source.name.clone()))?;
                Ok(Resource::Model(ModelResource {
                    scene_name: entry.scene.clone(),
                    bounds: Aabb::new(Vec3::from(entry.min), Vec3::from(entry.max)),
                    mesh_count: entry.mesh_count,
                    animations: entry
                        .animations
                        .iter()
                        .map(|clip| AnimationClip::new(clip.name.clone(), clip.duration))
                        .collect(),
                }))
            }
            SourceKind::Texture | SourceKind::CubeTexture => Ok(Resource::Texture {
                path: source.path.clone(),
            }),
            SourceKind::Audio => Ok(Resource::Audio {
                path: source.path.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"(
        models: {
            "foxModel": (
                scene: "Fox",
                min: (-11.0, 0.0, -45.0),
                max: (11.0, 62.0, 66.0),
                mesh_count: 1,
                animations: [
                    (name: "Animation_Idle|Survey", duration: 3.38),
                ],
            ),
        },
    )"#;

    fn source(name: &str, kind: SourceKind) -> SourceDescriptor {
        SourceDescriptor {
            name: name.into(),
            kind,
            path: "unused".into(),
        }
    }

    #[test]
    fn test_loads_model_entry() {
        let mut loader = ManifestLoader::parse(MANIFEST).unwrap();
        let resource = loader.load(&source("foxModel", SourceKind::GltfModel)).unwrap();
        let model = resource.as_model().unwrap();
        assert_eq!(model.scene_name, "Fox");
        assert_eq!(model.bounds.max, Vec3::new(11.0, 62.0, 66.0));
        assert_eq!(model.animations[0].name, "Animation_Idle|Survey");
    }

    #[test]
    fn test_unknown_model_and_other_kinds() {
        let mut loader = ManifestLoader::parse(MANIFEST).unwrap();
        assert!(matches!(
            loader.load(&source("catModel", SourceKind::GltfModel)),
            Err(AssetError::NotFound(_))
        ));
        assert!(matches!(
            loader.load(&source("grassColor", SourceKind::Texture)),
            Ok(Resource::Texture { .. })
        ));
    }

    #[test]
    fn test_invalid_manifest() {
        assert!(matches!(ManifestLoader::parse("(models: 3)"), Err(AssetError::InvalidData(_))));
    }
}
