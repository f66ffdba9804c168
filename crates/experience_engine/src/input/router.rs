//! Key to animation command routing

use super::{AnimationCommand, Key, KeyBinding};
use crate::entity::AnimatedEntity;
use std::collections::HashMap;

/// Maps key presses to animation commands on a target entity
///
/// The target is supplied per key press because it may not exist yet: an
/// absent target drops the key.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    bindings: HashMap<Key, AnimationCommand>,
    disposed: bool,
}

impl InputRouter {
    /// Build the lookup table; unparseable key names are logged and skipped
    pub fn new(bindings: &[KeyBinding]) -> Self {
        let mut table = HashMap::new();
        for binding in bindings {
            for name in &binding.keys {
                match name.parse::<Key>() {
                    Ok(key) => {
                        if let Some(previous) = table.insert(key, binding.command.clone()) {
                            log::warn!("Key '{}' rebound from {:?} to {:?}", key, previous, binding.command);
                        }
                    }
                    Err(e) => log::warn!("Skipping binding: {}", e),
                }
            }
        }
        Self {
            bindings: table,
            disposed: false,
        }
    }

    /// Command bound to `key`
    pub fn command_for(&self, key: &Key) -> Option<&AnimationCommand> {
        self.bindings.get(key)
    }

    /// Apply the command bound to `key` to `target`
    ///
    /// Returns the command issued, or `None` when the key is unbound, the
    /// router is disposed, or there is no target.
    pub fn handle_key(&self, key: &Key, target: Option<&mut AnimatedEntity>) -> Option<AnimationCommand> {
        if self.disposed {
            return None;
        }
        let command = self.bindings.get(key)?;
        let Some(entity) = target else {
            log::trace!("Key '{}' dropped: no target yet", key);
            return None;
        };
        match command {
            AnimationCommand::Play(name) => {
                entity.play_animation(name, entity.fade_duration());
            }
            AnimationCommand::Stop => {
                entity.stop_animations(entity.stop_fade_duration());
            }
        }
        Some(command.clone())
    }

    /// Stop handling keys; idempotent
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::debug!("Input router disposed");
        }
        self.disposed = true;
    }

    /// Whether [`Self::dispose`] was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AnimationClip, ModelResource, Resource, ResourceTable, SourceDescriptor, SourceKind};
    use crate::audio::AudioEngine;
    use crate::context::Context;
    use crate::entity::AnimatedEntityOptions;
    use crate::foundation::math::Vec3;
    use crate::input::default_bindings;
    use crate::scene::{Aabb, SimpleSceneGraph};
    use std::rc::Rc;

    fn fox(table: Rc<ResourceTable>) -> AnimatedEntity {
        let context = Context::new(SimpleSceneGraph::new().into_shared(), table, AudioEngine::silent());
        AnimatedEntity::new(
            context,
            AnimatedEntityOptions {
                resource_name: Some("foxModel".into()),
                name: "Fox".into(),
                ..AnimatedEntityOptions::default()
            },
        )
    }

    fn fox_table() -> Rc<ResourceTable> {
        Rc::new(ResourceTable::new(vec![SourceDescriptor {
            name: "foxModel".into(),
            kind: SourceKind::GltfModel,
            path: "models/Fox/glTF/Fox.gltf".into(),
        }]))
    }

    fn load_fox(table: &ResourceTable) {
        table.source_loaded(
            "foxModel",
            Resource::Model(ModelResource {
                scene_name: "Fox".into(),
                bounds: Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)),
                mesh_count: 1,
                animations: vec![
                    AnimationClip::new("Animation_Idle|Survey", 3.4),
                    AnimationClip::new("Animation_Walking|Walk", 0.7),
                    AnimationClip::new("Animation_Running|Run", 0.5),
                ],
            }),
        );
    }

    #[test]
    fn test_key_before_target_is_dropped() {
        let table = fox_table();
        let router = InputRouter::new(&default_bindings());
        let mut target: Option<AnimatedEntity> = None;

        assert_eq!(router.handle_key(&Key::Character('w'), target.as_mut()), None);

        load_fox(&table);
        assert!(table.is_ready());
        target = Some(fox(table));
        assert_eq!(
            router.handle_key(&Key::Character('w'), target.as_mut()),
            Some(AnimationCommand::Play("walking".into()))
        );
        assert_eq!(target.unwrap().current_animation(), Some("walking"));
    }

    #[test]
    fn test_default_table() {
        let table = fox_table();
        load_fox(&table);
        let mut fox = fox(table);
        let router = InputRouter::new(&default_bindings());

        router.handle_key(&Key::Character('3'), Some(&mut fox));
        assert_eq!(fox.current_animation(), Some("running"));
        router.handle_key(&Key::Character('S'), Some(&mut fox));
        assert_eq!(fox.current_animation(), Some("idle"));
        assert_eq!(router.handle_key(&Key::Character('x'), Some(&mut fox)), None);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let table = fox_table();
        load_fox(&table);
        let mut fox = fox(table);
        let mut router = InputRouter::new(&default_bindings());
        router.dispose();
        router.dispose();
        assert!(router.is_disposed());
        assert_eq!(router.handle_key(&Key::Character('2'), Some(&mut fox)), None);
        assert_eq!(fox.current_animation(), Some("idle"));
    }

    #[test]
    fn test_bad_key_names_are_skipped() {
        let bindings = vec![KeyBinding {
            keys: vec!["Hyper".into(), "j".into()],
            command: AnimationCommand::Stop,
        }];
        let router = InputRouter::new(&bindings);
        assert_eq!(router.command_for(&Key::Character('j')), Some(&AnimationCommand::Stop));
        assert_eq!(router.bindings.len(), 1);
    }
}
