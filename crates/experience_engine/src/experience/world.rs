//! Entities built once resources are ready

use crate::config::EntityConfig;
use crate::context::Context;
use crate::entity::{AnimatedEntity, SceneEntity};

/// Live entities of the experience
#[derive(Debug, Default)]
pub struct World {
    entities: Vec<AnimatedEntity>,
    input_target: Option<usize>,
}

impl World {
    /// Build every configured entity
    ///
    /// The keyboard drives `input_target` by name, or the first entity.
    pub fn build(context: &Context, entities: &[EntityConfig], input_target: Option<&str>, default_volume: f32) -> Self {
        let entities: Vec<AnimatedEntity> = entities
            .iter()
            .map(|config| AnimatedEntity::new(context.clone(), config.to_options(default_volume)))
            .collect();

        let input_target = match input_target {
            Some(name) => {
                let index = entities.iter().position(|entity| entity.name() == name);
                if index.is_none() {
                    log::warn!("Input target '{}' not found; keyboard stays inert", name);
                }
                index
            }
            None => (!entities.is_empty()).then_some(0),
        };

        Self {
            entities,
            input_target,
        }
    }

    /// Entities in build order
    pub fn entities(&self) -> &[AnimatedEntity] {
        &self.entities
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&AnimatedEntity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    /// Look up an entity by name, mutably
    pub fn entity_mut(&mut self, name: &str) -> Option<&mut AnimatedEntity> {
        self.entities.iter_mut().find(|entity| entity.name() == name)
    }

    /// Entity the keyboard drives
    pub fn input_target_mut(&mut self) -> Option<&mut AnimatedEntity> {
        self.input_target.and_then(|index| self.entities.get_mut(index))
    }

    /// Whether nothing was built
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Advance every entity
    pub fn update(&mut self, delta_seconds: f32) {
        for entity in &mut self.entities {
            entity.update(delta_seconds);
        }
    }

    /// Dispose every entity and forget them
    pub fn dispose(&mut self) {
        for entity in &mut self.entities {
            entity.dispose();
        }
        self.entities.clear();
        self.input_target = None;
    }
}
