//! Animated, inspectable entity

use super::animation::{display_name, AnimationMixer, FadeCurve, Transition};
use super::interactive::{InteractiveEntity, PanelOptions};
use super::panel::{PanelAction, PanelItemDescriptor};
use super::{Capabilities, SceneEntity};
use crate::audio::SoundOptions;
use crate::context::Context;
use crate::foundation::math::Vec3;
use crate::scene::{NodeKind, SceneNode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model scale, uniform or per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityScale {
    /// Same factor on every axis
    Uniform(f32),
    /// Per-axis factors
    Vector(Vec3),
}

impl EntityScale {
    /// Per-axis factors
    pub fn to_vector(self) -> Vec3 {
        match self {
            Self::Uniform(s) => Vec3::new(s, s, s),
            Self::Vector(v) => v,
        }
    }
}

impl Default for EntityScale {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

/// Construction options for [`AnimatedEntity`]
#[derive(Debug, Clone)]
pub struct AnimatedEntityOptions {
    /// Model resource to look up; required
    pub resource_name: Option<String>,
    /// Display name
    pub name: String,
    /// Display type
    pub kind_label: String,
    /// Model scale
    pub scale: EntityScale,
    /// World position
    pub position: Vec3,
    /// Whether every mesh casts shadows
    pub cast_shadow: bool,
    /// Action made current at construction; first clip when absent or unknown
    pub default_animation: Option<String>,
    /// Crossfade used by panel links and the input router
    pub fade_duration: f32,
    /// Crossfade used when returning to the default action
    pub stop_fade_duration: f32,
    /// Weight curve of every crossfade
    pub fade_curve: FadeCurve,
    /// Sounds registered before panel items are bound
    pub sounds: Vec<(String, PathBuf, SoundOptions)>,
    /// Items appended after the generated animation links
    pub extra_items: Vec<PanelItemDescriptor>,
}

impl Default for AnimatedEntityOptions {
    fn default() -> Self {
        Self {
            resource_name: None,
            name: "Object".to_string(),
            kind_label: "Animated Object".to_string(),
            scale: EntityScale::default(),
            position: Vec3::zeros(),
            cast_shadow: true,
            default_animation: None,
            fade_duration: 1.0,
            stop_fade_duration: 0.35,
            fade_curve: FadeCurve::default(),
            sounds: Vec::new(),
            extra_items: Vec::new(),
        }
    }
}

/// Interactive entity with a crossfading animation mixer
#[derive(Debug)]
pub struct AnimatedEntity {
    base: InteractiveEntity,
    mixer: AnimationMixer,
    default_animation: Option<String>,
    fade_duration: f32,
    stop_fade_duration: f32,
}

impl AnimatedEntity {
    /// Build the entity from a model resource in `context`
    ///
    /// A missing resource name or resource is logged and yields an inert
    /// entity without placement, panel or animations.
    pub fn new(context: Context, options: AnimatedEntityOptions) -> Self {
        let mut entity = Self {
            base: InteractiveEntity::new(context, options.name.clone()),
            mixer: AnimationMixer::default(),
            default_animation: None,
            fade_duration: options.fade_duration,
            stop_fade_duration: options.stop_fade_duration,
        };

        let Some(resource_name) = options.resource_name.as_deref() else {
            log::error!("'{}' needs a resource name", options.name);
            return entity;
        };
        let model = match entity.base.context().resources.model(resource_name) {
            Ok(model) => model,
            Err(e) => {
                log::error!("'{}' cannot load its model: {}", options.name, e);
                return entity;
            }
        };

        let mut node = SceneNode::model(&model.scene_name, model.bounds, model.mesh_count);
        node.kind = NodeKind::Model {
            mesh_count: model.mesh_count,
            cast_shadow: options.cast_shadow,
        };
        node.transform.position = options.position;
        node.transform.scale = options.scale.to_vector();
        let node = entity.base.context().scene.borrow_mut().add(node);
        entity.base.set_placement(node);

        for (name, path, sound_options) in &options.sounds {
            entity.base.add_sound(name.clone(), path, *sound_options);
        }

        entity.mixer = AnimationMixer::new(&model.animations, options.fade_curve);
        entity.default_animation = entity.resolve_default(options.default_animation.as_deref());
        if let Some(default) = entity.default_animation.clone() {
            entity.mixer.start(&default);
        }

        let panel = PanelOptions {
            name: options.name.clone(),
            kind_label: options.kind_label.clone(),
            create_tracking_box: true,
        };
        if entity.base.setup_panel(node, panel) {
            let mut items = entity.animation_items();
            items.extend(options.extra_items);
            entity.base.add_panel_items(items);
        }
        log::info!(
            "'{}' ready with {} animation(s)",
            options.name,
            entity.mixer.names().len()
        );
        entity
    }

    fn resolve_default(&self, requested: Option<&str>) -> Option<String> {
        let first = self.mixer.names().first().cloned();
        match requested.map(str::to_lowercase) {
            Some(name) if self.mixer.action(&name).is_some() => Some(name),
            Some(name) => {
                log::warn!("Default animation '{}' not found on '{}'; using the first clip", name, self.name());
                first
            }
            None => first,
        }
    }

    fn animation_items(&self) -> Vec<PanelItemDescriptor> {
        if self.mixer.is_empty() {
            return Vec::new();
        }
        let mut items = vec![
            PanelItemDescriptor::divider(),
            PanelItemDescriptor::label("Animation"),
            PanelItemDescriptor::divider(),
        ];
        items.extend(self.mixer.names().iter().map(|name| {
            let display = display_name(name);
            PanelItemDescriptor::link(format!("Play {display}"), PanelAction::PlayAnimation(name.clone()))
                .with_value(display)
        }));
        items
    }

    /// Composed interactive entity
    pub fn interactive(&self) -> &InteractiveEntity {
        &self.base
    }

    /// Composed interactive entity, mutably
    pub fn interactive_mut(&mut self) -> &mut InteractiveEntity {
        &mut self.base
    }

    /// Animation mixer
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Registered animation names in registration order
    pub fn animation_names(&self) -> &[String] {
        self.mixer.names()
    }

    /// Current action name
    pub fn current_animation(&self) -> Option<&str> {
        self.mixer.current()
    }

    /// Action returned to by [`Self::stop_animations`]
    pub fn default_animation(&self) -> Option<&str> {
        self.default_animation.as_deref()
    }

    /// Configured crossfade duration
    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }

    /// Configured return-to-default duration
    pub fn stop_fade_duration(&self) -> f32 {
        self.stop_fade_duration
    }

    /// Crossfade to `name` over `fade_duration` seconds
    pub fn play_animation(&mut self, name: &str, fade_duration: f32) -> Transition {
        let transition = self.mixer.transition_to(name, fade_duration);
        match transition {
            Transition::Started => log::debug!("'{}' crossfading to '{}'", self.name(), name),
            Transition::AlreadyCurrent => {}
            Transition::Unknown => log::warn!("Animation '{}' not found on '{}'", name, self.name()),
            Transition::NoAnimations => log::warn!("'{}' has no animations", self.name()),
        }
        transition
    }

    /// Crossfade back to the default action
    pub fn stop_animations(&mut self, fade_duration: f32) -> Transition {
        match self.default_animation.clone() {
            Some(default) => self.play_animation(&default, fade_duration),
            None => {
                log::warn!("'{}' has no animations", self.name());
                Transition::NoAnimations
            }
        }
    }

    /// Activate panel item `index`, performing animation actions here
    pub fn activate_panel_item(&mut self, index: usize, value: Option<f32>) {
        match self.base.activate_panel_item(index, value) {
            Some(PanelAction::PlayAnimation(name)) => {
                self.play_animation(&name, self.fade_duration);
            }
            Some(PanelAction::StopAnimations) => {
                self.stop_animations(self.stop_fade_duration);
            }
            _ => {}
        }
    }
}

impl SceneEntity for AnimatedEntity {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = self.base.capabilities();
        caps.set(Capabilities::ANIMATION, !self.mixer.is_empty());
        caps
    }

    fn update(&mut self, delta_seconds: f32) {
        let delta = if delta_seconds.is_finite() && delta_seconds >= 0.0 {
            delta_seconds
        } else {
            log::warn!("'{}' ignoring invalid delta {}", self.name(), delta_seconds);
            0.0
        };
        self.mixer.update(delta);
        self.base.update(delta);
    }

    fn dispose(&mut self) {
        self.mixer.stop_all();
        self.base.dispose();
    }
}
