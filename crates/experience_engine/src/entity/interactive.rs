//! Entity with a placement node, an inspection panel and sounds

use super::panel::{Panel, PanelAction, PanelItemDescriptor};
use super::{Capabilities, SceneEntity};
use crate::audio::{SoundHandle, SoundOptions};
use crate::context::Context;
use crate::scene::{NodeId, SceneNode};
use std::collections::HashMap;
use std::path::Path;

/// How to build an inspection panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelOptions {
    /// Panel title
    pub name: String,
    /// Panel subtitle
    pub kind_label: String,
    /// Track an invisible box sized to the target instead of the target
    pub create_tracking_box: bool,
}

/// Scene object carrying an optional panel and a named sound registry
#[derive(Debug)]
pub struct InteractiveEntity {
    name: String,
    context: Context,
    placement: Option<NodeId>,
    panel: Option<Panel>,
    sounds: HashMap<String, SoundHandle>,
}

impl InteractiveEntity {
    /// Create an entity with nothing attached yet
    pub fn new(context: Context, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context,
            placement: None,
            panel: None,
            sounds: HashMap::new(),
        }
    }

    /// Services this entity was built with
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Model node owned by this entity
    pub fn placement(&self) -> Option<NodeId> {
        self.placement
    }

    /// Take ownership of a scene node; a previous node is removed
    pub fn set_placement(&mut self, node: NodeId) {
        if let Some(old) = self.placement.replace(node) {
            if old != node {
                self.context.scene.borrow_mut().remove(old);
            }
        }
    }

    /// Attach a panel following `target`
    ///
    /// With a tracking box, the panel follows an invisible box sized to the
    /// target's world bounds at creation time. Returns `false` when `target`
    /// is not in the scene.
    pub fn setup_panel(&mut self, target: NodeId, options: PanelOptions) -> bool {
        if self.panel.is_some() {
            log::debug!("Replacing panel of '{}'", self.name);
            self.dispose_panel();
        }

        let mut scene = self.context.scene.borrow_mut();
        let Some(bounds) = scene.world_bounds(target) else {
            log::warn!("Cannot set up panel for '{}': target not in scene", self.name);
            return false;
        };

        let proxy = options
            .create_tracking_box
            .then(|| scene.add(SceneNode::tracking_proxy(format!("{} tracking box", options.name), &bounds)));
        let followed = proxy.unwrap_or(target);
        let anchor = scene.add(SceneNode::panel_anchor(format!("{} panel", options.name), followed));
        let screen_position = scene.project_to_screen(anchor);
        drop(scene);

        self.panel = Some(Panel {
            title: options.name,
            kind_label: options.kind_label,
            anchor,
            proxy,
            target,
            screen_position,
            items: Vec::new(),
        });
        true
    }

    /// Current panel
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    /// Bind and append items; returns how many were added
    pub fn add_panel_items(&mut self, items: Vec<PanelItemDescriptor>) -> usize {
        let sounds = &self.sounds;
        let Some(panel) = self.panel.as_mut() else {
            log::warn!("'{}' has no panel; {} item(s) dropped", self.name, items.len());
            return 0;
        };
        let count = items.len();
        panel
            .items
            .extend(items.into_iter().map(|item| item.bind(|sound| sounds.contains_key(sound))));
        count
    }

    /// Replace every item
    pub fn replace_panel_items(&mut self, items: Vec<PanelItemDescriptor>) -> usize {
        if let Some(panel) = self.panel.as_mut() {
            panel.items.clear();
        }
        self.add_panel_items(items)
    }

    /// Re-project the panel anchor to screen space
    pub fn track_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let scene = self.context.scene.borrow();
        panel.screen_position = scene.project_to_screen(panel.anchor);
    }

    /// Remove the panel anchor and free the tracking box
    pub fn dispose_panel(&mut self) {
        let Some(panel) = self.panel.take() else {
            return;
        };
        let mut scene = self.context.scene.borrow_mut();
        scene.remove(panel.anchor);
        if let Some(proxy) = panel.proxy {
            scene.dispose(proxy);
        }
    }

    /// Activate item `index`, passing a slider value if any
    ///
    /// Plays the item's bound sound and performs sound, scale and custom
    /// actions. Animation actions are returned for the caller to perform.
    pub fn activate_panel_item(&mut self, index: usize, value: Option<f32>) -> Option<PanelAction> {
        let item = self.panel.as_ref()?.items.get(index).cloned();
        let Some(item) = item else {
            log::warn!("'{}' has no panel item {}", self.name, index);
            return None;
        };
        if let Some(sound) = item.sound() {
            self.play_sound(sound);
        }
        let value = value.and_then(|v| item.clamp_input(v));

        match item.action()?.clone() {
            PanelAction::PlaySound(name) => {
                self.play_sound(&name);
                None
            }
            PanelAction::StopSound(name) => {
                self.stop_sound(&name);
                None
            }
            PanelAction::SetScale => {
                match value {
                    Some(scale) => self.set_uniform_scale(scale),
                    None => log::warn!("'{}' needs a slider value to scale", item.name()),
                }
                None
            }
            PanelAction::Custom(callback) => {
                callback(value);
                None
            }
            action @ (PanelAction::PlayAnimation(_) | PanelAction::StopAnimations) => Some(action),
        }
    }

    /// Set uniform scale of the placement node
    pub fn set_uniform_scale(&mut self, scale: f32) {
        let Some(node) = self.placement else {
            return;
        };
        if let Some(node) = self.context.scene.borrow_mut().node_mut(node) {
            node.transform.set_uniform_scale(scale);
        }
    }

    /// Register a sound under `name`
    ///
    /// An existing sound with that name is stopped and released first.
    pub fn add_sound(&mut self, name: impl Into<String>, path: impl AsRef<Path>, options: SoundOptions) {
        let name = name.into();
        let handle = SoundHandle::new(&self.context.audio, path, options);
        if let Some(mut old) = self.sounds.insert(name.clone(), handle) {
            log::debug!("Sound '{}' on '{}' replaced", name, self.name);
            old.release();
        }
    }

    /// Play a registered sound; returns whether it exists
    pub fn play_sound(&mut self, name: &str) -> bool {
        match self.sounds.get_mut(name) {
            Some(sound) => {
                sound.play();
                true
            }
            None => {
                log::warn!("Sound '{}' not found on '{}'", name, self.name);
                false
            }
        }
    }

    /// Stop a registered sound; returns whether it exists
    pub fn stop_sound(&mut self, name: &str) -> bool {
        match self.sounds.get_mut(name) {
            Some(sound) => {
                sound.stop();
                true
            }
            None => {
                log::warn!("Sound '{}' not found on '{}'", name, self.name);
                false
            }
        }
    }

    /// Look up a registered sound
    pub fn sound(&self, name: &str) -> Option<&SoundHandle> {
        self.sounds.get(name)
    }

    /// Number of registered sounds
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Whether a sound is registered under `name`
    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }
}

impl SceneEntity for InteractiveEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::PLACEMENT, self.placement.is_some());
        caps.set(Capabilities::PANEL, self.panel.is_some());
        caps.set(Capabilities::SOUND, !self.sounds.is_empty());
        caps
    }

    fn update(&mut self, _delta_seconds: f32) {
        self.track_panel();
    }

    fn dispose(&mut self) {
        self.dispose_panel();
        for sound in self.sounds.values_mut() {
            sound.stop();
        }
        self.sounds.clear();
        if let Some(node) = self.placement.take() {
            self.context.scene.borrow_mut().remove(node);
        }
    }
}
