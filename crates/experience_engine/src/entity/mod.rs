//! Scene entities
//!
//! Entities are built by composition: an [`AnimatedEntity`] contains an
//! [`InteractiveEntity`], which owns the placement node, the inspection
//! panel and the sound registry.

mod animated;
mod animation;
mod interactive;
mod panel;

pub use animated::{AnimatedEntity, AnimatedEntityOptions, EntityScale};
pub use animation::{
    display_name, normalize_animation_name, AnimationAction, AnimationMixer, FadeCurve, Transition,
};
pub use interactive::{InteractiveEntity, PanelOptions};
pub use panel::{Panel, PanelAction, PanelItem, PanelItemDescriptor, PanelItemKind, PanelValue};

use bitflags::bitflags;

bitflags! {
    /// What an entity can do
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Placed in the scene
        const PLACEMENT = 1 << 0;
        /// Has an inspection panel
        const PANEL = 1 << 1;
        /// Has registered sounds
        const SOUND = 1 << 2;
        /// Has animation clips
        const ANIMATION = 1 << 3;
    }
}

/// Behaviour shared by everything the world updates each frame
pub trait SceneEntity {
    /// Display name
    fn name(&self) -> &str;

    /// Current capabilities
    fn capabilities(&self) -> Capabilities;

    /// Advance by `delta_seconds`
    fn update(&mut self, delta_seconds: f32);

    /// Release scene nodes and sounds; safe to call repeatedly
    fn dispose(&mut self);
}
