//! Inspection panel items
//!
//! Items are declared as [`PanelItemDescriptor`]s, then bound against the
//! owning entity into immutable [`PanelItem`]s. Binding resolves the sound
//! reference once so activation never looks it up by string again.

use crate::scene::NodeId;
use crate::foundation::math::Vec2;
use std::fmt;
use std::rc::Rc;

/// Visual kind of a panel row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelItemKind {
    /// Horizontal rule
    Divider,
    /// Static text
    Label,
    /// Clickable text
    Link,
    /// Numeric slider
    Slider {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Increment
        step: f32,
    },
}

/// Displayed value of an item
#[derive(Debug, Clone, PartialEq)]
pub enum PanelValue {
    /// Text shown beside the name
    Text(String),
    /// Slider position
    Number(f32),
}

/// What activating an item does
#[derive(Clone)]
pub enum PanelAction {
    /// Crossfade to a named animation
    PlayAnimation(String),
    /// Fade every animation out
    StopAnimations,
    /// Play a registered sound
    PlaySound(String),
    /// Stop a registered sound
    StopSound(String),
    /// Apply the slider value as uniform model scale
    SetScale,
    /// Arbitrary callback receiving the slider value, if any
    Custom(Rc<dyn Fn(Option<f32>)>),
}

impl fmt::Debug for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayAnimation(name) => f.debug_tuple("PlayAnimation").field(name).finish(),
            Self::StopAnimations => f.write_str("StopAnimations"),
            Self::PlaySound(name) => f.debug_tuple("PlaySound").field(name).finish(),
            Self::StopSound(name) => f.debug_tuple("StopSound").field(name).finish(),
            Self::SetScale => f.write_str("SetScale"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Unbound panel item declaration
#[derive(Debug, Clone)]
pub struct PanelItemDescriptor {
    kind: PanelItemKind,
    name: String,
    value: Option<PanelValue>,
    action: Option<PanelAction>,
    sound: Option<String>,
}

impl PanelItemDescriptor {
    /// Horizontal rule
    pub fn divider() -> Self {
        Self::new(PanelItemKind::Divider, "")
    }

    /// Static text
    pub fn label(name: impl Into<String>) -> Self {
        Self::new(PanelItemKind::Label, name)
    }

    /// Clickable text running `action`
    pub fn link(name: impl Into<String>, action: PanelAction) -> Self {
        Self {
            action: Some(action),
            ..Self::new(PanelItemKind::Link, name)
        }
    }

    /// Slider over `[min, max]` starting at `value`
    pub fn slider(name: impl Into<String>, min: f32, max: f32, step: f32, value: f32, action: PanelAction) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: Some(PanelValue::Number(value.clamp(min, max))),
            action: Some(action),
            ..Self::new(PanelItemKind::Slider { min, max, step }, name)
        }
    }

    fn new(kind: PanelItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            value: None,
            action: None,
            sound: None,
        }
    }

    /// Show `value` beside the name
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(PanelValue::Text(value.into()));
        self
    }

    /// Play the named sound whenever the item activates
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the sound reference with `has_sound`
    ///
    /// An unknown sound is dropped from the item with a warning.
    pub fn bind(self, has_sound: impl Fn(&str) -> bool) -> PanelItem {
        let sound = match self.sound {
            Some(sound) if has_sound(&sound) => Some(sound),
            Some(sound) => {
                log::warn!("Panel item '{}' references unknown sound '{}'", self.name, sound);
                None
            }
            None => None,
        };
        PanelItem {
            kind: self.kind,
            name: self.name,
            value: self.value,
            action: self.action,
            sound,
        }
    }
}

/// Bound, immutable panel item
#[derive(Debug, Clone)]
pub struct PanelItem {
    kind: PanelItemKind,
    name: String,
    value: Option<PanelValue>,
    action: Option<PanelAction>,
    sound: Option<String>,
}

impl PanelItem {
    /// Visual kind
    pub fn kind(&self) -> PanelItemKind {
        self.kind
    }

    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Displayed value
    pub fn value(&self) -> Option<&PanelValue> {
        self.value.as_ref()
    }

    /// Activation behaviour
    pub fn action(&self) -> Option<&PanelAction> {
        self.action.as_ref()
    }

    /// Sound played on activation
    pub fn sound(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    /// Slider input clamped to the item's range; `None` for non-sliders
    pub fn clamp_input(&self, value: f32) -> Option<f32> {
        match self.kind {
            PanelItemKind::Slider { min, max, .. } if value.is_finite() => Some(value.clamp(min, max)),
            _ => None,
        }
    }
}

/// Floating inspection panel anchored to an entity
#[derive(Debug, Clone)]
pub struct Panel {
    /// Title (entity name)
    pub title: String,
    /// Subtitle (entity type)
    pub kind_label: String,
    /// Anchor node in the scene
    pub anchor: NodeId,
    /// Invisible tracking box, when one was created
    pub proxy: Option<NodeId>,
    /// Node the anchor follows
    pub target: NodeId,
    /// Last projected screen position
    pub screen_position: Option<Vec2>,
    pub(crate) items: Vec<PanelItem>,
}

impl Panel {
    /// Bound items in display order
    pub fn items(&self) -> &[PanelItem] {
        &self.items
    }

    /// Item names in display order
    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(PanelItem::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_drops_unknown_sound() {
        let item = PanelItemDescriptor::link("Bark", PanelAction::PlaySound("bark".into()))
            .with_sound("whistle")
            .bind(|name| name == "bark");
        assert_eq!(item.sound(), None);
        assert!(matches!(item.action(), Some(PanelAction::PlaySound(s)) if s == "bark"));
    }

    #[test]
    fn test_bind_keeps_known_sound() {
        let item = PanelItemDescriptor::label("Animation").with_sound("click").bind(|_| true);
        assert_eq!(item.sound(), Some("click"));
        assert_eq!(item.kind(), PanelItemKind::Label);
    }

    #[test]
    fn test_slider_clamps() {
        let item = PanelItemDescriptor::slider("Fox Scale", 0.1, 0.01, 0.001, 0.5, PanelAction::SetScale)
            .bind(|_| false);
        assert_eq!(item.kind(), PanelItemKind::Slider { min: 0.01, max: 0.1, step: 0.001 });
        assert_eq!(item.value(), Some(&PanelValue::Number(0.1)));
        assert_eq!(item.clamp_input(-3.0), Some(0.01));
        assert_eq!(item.clamp_input(f32::NAN), None);
        assert_eq!(PanelItemDescriptor::divider().bind(|_| false).clamp_input(1.0), None);
    }
}
