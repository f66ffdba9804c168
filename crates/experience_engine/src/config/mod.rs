//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::assets::SourceDescriptor;
use crate::audio::SoundOptions;
use crate::entity::{AnimatedEntityOptions, EntityScale, FadeCurve, PanelAction, PanelItemDescriptor};
use crate::foundation::math::Vec3;
use crate::input::{default_bindings, KeyBinding};
use crate::state::AppState;
use crate::ui::{default_menu_options, MenuOption, MenuSounds};
use std::path::{Path, PathBuf};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level experience configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Start screen title
    pub title: String,
    /// State the machine starts in
    pub starting_state: AppState,
    /// RON asset manifest describing model bundles
    pub manifest: Option<PathBuf>,
    /// Sources the resource table waits for
    pub sources: Vec<SourceDescriptor>,
    /// Animated entities built once resources are ready
    pub entities: Vec<EntityConfig>,
    /// Entity the keyboard drives; the first entity when absent
    pub input_target: Option<String>,
    /// Key to animation command table
    pub bindings: Vec<KeyBinding>,
    /// Start screen menu
    pub menu: MenuConfig,
    /// Audio settings
    pub audio: AudioSettings,
    /// Frames per second of the app loop
    pub frame_rate: f32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            title: "Fox".to_string(),
            starting_state: AppState::Loading,
            manifest: None,
            sources: Vec::new(),
            entities: Vec::new(),
            input_target: None,
            bindings: default_bindings(),
            menu: MenuConfig::default(),
            audio: AudioSettings::default(),
            frame_rate: 60.0,
        }
    }
}

impl Config for ExperienceConfig {}

impl ExperienceConfig {
    /// Seconds per frame at the configured rate
    pub fn frame_delta(&self) -> f32 {
        if self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            1.0 / 60.0
        }
    }
}

/// Start screen menu configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Options in display order
    pub options: Vec<MenuOption>,
    /// Selection and activation sounds
    pub sounds: MenuSounds,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            options: default_menu_options(),
            sounds: MenuSounds::default(),
        }
    }
}

/// Audio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Use the platform output device when available
    pub enabled: bool,
    /// Volume of sounds that do not set one
    pub default_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_volume: 0.1,
        }
    }
}

/// One entity sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Registry name
    pub name: String,
    /// Audio file
    pub path: PathBuf,
    /// Restart when finished
    #[serde(default)]
    pub looping: bool,
    /// Volume; the audio default when absent
    #[serde(default)]
    pub volume: Option<f32>,
}

/// What a configured link does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAction {
    /// Crossfade to an animation
    PlayAnimation(String),
    /// Return to the default animation
    StopAnimations,
    /// Play a sound
    PlaySound(String),
    /// Stop a sound
    StopSound(String),
}

/// Extra panel row appended after the generated animation links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelItemConfig {
    /// Horizontal rule
    Divider,
    /// Static text
    Label {
        /// Text
        name: String,
    },
    /// Clickable text
    Link {
        /// Text
        name: String,
        /// Behaviour
        action: LinkAction,
        /// Sound bound to activation
        #[serde(default)]
        sound: Option<String>,
    },
    /// Slider rescaling the model
    ScaleSlider {
        /// Text
        name: String,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
        /// Increment
        step: f32,
        /// Initial value
        value: f32,
        /// Sound bound to activation
        #[serde(default)]
        sound: Option<String>,
    },
}

impl PanelItemConfig {
    /// Unbound item for this row
    pub fn to_descriptor(&self) -> PanelItemDescriptor {
        let (item, sound) = match self {
            Self::Divider => (PanelItemDescriptor::divider(), None),
            Self::Label { name } => (PanelItemDescriptor::label(name.clone()), None),
            Self::Link { name, action, sound } => {
                let action = match action {
                    LinkAction::PlayAnimation(clip) => PanelAction::PlayAnimation(clip.clone()),
                    LinkAction::StopAnimations => PanelAction::StopAnimations,
                    LinkAction::PlaySound(s) => PanelAction::PlaySound(s.clone()),
                    LinkAction::StopSound(s) => PanelAction::StopSound(s.clone()),
                };
                (PanelItemDescriptor::link(name.clone(), action), sound.as_ref())
            }
            Self::ScaleSlider {
                name,
                min,
                max,
                step,
                value,
                sound,
            } => (
                PanelItemDescriptor::slider(name.clone(), *min, *max, *step, *value, PanelAction::SetScale),
                sound.as_ref(),
            ),
        };
        match sound {
            Some(sound) => item.with_sound(sound.clone()),
            None => item,
        }
    }
}

/// Animated entity definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Model resource name
    pub resource_name: Option<String>,
    /// Display name
    pub name: String,
    /// Display type
    #[serde(rename = "type")]
    pub kind_label: String,
    /// Uniform factor or `[x, y, z]`
    pub scale: EntityScale,
    /// World position
    pub position: Vec3,
    /// Whether meshes cast shadows
    pub cast_shadow: bool,
    /// Initial animation
    pub default_animation: Option<String>,
    /// Crossfade duration in seconds
    pub fade_duration: f32,
    /// Return-to-default duration in seconds
    pub stop_fade_duration: f32,
    /// Crossfade weight curve
    pub fade_curve: FadeCurve,
    /// Sounds registered on the entity
    pub sounds: Vec<SoundConfig>,
    /// Extra panel rows
    pub panel_items: Vec<PanelItemConfig>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        let options = AnimatedEntityOptions::default();
        Self {
            resource_name: None,
            name: options.name,
            kind_label: options.kind_label,
            scale: options.scale,
            position: options.position,
            cast_shadow: options.cast_shadow,
            default_animation: None,
            fade_duration: options.fade_duration,
            stop_fade_duration: options.stop_fade_duration,
            fade_curve: options.fade_curve,
            sounds: Vec::new(),
            panel_items: Vec::new(),
        }
    }
}

impl EntityConfig {
    /// Construction options, filling sound volumes from `default_volume`
    pub fn to_options(&self, default_volume: f32) -> AnimatedEntityOptions {
        AnimatedEntityOptions {
            resource_name: self.resource_name.clone(),
            name: self.name.clone(),
            kind_label: self.kind_label.clone(),
            scale: self.scale,
            position: self.position,
            cast_shadow: self.cast_shadow,
            default_animation: self.default_animation.clone(),
            fade_duration: self.fade_duration,
            stop_fade_duration: self.stop_fade_duration,
            fade_curve: self.fade_curve,
            sounds: self
                .sounds
                .iter()
                .map(|sound| {
                    let options = SoundOptions {
                        looping: sound.looping,
                        volume: sound.volume.unwrap_or(default_volume),
                    };
                    (sound.name.clone(), sound.path.clone(), options)
                })
                .collect(),
            extra_items: self.panel_items.iter().map(PanelItemConfig::to_descriptor).collect(),
        }
    }
}
