//! Start screen: title plus the main menu

use super::menu::{Menu, MenuOption, MenuResponse};
use super::MenuUi;
use crate::audio::{AudioEngine, SoundHandle, SoundOptions};
use crate::input::{Key, NamedKey};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sounds played by the start screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSounds {
    /// Played when the selection moves
    pub change: Option<PathBuf>,
    /// Played when an option is activated
    pub start: Option<PathBuf>,
    /// Volume of both sounds
    pub volume: Option<f32>,
}

/// Title screen with a keyboard-driven menu
#[derive(Debug)]
pub struct StartScreen {
    title: String,
    menu: Menu,
    visible: bool,
    change_sound: Option<SoundHandle>,
    start_sound: Option<SoundHandle>,
}

impl StartScreen {
    /// Create a visible start screen
    pub fn new(title: impl Into<String>, options: Vec<MenuOption>, sounds: &MenuSounds, audio: &AudioEngine) -> Self {
        let sound_options = SoundOptions {
            volume: sounds.volume.unwrap_or(SoundOptions::default().volume),
            ..SoundOptions::default()
        };
        let load = |path: &Option<PathBuf>| path.as_ref().map(|p| SoundHandle::new(audio, p, sound_options));
        Self {
            title: title.into(),
            menu: Menu::new(options),
            visible: true,
            change_sound: load(&sounds.change),
            start_sound: load(&sounds.start),
        }
    }

    /// Title text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Menu model
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Feed a key press
    ///
    /// Hidden screens ignore every key. The caller triggers the event of an
    /// [`MenuResponse::Activated`] response.
    pub fn handle_key(&mut self, key: &Key) -> MenuResponse {
        if !self.visible {
            return MenuResponse::Ignored;
        }
        let moved = match key {
            Key::Named(NamedKey::ArrowUp) => self.menu.select_previous(),
            Key::Named(NamedKey::ArrowDown) => self.menu.select_next(),
            Key::Named(NamedKey::Enter) => {
                let Some(option) = self.menu.selected_option() else {
                    return MenuResponse::Ignored;
                };
                let event = option.event.clone();
                log::info!("Menu option '{}' activated", option.label);
                if let Some(sound) = self.start_sound.as_mut() {
                    sound.play();
                }
                return MenuResponse::Activated(event);
            }
            _ => return MenuResponse::Ignored,
        };
        match moved {
            Some(index) => {
                if let Some(sound) = self.change_sound.as_mut() {
                    sound.play();
                }
                MenuResponse::Selected(index)
            }
            None => MenuResponse::Ignored,
        }
    }
}

impl MenuUi for StartScreen {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
        if let Some(sound) = self.change_sound.as_mut() {
            sound.stop();
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
