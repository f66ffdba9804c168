//! Menu UI
//!
//! The widgets themselves are rendered elsewhere; the core only needs a
//! collaborator it can show and hide, and a menu model that turns key
//! presses into selection events.

mod menu;
mod start_screen;

pub use menu::{default_menu_options, Menu, MenuOption, MenuResponse};
pub use start_screen::{MenuSounds, StartScreen};

/// Menu collaborator driven by the lifecycle controller
pub trait MenuUi {
    /// Make the menu visible
    fn show(&mut self);

    /// Hide the menu
    fn hide(&mut self);

    /// Whether the menu is visible
    fn is_visible(&self) -> bool;
}
