//! Menu model: ordered options and a wrapping selection

use crate::events::names;
use serde::{Deserialize, Serialize};

/// One menu entry and the event it triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Text shown
    pub label: String,
    /// Event triggered on activation
    pub event: String,
}

impl MenuOption {
    /// Create an option
    pub fn new(label: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            event: event.into(),
        }
    }
}

/// `Continue` and `Options`
pub fn default_menu_options() -> Vec<MenuOption> {
    vec![
        MenuOption::new("Continue", names::CONTINUE_SELECTED),
        MenuOption::new("Options", names::OPTIONS_SELECTED),
    ]
}

/// Result of feeding a key to a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResponse {
    /// Key not handled
    Ignored,
    /// Selection moved to this index
    Selected(usize),
    /// Option activated; carries its event name
    Activated(String),
}

/// Ordered options with one selected entry
#[derive(Debug, Clone, Default)]
pub struct Menu {
    options: Vec<MenuOption>,
    selected: usize,
}

impl Menu {
    /// Create a menu with the first option selected
    pub fn new(options: Vec<MenuOption>) -> Self {
        Self {
            options,
            selected: 0,
        }
    }

    /// Options in display order
    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    /// Selected index
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Selected option, `None` for an empty menu
    pub fn selected_option(&self) -> Option<&MenuOption> {
        self.options.get(self.selected)
    }

    /// Move down, wrapping to the top
    pub fn select_next(&mut self) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        self.selected = (self.selected + 1) % self.options.len();
        Some(self.selected)
    }

    /// Move up, wrapping to the bottom
    pub fn select_previous(&mut self) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        Some(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut menu = Menu::new(default_menu_options());
        assert_eq!(menu.selected_option().unwrap().label, "Continue");
        assert_eq!(menu.select_previous(), Some(1));
        assert_eq!(menu.select_next(), Some(0));
        assert_eq!(menu.select_next(), Some(1));
        assert_eq!(menu.selected_option().unwrap().event, "optionsSelected");
    }

    #[test]
    fn test_empty_menu() {
        let mut menu = Menu::new(Vec::new());
        assert_eq!(menu.select_next(), None);
        assert_eq!(menu.select_previous(), None);
        assert!(menu.selected_option().is_none());
    }
}
