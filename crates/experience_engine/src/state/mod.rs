//! Global application state machine
//!
//! A value holder plus validator over the fixed set of lifecycle states. It
//! composes an [`EventBus`] that menu selections and other semantic events
//! are published on, but a transition only notifies when the caller opted in
//! with [`AppStateMachine::notify_on_change`].

use crate::events::{EventArg, EventBus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of the experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppState {
    /// Resources are loading
    #[serde(rename = "LOADING")]
    Loading,
    /// Start screen menu is shown
    #[serde(rename = "MENU")]
    Menu,
    /// The interactive scene is running
    #[serde(rename = "EXPERIENCE")]
    Experience,
    /// The experience is restarting
    #[serde(rename = "RESTART")]
    Restart,
    /// The experience has ended
    #[serde(rename = "END")]
    ExperienceEnd,
    /// A section of the experience ended
    #[serde(rename = "SECTION_END")]
    SectionEnd,
    /// A section of the experience started
    #[serde(rename = "SECTION_START")]
    SectionStart,
}

impl AppState {
    /// Every member of the closed state set
    pub const ALL: [Self; 7] = [
        Self::Loading,
        Self::Menu,
        Self::Experience,
        Self::Restart,
        Self::ExperienceEnd,
        Self::SectionEnd,
        Self::SectionStart,
    ];

    /// Wire value of the state
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Menu => "MENU",
            Self::Experience => "EXPERIENCE",
            Self::Restart => "RESTART",
            Self::ExperienceEnd => "END",
            Self::SectionEnd => "SECTION_END",
            Self::SectionStart => "SECTION_START",
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppState {
    type Err = StateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| StateError::Unknown(value.to_string()))
    }
}

/// State machine errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Requested value is not a member of the state set
    #[error("State not found in enum: '{0}'")]
    Unknown(String),
}

/// Single-instance lifecycle state holder
#[derive(Debug, Default)]
pub struct AppStateMachine {
    state: Option<AppState>,
    events: EventBus,
    change_event: Option<String>,
}

impl AppStateMachine {
    /// Create a state machine, optionally starting unset
    pub fn new(initial: Option<AppState>) -> Self {
        Self {
            state: initial,
            events: EventBus::new(),
            change_event: None,
        }
    }

    /// Create a state machine from a wire value
    ///
    /// An unknown value is logged and leaves the machine unset.
    pub fn from_name(initial: &str) -> Self {
        let mut machine = Self::new(None);
        let _ = machine.set_state_named(initial);
        machine
    }

    /// Current state, `None` while unset
    pub fn state(&self) -> Option<AppState> {
        self.state
    }

    /// Whether the machine currently sits in `state`
    pub fn is(&self, state: AppState) -> bool {
        self.state == Some(state)
    }

    /// Record a new state
    pub fn set_state(&mut self, state: AppState) {
        let previous = self.state.replace(state);
        log::debug!(
            "State {} -> {}",
            previous.map_or("<unset>", AppState::as_str),
            state
        );
        if let Some(name) = &self.change_event {
            self.events.trigger(name, &[EventArg::Text(state.as_str().to_string())]);
        }
    }

    /// Validate a wire value and transition to it
    ///
    /// Non-members are logged and rejected; the current state is preserved.
    pub fn set_state_named(&mut self, value: &str) -> Result<AppState, StateError> {
        match value.parse::<AppState>() {
            Ok(state) => {
                self.set_state(state);
                Ok(state)
            }
            Err(err) => {
                log::error!("{err}");
                Err(err)
            }
        }
    }

    /// Event bus carrying semantic events such as menu selections
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Opt in to a notification on every successful transition
    ///
    /// Handlers receive the new state's wire value as the only argument.
    pub fn notify_on_change(&mut self, event_name: impl Into<String>) {
        self.change_event = Some(event_name.into());
    }

    /// Log an event record
    pub fn log_event(&self, event_name: &str, data: &str) {
        log::info!("Event: {event_name}, Data: {data}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_every_member_round_trips_through_set_state() {
        let mut machine = AppStateMachine::new(None);
        for state in AppState::ALL {
            machine.set_state(state);
            assert_eq!(machine.state(), Some(state));

            assert_eq!(machine.set_state_named(state.as_str()), Ok(state));
            assert_eq!(machine.state(), Some(state));
        }
    }

    #[test]
    fn test_unknown_value_is_rejected_and_state_kept() {
        let mut machine = AppStateMachine::new(Some(AppState::Menu));
        for _ in 0..2 {
            let result = machine.set_state_named("PAUSED");
            assert_eq!(result, Err(StateError::Unknown("PAUSED".into())));
            assert_eq!(machine.state(), Some(AppState::Menu));
        }
    }

    #[test]
    fn test_experience_end_uses_end_value() {
        assert_eq!("END".parse::<AppState>(), Ok(AppState::ExperienceEnd));
        assert!("EXPERIENCE_END".parse::<AppState>().is_err());
        assert!("loading".parse::<AppState>().is_err());
    }

    #[test]
    fn test_from_name_unknown_leaves_unset() {
        assert_eq!(AppStateMachine::from_name("LOADING").state(), Some(AppState::Loading));
        assert_eq!(AppStateMachine::from_name("BOGUS").state(), None);
    }

    #[test]
    fn test_transitions_are_silent_unless_wired() {
        let mut machine = AppStateMachine::new(Some(AppState::Loading));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        machine.events().on("stateChanged", move |args| sink.borrow_mut().extend_from_slice(args));

        machine.set_state(AppState::Menu);
        assert!(seen.borrow().is_empty());

        machine.notify_on_change("stateChanged");
        machine.set_state(AppState::Experience);
        let _ = machine.set_state_named("NOPE");
        assert_eq!(*seen.borrow(), vec![EventArg::Text("EXPERIENCE".into())]);
    }
}
