//! Scene lifecycle controller

use crate::events::{names, EventBus, HandlerId};
use crate::state::{AppState, AppStateMachine};
use crate::ui::MenuUi;
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// Owns the state machine and drives transitions chosen in the menu
///
/// Only this controller moves the state on a menu selection. The menu is
/// held weakly so the subscription never keeps it alive.
#[derive(Debug)]
pub struct SceneLifecycleController {
    state: Rc<RefCell<AppStateMachine>>,
    events: EventBus,
    subscriptions: Vec<(&'static str, HandlerId)>,
}

impl SceneLifecycleController {
    /// Take ownership of `machine` and subscribe to its menu events
    pub fn new(machine: AppStateMachine, menu: Weak<RefCell<dyn MenuUi>>) -> Self {
        let events = machine.events().clone();
        let state = Rc::new(RefCell::new(machine));

        let weak_state = Rc::downgrade(&state);
        let continue_id = events.on(names::CONTINUE_SELECTED, move |_| {
            continue_selected(&weak_state, &menu);
        });

        let weak_state = Rc::downgrade(&state);
        let options_id = events.on(names::OPTIONS_SELECTED, move |_| {
            if let Some(state) = weak_state.upgrade() {
                if let Ok(machine) = state.try_borrow() {
                    machine.log_event(names::OPTIONS_SELECTED, "");
                }
            }
        });

        Self {
            state,
            events,
            subscriptions: vec![(names::CONTINUE_SELECTED, continue_id), (names::OPTIONS_SELECTED, options_id)],
        }
    }

    /// Current state
    pub fn state(&self) -> Option<AppState> {
        self.state.borrow().state()
    }

    /// Read access to the state machine
    pub fn machine(&self) -> Ref<'_, AppStateMachine> {
        self.state.borrow()
    }

    /// Bus menu selections are published on
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Move from loading to the menu once resources are ready
    pub fn resources_ready(&self) {
        let mut machine = self.state.borrow_mut();
        if machine.is(AppState::Loading) || machine.state().is_none() {
            machine.set_state(AppState::Menu);
        }
    }

    /// Whether the menu subscriptions are still registered
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Unsubscribe from menu events; idempotent
    pub fn dispose(&mut self) {
        for (name, id) in self.subscriptions.drain(..) {
            self.events.off_handler(name, id);
        }
    }
}

fn continue_selected(state: &Weak<RefCell<AppStateMachine>>, menu: &Weak<RefCell<dyn MenuUi>>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let Ok(mut machine) = state.try_borrow_mut() else {
        log::error!("State machine busy; '{}' ignored", names::CONTINUE_SELECTED);
        return;
    };
    match machine.state() {
        None | Some(AppState::Loading) | Some(AppState::Menu) => machine.set_state(AppState::Experience),
        Some(other) => {
            log::warn!("'{}' ignored in state {}", names::CONTINUE_SELECTED, other);
            return;
        }
    }
    drop(machine);

    if let Some(menu) = menu.upgrade() {
        match menu.try_borrow_mut() {
            Ok(mut menu) => menu.hide(),
            Err(_) => log::error!("Menu busy; cannot hide"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeMenu {
        visible: bool,
        hides: u32,
    }

    impl MenuUi for FakeMenu {
        fn show(&mut self) {
            self.visible = true;
        }

        fn hide(&mut self) {
            self.visible = false;
            self.hides += 1;
        }

        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    fn setup(initial: AppState) -> (SceneLifecycleController, Rc<RefCell<FakeMenu>>) {
        let menu = Rc::new(RefCell::new(FakeMenu {
            visible: true,
            hides: 0,
        }));
        let dyn_menu: Rc<RefCell<dyn MenuUi>> = menu.clone();
        let controller = SceneLifecycleController::new(AppStateMachine::new(Some(initial)), Rc::downgrade(&dyn_menu));
        (controller, menu)
    }

    #[test]
    fn test_continue_enters_experience_and_hides_menu() {
        let (controller, menu) = setup(AppState::Loading);
        controller.resources_ready();
        assert_eq!(controller.state(), Some(AppState::Menu));

        controller.events().trigger(names::CONTINUE_SELECTED, &[]);
        assert_eq!(controller.state(), Some(AppState::Experience));
        assert!(!menu.borrow().visible);
        assert_eq!(menu.borrow().hides, 1);
    }

    #[test]
    fn test_continue_ignored_after_end() {
        let (controller, menu) = setup(AppState::ExperienceEnd);
        controller.events().trigger(names::CONTINUE_SELECTED, &[]);
        assert_eq!(controller.state(), Some(AppState::ExperienceEnd));
        assert!(menu.borrow().visible);
    }

    #[test]
    fn test_dropped_menu_is_tolerated() {
        let (controller, menu) = setup(AppState::Menu);
        drop(menu);
        assert_eq!(controller.events().trigger(names::CONTINUE_SELECTED, &[]), 1);
        assert_eq!(controller.state(), Some(AppState::Experience));
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let (mut controller, menu) = setup(AppState::Menu);
        controller.dispose();
        controller.dispose();
        assert!(!controller.is_attached());
        assert_eq!(controller.events().trigger(names::CONTINUE_SELECTED, &[]), 0);
        assert_eq!(controller.state(), Some(AppState::Menu));
        assert_eq!(menu.borrow().hides, 0);
    }

    #[test]
    fn test_options_selected_keeps_state() {
        let (controller, _menu) = setup(AppState::Menu);
        assert_eq!(controller.events().trigger(names::OPTIONS_SELECTED, &[]), 1);
        assert_eq!(controller.state(), Some(AppState::Menu));
    }
}
