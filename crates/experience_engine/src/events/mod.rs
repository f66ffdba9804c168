//! Publish/subscribe event bus
//!
//! Key principles:
//! - Handlers are registered per event name and invoked in registration order
//! - Dispatch is immediate and synchronous (no queuing)
//! - Subscribing or unsubscribing from inside a handler never corrupts the
//!   dispatch in progress
//!
//! The bus is a cheap handle over shared single-threaded state: cloning it
//! yields another handle to the same registry. Components compose a bus as a
//! field instead of inheriting emitter behaviour.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Well-known event names
pub mod names {
    /// Menu "Continue" was chosen
    pub const CONTINUE_SELECTED: &str = "continueSelected";
    /// Menu "Options" was chosen
    pub const OPTIONS_SELECTED: &str = "optionsSelected";
    /// All resources finished loading
    pub const READY: &str = "ready";
}

/// Positional argument passed through to handlers
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Free-form text
    Text(String),
    /// Numeric payload
    Number(f64),
    /// Boolean payload
    Flag(bool),
}

impl fmt::Display for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// Identifies one registration so it can be removed later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type SharedHandler = Rc<RefCell<dyn FnMut(&[EventArg])>>;

struct Registration {
    id: HandlerId,
    handler: SharedHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<String, Vec<Registration>>,
}

impl Registry {
    fn contains(&self, name: &str, id: HandlerId) -> bool {
        self.handlers
            .get(name)
            .is_some_and(|list| list.iter().any(|r| r.id == id))
    }
}

/// Event bus with named registration and immediate dispatch
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `name`
    ///
    /// Registering the same closure twice is allowed; it then runs once per
    /// registration.
    pub fn on<F>(&self, name: &str, handler: F) -> HandlerId
    where
        F: FnMut(&[EventArg]) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = HandlerId(registry.next_id);
        registry.next_id += 1;
        registry
            .handlers
            .entry(name.to_string())
            .or_default()
            .push(Registration {
                id,
                handler: Rc::new(RefCell::new(handler)),
            });
        id
    }

    /// Remove every handler registered for `name`
    ///
    /// Returns how many were removed. Unknown names are a no-op.
    pub fn off(&self, name: &str) -> usize {
        self.registry
            .borrow_mut()
            .handlers
            .remove(name)
            .map_or(0, |list| list.len())
    }

    /// Remove one registration for `name`
    ///
    /// Returns `false` when no such registration exists.
    pub fn off_handler(&self, name: &str, id: HandlerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(list) = registry.handlers.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            registry.handlers.remove(name);
        }
        removed
    }

    /// Invoke every handler currently registered for `name`, in order
    ///
    /// Handlers added during this dispatch are not called until the next
    /// trigger; handlers removed during it are skipped. A handler that
    /// re-triggers its own event is not re-entered. Returns the number of
    /// handlers invoked.
    pub fn trigger(&self, name: &str, args: &[EventArg]) -> usize {
        let snapshot: Vec<(HandlerId, SharedHandler)> = match self.registry.borrow().handlers.get(name) {
            Some(list) => list.iter().map(|r| (r.id, Rc::clone(&r.handler))).collect(),
            None => return 0,
        };

        let mut invoked = 0;
        for (id, handler) in snapshot {
            if !self.registry.borrow().contains(name, id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut callback) => {
                    (&mut *callback)(args);
                    invoked += 1;
                }
                Err(_) => {
                    log::warn!("Skipping re-entrant dispatch of '{}' to a handler already running", name);
                }
            }
        }
        invoked
    }

    /// Number of handlers registered for `name`
    pub fn handler_count(&self, name: &str) -> usize {
        self.registry.borrow().handlers.get(name).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let mut names: Vec<&String> = registry.handlers.keys().collect();
        names.sort();
        f.debug_struct("EventBus").field("events", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn FnMut(&[EventArg])>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |tag: &'static str| {
            let sink = Rc::clone(&sink);
            Box::new(move |_: &[EventArg]| sink.borrow_mut().push(tag.to_string())) as Box<dyn FnMut(&[EventArg])>
        };
        (log, make)
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        bus.on("tick", make("a"));
        bus.on("tick", make("b"));
        bus.on("other", make("x"));

        assert_eq!(bus.trigger("tick", &[]), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_registration_runs_twice() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let count = Rc::clone(&count);
            bus.on("ready", move |_| count.set(count.get() + 1));
        }
        bus.trigger("ready", &[]);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_arguments_pass_through() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on("state", move |args| sink.borrow_mut().extend_from_slice(args));

        bus.trigger("state", &[EventArg::Text("MENU".into()), EventArg::Number(2.0)]);
        assert_eq!(*seen.borrow(), vec![EventArg::Text("MENU".into()), EventArg::Number(2.0)]);
    }

    #[test]
    fn test_trigger_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.trigger("nobody", &[]), 0);
    }

    #[test]
    fn test_off_unknown_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.off("missing"), 0);
        let (_, make) = recorder();
        let id = bus.on("tick", make("a"));
        assert!(!bus.off_handler("missing", id));
        assert_eq!(bus.handler_count("tick"), 1);
    }

    #[test]
    fn test_off_handler_removes_only_that_registration() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let first = bus.on("tick", make("a"));
        bus.on("tick", make("b"));

        assert!(bus.off_handler("tick", first));
        assert!(!bus.off_handler("tick", first));
        bus.trigger("tick", &[]);
        assert_eq!(*log.borrow(), vec!["b"]);

        assert_eq!(bus.off("tick"), 1);
        assert_eq!(bus.trigger("tick", &[]), 0);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next_trigger() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let inner_bus = bus.clone();
        let late = RefCell::new(Some(make("late")));
        bus.on("tick", move |_| {
            if let Some(handler) = late.borrow_mut().take() {
                inner_bus.on("tick", handler);
            }
        });

        assert_eq!(bus.trigger("tick", &[]), 1);
        assert!(log.borrow().is_empty());

        assert_eq!(bus.trigger("tick", &[]), 2);
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_skips_removed() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let inner_bus = bus.clone();
        bus.on("tick", move |_| {
            inner_bus.off("tick");
        });
        bus.on("tick", make("second"));

        assert_eq!(bus.trigger("tick", &[]), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_nested_trigger_of_other_event() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let inner_bus = bus.clone();
        bus.on("outer", move |_| {
            inner_bus.trigger("inner", &[]);
        });
        bus.on("inner", make("inner"));

        bus.trigger("outer", &[]);
        assert_eq!(*log.borrow(), vec!["inner"]);
    }

    #[test]
    fn test_self_retrigger_is_not_reentered() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let inner_bus = bus.clone();
        let counter = Rc::clone(&count);
        bus.on("loop", move |_| {
            counter.set(counter.get() + 1);
            inner_bus.trigger("loop", &[]);
        });

        bus.trigger("loop", &[]);
        assert_eq!(count.get(), 1);
    }
}
