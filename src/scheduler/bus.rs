//! Typed publish/subscribe for "something changed" signals
//!
//! Handlers return whether they still want events. Listeners that decline,
//! fail, or whose backing object is gone, are dropped after delivery without
//! disturbing the order of the remaining listeners. A listener whose object
//! is borrowed elsewhere misses that one event and stays subscribed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, warn};

/// Why a listener could not handle an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    #[error("listener target was dropped")]
    TargetDropped,

    #[error("listener target is busy")]
    TargetBusy,

    #[error("listener failed: {0}")]
    Failed(String),
}

/// Handle returned by `subscribe`, usable to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Box<dyn FnMut(&E) -> Result<bool, ListenerError>>;

/// Listener list for one event type
pub struct NotificationBus<E> {
    name: &'static str,
    listeners: Vec<(ListenerId, Handler<E>)>,
    next_id: u64,
}

impl<E> NotificationBus<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a handler; it stays subscribed while it returns `Ok(true)`
    pub fn subscribe<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&E) -> Result<bool, ListenerError> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(handler)));
        id
    }

    /// Register a handler bound to a shared object
    ///
    /// The bus only holds a weak reference; once the object is dropped the
    /// listener removes itself on the next notification. Events arriving
    /// while the object is already borrowed are skipped.
    pub fn subscribe_weak<T, F>(&mut self, target: &Rc<RefCell<T>>, mut handler: F) -> ListenerId
    where
        T: 'static,
        F: FnMut(&mut T, &E) -> bool + 'static,
    {
        let weak: Weak<RefCell<T>> = Rc::downgrade(target);
        self.subscribe(move |event| {
            let target = weak.upgrade().ok_or(ListenerError::TargetDropped)?;
            let mut target = target
                .try_borrow_mut()
                .map_err(|_| ListenerError::TargetBusy)?;
            Ok(handler(&mut target, event))
        })
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener once, in subscription order
    ///
    /// Returns how many listeners handled the event successfully; skipped
    /// busy listeners are not counted.
    pub fn notify(&mut self, event: &E) -> usize {
        let mut delivered = 0;
        let name = self.name;

        self.listeners
            .retain_mut(|(id, handler)| match handler(event) {
                Ok(interested) => {
                    delivered += 1;
                    interested
                }
                Err(ListenerError::TargetBusy) => {
                    debug!(bus = name, listener = id.0, "Listener target busy, skipped");
                    true
                }
                Err(e) => {
                    warn!(bus = name, listener = id.0, error = %e, "Dropping listener");
                    false
                }
            });

        delivered
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> fmt::Debug for NotificationBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listener_receives_event_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = NotificationBus::new("test");

        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |value: &i32| {
                log.borrow_mut().push(format!("{tag}{value}"));
                Ok(true)
            });
        }

        assert_eq!(bus.notify(&1), 3);
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_uninterested_listener_is_removed_without_skipping_others() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = NotificationBus::new("test");

        for (tag, keep) in [("a", true), ("b", false), ("c", true)] {
            let log = Rc::clone(&log);
            bus.subscribe(move |_: &()| {
                log.borrow_mut().push(tag);
                Ok(keep)
            });
        }

        bus.notify(&());
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(bus.len(), 2);

        bus.notify(&());
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "c"]);
    }

    #[test]
    fn test_dropped_target_is_delisted_and_others_still_notified() {
        let mut bus = NotificationBus::new("test");
        let gone = Rc::new(RefCell::new(0));
        let alive = Rc::new(RefCell::new(0));

        bus.subscribe_weak(&gone, |count: &mut i32, value: &i32| {
            *count += value;
            true
        });
        bus.subscribe_weak(&alive, |count: &mut i32, value: &i32| {
            *count += value;
            true
        });

        drop(gone);
        assert_eq!(bus.notify(&5), 1);
        assert_eq!(*alive.borrow(), 5);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_busy_target_skips_event_but_stays_subscribed() {
        let mut bus = NotificationBus::new("test");
        let panel = Rc::new(RefCell::new(0));

        bus.subscribe_weak(&panel, |count: &mut i32, value: &i32| {
            *count += value;
            true
        });

        {
            let _reading = panel.borrow();
            assert_eq!(bus.notify(&5), 0);
        }
        assert_eq!(bus.len(), 1);

        assert_eq!(bus.notify(&7), 1);
        assert_eq!(*panel.borrow(), 7);
    }

    #[test]
    fn test_failing_listener_is_delisted() {
        let mut bus = NotificationBus::new("test");
        bus.subscribe(|_: &u8| Err(ListenerError::Failed("boom".into())));
        bus.subscribe(|_: &u8| Ok(true));

        assert_eq!(bus.notify(&0), 1);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = NotificationBus::new("test");
        let id = bus.subscribe(|_: &u8| Ok(true));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());
    }
}
