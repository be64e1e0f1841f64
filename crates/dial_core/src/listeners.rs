//! Document-level listener registry with scoped subscriptions
//!
//! Controls that need to observe input outside their own bounds (a popover
//! dismissing on an outside press, a slider drag continuing after the
//! pointer leaves the track) subscribe here for exactly as long as they need
//! to. A [`Subscription`] unsubscribes when dropped, so every exit path
//! (close, pointer-up, disable, or dropping the control mid-gesture)
//! releases the listener.
//!
//! # Example
//!
//! ```rust
//! use dial_core::events::{event_types, PointerEvent};
//! use dial_core::listeners::ListenerHub;
//!
//! let hub = ListenerHub::new();
//! let subscription = hub.subscribe(event_types::POINTER_DOWN, |_event| {});
//! assert_eq!(hub.listener_count(), 1);
//!
//! drop(subscription);
//! assert_eq!(hub.listener_count(), 0);
//! hub.dispatch(&PointerEvent::down(0.0, 0.0));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::events::{EventType, PointerEvent};

new_key_type! {
    /// Unique identifier for a document listener
    pub struct ListenerId;
}

/// Listener callback
///
/// Uses Rc since UI is single-threaded.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// Dispatch phase at document level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the event reaches the hit element
    Capture,
    /// After the hit element handled the event
    #[default]
    Bubble,
}

struct Listener {
    event_type: EventType,
    phase: Phase,
    handler: PointerHandler,
}

type ListenerMap = RefCell<SlotMap<ListenerId, Listener>>;

/// Registry of document-level pointer listeners
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ListenerHub {
    listeners: Rc<ListenerMap>,
}

impl ListenerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a bubble-phase listener for `event_type`
    pub fn subscribe<F>(&self, event_type: EventType, handler: F) -> Subscription
    where
        F: Fn(&PointerEvent) + 'static,
    {
        self.subscribe_in(event_type, Phase::Bubble, handler)
    }

    /// Subscribe a capture-phase listener for `event_type`
    pub fn subscribe_capture<F>(&self, event_type: EventType, handler: F) -> Subscription
    where
        F: Fn(&PointerEvent) + 'static,
    {
        self.subscribe_in(event_type, Phase::Capture, handler)
    }

    fn subscribe_in<F>(&self, event_type: EventType, phase: Phase, handler: F) -> Subscription
    where
        F: Fn(&PointerEvent) + 'static,
    {
        let id = self.listeners.borrow_mut().insert(Listener {
            event_type,
            phase,
            handler: Rc::new(handler),
        });
        tracing::trace!("document listener {:?} subscribed for event {}", id, event_type);
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Dispatch one phase of `event`, returning how many listeners ran
    ///
    /// Handlers run against a snapshot, so they may drop their own (or
    /// another) subscription; a listener released earlier in the same
    /// dispatch is skipped.
    pub fn dispatch_phase(&self, event: &PointerEvent, phase: Phase) -> usize {
        let snapshot: SmallVec<[(ListenerId, PointerHandler); 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.event_type == event.event_type && l.phase == phase)
            .map(|(id, l)| (id, l.handler.clone()))
            .collect();

        let mut ran = 0;
        for (id, handler) in snapshot {
            if !self.listeners.borrow().contains_key(id) {
                continue;
            }
            handler(event);
            ran += 1;
        }
        ran
    }

    /// Dispatch `event` to capture then bubble listeners
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        self.dispatch_phase(event, Phase::Capture) + self.dispatch_phase(event, Phase::Bubble)
    }

    /// Total number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of live listeners for one event type
    pub fn count_for(&self, event_type: EventType) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|l| l.event_type == event_type)
            .count()
    }
}

impl std::fmt::Debug for ListenerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Scoped listener registration; unsubscribes on drop
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: ListenerId,
    listeners: Weak<ListenerMap>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|map| map.borrow().contains_key(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(map) = self.listeners.upgrade() {
            if map.borrow_mut().remove(self.id).is_some() {
                tracing::trace!("document listener {:?} released", self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_by_type() {
        let hub = ListenerHub::new();
        let downs = Rc::new(Cell::new(0));
        let downs_cb = downs.clone();
        let _sub = hub.subscribe(event_types::POINTER_DOWN, move |_| {
            downs_cb.set(downs_cb.get() + 1)
        });

        assert_eq!(hub.dispatch(&PointerEvent::down(0.0, 0.0)), 1);
        assert_eq!(hub.dispatch(&PointerEvent::up(0.0, 0.0)), 0);
        assert_eq!(downs.get(), 1);
    }

    #[test]
    fn test_capture_runs_before_bubble() {
        let hub = ListenerHub::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let bubble_order = order.clone();
        let capture_order = order.clone();
        let _bubble = hub.subscribe(event_types::POINTER_DOWN, move |_| {
            bubble_order.borrow_mut().push("bubble")
        });
        let _capture = hub.subscribe_capture(event_types::POINTER_DOWN, move |_| {
            capture_order.borrow_mut().push("capture")
        });

        hub.dispatch(&PointerEvent::down(0.0, 0.0));
        assert_eq!(*order.borrow(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = ListenerHub::new();
        let sub = hub.subscribe(event_types::POINTER_MOVE, |_| {});
        assert!(sub.is_active());
        assert_eq!(hub.count_for(event_types::POINTER_MOVE), 1);

        drop(sub);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_handler_may_release_itself_during_dispatch() {
        let hub = ListenerHub::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let other_ran = Rc::new(Cell::new(false));

        // The first listener releases both its own and the second subscription
        let slot_cb = slot.clone();
        let first = hub.subscribe(event_types::POINTER_UP, move |_| {
            slot_cb.borrow_mut().take();
        });
        let other_ran_cb = other_ran.clone();
        *slot.borrow_mut() = Some(hub.subscribe(event_types::POINTER_UP, move |_| {
            other_ran_cb.set(true)
        }));

        assert_eq!(hub.dispatch(&PointerEvent::up(0.0, 0.0)), 1);
        assert!(!other_ran.get());
        assert_eq!(hub.listener_count(), 1);
        drop(first);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_hub() {
        let hub = ListenerHub::new();
        let sub = hub.subscribe(event_types::POINTER_DOWN, |_| {});
        drop(hub);
        assert!(!sub.is_active());
        drop(sub);
    }
}
