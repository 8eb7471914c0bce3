//! Push channels: broadcast a payload by reference to every subscriber of an id.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::ids::MessageId;
use super::subscription::{Subscription, Unsubscribe};

/// A subscriber to a [`PushReactable`].
pub struct PushReceiver<T> {
    id: MessageId,
    name: Option<String>,
    on_receive: Rc<dyn Fn(&T)>,
    on_unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl<T> PushReceiver<T> {
    pub fn new<F>(id: MessageId, on_receive: F) -> Self
    where
        F: Fn(&T) + 'static,
    {
        Self {
            id,
            name: None,
            on_receive: Rc::new(on_receive),
            on_unsubscribe: None,
        }
    }

    /// Name shown in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Callback run once when the subscription ends.
    pub fn on_unsubscribe<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_unsubscribe = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }
}

struct PushEntry<T> {
    key: u64,
    id: MessageId,
    name: Option<String>,
    on_receive: Rc<dyn Fn(&T)>,
    active: Rc<Cell<bool>>,
}

struct PushRegistry<T> {
    entries: RefCell<Vec<PushEntry<T>>>,
    next_key: Cell<u64>,
}

impl<T> Unsubscribe for PushRegistry<T> {
    fn unsubscribe(&self, key: u64) {
        self.entries.borrow_mut().retain(|entry| {
            if entry.key == key {
                entry.active.set(false);
                tracing::trace!(id = %entry.id, name = ?entry.name, "push receiver unsubscribed");
                false
            } else {
                true
            }
        });
    }
}

/// A typed broadcast channel.
///
/// Delivery is synchronous and in subscription order. Subscribing while a
/// push is in flight only affects later pushes; unsubscribing while a push is
/// in flight stops delivery to that subscriber immediately, including for
/// the rest of the current push.
///
/// Cloning yields another handle to the same channel.
pub struct PushReactable<T> {
    registry: Rc<PushRegistry<T>>,
}

impl<T: 'static> PushReactable<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(PushRegistry {
                entries: RefCell::new(Vec::new()),
                next_key: Cell::new(0),
            }),
        }
    }

    pub fn subscribe(&self, receiver: PushReceiver<T>) -> Subscription {
        let key = self.registry.next_key.get();
        self.registry.next_key.set(key + 1);

        tracing::trace!(id = %receiver.id, name = ?receiver.name, "push receiver subscribed");

        self.registry.entries.borrow_mut().push(PushEntry {
            key,
            id: receiver.id,
            name: receiver.name,
            on_receive: receiver.on_receive,
            active: Rc::new(Cell::new(true)),
        });

        let registry = Rc::downgrade(&self.registry);
        let registry: Weak<dyn Unsubscribe> = registry;
        Subscription::new(registry, key, receiver.on_unsubscribe)
    }

    /// Deliver `payload` to every subscriber registered for `id`.
    pub fn push(&self, id: MessageId, payload: &T) {
        // Snapshot first so handlers may subscribe or unsubscribe freely.
        let targets: Vec<(Rc<dyn Fn(&T)>, Rc<Cell<bool>>)> = self
            .registry
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.id == id)
            .map(|entry| (entry.on_receive.clone(), entry.active.clone()))
            .collect();

        for (on_receive, active) in targets {
            if active.get() {
                on_receive(payload);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.entries.borrow().len()
    }

    pub fn subscriber_count_for(&self, id: MessageId) -> usize {
        self.registry
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.id == id)
            .count()
    }

    /// Drop every subscriber. Outstanding [`Subscription`]s become no-ops
    /// apart from their unsubscribe callbacks.
    pub fn unsubscribe_all(&self) {
        let entries = std::mem::take(&mut *self.registry.entries.borrow_mut());
        for entry in entries {
            entry.active.set(false);
        }
    }
}

impl<T: 'static> Default for PushReactable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PushReactable<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T> fmt::Debug for PushReactable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushReactable")
            .field("subscribers", &self.registry.entries.borrow().len())
            .finish()
    }
}
