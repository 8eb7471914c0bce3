//! Pull channels: synchronous request/response with one responder per id.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use strata_core::alloc::HashMap;

use super::ids::MessageId;
use super::subscription::{Subscription, Unsubscribe};
use crate::error::{MessagingError, MessagingResult};

/// The single answerer for one request id on a [`PullReactable`].
pub struct PullResponder<T> {
    id: MessageId,
    name: Option<String>,
    respond: Rc<dyn Fn() -> T>,
    on_unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl<T> PullResponder<T> {
    pub fn new<F>(id: MessageId, respond: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            id,
            name: None,
            respond: Rc::new(respond),
            on_unsubscribe: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

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

struct PullEntry<T> {
    key: u64,
    name: Option<String>,
    respond: Rc<dyn Fn() -> T>,
}

struct PullRegistry<T> {
    responders: RefCell<HashMap<MessageId, PullEntry<T>>>,
    next_key: Cell<u64>,
}

impl<T> Unsubscribe for PullRegistry<T> {
    fn unsubscribe(&self, key: u64) {
        self.responders.borrow_mut().retain(|id, entry| {
            if entry.key == key {
                tracing::trace!(%id, name = ?entry.name, "pull responder unsubscribed");
                false
            } else {
                true
            }
        });
    }
}

/// A typed request/response channel.
///
/// Lets a consumer fetch a value on demand from whoever registered for the
/// request id, without knowing the producer's concrete type.
///
/// Cloning yields another handle to the same channel.
pub struct PullReactable<T> {
    registry: Rc<PullRegistry<T>>,
}

impl<T: 'static> PullReactable<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(PullRegistry {
                responders: RefCell::new(HashMap::new()),
                next_key: Cell::new(0),
            }),
        }
    }

    /// Register `responder` as the answerer for its id.
    ///
    /// Fails with [`MessagingError::ResponderAlreadyRegistered`] if that id
    /// already has a responder.
    pub fn subscribe(&self, responder: PullResponder<T>) -> MessagingResult<Subscription> {
        let mut responders = self.registry.responders.borrow_mut();
        if responders.contains_key(&responder.id) {
            return Err(MessagingError::ResponderAlreadyRegistered { id: responder.id });
        }

        let key = self.registry.next_key.get();
        self.registry.next_key.set(key + 1);

        tracing::trace!(id = %responder.id, name = ?responder.name, "pull responder subscribed");

        responders.insert(
            responder.id,
            PullEntry {
                key,
                name: responder.name,
                respond: responder.respond,
            },
        );
        drop(responders);

        let registry = Rc::downgrade(&self.registry);
        let registry: Weak<dyn Unsubscribe> = registry;
        Ok(Subscription::new(registry, key, responder.on_unsubscribe))
    }

    /// Ask the responder registered for `id` for its current answer.
    pub fn pull(&self, id: MessageId) -> MessagingResult<T> {
        let respond = self
            .registry
            .responders
            .borrow()
            .get(&id)
            .map(|entry| entry.respond.clone())
            .ok_or(MessagingError::NoResponder { id })?;

        // The registry is not borrowed while the responder runs.
        Ok(respond())
    }

    pub fn has_responder(&self, id: MessageId) -> bool {
        self.registry.responders.borrow().contains_key(&id)
    }
}

impl<T: 'static> Default for PullReactable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PullReactable<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T> fmt::Debug for PullReactable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullReactable")
            .field("responders", &self.registry.responders.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: MessageId = MessageId::custom(10);

    #[test]
    fn test_pull_returns_current_answer() {
        let reactable = PullReactable::<Vec<u32>>::new();
        let source = Rc::new(RefCell::new(vec![1, 2]));

        let _sub = reactable
            .subscribe(PullResponder::new(ID, {
                let source = source.clone();
                move || source.borrow().clone()
            }))
            .unwrap();

        assert_eq!(reactable.pull(ID).unwrap(), vec![1, 2]);

        source.borrow_mut().push(3);
        assert_eq!(reactable.pull(ID).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_second_responder_for_same_id_is_rejected() {
        let reactable = PullReactable::<u32>::new();
        let _first = reactable.subscribe(PullResponder::new(ID, || 1)).unwrap();

        let second = reactable.subscribe(PullResponder::new(ID, || 2));

        assert_eq!(
            second.unwrap_err(),
            MessagingError::ResponderAlreadyRegistered { id: ID }
        );
        assert_eq!(reactable.pull(ID).unwrap(), 1);
    }

    #[test]
    fn test_pull_without_responder() {
        let reactable = PullReactable::<u32>::new();
        assert_eq!(
            reactable.pull(ID).unwrap_err(),
            MessagingError::NoResponder { id: ID }
        );
    }

    #[test]
    fn test_unsubscribe_frees_the_id() {
        let reactable = PullReactable::<u32>::new();
        let mut first = reactable.subscribe(PullResponder::new(ID, || 1)).unwrap();

        first.unsubscribe();
        first.unsubscribe();
        assert!(!reactable.has_responder(ID));

        let _second = reactable.subscribe(PullResponder::new(ID, || 2)).unwrap();
        assert_eq!(reactable.pull(ID).unwrap(), 2);
    }

    #[test]
    fn test_responder_may_pull_other_ids() {
        let reactable = PullReactable::<u32>::new();
        let other = MessageId::custom(11);

        let _base = reactable.subscribe(PullResponder::new(other, || 20)).unwrap();
        let _derived = reactable
            .subscribe(PullResponder::new(ID, {
                let reactable = reactable.clone();
                move || reactable.pull(other).unwrap_or_default() + 1
            }))
            .unwrap();

        assert_eq!(reactable.pull(ID).unwrap(), 21);
    }
}
