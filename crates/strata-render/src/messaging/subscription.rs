use std::fmt;
use std::rc::Weak;

/// Implemented by channel registries so a [`Subscription`] can remove its
/// listener without knowing the payload type.
pub(crate) trait Unsubscribe {
    fn unsubscribe(&self, key: u64);
}

/// Handle returned by every channel `subscribe` call.
///
/// Unsubscribing removes exactly one listener and then runs the listener's
/// unsubscribe callback, if it has one. Both happen at most once, however
/// many times [`unsubscribe`](Self::unsubscribe) is called. Dropping the
/// handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    registry: Option<Weak<dyn Unsubscribe>>,
    key: u64,
    on_unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(
        registry: Weak<dyn Unsubscribe>,
        key: u64,
        on_unsubscribe: Option<Box<dyn FnOnce()>>,
    ) -> Self {
        Self {
            registry: Some(registry),
            key,
            on_unsubscribe,
        }
    }

    /// Stop delivery to this listener. Idempotent.
    ///
    /// Safe to call from inside the listener's own handler: the in-flight
    /// delivery finishes, later ones do not happen.
    pub fn unsubscribe(&mut self) {
        let Some(registry) = self.registry.take() else {
            return;
        };

        // The channel may already be gone; the cleanup still runs once.
        if let Some(registry) = registry.upgrade() {
            registry.unsubscribe(self.key);
        }

        if let Some(callback) = self.on_unsubscribe.take() {
            callback();
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.strong_count() > 0)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("active", &self.is_active())
            .finish()
    }
}
