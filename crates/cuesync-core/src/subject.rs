//! Typed observer/subject primitive.
//!
//! Listeners are invoked in registration order. A panicking listener is
//! isolated: the panic is caught and logged, and the remaining listeners
//! still fire, so one faulty consumer can never stall the tick.

use std::panic::{AssertUnwindSafe, catch_unwind};

use uuid::Uuid;

/// Token returned by [`Subject::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

type Callback<T> = Box<dyn FnMut(&T)>;

/// An ordered list of callbacks observing values of type `T`.
pub struct Subject<T> {
    listeners: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Subject<T> {
    /// Creates an empty subject.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener; listeners fire in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if the token was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Emits a value to every listener, in registration order.
    ///
    /// A listener that panics is caught and logged; remaining listeners
    /// still receive the value.
    pub fn emit(&mut self, value: &T) {
        for (id, listener) in &mut self.listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(value))) {
                let message = panic_message(&panic);
                tracing::error!(subscription = %display_id(*id), %message, "listener panicked");
            }
        }
    }

    /// Drops every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn display_id(id: SubscriptionId) -> Uuid {
    id.0
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
