//! Per-element change-notification store.
//!
//! A consumer subscribes to a single element and is notified only when that
//! element's resolved `(highlight, border)` pair changes, never on every
//! 100 ms tick. With hundreds of elements on screen this keeps per-tick
//! notification work proportional to the handful of elements near their
//! trigger time.

use std::collections::HashMap;

use cuesync_core::element::{ElementId, ElementVisual};
use cuesync_core::subject::{Subject, SubscriptionId};

use crate::boundary::ElementDelta;

/// Key-scoped pub/sub over per-element visual state.
#[derive(Debug, Default)]
pub struct ElementStateStore {
    published: HashMap<ElementId, ElementVisual>,
    subscribers: HashMap<ElementId, Subject<ElementVisual>>,
}

impl ElementStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one element's visual state.
    pub fn subscribe(
        &mut self,
        element_id: &ElementId,
        listener: impl FnMut(&ElementVisual) + 'static,
    ) -> SubscriptionId {
        self.subscribers
            .entry(element_id.clone())
            .or_default()
            .subscribe(listener)
    }

    /// Removes a subscription. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, element_id: &ElementId, id: SubscriptionId) -> bool {
        self.subscribers
            .get_mut(element_id)
            .is_some_and(|subject| subject.unsubscribe(id))
    }

    /// Last published pair for an element; `(inactive, none)` if never
    /// published.
    #[must_use]
    pub fn get(&self, element_id: &ElementId) -> ElementVisual {
        self.published.get(element_id).copied().unwrap_or_default()
    }

    /// Publishes a batch of deltas from an evaluation pass.
    ///
    /// A subscriber fires only when its own element's pair actually differs
    /// from the last published value, so re-publishing an unchanged delta is
    /// a no-op.
    pub fn publish(&mut self, deltas: &[ElementDelta]) {
        for delta in deltas {
            let previous = self.published.get(&delta.element_id).copied().unwrap_or_default();
            if previous == delta.visual {
                continue;
            }
            self.published.insert(delta.element_id.clone(), delta.visual);
            if let Some(subject) = self.subscribers.get_mut(&delta.element_id) {
                subject.emit(&delta.visual);
            }
        }
    }

    /// Clears published state, keeping subscriptions alive (guest STOP).
    pub fn reset(&mut self) {
        self.published.clear();
    }

    /// Drops every subscription and all published state.
    pub fn destroy(&mut self) {
        self.published.clear();
        self.subscribers.clear();
    }
}
