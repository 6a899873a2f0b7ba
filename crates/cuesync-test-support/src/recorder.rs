//! Recording listener — captures every value a subject emits.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, clonable capture buffer for observer callbacks.
///
/// Tests hand one clone to a `Subject` listener and keep the other to read
/// back what was emitted.
#[derive(Debug)]
pub struct SharedRecorder<T> {
    values: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for SharedRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
        }
    }
}

impl<T: Clone> SharedRecorder<T> {
    /// Records one value.
    pub fn push(&self, value: T) {
        self.values.borrow_mut().push(value);
    }

    /// Returns a snapshot of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    /// Returns the most recently recorded value, if any.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.values.borrow().last().cloned()
    }

    /// Number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

/// Creates an empty recorder.
#[must_use]
pub fn recorder<T: Clone>() -> SharedRecorder<T> {
    SharedRecorder {
        values: Rc::new(RefCell::new(Vec::new())),
    }
}
