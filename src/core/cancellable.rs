//! # AnyCancellable: cancel-on-drop handle.
//!
//! Wraps any [`Cancellable`] and cancels it when dropped. Returned by
//! [`PublisherExt::sink`](crate::PublisherExt::sink); keep it alive for as long
//! as the subscription should run.
//!
//! ## Example
//! ```rust
//! use demandflow::{PassthroughSubject, PublisherExt, Never, Subject};
//! use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//!
//! let subject = PassthroughSubject::<u32, Never>::new();
//! let seen = Arc::new(AtomicU32::new(0));
//! let s = Arc::clone(&seen);
//!
//! let handle = subject.clone().sink(|_| {}, move |v| { s.fetch_add(v, Ordering::Relaxed); });
//! subject.send(1);
//! drop(handle); // cancels
//! subject.send(2);
//! assert_eq!(seen.load(Ordering::Relaxed), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use super::Cancellable;

/// Type-erased cancellation handle that cancels on drop.
#[must_use = "dropping an AnyCancellable cancels the subscription"]
pub struct AnyCancellable {
    target: Option<Arc<dyn Cancellable>>,
}

impl AnyCancellable {
    /// Wraps a cancellable target.
    pub fn new(target: Arc<dyn Cancellable>) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// Cancels the target now. Later calls and the eventual drop do nothing.
    pub fn cancel(&mut self) {
        if let Some(target) = self.target.take() {
            target.cancel();
        }
    }

    /// Stores the handle in a collection owned by the caller.
    pub fn store(self, bag: &mut Vec<AnyCancellable>) {
        bag.push(self);
    }

    /// True until [`cancel`](Self::cancel) has been called.
    pub fn is_armed(&self) -> bool {
        self.target.is_some()
    }
}

impl Drop for AnyCancellable {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for AnyCancellable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCancellable")
            .field("armed", &self.is_armed())
            .finish()
    }
}
