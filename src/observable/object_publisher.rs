//! # ObservableObjectPublisher: payload-free change notifications.
//!
//! A thin front over a [`PassthroughSubject<(), Never>`]: `send()` fans one
//! `()` out to every attached subscriber that has demand left. Nothing is
//! buffered, so a notification sent with no subscribers is simply gone.

use std::fmt;

use crate::core::{Never, Publisher, Subscriber};
use crate::subjects::{PassthroughSubject, Subject};

/// Broadcasts "something is about to change" to its subscribers.
///
/// Clones share the same subscribers.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use demandflow::ObservableObjectPublisher;
/// use demandflow::{Never, Publisher};
/// use demandflow::testing::Recorder;
///
/// let changes = ObservableObjectPublisher::new();
/// changes.send(); // no subscribers: nothing happens, nothing is kept
///
/// let rec = Arc::new(Recorder::<(), Never>::unbounded());
/// changes.subscribe(Arc::clone(&rec));
/// changes.send();
/// assert_eq!(rec.values().len(), 1);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ObservableObjectPublisher {
    subject: PassthroughSubject<(), Never>,
}

impl ObservableObjectPublisher {
    /// Creates a publisher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifies every current subscriber.
    pub fn send(&self) {
        self.subject.send(());
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }
}

impl fmt::Debug for ObservableObjectPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableObjectPublisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Publisher for ObservableObjectPublisher {
    type Output = ();
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = (), Failure = Never>,
    {
        self.subject.subscribe(subscriber);
    }
}
