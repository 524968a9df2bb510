//! # Published: a value cell wired to its owner's change publisher.
//!
//! Wiring is explicit: the owner builds its fields with a reference to its
//! [`ObservableObjectPublisher`] at construction time.
//!
//! ```text
//! Published::set(v)
//!     ├─1─► owner.send()          (subscribers see "will change", old value still readable)
//!     ├─2─► store v
//!     └─3─► cell subject.send(v)  (subscribers of publisher() see v)
//! ```
//!
//! ## Example
//! ```rust
//! use demandflow::{ObservableObject, ObservableObjectPublisher, Published};
//!
//! struct Settings {
//!     changes: ObservableObjectPublisher,
//!     volume: Published<u8>,
//! }
//!
//! impl Settings {
//!     fn new() -> Self {
//!         let changes = ObservableObjectPublisher::new();
//!         let volume = Published::wired(5, &changes);
//!         Self { changes, volume }
//!     }
//! }
//!
//! impl ObservableObject for Settings {
//!     fn object_will_change(&self) -> ObservableObjectPublisher {
//!         self.changes.clone()
//!     }
//! }
//!
//! let settings = Settings::new();
//! settings.volume.set(7);
//! assert_eq!(settings.volume.get(), 7);
//! ```

use std::fmt;

use crate::core::{Never, Publisher, Subscriber};
use crate::subjects::{CurrentValueSubject, Subject};

use super::ObservableObjectPublisher;

/// Value cell that announces changes.
pub struct Published<T> {
    subject: CurrentValueSubject<T, Never>,
    owner: Option<ObservableObjectPublisher>,
}

impl<T> Published<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a cell with no owner.
    pub fn new(value: T) -> Self {
        Self {
            subject: CurrentValueSubject::new(value),
            owner: None,
        }
    }

    /// Creates a cell that notifies `owner` before every change.
    pub fn wired(value: T, owner: &ObservableObjectPublisher) -> Self {
        Self {
            subject: CurrentValueSubject::new(value),
            owner: Some(owner.clone()),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.subject.value()
    }

    /// Notifies the owner, then stores and broadcasts `value`.
    pub fn set(&self, value: T) {
        if let Some(owner) = &self.owner {
            owner.send();
        }
        self.subject.send(value);
    }

    /// Applies `f` to a copy of the current value and stores the result.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.set(f(self.get()));
    }

    /// Publisher of the current value followed by every later one.
    pub fn publisher(&self) -> PublishedPublisher<T> {
        PublishedPublisher {
            subject: self.subject.clone(),
        }
    }

    /// True when the cell notifies an owner.
    pub fn is_wired(&self) -> bool {
        self.owner.is_some()
    }
}

impl<T> fmt::Debug for Published<T>
where
    T: Clone + Send + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Published")
            .field("value", &self.get())
            .field("wired", &self.is_wired())
            .finish()
    }
}

/// Publisher returned by [`Published::publisher`].
pub struct PublishedPublisher<T> {
    subject: CurrentValueSubject<T, Never>,
}

impl<T> Clone for PublishedPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T> Publisher for PublishedPublisher<T>
where
    T: Clone + Send + 'static,
{
    type Output = T;
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = Never>,
    {
        self.subject.subscribe(subscriber);
    }
}
