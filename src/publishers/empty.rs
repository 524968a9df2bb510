//! # Empty: a publisher with no values.

use std::fmt;
use std::marker::PhantomData;

use crate::core::{Completion, Publisher, Subscriber, Subscriptions};

/// Publishes no values; finishes immediately, or never terminates.
pub struct Empty<T, E> {
    complete_immediately: bool,
    _types: PhantomData<fn() -> (T, E)>,
}

impl<T, E> Empty<T, E> {
    /// Finishes right after the subscription.
    pub fn new() -> Self {
        Self {
            complete_immediately: true,
            _types: PhantomData,
        }
    }

    /// Never sends anything after the subscription.
    pub fn never() -> Self {
        Self {
            complete_immediately: false,
            _types: PhantomData,
        }
    }

    /// True when subscribers receive `Finished` immediately.
    pub fn completes_immediately(&self) -> bool {
        self.complete_immediately
    }
}

impl<T, E> Default for Empty<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Empty<T, E> {
    fn clone(&self) -> Self {
        Self {
            complete_immediately: self.complete_immediately,
            _types: PhantomData,
        }
    }
}

impl<T, E> fmt::Debug for Empty<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Empty")
            .field("complete_immediately", &self.complete_immediately)
            .finish()
    }
}

impl<T, E> PartialEq for Empty<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.complete_immediately == other.complete_immediately
    }
}

impl<T, E> Eq for Empty<T, E> {}

impl<T, E> Publisher for Empty<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        subscriber.receive_subscription(Subscriptions::empty());
        if self.complete_immediately {
            subscriber.receive_completion(Completion::Finished);
        }
    }
}
