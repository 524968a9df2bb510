//! # Publisher: the producing side of a subscription.
//!
//! `subscribe` attaches a subscriber and synchronously hands it a
//! [`Subscription`](super::Subscription). Values then flow against the demand the
//! subscriber requests, followed by one terminal [`Completion`](super::Completion).
//!
//! Publisher values are **descriptions**: every `subscribe` call builds fresh
//! per-subscription state, so one publisher can be subscribed to many times
//! independently.
//!
//! Operators are chained through [`PublisherExt`](crate::PublisherExt).

use super::Subscriber;

/// Source of values for any number of independent subscriptions.
pub trait Publisher {
    /// Type of values produced.
    type Output: Send + 'static;
    /// Type of the failure this publisher can terminate with.
    type Failure: Send + 'static;

    /// Attaches `subscriber` and starts a new subscription.
    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>;
}
