//! # Subject: a publisher that callers push into.

use crate::core::{Completion, Publisher, SubscriptionRef};

/// Publisher whose signals are injected from outside.
///
/// Every subject is also usable as a [`Subscriber`](crate::Subscriber): attached
/// to an upstream it requests unbounded demand and relays what it receives.
pub trait Subject: Publisher {
    /// Broadcasts a value to the current subscribers.
    fn send(&self, value: Self::Output);

    /// Terminates every current and future subscription with `completion`.
    ///
    /// Only the first call has an effect.
    fn send_completion(&self, completion: Completion<Self::Failure>);

    /// Attaches an upstream subscription and requests unbounded demand from it.
    fn send_subscription(&self, subscription: SubscriptionRef);
}
