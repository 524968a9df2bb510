//! # Subscriber: the consuming side of a subscription.
//!
//! A subscriber receives, in order:
//! ```text
//! receive_subscription(sub) ──► receive(value)* ──► receive_completion(c)
//!        (exactly once)          (≤ demand)          (at most once)
//! ```
//!
//! ## Rules
//! - Methods take `&self`: subscribers keep their own state behind interior
//!   mutability, which lets a callback cancel or request reentrantly.
//! - Calls for one subscription never overlap; the producer serializes them.
//! - The [`Demand`] returned by [`Subscriber::receive`] is **added** to the
//!   outstanding demand (`Demand::NONE` means "no more than already requested").
//! - A subscriber should drop its [`SubscriptionRef`] once it is cancelled or
//!   completed, which breaks the producer ⇄ subscriber reference cycle.

use std::sync::Arc;

use super::{Completion, Demand, SubscriptionRef};

/// Consumer of values and a terminal signal.
pub trait Subscriber: Send + Sync + 'static {
    /// Type of values received.
    type Input;
    /// Type of the failure carried by [`Completion::Failure`].
    type Failure;

    /// Called once, before any other signal.
    fn receive_subscription(&self, subscription: SubscriptionRef);

    /// Called for every value, never more often than demanded.
    ///
    /// Returns additional demand.
    fn receive(&self, input: Self::Input) -> Demand;

    /// Called once when the publisher terminates.
    fn receive_completion(&self, completion: Completion<Self::Failure>);
}

/// Type-erased subscriber.
pub type AnySubscriber<T, E> = Arc<dyn Subscriber<Input = T, Failure = E>>;

impl<S> Subscriber for Arc<S>
where
    S: Subscriber + ?Sized,
{
    type Input = S::Input;
    type Failure = S::Failure;

    #[inline]
    fn receive_subscription(&self, subscription: SubscriptionRef) {
        (**self).receive_subscription(subscription)
    }

    #[inline]
    fn receive(&self, input: Self::Input) -> Demand {
        (**self).receive(input)
    }

    #[inline]
    fn receive_completion(&self, completion: Completion<Self::Failure>) {
        (**self).receive_completion(completion)
    }
}
