//! # Subscription: the live link between one publisher and one subscriber.
//!
//! A subscriber receives exactly one [`Subscription`] and uses it to
//! - **request** demand ([`Subscription::request`]), and
//! - **cancel** the link ([`Cancellable::cancel`]).
//!
//! ## Rules
//! - `request` and `cancel` on a cancelled or terminated subscription are no-ops.
//! - `cancel` is idempotent and may be called from inside a delivery callback.
//! - Requests accumulate; they never replace earlier demand.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::Demand;

/// Something that can be stopped.
pub trait Cancellable: Send + Sync {
    /// Stops the activity and releases its resources.
    ///
    /// Calling it more than once has no further effect.
    fn cancel(&self);
}

/// Producer-side handle given to a subscriber.
pub trait Subscription: Cancellable {
    /// Authorizes the publisher to deliver `demand` more values.
    fn request(&self, demand: Demand);
}

/// Shared subscription handle.
pub type SubscriptionRef = Arc<dyn Subscription>;

impl Cancellable for CancellationToken {
    fn cancel(&self) {
        CancellationToken::cancel(self);
    }
}

/// Subscription that ignores demand and cancellation.
///
/// Handed out by publishers that complete without producing values.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySubscription;

impl Cancellable for EmptySubscription {
    fn cancel(&self) {}
}

impl Subscription for EmptySubscription {
    fn request(&self, _demand: Demand) {}
}

/// Factory for shared no-op subscriptions.
pub struct Subscriptions;

impl Subscriptions {
    /// Returns a subscription that does nothing.
    pub fn empty() -> SubscriptionRef {
        Arc::new(EmptySubscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_subscription_is_inert() {
        let sub = Subscriptions::empty();
        sub.request(Demand::Unbounded);
        sub.cancel();
        sub.cancel();
    }

    #[test]
    fn test_token_is_cancellable() {
        let token = CancellationToken::new();
        let c: &dyn Cancellable = &token;
        c.cancel();
        c.cancel();
        assert!(token.is_cancelled());
    }
}
