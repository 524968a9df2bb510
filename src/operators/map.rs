//! # Map: transforms every value.
//!
//! Demand, cancellation and the terminal signal pass through untouched; the
//! upstream subscription is handed to the downstream as-is.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};

/// Applies `transform` to each upstream value.
pub struct Map<U, F> {
    upstream: U,
    transform: Arc<F>,
}

impl<U, F> Map<U, F> {
    /// Wraps `upstream` with `transform`.
    pub fn new(upstream: U, transform: F) -> Self {
        Self {
            upstream,
            transform: Arc::new(transform),
        }
    }

    /// The wrapped publisher.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

impl<U: Clone, F> Clone for Map<U, F> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<U: fmt::Debug, F> fmt::Debug for Map<U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}

impl<U, F, O> Publisher for Map<U, F>
where
    U: Publisher,
    F: Fn(U::Output) -> O + Send + Sync + 'static,
    O: Send + 'static,
{
    type Output = O;
    type Failure = U::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = O, Failure = U::Failure>,
    {
        self.upstream.subscribe(MapSubscriber {
            downstream: subscriber,
            transform: Arc::clone(&self.transform),
            _input: PhantomData::<fn(U::Output)>,
        });
    }
}

struct MapSubscriber<S, F, I> {
    downstream: S,
    transform: Arc<F>,
    _input: PhantomData<fn(I)>,
}

impl<S, F, I> Subscriber for MapSubscriber<S, F, I>
where
    S: Subscriber,
    F: Fn(I) -> S::Input + Send + Sync + 'static,
    I: 'static,
{
    type Input = I;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.downstream.receive_subscription(subscription);
    }

    fn receive(&self, input: I) -> Demand {
        self.downstream.receive((self.transform)(input))
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        self.downstream.receive_completion(completion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;
    use crate::{Fail, Never, Sequence};

    #[test]
    fn test_maps_values_and_keeps_demand() {
        let rec = Arc::new(Recorder::<String, Never>::new(Demand::max(2)));
        Map::new(Sequence::new(1..=4), |v: i32| format!("#{v}")).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec!["#1", "#2"]);

        rec.request(Demand::Unbounded);
        assert_eq!(rec.values().len(), 4);
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn test_failure_passes_through() {
        let rec = Arc::new(Recorder::<u8, &'static str>::unbounded());
        Map::new(Fail::<u8, &'static str>::new("e"), |v: u8| v + 1).subscribe(Arc::clone(&rec));
        assert_eq!(rec.completion(), Some(Completion::Failure("e")));
    }
}
