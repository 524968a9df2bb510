//! # Sequence: emits the items of an iterable against demand.
//!
//! ## Rules
//! - Values are emitted only while demand is outstanding.
//! - `Finished` is sent as soon as the iterator is known to be exhausted,
//!   without waiting for further demand. An empty iterable finishes right after
//!   the subscription.
//! - `request` called from inside `receive` only adds demand: the emission loop
//!   already running picks it up, so recursion depth stays constant.
//! - Concurrent `request` calls never emit in parallel; one caller drains,
//!   the others add demand.
//! - `cancel` drops the iterator immediately.

use std::iter::Peekable;
use std::sync::{Arc, Mutex};

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Never, Publisher, Subscriber, Subscription, Subscriptions,
};

/// Publishes every item of a cloneable iterable, then finishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence<I> {
    items: I,
}

impl<I> Sequence<I> {
    /// Creates a publisher for `items`; each subscription iterates a fresh clone.
    pub fn new(items: I) -> Self {
        Self { items }
    }

    /// The stored iterable.
    pub fn items(&self) -> &I {
        &self.items
    }
}

impl<I> Publisher for Sequence<I>
where
    I: IntoIterator + Clone,
    I::Item: Send + 'static,
    I::IntoIter: Send + 'static,
{
    type Output = I::Item;
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = I::Item, Failure = Never>,
    {
        let mut iter = self.items.clone().into_iter().peekable();
        if iter.peek().is_none() {
            subscriber.receive_subscription(Subscriptions::empty());
            subscriber.receive_completion(Completion::Finished);
            return;
        }
        let sub = Arc::new(SequenceSubscription {
            downstream: subscriber,
            state: Mutex::new(SequenceState {
                iter: Some(iter),
                demand: Demand::NONE,
                emitting: false,
                done: false,
            }),
        });
        sub.downstream.receive_subscription(sub.clone());
    }
}

struct SequenceState<It: Iterator> {
    iter: Option<Peekable<It>>,
    demand: Demand,
    emitting: bool,
    done: bool,
}

struct SequenceSubscription<S, It: Iterator> {
    downstream: S,
    state: Mutex<SequenceState<It>>,
}

impl<S, It> Cancellable for SequenceSubscription<S, It>
where
    S: Subscriber<Input = It::Item>,
    It: Iterator + Send,
    It::Item: Send,
{
    fn cancel(&self) {
        let mut st = lock(&self.state);
        st.done = true;
        st.iter = None;
    }
}

impl<S, It> Subscription for SequenceSubscription<S, It>
where
    S: Subscriber<Input = It::Item>,
    It: Iterator + Send,
    It::Item: Send,
{
    fn request(&self, demand: Demand) {
        let mut st = lock(&self.state);
        if st.done {
            return;
        }
        st.demand += demand;
        if st.emitting {
            return;
        }
        st.emitting = true;

        loop {
            if !st.demand.has_demand() {
                st.emitting = false;
                return;
            }
            let next = {
                let state = &mut *st;
                match state.iter.as_mut() {
                    Some(iter) => iter.next().map(|v| (v, iter.peek().is_none())),
                    None => None,
                }
            };
            let Some((value, exhausted)) = next else {
                st.done = true;
                st.iter = None;
                drop(st);
                self.downstream.receive_completion(Completion::Finished);
                return;
            };
            let _ = st.demand.consume_one();
            drop(st);

            let more = self.downstream.receive(value);

            st = lock(&self.state);
            if st.done {
                return;
            }
            if exhausted {
                st.done = true;
                st.iter = None;
                drop(st);
                self.downstream.receive_completion(Completion::Finished);
                return;
            }
            st.demand += more;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Signal};

    #[test]
    fn test_emits_against_demand_then_finishes() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::max(2)));
        Sequence::new(vec![1, 2, 3, 4]).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![1, 2]);
        assert!(!rec.is_terminated());

        rec.request(Demand::max(2));
        assert_eq!(rec.values(), vec![1, 2, 3, 4]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn test_finishes_without_extra_demand() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::max(3)));
        Sequence::new(0..3).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![0, 1, 2]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
        assert_eq!(rec.outstanding(), Demand::NONE);
    }

    #[test]
    fn test_empty_sequence_finishes_immediately() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::NONE));
        Sequence::new(Vec::<u32>::new()).subscribe(Arc::clone(&rec));
        assert_eq!(
            rec.signals(),
            vec![Signal::Subscription, Signal::Completion(Completion::Finished)]
        );
    }

    #[test]
    fn test_demand_returned_from_receive_is_added() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::max(1)).with_demand_per_value(Demand::max(1)));
        Sequence::new(0..100).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), (0..100).collect::<Vec<_>>());
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn test_cancel_from_inside_receive() {
        let rec = Arc::new(Recorder::<u32, Never>::unbounded().cancel_after(3));
        Sequence::new(0..10).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![0, 1, 2]);
        assert_eq!(rec.completion(), None);
    }

    #[test]
    fn test_cancel_on_last_value_suppresses_completion() {
        let rec = Arc::new(Recorder::<u32, Never>::unbounded().cancel_after(2));
        Sequence::new(vec![1, 2]).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![1, 2]);
        assert_eq!(rec.completion(), None);
    }

    #[test]
    fn test_resubscribe_restarts_from_the_beginning() {
        let seq = Sequence::new(vec!['a', 'b']);
        for _ in 0..2 {
            let rec = Arc::new(Recorder::<char, Never>::unbounded());
            seq.subscribe(Arc::clone(&rec));
            assert_eq!(rec.values(), vec!['a', 'b']);
        }
    }

    #[test]
    fn test_concurrent_requests_never_over_deliver() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::NONE));
        Sequence::new(0..1000).subscribe(Arc::clone(&rec));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let rec = Arc::clone(&rec);
                scope.spawn(move || {
                    for _ in 0..250 {
                        rec.request(Demand::max(1));
                    }
                });
            }
        });
        assert_eq!(rec.values(), (0..1000).collect::<Vec<_>>());
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }
}
