//! # PassthroughSubject: fan-out without memory.
//!
//! A value sent while a subscriber has no outstanding demand is lost for that
//! subscriber. Sending with no subscribers at all does nothing.

use std::fmt;
use std::sync::Arc;

use crate::core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};

use super::hub::{Forget, Hub};
use super::Subject;

/// Broadcasts values to every subscriber attached at the time of `send`.
///
/// Clones share the same subscribers.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use demandflow::{Never, PassthroughSubject, Publisher, Subject};
/// use demandflow::testing::Recorder;
///
/// let subject = PassthroughSubject::<u8, Never>::new();
/// subject.send(0); // nobody listens
///
/// let rec = Arc::new(Recorder::unbounded());
/// subject.subscribe(Arc::clone(&rec));
/// subject.send(1);
/// assert_eq!(rec.values(), vec![1]);
/// ```
pub struct PassthroughSubject<T, E> {
    hub: Arc<Hub<T, E, Forget>>,
}

impl<T, E> PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a subject with no subscribers.
    pub fn new() -> Self {
        Self {
            hub: Hub::passthrough(),
        }
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    /// True once a completion was sent.
    pub fn is_completed(&self) -> bool {
        self.hub.is_completed()
    }
}

impl<T, E> Default for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for PassthroughSubject<T, E> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<T, E> fmt::Debug for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassthroughSubject")
            .field("subscribers", &self.subscriber_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// Handles are equal when they share the same subscribers.
impl<T, E> PartialEq for PassthroughSubject<T, E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.hub, &other.hub)
    }
}

impl<T, E> Eq for PassthroughSubject<T, E> {}

impl<T, E> Publisher for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = T;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = E>,
    {
        self.hub.attach(Arc::new(subscriber));
    }
}

impl<T, E> Subject for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn send(&self, value: T) {
        self.hub.send(value);
    }

    fn send_completion(&self, completion: Completion<E>) {
        self.hub.send_completion(completion);
    }

    fn send_subscription(&self, subscription: SubscriptionRef) {
        self.hub.send_subscription(subscription);
    }
}

impl<T, E> Subscriber for PassthroughSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.hub.send_subscription(subscription);
    }

    fn receive(&self, input: T) -> Demand {
        self.hub.send(input);
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        self.hub.send_completion(completion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Signal};
    use crate::{Never, Sequence};

    #[test]
    fn test_send_without_subscribers_is_noop() {
        let subject = PassthroughSubject::<u32, Never>::new();
        subject.send(1);
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        subject.subscribe(Arc::clone(&rec));
        subject.send(2);
        assert_eq!(rec.values(), vec![2]);
    }

    #[test]
    fn test_respects_each_subscriber_demand() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let eager = Arc::new(Recorder::<u32, Never>::unbounded());
        let lazy = Arc::new(Recorder::<u32, Never>::new(Demand::max(1)));
        subject.subscribe(Arc::clone(&eager));
        subject.subscribe(Arc::clone(&lazy));

        (1..=3).for_each(|v| subject.send(v));
        assert_eq!(eager.values(), vec![1, 2, 3]);
        assert_eq!(lazy.values(), vec![1]);

        lazy.request(Demand::max(1));
        subject.send(4);
        assert_eq!(lazy.values(), vec![1, 4]);
    }

    #[test]
    fn test_completion_reaches_late_subscribers() {
        let subject = PassthroughSubject::<u32, &'static str>::new();
        subject.send_completion(Completion::Failure("closed"));
        subject.send_completion(Completion::Finished);
        subject.send(1);

        let rec = Arc::new(Recorder::<u32, &'static str>::new(Demand::NONE));
        subject.subscribe(Arc::clone(&rec));
        assert_eq!(
            rec.signals(),
            vec![
                Signal::Subscription,
                Signal::Completion(Completion::Failure("closed"))
            ]
        );
    }

    #[test]
    fn test_reentrant_send_is_queued() {
        struct Echo {
            subject: PassthroughSubject<u32, Never>,
            seen: std::sync::Mutex<Vec<u32>>,
        }

        impl Subscriber for Echo {
            type Input = u32;
            type Failure = Never;

            fn receive_subscription(&self, subscription: SubscriptionRef) {
                subscription.request(Demand::Unbounded);
            }

            fn receive(&self, input: u32) -> Demand {
                self.seen.lock().unwrap().push(input);
                if input < 3 {
                    self.subject.send(input + 1);
                }
                Demand::NONE
            }

            fn receive_completion(&self, _completion: Completion<Never>) {}
        }

        let subject = PassthroughSubject::<u32, Never>::new();
        let echo = Arc::new(Echo {
            subject: subject.clone(),
            seen: std::sync::Mutex::new(Vec::new()),
        });
        subject.subscribe(Arc::clone(&echo));
        subject.send(0);
        assert_eq!(*echo.seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_relays_upstream() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        subject.subscribe(Arc::clone(&rec));

        Sequence::new(0..3).subscribe(subject.clone());
        assert_eq!(rec.values(), vec![0, 1, 2]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
        assert!(subject.is_completed());
    }

    #[test]
    fn test_cancel_detaches() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        subject.subscribe(Arc::clone(&rec));
        assert_eq!(subject.subscriber_count(), 1);
        rec.cancel();
        assert_eq!(subject.subscriber_count(), 0);
        subject.send(9);
        assert!(rec.values().is_empty());
    }

    #[test]
    fn test_first_upstream_completion_releases_all_upstreams() {
        let first = PassthroughSubject::<u32, Never>::new();
        let second = PassthroughSubject::<u32, Never>::new();
        let relay = PassthroughSubject::<u32, Never>::new();
        first.subscribe(relay.clone());
        second.subscribe(relay.clone());
        assert_eq!(relay.hub.upstream_count(), 2);
        assert_eq!(second.subscriber_count(), 1);

        first.send_completion(Completion::Finished);
        assert!(relay.is_completed());
        assert_eq!(relay.hub.upstream_count(), 0);
        assert_eq!(second.subscriber_count(), 0);
    }

    #[test]
    fn test_concurrent_senders_never_overlap() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        subject.subscribe(Arc::clone(&rec));

        std::thread::scope(|scope| {
            for t in 0..4 {
                let subject = subject.clone();
                scope.spawn(move || (0..100).for_each(|i| subject.send(t * 100 + i)));
            }
        });
        let mut values = rec.values();
        values.sort_unstable();
        assert_eq!(values, (0..400).collect::<Vec<_>>());
    }
}
