//! # CurrentValueSubject: fan-out that remembers the latest value.
//!
//! ## Rules
//! - A new subscriber receives the current value as soon as it requests demand.
//! - A subscriber without demand keeps only the most recent value; older ones
//!   are replaced, never queued.
//! - [`CurrentValueSubject::value`] always reflects the last `send`.

use std::fmt;
use std::sync::Arc;

use crate::core::{Completion, Demand, Publisher, Subscriber, SubscriptionRef};

use super::hub::{Hub, Latest};
use super::Subject;

/// Broadcasts values and replays the current one to new subscribers.
pub struct CurrentValueSubject<T, E> {
    hub: Arc<Hub<T, E, Latest<T>>>,
}

impl<T, E> CurrentValueSubject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a subject holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            hub: Hub::current_value(value),
        }
    }

    /// The latest value sent, or the initial one.
    pub fn value(&self) -> T {
        self.hub.current()
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

impl<T, E> Clone for CurrentValueSubject<T, E> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<T, E> fmt::Debug for CurrentValueSubject<T, E>
where
    T: Clone + Send + fmt::Debug + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentValueSubject")
            .field("value", &self.value())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T, E> Publisher for CurrentValueSubject<T, E>
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

impl<T, E> Subject for CurrentValueSubject<T, E>
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

impl<T, E> Subscriber for CurrentValueSubject<T, E>
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
    use crate::Never;

    #[test]
    fn test_replays_current_value_on_demand() {
        let subject = CurrentValueSubject::<&str, Never>::new("a");
        subject.send("b");

        let rec = Arc::new(Recorder::<&str, Never>::new(Demand::NONE));
        subject.subscribe(Arc::clone(&rec));
        assert_eq!(rec.signals(), vec![Signal::Subscription]);

        rec.request(Demand::max(1));
        assert_eq!(rec.values(), vec!["b"]);
    }

    #[test]
    fn test_value_follows_sends_and_survives_completion() {
        let subject = CurrentValueSubject::<u32, Never>::new(4);
        assert_eq!(subject.value(), 4);
        subject.send(5);
        subject.send_completion(Completion::Finished);
        subject.send(6);
        assert_eq!(subject.value(), 5);
        assert_eq!(format!("{subject:?}"), "CurrentValueSubject { value: 5, subscribers: 0 }");
    }

    #[test]
    fn test_keeps_only_latest_without_demand() {
        let subject = CurrentValueSubject::<u32, Never>::new(0);
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::max(1)));
        subject.subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![0]);

        (1..=5).for_each(|v| subject.send(v));
        assert_eq!(subject.value(), 5);

        rec.request(Demand::max(2));
        assert_eq!(rec.values(), vec![0, 5]);
        subject.send(6);
        assert_eq!(rec.values(), vec![0, 5, 6]);
    }

    #[test]
    fn test_unbounded_sees_every_value() {
        let subject = CurrentValueSubject::<u32, Never>::new(1);
        let rec = Arc::new(Recorder::<u32, Never>::unbounded());
        subject.subscribe(Arc::clone(&rec));
        subject.send(2);
        subject.send_completion(Completion::Finished);
        subject.send(3);
        assert_eq!(
            rec.signals(),
            vec![
                Signal::Subscription,
                Signal::Value(1),
                Signal::Value(2),
                Signal::Completion(Completion::Finished)
            ]
        );
        assert_eq!(subject.value(), 2);
    }
}
