//! # Values: a publisher consumed as an async `Stream`.
//!
//! ## Architecture
//! ```text
//! publisher ──► ValuesLink (Subscriber) ──► unbounded mpsc ──► Values (Stream)
//!                     ▲                                            │
//!                     └────────── request(1) per item ◄────────────┘
//! ```
//!
//! ## Rules
//! - `Config::values_demand` is requested up front (`0` means unbounded).
//! - With finite demand, one more value is requested for every item the
//!   stream yields, so at most `values_demand` items wait in the channel.
//! - `Failure(e)` is yielded as `Err(e)`, then the stream ends; `Finished` ends
//!   the stream.
//! - Dropping the stream cancels the subscription.

use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::core::sync::lock;
use crate::core::{Completion, Demand, Subscriber, SubscriptionRef};

struct LinkState<T, E> {
    tx: Option<mpsc::UnboundedSender<Result<T, E>>>,
    subscription: Option<SubscriptionRef>,
    cancelled: bool,
}

/// Subscriber side of [`Values`].
pub(crate) struct ValuesLink<T, E> {
    initial: Demand,
    state: Mutex<LinkState<T, E>>,
}

impl<T, E> ValuesLink<T, E> {
    fn request(&self, demand: Demand) {
        let subscription = lock(&self.state).subscription.clone();
        if let Some(subscription) = subscription {
            subscription.request(demand);
        }
    }

    fn cancel(&self) {
        let subscription = {
            let mut st = lock(&self.state);
            st.cancelled = true;
            st.tx = None;
            st.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

impl<T, E> Subscriber for ValuesLink<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if st.cancelled || st.subscription.is_some() {
                drop(st);
                subscription.cancel();
                return;
            }
            st.subscription = Some(subscription.clone());
        }
        subscription.request(self.initial);
    }

    fn receive(&self, input: T) -> Demand {
        if let Some(tx) = &lock(&self.state).tx {
            let _ = tx.send(Ok(input));
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let tx = {
            let mut st = lock(&self.state);
            st.subscription = None;
            st.tx.take()
        };
        if let (Some(tx), Completion::Failure(e)) = (tx, completion) {
            let _ = tx.send(Err(e));
        }
    }
}

/// Async stream over the values of a publisher.
///
/// Created by [`PublisherExt::values`](crate::PublisherExt::values).
///
/// ## Example
/// ```rust
/// use futures::StreamExt;
/// use demandflow::{PublisherExt, Sequence};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let items: Vec<_> = Sequence::new(1..=3).values().collect().await;
/// assert_eq!(items, vec![Ok(1), Ok(2), Ok(3)]);
/// # }
/// ```
pub struct Values<T, E> {
    rx: mpsc::UnboundedReceiver<Result<T, E>>,
    link: Arc<ValuesLink<T, E>>,
    replenish: bool,
}

impl<T, E> Values<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Builds the link; subscribe the returned link to start the flow.
    pub(crate) fn new(initial: Demand) -> (Self, Arc<ValuesLink<T, E>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let link = Arc::new(ValuesLink {
            initial,
            state: Mutex::new(LinkState {
                tx: Some(tx),
                subscription: None,
                cancelled: false,
            }),
        });
        let values = Self {
            rx,
            link: Arc::clone(&link),
            replenish: !initial.is_unbounded(),
        };
        (values, link)
    }

    /// Cancels the subscription; items already buffered are still yielded.
    pub fn cancel(&mut self) {
        self.link.cancel();
    }
}

impl<T, E> Unpin for Values<T, E> {}

impl<T, E> Stream for Values<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = Result<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(value))) => {
                if this.replenish {
                    this.link.request(Demand::max(1));
                }
                Poll::Ready(Some(Ok(value)))
            }
            other => other,
        }
    }
}

impl<T, E> Drop for Values<T, E> {
    fn drop(&mut self) {
        self.link.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Completion, Config, Fail, Never, PassthroughSubject, PublisherExt, Sequence, Subject,
    };
    use futures::StreamExt;

    #[tokio::test]
    async fn test_collects_sequence() {
        let items: Vec<_> = Sequence::new(0..100).values().collect().await;
        assert_eq!(items.len(), 100);
        assert!(items.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_failure_is_last_item() {
        let mut values = Fail::<u8, &'static str>::new("bad").values();
        assert_eq!(values.next().await, Some(Err("bad")));
        assert_eq!(values.next().await, None);
    }

    #[tokio::test]
    async fn test_bounded_window_replenishes() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let config = Config {
            values_demand: 2,
            ..Config::default()
        };
        let mut values = subject.clone().values_with(&config);

        (0..5).for_each(|v| subject.send(v));
        assert_eq!(values.next().await, Some(Ok(0)));
        assert_eq!(values.next().await, Some(Ok(1)));

        subject.send(5);
        subject.send(6);
        assert_eq!(values.next().await, Some(Ok(5)));
        assert_eq!(values.next().await, Some(Ok(6)));
        subject.send_completion(Completion::Finished);
        assert_eq!(values.next().await, None);
    }

    #[tokio::test]
    async fn test_drop_cancels_subscription() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let values = subject.clone().values();
        assert_eq!(subject.subscriber_count(), 1);
        drop(values);
        assert_eq!(subject.subscriber_count(), 0);
    }
}
