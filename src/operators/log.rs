//! # Log: records every signal as a `tracing` event.
//!
//! Signals pass through unchanged; the operator only observes them.
//!
//! ## Output (with a `fmt` subscriber)
//! ```text
//! DEBUG demandflow::operators::log: receive subscription prefix="numbers"
//! DEBUG demandflow::operators::log: request demand prefix="numbers" demand=max(2)
//! DEBUG demandflow::operators::log: receive value prefix="numbers" value=1
//! DEBUG demandflow::operators::log: receive completion prefix="numbers" completion=finished
//! DEBUG demandflow::operators::log: cancel prefix="numbers"
//! ```
//!
//! ## Example
//! ```rust
//! use demandflow::{PublisherExt, Sequence};
//!
//! let _handle = Sequence::new(0..3).log("numbers").sink(|_| {}, |_| {});
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Publisher, Subscriber, Subscription, SubscriptionRef,
};

/// Logs the signals of `upstream` under `prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log<U> {
    upstream: U,
    prefix: String,
}

impl<U> Log<U> {
    /// Wraps `upstream`; events carry `prefix`.
    pub fn new(upstream: U, prefix: impl Into<String>) -> Self {
        Self {
            upstream,
            prefix: prefix.into(),
        }
    }

    /// The label attached to every event.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<U> Publisher for Log<U>
where
    U: Publisher,
    U::Output: fmt::Debug,
    U::Failure: fmt::Debug,
{
    type Output = U::Output;
    type Failure = U::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U::Output, Failure = U::Failure>,
    {
        let prefix: Arc<str> = Arc::from(self.prefix.as_str());
        self.upstream.subscribe(Arc::new_cyclic(|me| LogInner {
            me: me.clone(),
            prefix,
            downstream: subscriber,
            upstream: Mutex::new(None),
        }));
    }
}

struct LogInner<S> {
    me: Weak<LogInner<S>>,
    prefix: Arc<str>,
    downstream: S,
    upstream: Mutex<Option<SubscriptionRef>>,
}

impl<S> Subscriber for LogInner<S>
where
    S: Subscriber,
    S::Input: fmt::Debug,
    S::Failure: fmt::Debug,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        debug!(prefix = %self.prefix, "receive subscription");
        *lock(&self.upstream) = Some(subscription);
        if let Some(me) = self.me.upgrade() {
            self.downstream.receive_subscription(me);
        }
    }

    fn receive(&self, input: S::Input) -> Demand {
        debug!(prefix = %self.prefix, value = ?input, "receive value");
        let more = self.downstream.receive(input);
        if more.has_demand() {
            debug!(prefix = %self.prefix, demand = %more, "request demand (synchronous)");
        }
        more
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        match &completion {
            Completion::Finished => {
                debug!(prefix = %self.prefix, completion = "finished", "receive completion");
            }
            Completion::Failure(e) => {
                debug!(prefix = %self.prefix, completion = "failure", error = ?e, "receive completion");
            }
        }
        lock(&self.upstream).take();
        self.downstream.receive_completion(completion);
    }
}

impl<S> Cancellable for LogInner<S>
where
    S: Subscriber,
{
    fn cancel(&self) {
        let upstream = lock(&self.upstream).take();
        if let Some(upstream) = upstream {
            debug!(prefix = %self.prefix, "cancel");
            upstream.cancel();
        }
    }
}

impl<S> Subscription for LogInner<S>
where
    S: Subscriber,
{
    fn request(&self, demand: Demand) {
        let upstream = lock(&self.upstream).clone();
        if let Some(upstream) = upstream {
            debug!(prefix = %self.prefix, demand = %demand, "request demand");
            upstream.request(demand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Signal};
    use crate::{Fail, Never, Sequence};

    #[test]
    fn test_relays_signals_unchanged() {
        let rec = Arc::new(Recorder::<u8, Never>::new(Demand::max(1)));
        Log::new(Sequence::new(vec![1u8, 2]), "seq").subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![1]);

        rec.request(Demand::max(1));
        assert_eq!(
            rec.signals(),
            vec![
                Signal::Subscription,
                Signal::Value(1),
                Signal::Value(2),
                Signal::Completion(Completion::Finished)
            ]
        );
    }

    #[test]
    fn test_relays_failure_and_cancel() {
        let rec = Arc::new(Recorder::<u8, &'static str>::unbounded());
        Log::new(Fail::<u8, &'static str>::new("x"), "fail").subscribe(Arc::clone(&rec));
        assert_eq!(rec.completion(), Some(Completion::Failure("x")));

        let rec = Arc::new(Recorder::<u8, Never>::unbounded().cancel_after(1));
        Log::new(Sequence::new(0..10u8), "cancel").subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![0]);
        assert_eq!(Log::new(Sequence::new(0..1), "a").prefix(), "a");
    }
}
