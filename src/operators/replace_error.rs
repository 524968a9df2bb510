//! # ReplaceError: turns an upstream failure into one value and `Finished`.
//!
//! ## Rules
//! - Values and demand pass through while the upstream is live.
//! - On `Failure(_)` the replacement value is sent once the downstream has
//!   demand left, then `Finished`. The failure type becomes [`Never`].
//! - `Finished` from upstream is forwarded as-is.

use std::marker::PhantomData;
use std::mem;
use std::sync::{Arc, Mutex, Weak};

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Never, Publisher, Subscriber, Subscription, SubscriptionRef,
};
use crate::error::ContractViolation;

/// Replaces any upstream failure with `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceError<U, T> {
    upstream: U,
    output: T,
}

impl<U, T> ReplaceError<U, T> {
    /// Wraps `upstream`; `output` is sent in place of a failure.
    pub fn new(upstream: U, output: T) -> Self {
        Self { upstream, output }
    }

    /// The wrapped publisher.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// The replacement value.
    pub fn output(&self) -> &T {
        &self.output
    }
}

impl<U> Publisher for ReplaceError<U, U::Output>
where
    U: Publisher,
    U::Output: Clone,
{
    type Output = U::Output;
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U::Output, Failure = Never>,
    {
        let inner = Arc::new_cyclic(|me| ReplaceInner::<S, U::Failure> {
            me: me.clone(),
            downstream: subscriber,
            state: Mutex::new(ReplaceState {
                status: Status::Awaiting,
                replacement: Some(self.output.clone()),
                demand: Demand::NONE,
            }),
            _failure: PhantomData,
        });
        self.upstream.subscribe(inner);
    }
}

enum Status {
    Awaiting,
    Relaying(SubscriptionRef),
    Holding,
    Emitting,
    Done,
    Cancelled,
}

struct ReplaceState<T> {
    status: Status,
    replacement: Option<T>,
    /// Downstream demand not yet used, tracked to gate the replacement.
    demand: Demand,
}

struct ReplaceInner<S: Subscriber, F> {
    me: Weak<ReplaceInner<S, F>>,
    downstream: S,
    state: Mutex<ReplaceState<S::Input>>,
    _failure: PhantomData<fn(F)>,
}

impl<S, F> ReplaceInner<S, F>
where
    S: Subscriber<Failure = Never>,
    S::Input: Send,
    F: 'static,
{
    fn emit(&self, value: S::Input) {
        let _ = self.downstream.receive(value);

        let mut st = lock(&self.state);
        if !matches!(st.status, Status::Emitting) {
            return;
        }
        st.status = Status::Done;
        drop(st);
        self.downstream.receive_completion(Completion::Finished);
    }

    fn take_replacement(st: &mut ReplaceState<S::Input>) -> Option<S::Input> {
        st.status = Status::Emitting;
        st.replacement.take()
    }
}

impl<S, F> Subscriber for ReplaceInner<S, F>
where
    S: Subscriber<Failure = Never>,
    S::Input: Send,
    F: 'static,
{
    type Input = S::Input;
    type Failure = F;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if !matches!(st.status, Status::Awaiting) {
                drop(st);
                subscription.cancel();
                ContractViolation::DuplicateSubscription {
                    subscriber: "replace_error",
                }
                .raise();
            }
            st.status = Status::Relaying(subscription);
        }
        if let Some(me) = self.me.upgrade() {
            self.downstream.receive_subscription(me);
        }
    }

    fn receive(&self, input: S::Input) -> Demand {
        {
            let mut st = lock(&self.state);
            if !matches!(st.status, Status::Relaying(_)) {
                return Demand::NONE;
            }
            let _ = st.demand.consume_one();
        }
        let more = self.downstream.receive(input);
        lock(&self.state).demand += more;
        more
    }

    fn receive_completion(&self, completion: Completion<F>) {
        let mut st = lock(&self.state);
        if !matches!(st.status, Status::Relaying(_)) {
            return;
        }
        match completion {
            Completion::Finished => {
                st.status = Status::Done;
                drop(st);
                self.downstream.receive_completion(Completion::Finished);
            }
            Completion::Failure(_) if st.demand.has_demand() => {
                let value = Self::take_replacement(&mut st);
                drop(st);
                if let Some(value) = value {
                    self.emit(value);
                }
            }
            Completion::Failure(_) => {
                st.status = Status::Holding;
            }
        }
    }
}

impl<S, F> Cancellable for ReplaceInner<S, F>
where
    S: Subscriber<Failure = Never>,
    S::Input: Send,
    F: 'static,
{
    fn cancel(&self) {
        let prev = {
            let mut st = lock(&self.state);
            st.replacement = None;
            mem::replace(&mut st.status, Status::Cancelled)
        };
        if let Status::Relaying(upstream) = prev {
            upstream.cancel();
        }
    }
}

impl<S, F> Subscription for ReplaceInner<S, F>
where
    S: Subscriber<Failure = Never>,
    S::Input: Send,
    F: 'static,
{
    fn request(&self, demand: Demand) {
        let mut st = lock(&self.state);
        st.demand += demand;
        if let Status::Relaying(upstream) = &st.status {
            let upstream = Arc::clone(upstream);
            drop(st);
            upstream.request(demand);
            return;
        }
        if matches!(st.status, Status::Holding) && st.demand.has_demand() {
            let value = Self::take_replacement(&mut st);
            drop(st);
            if let Some(value) = value {
                self.emit(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Signal};
    use crate::{PassthroughSubject, Sequence, Subject};

    #[test]
    fn test_failure_becomes_value_and_finish() {
        let subject = PassthroughSubject::<i32, &'static str>::new();
        let rec = Arc::new(Recorder::<i32, Never>::unbounded());
        ReplaceError::new(subject.clone(), -1).subscribe(Arc::clone(&rec));

        subject.send(1);
        subject.send_completion(Completion::Failure("bad"));
        assert_eq!(
            rec.signals(),
            vec![
                Signal::Subscription,
                Signal::Value(1),
                Signal::Value(-1),
                Signal::Completion(Completion::Finished)
            ]
        );
    }

    #[test]
    fn test_replacement_waits_for_demand() {
        let subject = PassthroughSubject::<i32, &'static str>::new();
        let rec = Arc::new(Recorder::<i32, Never>::new(Demand::max(1)));
        ReplaceError::new(subject.clone(), 0).subscribe(Arc::clone(&rec));

        subject.send(7);
        subject.send_completion(Completion::Failure("bad"));
        assert_eq!(rec.values(), vec![7]);
        assert!(!rec.is_terminated());

        rec.request(Demand::max(1));
        assert_eq!(rec.values(), vec![7, 0]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn test_finish_passes_through() {
        let rec = Arc::new(Recorder::<u8, Never>::unbounded());
        ReplaceError::new(Sequence::new(0..2u8), 9).subscribe(Arc::clone(&rec));
        assert_eq!(rec.values(), vec![0, 1]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }
}
