//! # Count: replaces the upstream values with their number.
//!
//! ## State machine
//! ```text
//!            value (count += 1, suppressed)
//!              ┌──────┐
//!              ▼      │
//! Awaiting ──► Counting ──Finished, demand > 0──► Emitting ──► Done
//!                 │  └───Finished, no demand───► Holding ──request──┘
//!                 └──────Failure(e)──► Done  (forwards Failure(e), no count)
//!
//! cancel() from any state ──► Cancelled (upstream cancelled, nothing else sent)
//! ```
//!
//! ## Rules
//! - Upstream demand is unbounded; downstream demand only gates the single count.
//! - The counter is a `u64` and **saturates** at `u64::MAX`.
//! - State is created per subscription.

use std::marker::PhantomData;
use std::mem;
use std::sync::{Arc, Mutex, Weak};

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Publisher, Subscriber, Subscription, SubscriptionRef,
};
use crate::error::ContractViolation;

/// Publishes the number of upstream values once the upstream finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count<U> {
    upstream: U,
}

impl<U> Count<U> {
    /// Wraps `upstream`.
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    /// The wrapped publisher.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}

impl<U> Publisher for Count<U>
where
    U: Publisher,
{
    type Output = u64;
    type Failure = U::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = u64, Failure = U::Failure>,
    {
        let inner = Arc::new_cyclic(|me| CountInner::<S, U::Output> {
            me: me.clone(),
            downstream: subscriber,
            state: Mutex::new(CountState {
                status: Status::Awaiting,
                count: 0,
                demand: Demand::NONE,
            }),
            _input: PhantomData,
        });
        self.upstream.subscribe(inner);
    }
}

enum Status {
    Awaiting,
    Counting(SubscriptionRef),
    Holding,
    Emitting,
    Done,
    Cancelled,
}

struct CountState {
    status: Status,
    count: u64,
    demand: Demand,
}

struct CountInner<S, I> {
    me: Weak<CountInner<S, I>>,
    downstream: S,
    state: Mutex<CountState>,
    _input: PhantomData<fn(I)>,
}

impl<S, I> CountInner<S, I>
where
    S: Subscriber<Input = u64>,
    I: Send + 'static,
{
    fn emit(&self, count: u64) {
        let _ = self.downstream.receive(count);

        let mut st = lock(&self.state);
        if !matches!(st.status, Status::Emitting) {
            return;
        }
        st.status = Status::Done;
        drop(st);
        self.downstream.receive_completion(Completion::Finished);
    }
}

impl<S, I> Subscriber for CountInner<S, I>
where
    S: Subscriber<Input = u64>,
    I: Send + 'static,
{
    type Input = I;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        let mut st = lock(&self.state);
        if !matches!(st.status, Status::Awaiting) {
            drop(st);
            subscription.cancel();
            ContractViolation::DuplicateSubscription { subscriber: "count" }.raise();
        }
        st.status = Status::Counting(subscription.clone());
        drop(st);

        if let Some(me) = self.me.upgrade() {
            self.downstream.receive_subscription(me);
        }
        if matches!(lock(&self.state).status, Status::Counting(_)) {
            subscription.request(Demand::Unbounded);
        }
    }

    fn receive(&self, _input: I) -> Demand {
        let mut st = lock(&self.state);
        if matches!(st.status, Status::Counting(_)) {
            st.count = st.count.saturating_add(1);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        let mut st = lock(&self.state);
        if !matches!(st.status, Status::Counting(_)) {
            return;
        }
        match completion {
            Completion::Finished if st.demand.has_demand() => {
                st.status = Status::Emitting;
                let count = st.count;
                drop(st);
                self.emit(count);
            }
            Completion::Finished => {
                st.status = Status::Holding;
            }
            Completion::Failure(e) => {
                st.status = Status::Done;
                drop(st);
                self.downstream.receive_completion(Completion::Failure(e));
            }
        }
    }
}

impl<S, I> Cancellable for CountInner<S, I>
where
    S: Subscriber<Input = u64>,
    I: Send + 'static,
{
    fn cancel(&self) {
        let prev = mem::replace(&mut lock(&self.state).status, Status::Cancelled);
        if let Status::Counting(upstream) = prev {
            upstream.cancel();
        }
    }
}

impl<S, I> Subscription for CountInner<S, I>
where
    S: Subscriber<Input = u64>,
    I: Send + 'static,
{
    fn request(&self, demand: Demand) {
        let mut st = lock(&self.state);
        st.demand += demand;
        if matches!(st.status, Status::Holding) && st.demand.has_demand() {
            st.status = Status::Emitting;
            let count = st.count;
            drop(st);
            self.emit(count);
        }
    }
}
