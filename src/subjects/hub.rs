//! # Hub: state shared by every handle of one subject.
//!
//! ## Architecture
//! ```text
//!   send(v) ─────────┐
//!   send_completion ─┤        Hub (Mutex<HubState>)
//!   upstream signals ┘   ┌──────────────────────────────┐
//!                        │ conduits: [C1, C2, ...]      │──► C1 ──► subscriber 1
//!                        │ completion: Option<..>       │──► C2 ──► subscriber 2
//!                        │ upstreams: [SubscriptionRef] │
//!                        │ retained: R (Forget|Latest)  │
//!                        └──────────────────────────────┘
//! ```
//!
//! ## Rules
//! - The hub lock only guards bookkeeping; conduits are snapshotted and called
//!   after the lock is released.
//! - After completion, late subscribers get an empty subscription and the
//!   stored completion; values are ignored.
//! - Upstream subscriptions are held until the subject completes. An upstream
//!   can only end by delivering a completion, and the first completion from any
//!   upstream completes the subject, which cancels and releases all of them.
//! - What is remembered between sends is decided by the `R` slot: [`Forget`]
//!   for passthrough subjects, [`Latest`] for current-value subjects.

use std::sync::{Arc, Mutex, Weak};

use crate::core::sync::lock;
use crate::core::{AnySubscriber, Completion, Demand, SubscriptionRef, Subscriptions};

use super::conduit::Conduit;

/// What a hub keeps of the values it broadcasts.
pub(crate) trait Retain<T>: Send + 'static {
    /// Records a value that was just sent.
    fn keep(&mut self, value: &T);

    /// Value a new subscriber starts from, if any.
    fn seed(&self) -> Option<T>;
}

/// Keeps nothing.
pub(crate) struct Forget;

impl<T> Retain<T> for Forget {
    fn keep(&mut self, _value: &T) {}

    fn seed(&self) -> Option<T> {
        None
    }
}

/// Always holds the latest value.
pub(crate) struct Latest<T>(T);

impl<T> Retain<T> for Latest<T>
where
    T: Clone + Send + 'static,
{
    fn keep(&mut self, value: &T) {
        self.0 = value.clone();
    }

    fn seed(&self) -> Option<T> {
        Some(self.0.clone())
    }
}

/// Removal of a conduit, independent of the hub's value types.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

struct HubState<T, E, R> {
    conduits: Vec<Arc<Conduit<T, E>>>,
    completion: Option<Completion<E>>,
    upstreams: Vec<SubscriptionRef>,
    next_id: u64,
    retained: R,
}

pub(crate) struct Hub<T, E, R> {
    state: Mutex<HubState<T, E, R>>,
}

impl<T, E, R> Hub<T, E, R> {
    pub(crate) fn subscriber_count(&self) -> usize {
        lock(&self.state).conduits.len()
    }

    pub(crate) fn is_completed(&self) -> bool {
        lock(&self.state).completion.is_some()
    }
}

impl<T, E, R> Detach for Hub<T, E, R>
where
    T: Send + 'static,
    E: Send + 'static,
    R: Send + 'static,
{
    fn detach(&self, id: u64) {
        lock(&self.state).conduits.retain(|c| c.id() != id);
    }
}

impl<T, E> Hub<T, E, Forget> {
    pub(crate) fn passthrough() -> Arc<Self> {
        Self::with_retained(Forget)
    }
}

impl<T, E> Hub<T, E, Latest<T>> {
    pub(crate) fn current_value(value: T) -> Arc<Self> {
        Self::with_retained(Latest(value))
    }

    /// The latest value sent, or the initial one.
    pub(crate) fn current(&self) -> T
    where
        T: Clone,
    {
        lock(&self.state).retained.0.clone()
    }
}

impl<T, E, R> Hub<T, E, R> {
    fn with_retained(retained: R) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HubState {
                conduits: Vec::new(),
                completion: None,
                upstreams: Vec::new(),
                next_id: 0,
                retained,
            }),
        })
    }
}

impl<T, E, R> Hub<T, E, R>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    R: Retain<T>,
{
    pub(crate) fn attach(self: &Arc<Self>, downstream: AnySubscriber<T, E>) {
        let mut st = lock(&self.state);
        if let Some(completion) = st.completion.clone() {
            drop(st);
            downstream.receive_subscription(Subscriptions::empty());
            downstream.receive_completion(completion);
            return;
        }
        let id = st.next_id;
        st.next_id += 1;
        let hub: Weak<dyn Detach> = Arc::<Self>::downgrade(self);
        let conduit = Arc::new(Conduit::new(id, hub, downstream, st.retained.seed()));
        st.conduits.push(Arc::clone(&conduit));
        drop(st);

        conduit.downstream().receive_subscription(conduit.clone());
        conduit.open();
    }

    pub(crate) fn send(&self, value: T) {
        let conduits = {
            let mut st = lock(&self.state);
            if st.completion.is_some() {
                return;
            }
            st.retained.keep(&value);
            st.conduits.clone()
        };
        for conduit in conduits {
            conduit.offer(value.clone());
        }
    }

    pub(crate) fn send_completion(&self, completion: Completion<E>) {
        let (conduits, upstreams) = {
            let mut st = lock(&self.state);
            if st.completion.is_some() {
                return;
            }
            st.completion = Some(completion.clone());
            (
                std::mem::take(&mut st.conduits),
                std::mem::take(&mut st.upstreams),
            )
        };
        for upstream in upstreams {
            upstream.cancel();
        }
        for conduit in conduits {
            conduit.finish(completion.clone());
        }
    }

    pub(crate) fn send_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if st.completion.is_none() {
                st.upstreams.push(subscription.clone());
            } else {
                drop(st);
                subscription.cancel();
                return;
            }
        }
        subscription.request(Demand::Unbounded);
    }

    #[cfg(test)]
    pub(crate) fn upstream_count(&self) -> usize {
        lock(&self.state).upstreams.len()
    }
}
