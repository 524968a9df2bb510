//! # Conduit: one subscriber's delivery lane inside a subject.
//!
//! ```text
//! offer(v) ──► demand > 0 ? queue.push(v) : latest = v (current-value) / drop
//! finish(c) ─► queue.push(c)
//!                 │
//!                 ▼
//!         drain loop (one caller at a time, no lock held while calling out)
//!                 │
//!                 ▼
//!            downstream
//! ```
//!
//! ## Rules
//! - `draining` starts `true`: nothing is delivered until the subscriber has
//!   returned from `receive_subscription` and [`Conduit::open`] ran.
//! - Whoever finds the lane idle drains it; concurrent or reentrant callers only
//!   enqueue.
//! - `cancel` clears the queue and detaches the lane from its hub.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, Weak};

use crate::core::sync::lock;
use crate::core::{AnySubscriber, Cancellable, Completion, Demand, Subscription};

use super::hub::Detach;

enum Delivery<T, E> {
    Value(T),
    Completion(Completion<E>),
}

struct ConduitState<T, E> {
    demand: Demand,
    queue: VecDeque<Delivery<T, E>>,
    latest: Option<T>,
    draining: bool,
    closed: bool,
    cancelled: bool,
}

pub(crate) struct Conduit<T, E> {
    id: u64,
    hub: Weak<dyn Detach>,
    downstream: AnySubscriber<T, E>,
    retain_latest: bool,
    state: Mutex<ConduitState<T, E>>,
}

impl<T, E> Conduit<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(
        id: u64,
        hub: Weak<dyn Detach>,
        downstream: AnySubscriber<T, E>,
        latest: Option<T>,
    ) -> Self {
        Self {
            id,
            hub,
            downstream,
            retain_latest: latest.is_some(),
            state: Mutex::new(ConduitState {
                demand: Demand::NONE,
                queue: VecDeque::new(),
                latest,
                draining: true,
                closed: false,
                cancelled: false,
            }),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn downstream(&self) -> &AnySubscriber<T, E> {
        &self.downstream
    }

    /// Ends the subscription handshake and delivers anything queued meanwhile.
    pub(crate) fn open(&self) {
        let mut st = lock(&self.state);
        st.draining = false;
        self.drain(st);
    }

    pub(crate) fn offer(&self, value: T) {
        let mut st = lock(&self.state);
        if st.closed || st.cancelled {
            return;
        }
        if st.demand.consume_one() {
            st.queue.push_back(Delivery::Value(value));
        } else if self.retain_latest {
            st.latest = Some(value);
            return;
        } else {
            tracing::trace!(conduit = self.id, "value dropped: no demand");
            return;
        }
        self.drain(st);
    }

    pub(crate) fn finish(&self, completion: Completion<E>) {
        let mut st = lock(&self.state);
        if st.closed || st.cancelled {
            return;
        }
        st.closed = true;
        st.latest = None;
        st.queue.push_back(Delivery::Completion(completion));
        self.drain(st);
    }

    fn promote_latest(st: &mut ConduitState<T, E>) {
        if st.latest.is_some() && st.demand.consume_one() {
            if let Some(value) = st.latest.take() {
                st.queue.push_back(Delivery::Value(value));
            }
        }
    }

    fn drain<'a>(&'a self, mut st: MutexGuard<'a, ConduitState<T, E>>) {
        if st.draining {
            return;
        }
        st.draining = true;
        loop {
            let Some(next) = st.queue.pop_front() else {
                st.draining = false;
                return;
            };
            drop(st);
            match next {
                Delivery::Value(value) => {
                    let more = self.downstream.receive(value);
                    st = lock(&self.state);
                    if st.cancelled {
                        st.queue.clear();
                        st.draining = false;
                        return;
                    }
                    st.demand += more;
                    Self::promote_latest(&mut st);
                }
                Delivery::Completion(completion) => {
                    self.downstream.receive_completion(completion);
                    return;
                }
            }
        }
    }
}

impl<T, E> Cancellable for Conduit<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn cancel(&self) {
        {
            let mut st = lock(&self.state);
            if st.cancelled {
                return;
            }
            st.cancelled = true;
            st.queue.clear();
            st.latest = None;
        }
        if let Some(hub) = self.hub.upgrade() {
            hub.detach(self.id);
        }
    }
}

impl<T, E> Subscription for Conduit<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn request(&self, demand: Demand) {
        let mut st = lock(&self.state);
        if st.closed || st.cancelled {
            return;
        }
        st.demand += demand;
        Self::promote_latest(&mut st);
        self.drain(st);
    }
}
