//! # Recorder: a contract-checking test subscriber.
//!
//! [`Recorder`] keeps every [`Signal`] it receives and tracks the demand it has
//! granted. Any protocol breach by the publisher under test is raised as a
//! [`ContractViolation`] panic:
//! - value without outstanding demand → `DemandExceeded`
//! - anything after the terminal signal → `SignalAfterCompletion`
//! - anything after the recorder cancelled → `SignalAfterCancel`
//! - value or completion before the subscription → `SignalBeforeSubscription`
//! - second subscription → `DuplicateSubscription`
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use demandflow::{Completion, Demand, Publisher, Sequence};
//! use demandflow::testing::{Recorder, Signal};
//!
//! let rec = Arc::new(Recorder::<u32, demandflow::Never>::new(Demand::max(2)));
//! Sequence::new(vec![1, 2, 3]).subscribe(Arc::clone(&rec));
//! assert_eq!(rec.values(), vec![1, 2]);
//!
//! rec.request(Demand::max(1));
//! assert_eq!(rec.values(), vec![1, 2, 3]);
//! assert_eq!(rec.completion(), Some(Completion::Finished));
//! assert_eq!(rec.signals()[0], Signal::Subscription);
//! ```

use std::fmt;
use std::sync::Mutex;

use crate::core::sync::lock;
use crate::core::{Completion, Demand, Subscriber, SubscriptionRef};
use crate::error::ContractViolation;

/// One recorded signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<T, E> {
    /// The subscription arrived.
    Subscription,
    /// A value arrived.
    Value(T),
    /// The terminal signal arrived.
    Completion(Completion<E>),
}

struct RecorderState<T, E> {
    subscription: Option<SubscriptionRef>,
    subscribed: bool,
    terminated: bool,
    cancelled: bool,
    outstanding: Demand,
    received: usize,
    signals: Vec<Signal<T, E>>,
}

/// Test subscriber that records signals and checks demand.
pub struct Recorder<T, E> {
    name: &'static str,
    initial: Demand,
    per_value: Demand,
    cancel_after: Option<usize>,
    state: Mutex<RecorderState<T, E>>,
}

impl<T, E> Recorder<T, E> {
    /// Creates a recorder that requests `initial` when subscribed.
    pub fn new(initial: Demand) -> Self {
        Self {
            name: "recorder",
            initial,
            per_value: Demand::NONE,
            cancel_after: None,
            state: Mutex::new(RecorderState {
                subscription: None,
                subscribed: false,
                terminated: false,
                cancelled: false,
                outstanding: Demand::NONE,
                received: 0,
                signals: Vec::new(),
            }),
        }
    }

    /// Creates a recorder that requests unbounded demand.
    pub fn unbounded() -> Self {
        Self::new(Demand::Unbounded)
    }

    /// Returns `demand` from every `receive` call.
    pub fn with_demand_per_value(mut self, demand: Demand) -> Self {
        self.per_value = demand;
        self
    }

    /// Cancels the subscription from inside `receive` once `n` values arrived.
    pub fn cancel_after(mut self, n: usize) -> Self {
        self.cancel_after = Some(n);
        self
    }

    /// Names the recorder in violation messages.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Requests more demand through the stored subscription.
    pub fn request(&self, demand: Demand) {
        let sub = {
            let mut st = lock(&self.state);
            if st.cancelled || st.terminated {
                return;
            }
            st.outstanding += demand;
            st.subscription.clone()
        };
        if let Some(sub) = sub {
            sub.request(demand);
        }
    }

    /// Cancels the stored subscription.
    pub fn cancel(&self) {
        let sub = {
            let mut st = lock(&self.state);
            st.cancelled = true;
            st.subscription.take()
        };
        if let Some(sub) = sub {
            sub.cancel();
        }
    }

    /// Values received so far.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        lock(&self.state)
            .signals
            .iter()
            .filter_map(|s| match s {
                Signal::Value(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    /// The terminal signal, if one arrived.
    pub fn completion(&self) -> Option<Completion<E>>
    where
        E: Clone,
    {
        lock(&self.state).signals.iter().find_map(|s| match s {
            Signal::Completion(c) => Some(c.clone()),
            _ => None,
        })
    }

    /// Every signal received so far, in order.
    pub fn signals(&self) -> Vec<Signal<T, E>>
    where
        T: Clone,
        E: Clone,
    {
        lock(&self.state).signals.clone()
    }

    /// True once a subscription arrived.
    pub fn is_subscribed(&self) -> bool {
        lock(&self.state).subscribed
    }

    /// True once a terminal signal arrived.
    pub fn is_terminated(&self) -> bool {
        lock(&self.state).terminated
    }

    /// Demand granted but not yet used.
    pub fn outstanding(&self) -> Demand {
        lock(&self.state).outstanding
    }

    fn check_live(&self, st: &RecorderState<T, E>) -> Result<(), ContractViolation> {
        let subscriber = self.name;
        if !st.subscribed {
            return Err(ContractViolation::SignalBeforeSubscription { subscriber });
        }
        if st.terminated {
            return Err(ContractViolation::SignalAfterCompletion { subscriber });
        }
        if st.cancelled {
            return Err(ContractViolation::SignalAfterCancel { subscriber });
        }
        Ok(())
    }
}

impl<T, E> Subscriber for Recorder<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        let initial = self.initial;
        {
            let mut st = lock(&self.state);
            if st.subscribed {
                drop(st);
                subscription.cancel();
                ContractViolation::DuplicateSubscription {
                    subscriber: self.name,
                }
                .raise();
            }
            st.subscribed = true;
            st.subscription = Some(subscription.clone());
            st.outstanding += initial;
            st.signals.push(Signal::Subscription);
        }
        if initial.has_demand() {
            subscription.request(initial);
        }
    }

    fn receive(&self, input: T) -> Demand {
        let mut st = lock(&self.state);
        if let Err(violation) = self.check_live(&st) {
            drop(st);
            violation.raise();
        }
        if !st.outstanding.consume_one() {
            drop(st);
            ContractViolation::DemandExceeded {
                subscriber: self.name,
            }
            .raise();
        }
        st.signals.push(Signal::Value(input));
        st.received += 1;
        st.outstanding += self.per_value;

        if self.cancel_after == Some(st.received) {
            st.cancelled = true;
            let sub = st.subscription.take();
            drop(st);
            if let Some(sub) = sub {
                sub.cancel();
            }
            return Demand::NONE;
        }
        self.per_value
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let mut st = lock(&self.state);
        if let Err(violation) = self.check_live(&st) {
            drop(st);
            violation.raise();
        }
        st.terminated = true;
        st.subscription = None;
        st.signals.push(Signal::Completion(completion));
    }
}

impl<T, E> fmt::Debug for Recorder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = lock(&self.state);
        f.debug_struct("Recorder")
            .field("name", &self.name)
            .field("signals", &st.signals.len())
            .field("outstanding", &st.outstanding)
            .field("terminated", &st.terminated)
            .finish()
    }
}
