//! # PrefixUntilOutput: relays the main upstream until a trigger fires.
//!
//! ## Architecture
//! ```text
//!   trigger ──► TriggerShim ──┐  (request max(1); first value or any completion = stop)
//!                             ▼
//!   main ─────────────► PrefixInner ──► downstream
//!                             ▲               │
//!                             └── request ────┘  (forwarded to main unchanged)
//! ```
//!
//! ## State machine
//! ```text
//! Relaying ──trigger value / trigger completion──► Stopped  (cancel both, send Finished)
//!    │
//!    └──main completion (Finished or Failure)───► Stopped  (cancel trigger, forward as-is)
//!
//! downstream cancel ──► Stopped (cancel both, send nothing)
//! ```
//!
//! ## Rules
//! - The trigger is subscribed first; if it fires before main subscribes, the
//!   downstream still receives its subscription and then `Finished`.
//! - Trigger failure resolves to plain `Finished`: the trigger only stops relaying.
//! - The `Relaying → Stopped` transition is taken under one mutex, so main and
//!   trigger may signal from different threads.
//! - A stop that arrives while a main signal is being delivered downstream is
//!   deferred until that delivery returns; downstream calls never overlap.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, Weak};

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Publisher, Subscriber, Subscription, SubscriptionRef,
};
use crate::error::ContractViolation;

/// Relays `upstream` until `other` emits a value or terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixUntilOutput<U, T> {
    upstream: U,
    other: T,
}

impl<U, T> PrefixUntilOutput<U, T> {
    /// Wraps `upstream`, stopping it when `other` fires.
    pub fn new(upstream: U, other: T) -> Self {
        Self { upstream, other }
    }

    /// The main publisher.
    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// The trigger publisher.
    pub fn other(&self) -> &T {
        &self.other
    }
}

impl<U, T> Publisher for PrefixUntilOutput<U, T>
where
    U: Publisher,
    T: Publisher,
{
    type Output = U::Output;
    type Failure = U::Failure;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = U::Output, Failure = U::Failure>,
    {
        let inner = Arc::new_cyclic(|me| PrefixInner {
            me: me.clone(),
            downstream: subscriber,
            state: Mutex::new(PrefixState::default()),
        });
        self.other.subscribe(TriggerShim::<S, T::Output, T::Failure> {
            inner: Arc::clone(&inner),
            _trigger: PhantomData,
        });
        self.upstream.subscribe(inner);
    }
}

#[derive(Default)]
struct PrefixState {
    main: Option<SubscriptionRef>,
    trigger: Option<SubscriptionRef>,
    main_subscribed: bool,
    trigger_subscribed: bool,
    /// Downstream has been handed its subscription.
    ready: bool,
    stopped: bool,
    /// Calls into the downstream currently in progress.
    depth: u32,
    finish_pending: bool,
}

struct PrefixInner<S> {
    me: Weak<PrefixInner<S>>,
    downstream: S,
    state: Mutex<PrefixState>,
}

impl<S> PrefixInner<S>
where
    S: Subscriber,
{
    /// Moves to `Stopped` because the trigger fired.
    fn stop(&self) {
        let (main, trigger, deliver) = {
            let mut st = lock(&self.state);
            if st.stopped {
                return;
            }
            st.stopped = true;
            let deliver = st.ready && st.depth == 0;
            if !deliver {
                st.finish_pending = true;
            }
            (st.main.take(), st.trigger.take(), deliver)
        };
        if let Some(main) = main {
            main.cancel();
        }
        if let Some(trigger) = trigger {
            trigger.cancel();
        }
        if deliver {
            self.downstream.receive_completion(Completion::Finished);
        }
    }

    /// Closes one downstream call; delivers a deferred `Finished` once idle.
    fn after_delivery(&self) {
        let deliver = {
            let mut st = lock(&self.state);
            st.depth -= 1;
            if st.depth == 0 && st.finish_pending {
                st.finish_pending = false;
                true
            } else {
                false
            }
        };
        if deliver {
            self.downstream.receive_completion(Completion::Finished);
        }
    }

    fn attach_trigger(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if st.trigger_subscribed {
                drop(st);
                subscription.cancel();
                ContractViolation::DuplicateSubscription {
                    subscriber: "prefix_until_output.trigger",
                }
                .raise();
            }
            st.trigger_subscribed = true;
            if st.stopped {
                drop(st);
                subscription.cancel();
                return;
            }
            st.trigger = Some(subscription.clone());
        }
        subscription.request(Demand::max(1));
    }
}

impl<S> Subscriber for PrefixInner<S>
where
    S: Subscriber,
    S::Input: Send,
{
    type Input = S::Input;
    type Failure = S::Failure;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if st.main_subscribed {
                drop(st);
                subscription.cancel();
                ContractViolation::DuplicateSubscription {
                    subscriber: "prefix_until_output",
                }
                .raise();
            }
            st.main_subscribed = true;
            st.ready = true;
            st.depth += 1;
            if st.stopped {
                drop(st);
                subscription.cancel();
            } else {
                st.main = Some(subscription);
            }
        }
        if let Some(me) = self.me.upgrade() {
            self.downstream.receive_subscription(me);
        }
        self.after_delivery();
    }

    fn receive(&self, input: S::Input) -> Demand {
        {
            let mut st = lock(&self.state);
            if st.stopped {
                return Demand::NONE;
            }
            st.depth += 1;
        }
        let more = self.downstream.receive(input);
        self.after_delivery();
        more
    }

    fn receive_completion(&self, completion: Completion<S::Failure>) {
        let trigger = {
            let mut st = lock(&self.state);
            if st.stopped {
                return;
            }
            st.stopped = true;
            st.main = None;
            st.trigger.take()
        };
        if let Some(trigger) = trigger {
            trigger.cancel();
        }
        self.downstream.receive_completion(completion);
    }
}

impl<S> Cancellable for PrefixInner<S>
where
    S: Subscriber,
{
    fn cancel(&self) {
        let (main, trigger) = {
            let mut st = lock(&self.state);
            st.stopped = true;
            st.finish_pending = false;
            (st.main.take(), st.trigger.take())
        };
        if let Some(main) = main {
            main.cancel();
        }
        if let Some(trigger) = trigger {
            trigger.cancel();
        }
    }
}

impl<S> Subscription for PrefixInner<S>
where
    S: Subscriber,
{
    fn request(&self, demand: Demand) {
        let main = lock(&self.state).main.clone();
        if let Some(main) = main {
            main.request(demand);
        }
    }
}

/// Subscriber attached to the trigger publisher.
struct TriggerShim<S, TI, TF> {
    inner: Arc<PrefixInner<S>>,
    _trigger: PhantomData<fn(TI, TF)>,
}

impl<S, TI, TF> Subscriber for TriggerShim<S, TI, TF>
where
    S: Subscriber,
    TI: 'static,
    TF: 'static,
{
    type Input = TI;
    type Failure = TF;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        self.inner.attach_trigger(subscription);
    }

    fn receive(&self, _input: TI) -> Demand {
        self.inner.stop();
        Demand::NONE
    }

    fn receive_completion(&self, _completion: Completion<TF>) {
        self.inner.stop();
    }
}
