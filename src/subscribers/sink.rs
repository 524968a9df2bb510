//! # Sink: closure subscriber with unbounded demand.
//!
//! ```text
//! Awaiting ──subscription──► Active(sub) ──completion──► Closed
//!                               │
//!                               └──cancel()──► Closed (upstream cancelled)
//! ```
//! A second subscription is cancelled on arrival. Values and completions that
//! arrive once `Closed` are ignored.

use std::fmt;
use std::mem;
use std::sync::Mutex;

use crate::core::sync::lock;
use crate::core::{Cancellable, Completion, Demand, Subscriber, SubscriptionRef};

type ValueFn<T> = Box<dyn Fn(T) + Send + Sync>;
type CompletionFn<E> = Box<dyn FnOnce(Completion<E>) + Send>;

enum Status {
    Awaiting,
    Active(SubscriptionRef),
    Closed,
}

/// Subscriber that calls closures for values and the completion.
pub struct Sink<T, E> {
    receive_value: ValueFn<T>,
    receive_completion: Mutex<Option<CompletionFn<E>>>,
    status: Mutex<Status>,
}

impl<T, E> Sink<T, E> {
    /// Creates a sink from its two callbacks.
    pub fn new<C, V>(receive_completion: C, receive_value: V) -> Self
    where
        C: FnOnce(Completion<E>) + Send + 'static,
        V: Fn(T) + Send + Sync + 'static,
    {
        Self {
            receive_value: Box::new(receive_value),
            receive_completion: Mutex::new(Some(Box::new(receive_completion))),
            status: Mutex::new(Status::Awaiting),
        }
    }

    fn is_active(&self) -> bool {
        matches!(*lock(&self.status), Status::Active(_))
    }
}

impl<T, E> Subscriber for Sink<T, E>
where
    T: 'static,
    E: 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut status = lock(&self.status);
            if !matches!(*status, Status::Awaiting) {
                drop(status);
                subscription.cancel();
                return;
            }
            *status = Status::Active(subscription.clone());
        }
        subscription.request(Demand::Unbounded);
    }

    fn receive(&self, input: T) -> Demand {
        if self.is_active() {
            (self.receive_value)(input);
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let prev = mem::replace(&mut *lock(&self.status), Status::Closed);
        if !matches!(prev, Status::Active(_)) {
            return;
        }
        let callback = lock(&self.receive_completion).take();
        if let Some(callback) = callback {
            callback(completion);
        }
    }
}

impl<T, E> Cancellable for Sink<T, E>
where
    T: 'static,
    E: 'static,
{
    fn cancel(&self) {
        let prev = mem::replace(&mut *lock(&self.status), Status::Closed);
        lock(&self.receive_completion).take();
        if let Status::Active(subscription) = prev {
            subscription.cancel();
        }
    }
}

impl<T, E> fmt::Debug for Sink<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match *lock(&self.status) {
            Status::Awaiting => "awaiting",
            Status::Active(_) => "active",
            Status::Closed => "closed",
        };
        f.debug_struct("Sink").field("status", &status).finish()
    }
}
