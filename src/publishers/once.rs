//! # One-result leaf publishers: [`Once`], [`Just`], [`Fail`].
//!
//! All three deliver a single `Result` through the same routine:
//! ```text
//! Ok(v)  ──► receive_subscription(sub) ── request(n > 0) ──► receive(v) ──► Finished
//! Err(e) ──► receive_subscription(empty) ──────────────────► Failure(e)   (no demand needed)
//! ```
//!
//! ## Equality
//! - `Once` and `Just` compare by their stored result/value.
//! - `Fail<A, E>` equals `Fail<B, E>` iff the errors are equal; the output type
//!   parameter does not take part.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::core::sync::lock;
use crate::core::{
    Cancellable, Completion, Demand, Never, Publisher, Subscriber, Subscription, Subscriptions,
};

/// Publishes one `Result`: a value then `Finished`, or an immediate failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Once<T, E> {
    result: Result<T, E>,
}

impl<T, E> Once<T, E> {
    /// Creates a publisher for `result`.
    pub fn new(result: Result<T, E>) -> Self {
        Self { result }
    }

    /// The stored result.
    pub fn result(&self) -> &Result<T, E> {
        &self.result
    }
}

impl<T, E> Publisher for Once<T, E>
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
        deliver_result(subscriber, self.result.clone());
    }
}

/// Publishes a single value, then finishes. Never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Just<T> {
    output: T,
}

impl<T> Just<T> {
    /// Creates a publisher for `output`.
    pub fn new(output: T) -> Self {
        Self { output }
    }

    /// The stored value.
    pub fn output(&self) -> &T {
        &self.output
    }
}

impl<T> Publisher for Just<T>
where
    T: Clone + Send + 'static,
{
    type Output = T;
    type Failure = Never;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = T, Failure = Never>,
    {
        deliver_result(subscriber, Ok(self.output.clone()));
    }
}

/// Terminates every subscription immediately with a stored error.
///
/// ## Example
/// ```rust
/// use demandflow::Fail;
///
/// let a: Fail<u32, &str> = Fail::new("boom");
/// let b: Fail<String, &str> = Fail::new("boom");
/// assert!(a == b);
/// ```
pub struct Fail<O, E> {
    error: E,
    _output: PhantomData<fn() -> O>,
}

impl<O, E> Fail<O, E> {
    /// Creates a publisher that fails with `error`.
    pub fn new(error: E) -> Self {
        Self {
            error,
            _output: PhantomData,
        }
    }

    /// The stored error.
    pub fn error(&self) -> &E {
        &self.error
    }
}

impl<O, E> Publisher for Fail<O, E>
where
    O: Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = O;
    type Failure = E;

    fn subscribe<S>(&self, subscriber: S)
    where
        S: Subscriber<Input = O, Failure = E>,
    {
        deliver_result(subscriber, Err(self.error.clone()));
    }
}

impl<O, E: Clone> Clone for Fail<O, E> {
    fn clone(&self) -> Self {
        Self::new(self.error.clone())
    }
}

impl<O, E: fmt::Debug> fmt::Debug for Fail<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fail").field("error", &self.error).finish()
    }
}

impl<A, B, E: PartialEq> PartialEq<Fail<B, E>> for Fail<A, E> {
    fn eq(&self, other: &Fail<B, E>) -> bool {
        self.error == other.error
    }
}

impl<O, E: Eq> Eq for Fail<O, E> {}

/// Starts a subscription that carries exactly one result.
fn deliver_result<S>(subscriber: S, result: Result<S::Input, S::Failure>)
where
    S: Subscriber,
    S::Input: Send,
{
    match result {
        Ok(value) => {
            let sub = Arc::new(OnceSubscription {
                downstream: subscriber,
                status: Mutex::new(Status::Pending(value)),
            });
            sub.downstream.receive_subscription(sub.clone());
        }
        Err(error) => {
            subscriber.receive_subscription(Subscriptions::empty());
            subscriber.receive_completion(Completion::Failure(error));
        }
    }
}

enum Status<T> {
    /// Waiting for the first demand.
    Pending(T),
    /// The value is with the downstream; `Finished` follows once it returns.
    Delivering,
    /// Delivered and finished, or cancelled.
    Done,
}

struct OnceSubscription<S: Subscriber> {
    downstream: S,
    status: Mutex<Status<S::Input>>,
}

impl<S> Cancellable for OnceSubscription<S>
where
    S: Subscriber,
    S::Input: Send,
{
    fn cancel(&self) {
        *lock(&self.status) = Status::Done;
    }
}

impl<S> Subscription for OnceSubscription<S>
where
    S: Subscriber,
    S::Input: Send,
{
    fn request(&self, demand: Demand) {
        if !demand.has_demand() {
            return;
        }
        let value = {
            let mut st = lock(&self.status);
            match std::mem::replace(&mut *st, Status::Delivering) {
                Status::Pending(value) => value,
                other => {
                    *st = other;
                    return;
                }
            }
        };
        let _ = self.downstream.receive(value);

        // A cancel from inside `receive` already moved the status to `Done`.
        let finish = {
            let mut st = lock(&self.status);
            matches!(std::mem::replace(&mut *st, Status::Done), Status::Delivering)
        };
        if finish {
            self.downstream.receive_completion(Completion::Finished);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Signal};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Boom(u8);

    #[test]
    fn test_just_waits_for_demand() {
        let rec = Arc::new(Recorder::<u32, Never>::new(Demand::NONE));
        Just::new(7).subscribe(Arc::clone(&rec));
        assert_eq!(rec.signals(), vec![Signal::Subscription]);

        rec.request(Demand::max(1));
        assert_eq!(rec.values(), vec![7]);
        assert_eq!(rec.completion(), Some(Completion::Finished));
    }

    #[test]
    fn test_fail_ignores_demand() {
        for initial in [Demand::NONE, Demand::max(1), Demand::Unbounded] {
            let rec = Arc::new(Recorder::<u32, Boom>::new(initial));
            Fail::<u32, Boom>::new(Boom(1)).subscribe(Arc::clone(&rec));
            assert_eq!(
                rec.signals(),
                vec![
                    Signal::Subscription,
                    Signal::Completion(Completion::Failure(Boom(1)))
                ]
            );
        }
    }

    #[test]
    fn test_fail_equality_ignores_output_type() {
        let a: Fail<u32, Boom> = Fail::new(Boom(3));
        let b: Fail<String, Boom> = Fail::new(Boom(3));
        let c: Fail<String, Boom> = Fail::new(Boom(4));
        assert!(a == b);
        assert!(a != c);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_once_err_fails_without_value() {
        let rec = Arc::new(Recorder::<u32, Boom>::unbounded());
        Once::new(Err(Boom(9))).subscribe(Arc::clone(&rec));
        assert!(rec.values().is_empty());
        assert_eq!(rec.completion(), Some(Completion::Failure(Boom(9))));
    }

    #[test]
    fn test_once_cancel_before_demand_drops_value() {
        let rec = Arc::new(Recorder::<u32, Boom>::new(Demand::NONE));
        Once::new(Ok(5)).subscribe(Arc::clone(&rec));
        rec.cancel();
        rec.request(Demand::max(1));
        assert_eq!(rec.signals(), vec![Signal::Subscription]);
    }

    #[test]
    fn test_cancel_inside_receive_suppresses_completion() {
        let rec = Arc::new(Recorder::<u32, Never>::unbounded().cancel_after(1));
        Just::new(7).subscribe(Arc::clone(&rec));
        assert_eq!(rec.signals(), vec![Signal::Subscription, Signal::Value(7)]);
        assert!(!rec.is_terminated());

        let rec = Arc::new(Recorder::<u32, Boom>::new(Demand::NONE).cancel_after(1));
        Once::new(Ok(3)).subscribe(Arc::clone(&rec));
        rec.request(Demand::max(1));
        assert_eq!(rec.signals(), vec![Signal::Subscription, Signal::Value(3)]);
        assert_eq!(rec.completion(), None);
    }

    #[test]
    fn test_each_subscription_is_independent() {
        let just = Just::new("x");
        let first = Arc::new(Recorder::<&str, Never>::unbounded());
        let second = Arc::new(Recorder::<&str, Never>::unbounded());
        just.subscribe(Arc::clone(&first));
        just.subscribe(Arc::clone(&second));
        assert_eq!(first.values(), vec!["x"]);
        assert_eq!(second.values(), vec!["x"]);
    }

    #[test]
    fn test_once_equality() {
        assert_eq!(Once::<u8, Boom>::new(Ok(1)), Once::new(Ok(1)));
        assert_ne!(Once::<u8, Boom>::new(Ok(1)), Once::new(Err(Boom(1))));
        assert_eq!(Just::new(2), Just::new(2));
    }
}
