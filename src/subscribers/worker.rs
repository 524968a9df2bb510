//! # Worker: an async handler fed by a publisher.
//!
//! A [`Receive`] implementation runs on a dedicated tokio task. The publisher
//! side is a bounded queue whose capacity is also the demand window: the gate
//! requests `capacity` values up front and one more after each handled value,
//! so the queue can never overflow.
//!
//! ## Architecture
//! ```text
//! publisher ──► WorkerGate ── try_send ──► [bounded queue] ──► worker task ──► Receive::receive
//!                   ▲                                              │
//!                   └────────────── request(1) after each value ◄──┘
//! ```
//!
//! ## Rules
//! - Panics inside the handler are caught and logged; the worker keeps going.
//! - The completion is handed to [`Receive::receive_completion`] after every
//!   queued value, then the task ends.
//! - [`WorkerHandle::cancel`] cancels the upstream subscription and stops the
//!   task at the next await point; queued values are dropped.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use demandflow::{Never, PublisherExt, Receive, Sequence};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Receive<u32, Never> for Printer {
//!     async fn receive(&self, value: u32) {
//!         println!("got {value}");
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handle = Sequence::new(0..3u32).spawn_worker(Arc::new(Printer));
//! handle.join().await;
//! # }
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::sync::lock;
use crate::core::{Cancellable, Completion, Demand, Publisher, Subscriber, SubscriptionRef};
use crate::error::ContractViolation;

/// Async handler driven by a worker task.
#[async_trait]
pub trait Receive<T, E>: Send + Sync + 'static
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Handles one value.
    async fn receive(&self, value: T);

    /// Handles the terminal signal. Default: ignore it.
    async fn receive_completion(&self, completion: Completion<E>) {
        let _ = completion;
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

enum Work<T, E> {
    Value(T),
    Done(Completion<E>),
}

struct GateState<T, E> {
    tx: Option<mpsc::Sender<Work<T, E>>>,
    subscription: Option<SubscriptionRef>,
}

/// Subscriber half of a worker: moves signals into the queue.
struct WorkerGate<T, E> {
    name: &'static str,
    capacity: usize,
    token: CancellationToken,
    state: Mutex<GateState<T, E>>,
}

impl<T, E> WorkerGate<T, E> {
    fn request(&self, demand: Demand) {
        let subscription = lock(&self.state).subscription.clone();
        if let Some(subscription) = subscription {
            subscription.request(demand);
        }
    }
}

impl<T, E> Subscriber for WorkerGate<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: SubscriptionRef) {
        {
            let mut st = lock(&self.state);
            if self.token.is_cancelled() || st.subscription.is_some() || st.tx.is_none() {
                drop(st);
                subscription.cancel();
                return;
            }
            st.subscription = Some(subscription.clone());
        }
        subscription.request(Demand::from(self.capacity as u64));
    }

    fn receive(&self, input: T) -> Demand {
        let st = lock(&self.state);
        let Some(tx) = &st.tx else {
            return Demand::NONE;
        };
        match tx.try_send(Work::Value(input)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                drop(st);
                ContractViolation::DemandExceeded {
                    subscriber: self.name,
                }
                .raise();
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::trace!(worker = self.name, "value dropped: worker stopped");
            }
        }
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let tx = {
            let mut st = lock(&self.state);
            st.subscription = None;
            st.tx.take()
        };
        if let Some(tx) = tx {
            // One slot beyond the demand window is reserved for this.
            let _ = tx.try_send(Work::Done(completion));
        }
    }
}

impl<T, E> Cancellable for WorkerGate<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn cancel(&self) {
        self.token.cancel();
        let subscription = {
            let mut st = lock(&self.state);
            st.tx = None;
            st.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

/// Handle to a running worker.
#[must_use = "dropping a WorkerHandle detaches the worker; call cancel() to stop it"]
pub struct WorkerHandle {
    name: &'static str,
    gate: Arc<dyn Cancellable>,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Name of the handler.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancels the upstream subscription and stops the worker task.
    pub fn cancel(&self) {
        self.gate.cancel();
    }

    /// True once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the worker task to end.
    pub async fn join(self) {
        if let Err(e) = self.join.await {
            tracing::warn!(worker = self.name, error = %e, "worker task ended abnormally");
        }
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("name", &self.name)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Subscribes a worker running `handler` to `publisher`.
///
/// Must be called from within a tokio runtime.
pub(crate) fn spawn_worker<P, H>(publisher: &P, handler: Arc<H>, config: &Config) -> WorkerHandle
where
    P: Publisher,
    H: Receive<P::Output, P::Failure>,
{
    let capacity = config.worker_capacity_clamped();
    let name = handler.name();
    let token = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel::<Work<P::Output, P::Failure>>(capacity + 1);

    let gate = Arc::new(WorkerGate {
        name,
        capacity,
        token: token.clone(),
        state: Mutex::new(GateState {
            tx: Some(tx),
            subscription: None,
        }),
    });

    let worker_gate = Arc::clone(&gate);
    let worker_token = token.clone();
    let join = tokio::spawn(async move {
        loop {
            let work = tokio::select! {
                biased;
                _ = worker_token.cancelled() => break,
                work = rx.recv() => work,
            };
            match work {
                Some(Work::Value(value)) => {
                    let fut = handler.receive(value);
                    if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                        log_panic(name, &*panic_err);
                    }
                    worker_gate.request(Demand::max(1));
                }
                Some(Work::Done(completion)) => {
                    let fut = handler.receive_completion(completion);
                    if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                        log_panic(name, &*panic_err);
                    }
                    break;
                }
                None => break,
            }
        }
        tracing::debug!(worker = name, "worker stopped");
    });

    publisher.subscribe(Arc::clone(&gate));
    WorkerHandle {
        name,
        gate,
        token,
        join,
    }
}

fn log_panic(name: &'static str, panic: &(dyn Any + Send)) {
    let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(worker = name, panic = %info, "worker handler panicked");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fail, Never, PassthroughSubject, PublisherExt, Sequence, Subject};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Collect {
        values: Mutex<Vec<u32>>,
        completion: Mutex<Option<Completion<&'static str>>>,
    }

    #[async_trait]
    impl Receive<u32, &'static str> for Collect {
        async fn receive(&self, value: u32) {
            if value == 3 {
                panic!("three");
            }
            self.values.lock().unwrap().push(value);
        }

        async fn receive_completion(&self, completion: Completion<&'static str>) {
            *self.completion.lock().unwrap() = Some(completion);
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    #[tokio::test]
    async fn test_handles_values_and_survives_panics() {
        let subject = PassthroughSubject::<u32, &'static str>::new();
        let collect = Arc::new(Collect::default());
        let handle = subject.clone().spawn_worker(Arc::clone(&collect));
        assert_eq!(handle.name(), "collect");

        (0..6).for_each(|v| subject.send(v));
        subject.send_completion(Completion::Failure("closed"));
        handle.join().await;

        assert_eq!(*collect.values.lock().unwrap(), vec![0, 1, 2, 4, 5]);
        assert_eq!(
            *collect.completion.lock().unwrap(),
            Some(Completion::Failure("closed"))
        );
    }

    struct Slow {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl Receive<u32, Never> for Slow {
        async fn receive(&self, _value: u32) {
            self.seen.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_demand_window_bounds_the_queue() {
        let slow = Arc::new(Slow {
            seen: AtomicUsize::new(0),
        });
        let config = Config {
            worker_capacity: 4,
            ..Config::default()
        };
        let handle = Sequence::new(0..50u32).spawn_worker_with(Arc::clone(&slow), &config);
        handle.join().await;
        assert_eq!(slow.seen.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn test_cancel_stops_worker_and_upstream() {
        let subject = PassthroughSubject::<u32, Never>::new();
        let slow = Arc::new(Slow {
            seen: AtomicUsize::new(0),
        });
        let handle = subject.clone().spawn_worker(Arc::clone(&slow));
        assert_eq!(subject.subscriber_count(), 1);

        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(subject.subscriber_count(), 0);
        handle.join().await;
    }

    #[tokio::test]
    async fn test_failure_only() {
        let collect = Arc::new(Collect::default());
        Fail::<u32, &'static str>::new("x")
            .spawn_worker(Arc::clone(&collect))
            .join()
            .await;
        assert_eq!(*collect.completion.lock().unwrap(), Some(Completion::Failure("x")));
        assert!(collect.values.lock().unwrap().is_empty());
    }
}
