//! # PublisherExt: chainable operators and terminal subscribers.
//!
//! Blanket-implemented for every [`Publisher`]. Each operator method consumes
//! the upstream description and returns a new one; nothing runs until a
//! subscriber attaches.
//!
//! ```text
//! Sequence::new(0..10)          // Publisher<Output = i32>
//!     .prefix_until_output(stop) // PrefixUntilOutput<Sequence<_>, _>
//!     .count()                   // Count<PrefixUntilOutput<..>>
//!     .sink(on_done, on_value)   // subscribes, returns AnyCancellable
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use demandflow::{PublisherExt, Sequence};
//!
//! let out = Arc::new(Mutex::new(Vec::new()));
//! let sink_out = Arc::clone(&out);
//! let _handle = Sequence::new(0..10)
//!     .map(|v| v * 2)
//!     .count()
//!     .sink(|_| {}, move |n| sink_out.lock().unwrap().push(n));
//! assert_eq!(*out.lock().unwrap(), vec![10]);
//! ```

use std::sync::Arc;

use crate::config::Config;
use crate::core::{AnyCancellable, Completion, Publisher};
#[cfg(feature = "logging")]
use crate::operators::Log;
use crate::operators::{Count, Map, PrefixUntilOutput, ReplaceError};
use crate::subscribers::{spawn_worker, Receive, Sink, Values, WorkerHandle};

/// Operator and subscriber constructors for every publisher.
pub trait PublisherExt: Publisher + Sized {
    /// Publishes the number of values once the upstream finishes.
    fn count(self) -> Count<Self> {
        Count::new(self)
    }

    /// Relays values until `other` emits a value or terminates.
    fn prefix_until_output<T>(self, other: T) -> PrefixUntilOutput<Self, T>
    where
        T: Publisher,
    {
        PrefixUntilOutput::new(self, other)
    }

    /// Transforms every value with `transform`.
    fn map<F, O>(self, transform: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> O + Send + Sync + 'static,
        O: Send + 'static,
    {
        Map::new(self, transform)
    }

    /// Replaces a failure with `output` followed by `Finished`.
    fn replace_error(self, output: Self::Output) -> ReplaceError<Self, Self::Output>
    where
        Self::Output: Clone,
    {
        ReplaceError::new(self, output)
    }

    /// Records every signal as a `tracing` event labelled with `prefix`.
    #[cfg(feature = "logging")]
    fn log(self, prefix: impl Into<String>) -> Log<Self> {
        Log::new(self, prefix)
    }

    /// Subscribes closures with unbounded demand.
    ///
    /// The subscription lives until the returned handle is cancelled or dropped.
    fn sink<C, V>(self, receive_completion: C, receive_value: V) -> AnyCancellable
    where
        C: FnOnce(Completion<Self::Failure>) + Send + 'static,
        V: Fn(Self::Output) + Send + Sync + 'static,
    {
        let sink = Arc::new(Sink::new(receive_completion, receive_value));
        self.subscribe(Arc::clone(&sink));
        AnyCancellable::new(sink)
    }

    /// Consumes the publisher as an async stream with the default [`Config`].
    fn values(self) -> Values<Self::Output, Self::Failure> {
        self.values_with(&Config::default())
    }

    /// Consumes the publisher as an async stream.
    fn values_with(self, config: &Config) -> Values<Self::Output, Self::Failure> {
        let (values, link) = Values::new(config.values_demand());
        self.subscribe(link);
        values
    }

    /// Runs `handler` on a tokio task fed by this publisher (default [`Config`]).
    fn spawn_worker<H>(self, handler: Arc<H>) -> WorkerHandle
    where
        H: Receive<Self::Output, Self::Failure>,
    {
        self.spawn_worker_with(handler, &Config::default())
    }

    /// Runs `handler` on a tokio task fed by this publisher.
    fn spawn_worker_with<H>(self, handler: Arc<H>, config: &Config) -> WorkerHandle
    where
        H: Receive<Self::Output, Self::Failure>,
    {
        spawn_worker(&self, handler, config)
    }
}

impl<P> PublisherExt for P where P: Publisher {}
