//! # demandflow
//!
//! **Demandflow** is an in-process reactive-streams runtime for Rust.
//!
//! It provides publishers, subscribers and operators connected by an explicit
//! demand protocol: a producer only sends as many values as its consumer has
//! requested, and every subscription ends with at most one terminal signal.
//! The protocol is scheduler-agnostic; signals may be delivered synchronously
//! on the caller's thread or from any other thread.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐     ┌───────────────────┐     ┌───────────────────┐
//!   │  Publisher   │     │     Operator      │     │    Subscriber     │
//!   │ (Sequence,   │────►│ (Count, Map,      │────►│ (Sink, Values,    │
//!   │  Subject,..) │     │  PrefixUntil.. )  │     │  worker, Recorder)│
//!   └──────▲───────┘     └──────┬─────▲──────┘     └─────────┬─────────┘
//!          │  request / cancel  │     │    request / cancel   │
//!          └────────────────────┘     └───────────────────────┘
//! ```
//!
//! ### Lifecycle of one subscription
//! ```text
//! publisher.subscribe(subscriber)
//!   ├─► receive_subscription(sub)            exactly once, first
//!   ├─► sub.request(n)                        demand accumulates
//!   ├─► receive(value) ─► returns extra demand (≤ outstanding demand)
//!   ├─► ...
//!   └─► receive_completion(Finished | Failure(e))   at most once, last
//!
//! sub.cancel() at any point (even inside receive): nothing more is delivered
//! ```
//!
//! ## Features
//! | Area                 | Description                                               | Key types / traits                                   |
//! |----------------------|-----------------------------------------------------------|------------------------------------------------------|
//! | **Protocol**         | Demand, terminal signal, the three roles.                 | [`Demand`], [`Completion`], [`Publisher`], [`Subscriber`], [`Subscription`] |
//! | **Leaf publishers**  | Sources with no upstream.                                 | [`Once`], [`Just`], [`Fail`], [`Sequence`], [`Empty`] |
//! | **Operators**        | Stateful transforms, chained via [`PublisherExt`].        | [`Count`], [`PrefixUntilOutput`], [`Map`], [`ReplaceError`] |
//! | **Subjects**         | Push-based multicast publishers.                          | [`PassthroughSubject`], [`CurrentValueSubject`]      |
//! | **Change tracking**  | Payload-free notifications with explicit field wiring.    | [`ObservableObjectPublisher`], [`Published`]         |
//! | **Async bridges**    | Streams and tokio workers with bounded demand windows.    | [`Values`], [`Receive`], [`WorkerHandle`]            |
//! | **Errors**           | Contract violations (fatal programming errors).           | [`ContractViolation`]                                |
//! | **Configuration**    | Demand windows of the async bridges.                      | [`Config`]                                           |
//!
//! ## Optional features
//! - `logging` (default): exports the [`Log`] operator, which records every
//!   signal as a `tracing` event.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use demandflow::{Completion, Never, PassthroughSubject, PublisherExt, Subject};
//!
//! let numbers = PassthroughSubject::<u32, Never>::new();
//! let stop = PassthroughSubject::<(), Never>::new();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let done = Arc::new(Mutex::new(None));
//! let (s, d) = (Arc::clone(&seen), Arc::clone(&done));
//!
//! let _handle = numbers
//!     .clone()
//!     .prefix_until_output(stop.clone())
//!     .sink(move |c| *d.lock().unwrap() = Some(c), move |v| s.lock().unwrap().push(v));
//!
//! numbers.send(1);
//! numbers.send(2);
//! stop.send(());
//! numbers.send(3);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
//! assert_eq!(*done.lock().unwrap(), Some(Completion::Finished));
//! ```

mod config;
mod core;
mod error;
mod ext;
mod observable;
mod operators;
mod publishers;
mod subjects;
mod subscribers;

pub mod testing;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{
    AnyCancellable, AnySubscriber, Cancellable, Completion, Demand, EmptySubscription, Never,
    Publisher, Subscriber, Subscription, SubscriptionRef, Subscriptions,
};
pub use error::ContractViolation;
pub use ext::PublisherExt;
pub use observable::{ObservableObject, ObservableObjectPublisher, Published, PublishedPublisher};
#[cfg(feature = "logging")]
pub use operators::Log;
pub use operators::{Count, Map, PrefixUntilOutput, ReplaceError};
pub use publishers::{Empty, Fail, Just, Once, Sequence};
pub use subjects::{CurrentValueSubject, PassthroughSubject, Subject};
pub use subscribers::{Receive, Sink, Values, WorkerHandle};

#[cfg(test)]
mod properties;
