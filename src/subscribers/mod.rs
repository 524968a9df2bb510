//! Terminal subscribers.
//!
//! ## Contents
//! - [`Sink`] closure subscriber with unbounded demand (via [`PublisherExt::sink`](crate::PublisherExt::sink))
//! - [`Values`] async `Stream` bridge with a bounded demand window
//! - [`Receive`] + [`WorkerHandle`] async handler on a dedicated tokio task
//!
//! ## Architecture
//! ```text
//!                 ┌──► Sink ───────────────► closures (synchronous)
//!   publisher ────┼──► ValuesLink ── mpsc ─► Values: Stream<Item = Result<T, E>>
//!                 └──► WorkerGate ── mpsc ─► worker task ─► Receive::receive().await
//! ```

mod sink;
mod values;
mod worker;

pub use sink::Sink;
pub use values::Values;
pub(crate) use worker::spawn_worker;
pub use worker::{Receive, WorkerHandle};
