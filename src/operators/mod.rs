//! Operators: publishers that wrap an upstream publisher.
//!
//! Each operator value is a cheap description. `subscribe` builds fresh
//! per-subscription state, subscribes it upstream, and hands the downstream a
//! subscription that forwards demand and cancellation:
//! ```text
//! upstream ──► [operator inner: subscriber + subscription] ──► downstream
//!     ▲                       │          ▲                         │
//!     └──── request/cancel ───┘          └──── request/cancel ─────┘
//! ```
//!
//! ## Contents
//! - [`Count`] number of upstream values, once the upstream finishes
//! - [`PrefixUntilOutput`] relays until a second publisher fires
//! - [`Map`] value transform
//! - [`ReplaceError`] failure replaced by a value
//! - [`Log`] `tracing` events for every signal (feature `logging`)

mod count;
#[cfg(feature = "logging")]
mod log;
mod map;
mod prefix_until_output;
mod replace_error;

pub use count::Count;
#[cfg(feature = "logging")]
pub use log::Log;
pub use map::Map;
pub use prefix_until_output::PrefixUntilOutput;
pub use replace_error::ReplaceError;
