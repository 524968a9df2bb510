//! Subjects: publishers that callers push values into.
//!
//! ## Architecture
//! ```text
//!  PassthroughSubject ─┐
//!                      ├──► Hub ──► Conduit per subscriber (own demand, own queue)
//!  CurrentValueSubject ┘
//! ```
//!
//! Handles are cheap clones sharing one hub. Each conduit serialises delivery to
//! its subscriber, so concurrent or reentrant `send` calls never overlap on it.

mod conduit;
mod current_value;
mod hub;
mod passthrough;
mod subject;

pub use current_value::CurrentValueSubject;
pub use passthrough::PassthroughSubject;
pub use subject::Subject;
