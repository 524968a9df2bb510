//! Test support shipped with the crate.
//!
//! - [`Recorder`] records every [`Signal`] and panics with a
//!   [`ContractViolation`](crate::ContractViolation) when a publisher breaks
//!   the protocol (over-delivery, signals after the end, ...).
//!
//! Use it from unit tests of custom publishers and operators.

mod recorder;

pub use recorder::{Recorder, Signal};
