//! Leaf publishers: sources with no upstream.
//!
//! ## Contents
//! - [`Once`] one `Result` (value then finish, or immediate failure)
//! - [`Just`] one value, never fails
//! - [`Fail`] immediate failure with a stored error
//! - [`Sequence`] items of an iterable, against demand
//! - [`Empty`] no values (finish immediately or never)
//!
//! `Just` and `Fail` are thin fronts over the same one-result delivery used by `Once`.

mod empty;
mod once;
mod sequence;

pub use empty::Empty;
pub use once::{Fail, Just, Once};
pub use sequence::Sequence;
