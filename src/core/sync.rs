//! Poison-tolerant locking.
//!
//! Per-subscription state never holds a lock across a call into another party,
//! so a poisoned mutex only means a panic happened between two plain field
//! updates. The state is still consistent; keep going.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `m`, recovering the guard if a previous holder panicked.
#[inline]
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
