//! # Runtime configuration for the async bridges.
//!
//! Provides [`Config`] centralized settings for the parts of the crate that
//! hand values to async code:
//! 1. **Value streams**: [`PublisherExt::values_with`](crate::PublisherExt::values_with)
//! 2. **Worker subscribers**: [`PublisherExt::spawn_worker_with`](crate::PublisherExt::spawn_worker_with)
//!
//! The synchronous protocol itself has no configuration.
//!
//! ## Sentinel values
//! - `values_demand = 0` → unbounded (the stream requests everything up front)
//! - `worker_capacity = 0` → clamped to 1

use crate::core::Demand;

/// Settings for the async bridges.
///
/// ## Field semantics
/// - `values_demand`: demand a [`Values`](crate::Values) stream requests up front
///   and the maximum number of values it buffers (`0` = unbounded)
/// - `worker_capacity`: queue size and demand window of a worker subscriber (min 1)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Demand requested by a value stream before the first poll.
    ///
    /// - `0` = unbounded, the stream buffers whatever the publisher sends
    /// - `n > 0` = at most `n` values are buffered; each consumed value
    ///   requests one more
    pub values_demand: usize,

    /// Capacity of a worker subscriber's queue.
    ///
    /// The worker requests exactly this much demand up front and one more per
    /// handled value, so the queue can never overflow. Minimum value is 1.
    pub worker_capacity: usize,
}

impl Config {
    /// Returns the initial demand of a value stream.
    ///
    /// - `Demand::Unbounded` → no backpressure
    /// - `Demand::Finite(n)` → at most `n` buffered values
    #[inline]
    pub fn values_demand(&self) -> Demand {
        if self.values_demand == 0 {
            Demand::Unbounded
        } else {
            Demand::max(self.values_demand as u64)
        }
    }

    /// Returns the worker queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn worker_capacity_clamped(&self) -> usize {
        self.worker_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `values_demand = 64`
    /// - `worker_capacity = 1024`
    fn default() -> Self {
        Self {
            values_demand: 64,
            worker_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_demand_is_unbounded() {
        let cfg = Config {
            values_demand: 0,
            ..Config::default()
        };
        assert_eq!(cfg.values_demand(), Demand::Unbounded);
    }

    #[test]
    fn test_worker_capacity_clamped() {
        let cfg = Config {
            worker_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.worker_capacity_clamped(), 1);
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.values_demand(), Demand::max(64));
        assert_eq!(cfg.worker_capacity_clamped(), 1024);
    }
}
