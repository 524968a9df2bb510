//! # Demand: how many values a subscriber is prepared to receive.
//!
//! [`Demand`] is either a finite count or [`Demand::Unbounded`].
//!
//! ## Rules
//! - Demand is **additive**: `request(2)` followed by `request(3)` authorizes 5 values.
//! - Demand never goes negative: [`Demand::consume_one`] refuses when nothing is left.
//! - Finite demand that would overflow `u64` saturates to [`Demand::Unbounded`].
//!
//! ## Example
//! ```rust
//! use demandflow::Demand;
//!
//! let mut d = Demand::max(2) + Demand::max(1);
//! assert_eq!(d, Demand::max(3));
//!
//! assert!(d.consume_one());
//! assert_eq!(d.remaining(), Some(2));
//!
//! assert_eq!(Demand::max(u64::MAX) + Demand::max(1), Demand::Unbounded);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

/// Outstanding demand on a subscription.
///
/// Ordering: every finite amount is smaller than [`Demand::Unbounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Demand {
    /// Finite demand with remaining count.
    Finite(u64),
    /// Unbounded demand.
    Unbounded,
}

impl Demand {
    /// No demand.
    pub const NONE: Demand = Demand::Finite(0);

    /// Finite demand of `n` values.
    #[inline]
    #[must_use]
    pub const fn max(n: u64) -> Self {
        Demand::Finite(n)
    }

    /// Returns `true` if the demand is unbounded.
    #[inline]
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Returns `true` if at least one value may be delivered.
    #[inline]
    #[must_use]
    pub const fn has_demand(&self) -> bool {
        matches!(self, Self::Unbounded) || matches!(self, Self::Finite(remaining) if *remaining > 0)
    }

    /// Returns the remaining finite demand, or `None` when unbounded.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> Option<u64> {
        match self {
            Self::Finite(value) => Some(*value),
            Self::Unbounded => None,
        }
    }

    /// Adds two demands, saturating to [`Demand::Unbounded`] on overflow.
    #[must_use]
    pub const fn saturating_add(self, other: Demand) -> Demand {
        match (self, other) {
            (Demand::Finite(a), Demand::Finite(b)) => match a.checked_add(b) {
                Some(total) => Demand::Finite(total),
                None => Demand::Unbounded,
            },
            _ => Demand::Unbounded,
        }
    }

    /// Consumes a single unit of demand when available.
    ///
    /// Returns `false` (and leaves `self` untouched) when no demand is left.
    #[must_use]
    pub fn consume_one(&mut self) -> bool {
        match *self {
            Demand::Unbounded => true,
            Demand::Finite(value) if value > 0 => {
                *self = Demand::Finite(value - 1);
                true
            }
            Demand::Finite(_) => false,
        }
    }
}

impl Default for Demand {
    /// Returns [`Demand::NONE`].
    fn default() -> Self {
        Demand::NONE
    }
}

impl From<u64> for Demand {
    fn from(n: u64) -> Self {
        Demand::Finite(n)
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, rhs: Demand) -> Demand {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Demand) {
        *self = self.saturating_add(rhs);
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Demand::Finite(n) => write!(f, "max({n})"),
            Demand::Unbounded => f.write_str("unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_accumulates() {
        let mut d = Demand::NONE;
        d += Demand::max(2);
        d += Demand::max(3);
        assert_eq!(d, Demand::max(5));
    }

    #[test]
    fn test_unbounded_absorbs() {
        assert_eq!(Demand::max(7) + Demand::Unbounded, Demand::Unbounded);
        assert_eq!(Demand::Unbounded + Demand::NONE, Demand::Unbounded);
    }

    #[test]
    fn test_overflow_saturates_to_unbounded() {
        assert_eq!(Demand::max(u64::MAX) + Demand::max(1), Demand::Unbounded);
    }

    #[test]
    fn test_consume_one_never_goes_negative() {
        let mut d = Demand::max(1);
        assert!(d.consume_one());
        assert!(!d.consume_one());
        assert_eq!(d, Demand::NONE);
    }

    #[test]
    fn test_consume_unbounded_stays_unbounded() {
        let mut d = Demand::Unbounded;
        for _ in 0..100 {
            assert!(d.consume_one());
        }
        assert!(d.is_unbounded());
    }

    #[test]
    fn test_ordering() {
        assert!(Demand::NONE < Demand::max(1));
        assert!(Demand::max(u64::MAX) < Demand::Unbounded);
        assert!(!Demand::NONE.has_demand());
        assert!(Demand::max(1).has_demand());
    }

    #[test]
    fn test_display() {
        assert_eq!(Demand::max(3).to_string(), "max(3)");
        assert_eq!(Demand::Unbounded.to_string(), "unbounded");
    }
}
