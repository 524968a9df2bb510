//! Protocol contract violations.
//!
//! Pipeline failures are **data**: they travel as
//! [`Completion::Failure`](crate::Completion::Failure) with the publisher's own
//! error type. [`ContractViolation`] is different: it describes a bug in a
//! producer or consumer implementation (over-delivery, signals after the end,
//! a second subscription). Such bugs are never recoverable; the runtime logs
//! them and panics.
//!
//! Helper methods (`as_label`, `as_message`) exist for logs and test assertions.

use thiserror::Error;

/// # Violations of the publisher/subscriber contract.
///
/// Raised with [`panic!`] after being logged at `error` level.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A value arrived while the subscriber had no outstanding demand.
    #[error("value delivered without outstanding demand to '{subscriber}'")]
    DemandExceeded {
        /// Name of the subscriber that detected the violation.
        subscriber: &'static str,
    },

    /// A value or completion arrived after the terminal signal.
    #[error("signal delivered to '{subscriber}' after its terminal completion")]
    SignalAfterCompletion {
        /// Name of the subscriber that detected the violation.
        subscriber: &'static str,
    },

    /// A value or completion arrived after the subscriber cancelled.
    #[error("signal delivered to '{subscriber}' after it cancelled")]
    SignalAfterCancel {
        /// Name of the subscriber that detected the violation.
        subscriber: &'static str,
    },

    /// A value or completion arrived before any subscription.
    #[error("signal delivered to '{subscriber}' before its subscription")]
    SignalBeforeSubscription {
        /// Name of the subscriber that detected the violation.
        subscriber: &'static str,
    },

    /// A second subscription was delivered to a subscriber that already has one.
    #[error("'{subscriber}' received a second subscription")]
    DuplicateSubscription {
        /// Name of the subscriber that detected the violation.
        subscriber: &'static str,
    },
}

impl ContractViolation {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use demandflow::ContractViolation;
    ///
    /// let v = ContractViolation::DemandExceeded { subscriber: "sink" };
    /// assert_eq!(v.as_label(), "demand_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContractViolation::DemandExceeded { .. } => "demand_exceeded",
            ContractViolation::SignalAfterCompletion { .. } => "signal_after_completion",
            ContractViolation::SignalAfterCancel { .. } => "signal_after_cancel",
            ContractViolation::SignalBeforeSubscription { .. } => "signal_before_subscription",
            ContractViolation::DuplicateSubscription { .. } => "duplicate_subscription",
        }
    }

    /// Returns a human-readable message with details about the violation.
    pub fn as_message(&self) -> String {
        match self {
            ContractViolation::DemandExceeded { subscriber } => {
                format!("over-delivery: subscriber={subscriber}")
            }
            ContractViolation::SignalAfterCompletion { subscriber } => {
                format!("signal after completion: subscriber={subscriber}")
            }
            ContractViolation::SignalAfterCancel { subscriber } => {
                format!("signal after cancel: subscriber={subscriber}")
            }
            ContractViolation::SignalBeforeSubscription { subscriber } => {
                format!("signal before subscription: subscriber={subscriber}")
            }
            ContractViolation::DuplicateSubscription { subscriber } => {
                format!("duplicate subscription: subscriber={subscriber}")
            }
        }
    }

    /// Logs the violation and panics.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!(label = self.as_label(), "{}", self.as_message());
        panic!("contract violation: {self}");
    }
}
