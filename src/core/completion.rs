//! # Terminal signals.
//!
//! Every subscription ends with exactly one [`Completion`]: [`Completion::Finished`]
//! for a normal end of stream, or [`Completion::Failure`] carrying the typed error.
//!
//! [`Never`] is the failure type of pipelines that cannot fail.

use std::convert::Infallible;

/// Failure type of publishers that never fail.
pub type Never = Infallible;

/// Terminal signal of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion<E> {
    /// The publisher finished normally.
    Finished,
    /// The publisher terminated with an error.
    Failure(E),
}

impl<E> Completion<E> {
    /// True for [`Completion::Finished`].
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Completion::Finished)
    }

    /// True for [`Completion::Failure`].
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Completion::Failure(_))
    }

    /// Returns the failure, if any.
    pub fn failure(self) -> Option<E> {
        match self {
            Completion::Finished => None,
            Completion::Failure(e) => Some(e),
        }
    }

    /// Maps the failure value, keeping `Finished` as is.
    pub fn map_failure<F, E2>(self, f: F) -> Completion<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failure(e) => Completion::Failure(f(e)),
        }
    }

    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Completion::Finished => "finished",
            Completion::Failure(_) => "failure",
        }
    }
}

impl Completion<Never> {
    /// Widens a never-failing completion to any failure type.
    pub fn widen<E>(self) -> Completion<E> {
        match self {
            Completion::Finished => Completion::Finished,
            Completion::Failure(never) => match never {},
        }
    }
}

impl<E> From<Result<(), E>> for Completion<E> {
    fn from(res: Result<(), E>) -> Self {
        match res {
            Ok(()) => Completion::Finished,
            Err(e) => Completion::Failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_failure() {
        let c: Completion<&str> = Completion::Failure("boom");
        assert_eq!(c.map_failure(str::len), Completion::Failure(4));

        let f: Completion<&str> = Completion::Finished;
        assert_eq!(f.map_failure(str::len), Completion::Finished);
    }

    #[test]
    fn test_from_result() {
        assert_eq!(Completion::from(Ok::<(), u8>(())), Completion::Finished);
        assert_eq!(Completion::from(Err::<(), u8>(3)), Completion::Failure(3));
    }

    #[test]
    fn test_widen_never() {
        let c: Completion<Never> = Completion::Finished;
        let wide: Completion<String> = c.widen();
        assert!(wide.is_finished());
    }
}
