//! Errors that remember where they were raised

use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// An error together with the backtrace captured when it was created.
///
/// The backtrace is only rendered on request, displaying the error shows just its kind.
#[derive(Debug)]
pub struct PayloadError<E> {
    kind: E,
    raised_at: Backtrace,
}

impl<E> PayloadError<E> {
    /// Wraps `kind`, capturing the current backtrace
    pub fn new(kind: E) -> Self {
        Self {
            kind,
            raised_at: Backtrace::new(),
        }
    }

    /// The wrapped error
    pub fn kind(&self) -> &E {
        &self.kind
    }

    /// Where the error was raised
    pub fn backtrace(&self) -> &Backtrace {
        &self.raised_at
    }
}

impl<E: Display> Display for PayloadError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl<E: Error> Error for PayloadError<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::error::ProjectError;

    #[test]
    fn displays_only_the_kind() {
        let error = PayloadError::new(ProjectError::custom("bad things"));
        assert_eq!(error.to_string(), "bad things");
        assert!(matches!(error.kind(), ProjectError::CustomError(_)));
        assert!(!error.backtrace().frames().is_empty());
    }
}
