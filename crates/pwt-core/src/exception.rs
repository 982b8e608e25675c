//! Build time exceptions

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Raised by task actions to fail the build.
///
/// Any error converts into an exception, keeping only its message. `BuildException` itself is
/// not an [`Error`](Error), otherwise that conversion would overlap with `From<T> for T`.
#[derive(Debug)]
pub struct BuildException {
    error: BuildError,
}

impl BuildException {
    pub fn custom(e: &str) -> Self {
        Self {
            error: BuildError::new(e),
        }
    }

    /// The message of the error that failed the build
    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl Display for BuildException {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<E: 'static + Error + Send + Sync> From<E> for BuildException {
    fn from(e: E) -> Self {
        Self {
            error: BuildError::new(e.to_string()),
        }
    }
}

pub type BuildResult<T = ()> = Result<T, BuildException>;

/// Represents any error
#[derive(Debug, thiserror::Error)]
#[error("{}", message)]
pub struct BuildError {
    message: String,
}

impl BuildError {
    /// Create a new, arbitrary build error
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            message: message.as_ref().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_message() {
        let exception = BuildException::custom("oh no");
        assert_eq!(exception.to_string(), "oh no");
    }

    #[test]
    fn errors_convert_to_messages() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let exception = BuildException::from(io);
        assert_eq!(exception.message(), "missing");
    }

    #[test]
    fn build_errors_keep_their_message() {
        let exception = BuildException::from(BuildError::new("Fail to compile GWT modules"));
        assert_eq!(exception.to_string(), "Fail to compile GWT modules");
    }
}
