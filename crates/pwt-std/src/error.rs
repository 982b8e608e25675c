//! Errors produced while running external processes

use crate::specs::exec_spec::ExecSpecBuilderError;
use std::ffi::OsString;
use std::io;

/// An error running an external process.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The process could not be started at all
    #[error("could not launch {executable:?}: {source}")]
    LaunchFailure {
        /// The executable that failed to launch
        executable: OsString,
        /// The cause of the failure
        #[source]
        source: io::Error,
    },
    /// The process ran and terminated with a failure code. Never raised by the runner itself,
    /// callers create it when they decide a non-zero exit fails the build.
    #[error("{step} (exit code {code})")]
    NonZeroExit {
        /// A description of the step that failed
        step: String,
        /// The exit code of the process
        code: i32,
    },
    /// The exec spec was missing required parts
    #[error(transparent)]
    InvalidSpec(#[from] ExecSpecBuilderError),
    /// The process handle was used incorrectly
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// Could not read from or write to the process
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A thread forwarding the output of the process panicked
    #[error("forwarding output of the process failed")]
    OutputThread,
}

impl ExecError {
    /// Gets the exit code carried by this error, if any
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Converts an exit code into a result. Zero is success, any other value fails with a
/// [`NonZeroExit`](ExecError::NonZeroExit) error naming `step`.
///
/// # Example
/// ```
/// # use pwt_std::error::ensure_success;
/// assert!(ensure_success("compile", 0).is_ok());
/// let err = ensure_success("compile", 127).unwrap_err();
/// assert_eq!(err.to_string(), "compile (exit code 127)");
/// ```
pub fn ensure_success<S: AsRef<str>>(step: S, code: i32) -> Result<(), ExecError> {
    if code == 0 {
        Ok(())
    } else {
        Err(ExecError::NonZeroExit {
            step: step.as_ref().to_string(),
            code,
        })
    }
}
