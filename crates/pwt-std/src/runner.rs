//! Launching processes behind a trait, so tasks can be driven without spawning anything.

use crate::error::ExecError;
use crate::specs::exec_spec::{ExecHandle, ExecSpec};
use std::path::Path;

/// A launched process that can be waited on.
pub trait RunningProcess: Send {
    /// Blocks until the process terminates and returns its exit code. Repeated calls return the
    /// same code.
    fn join(&mut self) -> Result<i32, ExecError>;

    /// Gets the exit code without blocking, failing with
    /// [`InvalidState`](ExecError::InvalidState) while the process is still running.
    fn exit_value(&mut self) -> Result<i32, ExecError>;
}

/// Launches processes described by exec specs.
pub trait ProcessRunner: Send + Sync {
    /// Starts the process without waiting for it. Relative working directories in the spec are
    /// resolved against `working_dir`.
    fn execute(
        &self,
        spec: ExecSpec,
        working_dir: &Path,
    ) -> Result<Box<dyn RunningProcess>, ExecError>;
}

impl RunningProcess for ExecHandle {
    fn join(&mut self) -> Result<i32, ExecError> {
        ExecHandle::join(self)
    }

    fn exit_value(&mut self) -> Result<i32, ExecError> {
        ExecHandle::exit_value(self)
    }
}

/// Runs processes on the host operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProcessRunner;

impl ProcessRunner for OsProcessRunner {
    fn execute(
        &self,
        spec: ExecSpec,
        working_dir: &Path,
    ) -> Result<Box<dyn RunningProcess>, ExecError> {
        let handle = spec.execute_spec(working_dir)?;
        trace!("launched process, state: {:?}", handle.state());
        Ok(Box::new(handle))
    }
}
