//! # The pwt Standard Library
//!
//! Contains the pieces needed to run external programs from a build: [`ExecSpec`](specs::exec_spec::ExecSpec)
//! describes a process, a [`ProcessRunner`](runner::ProcessRunner) launches it, and the
//! [`JavaCommandBuilder`](specs::java_spec::JavaCommandBuilder) assembles jvm command lines.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[macro_use]
extern crate log;

pub mod error;
pub mod extensions;
pub mod runner;
pub mod specs;

pub use crate::error::ExecError;
pub use crate::extensions::project_extensions::ProjectExec;
pub use crate::runner::{OsProcessRunner, ProcessRunner, RunningProcess};

mod private {
    use pwt_core::Project;

    /// Trait can only be implemented in the pwt std library for the Project type.
    pub trait ProjectSealed {}

    impl ProjectSealed for Project {}
}
