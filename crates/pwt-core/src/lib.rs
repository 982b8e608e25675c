//! The core of pwt. Defines projects, lazily evaluated properties, plugins and the error types
//! used by the gwt build tasks.

#[macro_use]
extern crate static_assertions;

pub mod error;
pub mod exception;
pub mod lazy_evaluation;
pub mod logging;
pub mod plugins;
pub mod project;
pub mod task;

pub use exception::{BuildError, BuildException, BuildResult};
pub use plugins::Plugin;
pub use project::Project;
pub use task::Task;

/// Commonly used types
pub mod prelude {
    pub use crate::exception::{BuildError, BuildException, BuildResult};
    pub use crate::lazy_evaluation::{Prop, Provider, ProviderExt, VecProp};
    pub use crate::plugins::extensions::ExtensionAware;
    pub use crate::plugins::Plugin;
    pub use crate::project::error::{ProjectError, ProjectResult};
    pub use crate::project::Project;
    pub use crate::task::Task;
}
