//! Tasks are units of work performed on a project.

use crate::exception::BuildResult;
use crate::project::error::ProjectResult;
use crate::Project;

/// A task that can be configured against a project and then executed.
pub trait Task: Sized {
    /// The name of this task
    const NAME: &'static str;

    /// A short description of what the task does
    fn description(&self) -> String {
        String::new()
    }

    /// Creates the task, wiring any defaults from the project
    fn create(project: &Project) -> ProjectResult<Self>;

    /// The action performed when the task runs
    fn task_action(&mut self, project: &Project) -> BuildResult;
}
