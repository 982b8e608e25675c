//! Extensions to the [`Project`](pwt_core::Project)

use crate::error::ExecError;
use crate::private::ProjectSealed;
use crate::runner::{ProcessRunner, RunningProcess};
use crate::specs::exec_spec::{ExecResult, ExecSpec, ExecSpecBuilder};
use pwt_core::Project;

/// Adds [`ExecSpec`](crate::specs::exec_spec::ExecSpec) related methods to projects.
///
/// Relative working directories are resolved against the project directory.
pub trait ProjectExec: ProjectSealed {
    /// Configure an [`ExecSpec`](crate::specs::exec_spec::ExecSpecBuilder), then execute it and
    /// wait for it to finish.
    ///
    /// # Example
    /// ```
    /// # use pwt_core::Project;
    /// use pwt_std::ProjectExec;
    ///
    /// # let project = Project::temp(None).unwrap();
    /// let result = project.exec(|exec| {
    ///     exec.exec("echo").args(&["Hello", "World"]);
    /// }).unwrap();
    /// assert!(result.success());
    /// ```
    fn exec<F>(&self, config: F) -> Result<ExecResult, ExecError>
    where
        F: FnOnce(&mut ExecSpecBuilder);

    /// Execute an [ExecSpec](ExecSpec) on the host and wait for it to finish.
    fn exec_spec(&self, exec_spec: ExecSpec) -> Result<ExecResult, ExecError>;

    /// Launch an [ExecSpec](ExecSpec) with a specific runner, without waiting for it.
    fn exec_with(
        &self,
        runner: &dyn ProcessRunner,
        exec_spec: ExecSpec,
    ) -> Result<Box<dyn RunningProcess>, ExecError>;
}

impl ProjectExec for Project {
    fn exec<F>(&self, config: F) -> Result<ExecResult, ExecError>
    where
        F: FnOnce(&mut ExecSpecBuilder),
    {
        let mut builder = ExecSpecBuilder::new();
        config(&mut builder);
        let exec_spec = builder.build()?;
        self.exec_spec(exec_spec)
    }

    fn exec_spec(&self, exec_spec: ExecSpec) -> Result<ExecResult, ExecError> {
        exec_spec.execute_spec(self.project_dir())?.wait()
    }

    fn exec_with(
        &self,
        runner: &dyn ProcessRunner,
        exec_spec: ExecSpec,
    ) -> Result<Box<dyn RunningProcess>, ExecError> {
        debug!("{} executing {}", self, exec_spec);
        runner.execute(exec_spec, &self.project_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::OsProcessRunner;
    use crate::specs::exec_spec::Output;

    #[test]
    fn runs_in_project_dir() {
        let project = Project::temp(None).unwrap();
        let result = project
            .exec(|exec| {
                exec.exec("pwd").stdout(Output::Bytes);
            })
            .unwrap();
        let printed = result.utf8_string().unwrap().unwrap();
        assert_eq!(
            std::path::Path::new(printed.trim()).canonicalize().unwrap(),
            project.project_dir().canonicalize().unwrap()
        );
    }

    #[test]
    fn exec_with_uses_runner() {
        let project = Project::temp(None).unwrap();
        let spec = ExecSpecBuilder::new()
            .with_exec("sh")
            .with_args(["-c", "exit 4"])
            .build()
            .unwrap();
        let mut process = project.exec_with(&OsProcessRunner, spec).unwrap();
        assert_eq!(process.join().unwrap(), 4);
    }

    #[test]
    fn missing_executable_is_invalid_spec() {
        let project = Project::temp(None).unwrap();
        let result = project.exec(|_| {});
        assert!(matches!(result, Err(ExecError::InvalidSpec(_))));
    }
}
