//! The project holds the layout of the module being built and the extensions registered by
//! plugins.

use crate::lazy_evaluation::{Prop, Provider};
use crate::plugins::extensions::{ExtensionAware, ExtensionContainer};
use crate::plugins::Plugin;
use crate::project::error::{ProjectError, ProjectResult};
use log::debug;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod error;

/// The Project contains layout information and the extensions that configure how it's built.
///
/// The project itself should be able to provide all information required to build a project, but
/// should not be the driver of the building itself.
///
/// By default, projects are created in the current directory and build into `<project>/build`.
///
/// # Example
/// ```
/// # use pwt_core::Project;
/// # use pwt_core::lazy_evaluation::Provider;
/// let project = Project::temp(None).unwrap();
/// assert_eq!(project.build_dir().get(), project.project_dir().join("build"));
/// ```
pub struct Project {
    name: String,
    project_dir: PathBuf,
    build_dir: Prop<PathBuf>,
    extensions: ExtensionContainer,
    applied_plugins: Vec<String>,
    _temp_dir: Option<TempDir>,
}

impl Debug for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Project {:?}", self.name)
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "project {:?}", self.name)
    }
}

impl Project {
    /// Create a new project in a temporary directory. The directory is removed once the project
    /// is dropped.
    pub fn temp<'a, I: Into<Option<&'a str>>>(name: I) -> ProjectResult<Self> {
        let temp_dir = TempDir::new()?;
        let mut project = Self::in_dir_with_name(temp_dir.path(), name.into().unwrap_or("root"))?;
        project._temp_dir = Some(temp_dir);
        Ok(project)
    }

    /// Create a new Project, with the current directory as the the directory to load
    pub fn new() -> ProjectResult<Self> {
        Self::in_dir(std::env::current_dir()?)
    }

    /// Creates a project in a specified directory, named after the directory.
    pub fn in_dir(path: impl AsRef<Path>) -> ProjectResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "root".to_string());
        Self::in_dir_with_name(path, name)
    }

    /// Creates a project in a specified directory.
    pub fn in_dir_with_name<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        name: S,
    ) -> ProjectResult<Self> {
        let path = path.as_ref();
        let project_dir = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let mut build_dir = Prop::new("buildDir");
        build_dir.set(project_dir.join("build"))?;
        debug!("created project {:?} at {:?}", name.as_ref(), project_dir);
        Ok(Self {
            name: name.as_ref().to_string(),
            project_dir,
            build_dir,
            extensions: ExtensionContainer::default(),
            applied_plugins: vec![],
            _temp_dir: None,
        })
    }

    /// The name of the project
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The absolute directory of the project
    pub fn project_dir(&self) -> PathBuf {
        self.project_dir.clone()
    }

    /// The build directory of the project. Changes to the build directory are seen by any
    /// provider derived from this property.
    pub fn build_dir(&self) -> Prop<PathBuf> {
        self.build_dir.clone()
    }

    /// Sets the build directory. Relative paths are resolved against the project directory.
    pub fn set_build_dir<P: AsRef<Path>>(&mut self, dir: P) -> ProjectResult {
        let path = self.file(dir);
        self.build_dir.set(path)?;
        Ok(())
    }

    /// Resolves a path against the project directory.
    pub fn file<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Applies a plugin to this project. Applying the same plugin more than once does nothing.
    pub fn apply_plugin<P: Plugin>(&mut self) -> ProjectResult {
        let plugin = P::default();
        let id = plugin.plugin_id().to_string();
        if self.applied_plugins.contains(&id) {
            return Ok(());
        }
        debug!("applying plugin {} to {}", id, self);
        plugin.apply(self)?;
        self.applied_plugins.push(id);
        Ok(())
    }

    /// Gets an extension by type, failing if it was never registered
    pub fn require_extension<E: 'static + Send + Sync>(&self) -> ProjectResult<&E> {
        self.extension::<E>()
            .ok_or_else(|| ProjectError::missing_extension::<E>().into())
    }

    /// Gets a mutable extension by type, failing if it was never registered
    pub fn require_extension_mut<E: 'static + Send + Sync>(&mut self) -> ProjectResult<&mut E> {
        self.extension_mut::<E>()
            .ok_or_else(|| ProjectError::missing_extension::<E>().into())
    }
}

impl ExtensionAware for Project {
    fn extensions(&self) -> &ExtensionContainer {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionContainer {
        &mut self.extensions
    }
}
