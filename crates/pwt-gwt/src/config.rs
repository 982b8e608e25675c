//! The `pwt.toml` settings file.
//!
//! Every value is optional. Values present in the file are applied on top of the defaults of the
//! [`PutnamiExtension`](PutnamiExtension), and settings from the command line can be merged on
//! top of the file with [`Merge`](merge::Merge).
//!
//! ```toml
//! modules = ["com.example.App"]
//!
//! [compile]
//! style = "PRETTY"
//! optimize = 0
//!
//! [dev]
//! max-heap-size = "1024m"
//!
//! [classpath]
//! sdm = ["lib/gwt-dev.jar", "lib/gwt-user.jar"]
//! ```

use crate::extensions::PutnamiExtension;
use crate::options::{CodeStyle, JsInteropMode, LogLevel, MethodNameDisplayMode, OptionError};
use merge::Merge;
use pwt_core::lazy_evaluation;
use pwt_std::specs::java_spec::JavaOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The default name of the settings file
pub const SETTINGS_FILE_NAME: &str = "pwt.toml";

/// An error loading or applying settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    InvalidOption(#[from] OptionError),
    #[error(transparent)]
    Property(#[from] lazy_evaluation::Error),
}

/// The contents of a settings file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GwtSettings {
    /// The modules to compile
    pub modules: Option<Vec<String>>,
    /// Compiler options
    pub compile: CompileSettings,
    /// Settings for the virtual machine running the compiler
    pub dev: JavaSettings,
    /// Class path entries
    pub classpath: ClasspathSettings,
}

/// Compiler options
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompileSettings {
    pub war: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub gen: Option<PathBuf>,
    pub deploy: Option<PathBuf>,
    pub extra: Option<PathBuf>,
    pub save_source_output: Option<PathBuf>,
    pub missing_deps_file: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub local_workers: Option<usize>,
    pub fail_on_error: Option<bool>,
    pub source_level: Option<String>,
    pub draft_compile: Option<bool>,
    pub optimize: Option<u8>,
    pub style: Option<CodeStyle>,
    pub compile_report: Option<bool>,
    pub incremental: Option<bool>,
    pub check_assertions: Option<bool>,
    pub check_casts: Option<bool>,
    pub enforce_strict_resources: Option<bool>,
    pub class_metadata: Option<bool>,
    pub overlapping_source_warnings: Option<bool>,
    pub save_source: Option<bool>,
    pub method_name_display_mode: Option<MethodNameDisplayMode>,
    pub closure_compiler: Option<bool>,
    pub js_interop_mode: Option<JsInteropMode>,
    pub validate_only: Option<bool>,
}

/// Settings for the virtual machine
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct JavaSettings {
    pub max_heap_size: Option<String>,
    pub min_heap_size: Option<String>,
    pub max_perm_size: Option<String>,
    pub debug_java: Option<bool>,
    pub debug_port: Option<u16>,
    pub debug_suspend: Option<bool>,
    pub java_args: Option<Vec<String>>,
}

/// Class path entries, relative paths are resolved against the project directory
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClasspathSettings {
    /// The compile class path of the project
    pub compile: Option<Vec<PathBuf>>,
    /// The class path of the gwt sdk
    pub sdm: Option<Vec<PathBuf>>,
}

macro_rules! set_present {
    ($prop:expr, $value:expr) => {
        if let Some(value) = $value {
            $prop.set(value)?;
        }
    };
}

impl GwtSettings {
    /// Parses settings from a string
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads settings from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&contents)?;
        debug!("loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Reads the `pwt.toml` file of a project directory, using empty settings if there is none
    pub fn find<P: AsRef<Path>>(project_dir: P) -> Result<Self, SettingsError> {
        let path = project_dir.as_ref().join(SETTINGS_FILE_NAME);
        if path.is_file() {
            Self::from_file(path)
        } else {
            debug!("no settings file at {:?}", path);
            Ok(Self::default())
        }
    }

    /// Applies the values present in these settings to an extension. Relative paths are resolved
    /// against the project directory.
    pub fn apply_to(
        &self,
        extension: &mut PutnamiExtension,
        project_dir: &Path,
    ) -> Result<(), SettingsError> {
        let resolve = |path: &PathBuf| {
            if path.is_absolute() {
                path.clone()
            } else {
                project_dir.join(path)
            }
        };
        if let Some(modules) = &self.modules {
            extension.modules.clear();
            extension.modules.push_all(modules.iter().cloned());
        }

        let compile = &self.compile;
        let options = &mut extension.compile;
        let file = |path: &Option<PathBuf>| path.as_ref().map(resolve);
        set_present!(options.war, file(&compile.war));
        set_present!(options.work_dir, file(&compile.work_dir));
        set_present!(options.gen, file(&compile.gen));
        set_present!(options.deploy, file(&compile.deploy));
        set_present!(options.extra, file(&compile.extra));
        set_present!(options.save_source_output, file(&compile.save_source_output));
        set_present!(options.missing_deps_file, file(&compile.missing_deps_file));
        set_present!(options.log_level, compile.log_level);
        if let Some(workers) = compile.local_workers {
            options.set_local_workers(workers)?;
        }
        set_present!(options.fail_on_error, compile.fail_on_error);
        set_present!(options.source_level, compile.source_level.clone());
        set_present!(options.draft_compile, compile.draft_compile);
        if let Some(level) = compile.optimize {
            options.set_optimize(level)?;
        }
        set_present!(options.style, compile.style);
        set_present!(options.compile_report, compile.compile_report);
        set_present!(options.incremental, compile.incremental);
        set_present!(options.check_assertions, compile.check_assertions);
        set_present!(options.check_casts, compile.check_casts);
        set_present!(options.enforce_strict_resources, compile.enforce_strict_resources);
        set_present!(options.class_metadata, compile.class_metadata);
        set_present!(
            options.overlapping_source_warnings,
            compile.overlapping_source_warnings
        );
        set_present!(options.save_source, compile.save_source);
        set_present!(
            options.method_name_display_mode,
            compile.method_name_display_mode
        );
        set_present!(options.closure_compiler, compile.closure_compiler);
        set_present!(options.js_interop_mode, compile.js_interop_mode);
        set_present!(options.validate_only, compile.validate_only);

        if self.dev != JavaSettings::default() {
            let dev = self.dev.to_java_options();
            extension.dev.set(dev)?;
        }

        let classpath = |entries: &Vec<PathBuf>| entries.iter().map(resolve).collect::<Vec<_>>();
        if let Some(entries) = &self.classpath.compile {
            extension.compile_classpath.clear();
            extension.compile_classpath.push_all(classpath(entries));
        }
        if let Some(entries) = &self.classpath.sdm {
            extension.sdm_classpath.clear();
            extension.sdm_classpath.push_all(classpath(entries));
        }
        Ok(())
    }
}

impl JavaSettings {
    /// The java options described by these settings
    pub fn to_java_options(&self) -> JavaOptions {
        JavaOptions {
            max_heap_size: self.max_heap_size.clone(),
            min_heap_size: self.min_heap_size.clone(),
            max_perm_size: self.max_perm_size.clone(),
            debug_java: self.debug_java.unwrap_or_default(),
            debug_port: self.debug_port.unwrap_or(JavaOptions::DEFAULT_DEBUG_PORT),
            debug_suspend: self.debug_suspend.unwrap_or_default(),
            java_args: self.java_args.clone().unwrap_or_default(),
        }
    }
}
