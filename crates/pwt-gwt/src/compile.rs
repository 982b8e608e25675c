//! The task that runs the GWT compiler

use crate::extensions::PutnamiExtension;
use crate::flags::*;
use crate::options::CompilerOptions;
use pwt_core::exception::BuildResult;
use pwt_core::lazy_evaluation::{Prop, Provider, VecProp};
use pwt_core::project::error::{ProjectError, ProjectResult};
use pwt_core::{Project, Task};
use pwt_std::error::ensure_success;
use pwt_std::runner::{OsProcessRunner, ProcessRunner};
use pwt_std::specs::java_spec::{JavaCommandBuilder, JavaOptions};
use pwt_std::ProjectExec;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::PathBuf;

/// The step named when the compiler exits with a failure
pub const COMPILE_FAILED: &str = "Fail to compile GWT modules";

/// Source directories, relative to the project, that are always on the class path
pub const SOURCE_DIRS: [&str; 2] = ["src/main/java", "src/main/resources"];

/// Compiles gwt modules to javascript by running `com.google.gwt.dev.Compiler`.
///
/// Every property falls back to the [`PutnamiExtension`](PutnamiExtension) of the project once
/// the task is created, so values set on the task only affect this task.
pub struct GwtCompile {
    /// The modules to compile, passed to the compiler in order
    pub modules: VecProp<String>,
    /// Options of the compiler
    pub options: CompilerOptions,
    /// Settings of the virtual machine running the compiler
    pub dev: Prop<JavaOptions>,
    /// The compile class path of the project
    pub compile_classpath: VecProp<PathBuf>,
    /// The class path of the gwt sdk
    pub sdm_classpath: VecProp<PathBuf>,
    /// Overrides the java executable
    pub java_executable: Prop<PathBuf>,
    runner: Box<dyn ProcessRunner>,
}

impl Debug for GwtCompile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GwtCompile")
            .field("modules", &self.modules)
            .field("options", &self.options)
            .field("dev", &self.dev)
            .finish_non_exhaustive()
    }
}

impl Default for GwtCompile {
    fn default() -> Self {
        Self::new()
    }
}

impl GwtCompile {
    /// Creates an unconfigured task that runs processes on the host
    pub fn new() -> Self {
        Self {
            modules: VecProp::new("modules"),
            options: CompilerOptions::new(),
            dev: Prop::with_convention("dev", JavaOptions::default),
            compile_classpath: VecProp::new("compileClasspath"),
            sdm_classpath: VecProp::new("sdmClasspath"),
            java_executable: Prop::new("javaExecutable"),
            runner: Box::new(OsProcessRunner),
        }
    }

    /// Runs the compiler with another process runner
    pub fn with_runner<R: ProcessRunner + 'static>(mut self, runner: R) -> Self {
        self.set_runner(runner);
        self
    }

    /// Runs the compiler with another process runner
    pub fn set_runner<R: ProcessRunner + 'static>(&mut self, runner: R) {
        self.runner = Box::new(runner);
    }

    /// Makes every property of this task fall back to the extension
    pub fn configure(&mut self, extension: &PutnamiExtension) -> ProjectResult {
        self.modules.set_convention(extension.modules.clone());
        self.options.follow(&extension.compile)?;
        self.dev.set_convention(extension.dev.clone())?;
        self.compile_classpath
            .set_convention(extension.compile_classpath.clone());
        self.sdm_classpath
            .set_convention(extension.sdm_classpath.clone());
        debug!("configured {} from the putnami extension", Self::NAME);
        Ok(())
    }

    /// Reads every option and builds the compiler invocation
    pub fn create_command(&self, project: &Project) -> ProjectResult<JavaCommandBuilder> {
        let options = &self.options;
        options.validate().map_err(ProjectError::custom)?;

        let mut builder = JavaCommandBuilder::new();
        if let Some(java) = self.java_executable.try_get() {
            builder.set_java_executable(java);
        }
        builder.configure_java_args(&self.dev.fallible_get()?);
        builder.add_java_args([NO_PERSISTENT_UNIT_CACHE]);
        builder.set_main_class(COMPILER_MAIN_CLASS);

        builder.add_class_paths(SOURCE_DIRS);
        builder.add_class_paths(self.compile_classpath.fallible_get()?);
        builder.add_class_paths(self.sdm_classpath.fallible_get()?);

        builder.add_arg_value(WORK_DIR, options.work_dir.try_get());
        builder.add_arg_value(GEN, options.gen.try_get());
        builder.add_arg_value(WAR, options.war.try_get());
        builder.add_arg_value(DEPLOY, options.deploy.try_get());
        builder.add_arg_value(EXTRA, options.extra.try_get());

        builder.add_arg_value(LOG_LEVEL, options.log_level.fallible_get()?);
        builder.add_arg_value(LOCAL_WORKERS, options.local_workers.fallible_get()?);
        FAIL_ON_ERROR.apply(&mut builder, options.fail_on_error.fallible_get()?);
        builder.add_arg_value(SOURCE_LEVEL, options.source_level.try_get());
        DRAFT_COMPILE.apply(&mut builder, options.draft_compile.fallible_get()?);
        builder.add_arg_value(OPTIMIZE, options.optimize.fallible_get()?);
        builder.add_arg_value(STYLE, options.style.fallible_get()?);
        COMPILE_REPORT.apply(&mut builder, options.compile_report.fallible_get()?);
        INCREMENTAL.apply(&mut builder, options.incremental.fallible_get()?);

        CHECK_ASSERTIONS.apply(&mut builder, options.check_assertions.fallible_get()?);
        CHECK_CASTS.apply(&mut builder, options.check_casts.fallible_get()?);
        ENFORCE_STRICT_RESOURCES.apply(
            &mut builder,
            options.enforce_strict_resources.fallible_get()?,
        );
        CLASS_METADATA.apply(&mut builder, options.class_metadata.fallible_get()?);

        OVERLAPPING_SOURCE_WARNINGS.apply(
            &mut builder,
            options.overlapping_source_warnings.fallible_get()?,
        );
        SAVE_SOURCE.apply(&mut builder, options.save_source.fallible_get()?);
        builder.add_arg_value(
            METHOD_NAME_DISPLAY_MODE,
            options.method_name_display_mode.fallible_get()?,
        );
        CLOSURE_COMPILER.apply(&mut builder, options.closure_compiler.fallible_get()?);
        builder.add_arg_value(JS_INTEROP_MODE, options.js_interop_mode.fallible_get()?);

        for module in self.modules.fallible_get()? {
            builder.add_arg(module);
        }
        trace!("{} command for {}: {}", Self::NAME, project, builder);
        Ok(builder)
    }

    /// The command line that would be run, for display
    pub fn command_line(&self, project: &Project) -> ProjectResult<String> {
        Ok(self.create_command(project)?.to_string())
    }

    /// Creates the directories the compiler writes to
    fn create_output_dirs(&self) -> std::io::Result<()> {
        let options = &self.options;
        let dirs = [
            &options.war,
            &options.work_dir,
            &options.gen,
            &options.deploy,
            &options.extra,
            &options.save_source_output,
        ];
        for dir in dirs.into_iter().filter_map(|dir| dir.try_get()) {
            fs::create_dir_all(dir)?;
        }
        if let Some(parent) = options
            .missing_deps_file
            .try_get()
            .and_then(|file| file.parent().map(PathBuf::from))
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Task for GwtCompile {
    const NAME: &'static str = "gwtCompile";

    fn description(&self) -> String {
        "Compile the GWT modules".to_string()
    }

    fn create(project: &Project) -> ProjectResult<Self> {
        let extension = project.require_extension::<PutnamiExtension>()?;
        let mut task = Self::new();
        task.configure(extension)?;
        Ok(task)
    }

    fn task_action(&mut self, project: &Project) -> BuildResult {
        let modules = self.modules.fallible_get()?;
        if modules.is_empty() {
            warn!("no gwt modules are configured");
        }
        let command = self.create_command(project)?;
        self.create_output_dirs()?;

        info!("compiling gwt modules: {}", modules.join(", "));
        let spec = command.into_exec_spec().build()?;
        let mut process = project.exec_with(self.runner.as_ref(), spec)?;
        let code = process.join()?;
        ensure_success(COMPILE_FAILED, code)?;
        info!("gwt modules compiled");
        Ok(())
    }
}
