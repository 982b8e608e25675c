//! The `pwt` command line

use crate::compile::GwtCompile;
use crate::config::GwtSettings;
use crate::extensions::PutnamiExtension;
use crate::options::{CodeStyle, LogLevel};
use crate::plugin::GwtPlugin;
use clap::Parser;
use merge::Merge;
use pwt_core::exception::BuildResult;
use pwt_core::logging::LoggingArgs;
use pwt_core::{Project, Task};
use std::path::PathBuf;

/// Compiles the GWT modules of a project.
///
/// Options given on the command line take precedence over the settings file.
#[derive(Debug, Parser, Clone)]
#[clap(name = "pwt")]
#[clap(version, author, about)]
#[clap(term_width = 64)]
pub struct PwtArgs {
    /// Log level to run pwt in.
    #[clap(flatten)]
    logging: LoggingArgs,

    /// Use an alternative settings file
    #[clap(short = 'F', long = "settings")]
    #[clap(help_heading = None)]
    settings_file: Option<PathBuf>,

    /// The directory of the project. Defaults to the current directory
    #[clap(long)]
    #[clap(help_heading = None)]
    project_dir: Option<PathBuf>,

    /// The build directory, relative to the project directory
    #[clap(long)]
    #[clap(help_heading = None)]
    build_dir: Option<PathBuf>,

    /// Print the compiler command line instead of running it
    #[clap(long)]
    #[clap(help_heading = None)]
    dry_run: bool,

    /// The number of local workers used by the compiler.
    ///
    /// Defaults to the number of cpus on the host.
    #[clap(long, short = 'J')]
    #[clap(help_heading = "Compiler")]
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    workers: Option<u32>,

    /// The optimization level, from 0 to 9
    #[clap(long, short = 'O')]
    #[clap(help_heading = "Compiler")]
    #[clap(value_parser = clap::value_parser!(u8).range(0..=9))]
    optimize: Option<u8>,

    /// The style of the emitted javascript
    #[clap(long)]
    #[clap(help_heading = "Compiler")]
    #[clap(value_parser = parse_style)]
    style: Option<CodeStyle>,

    /// The log level of the compiler itself
    #[clap(long)]
    #[clap(help_heading = "Compiler")]
    #[clap(value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// A module to compile. Replaces the modules of the settings file
    #[clap(long = "module", short = 'm')]
    #[clap(value_name = "MODULE")]
    #[clap(help_heading = "Compiler")]
    modules: Vec<String>,
}

fn parse_style(style: &str) -> Result<CodeStyle, String> {
    style.parse().map_err(|_| format!("unknown style {:?}", style))
}

fn parse_log_level(level: &str) -> Result<LogLevel, String> {
    level
        .parse()
        .map_err(|_| format!("unknown log level {:?}", level))
}

impl PwtArgs {
    /// Simulate creating the args from the command line
    pub fn try_command_line<S: AsRef<str>>(cmd: S) -> Result<Self, clap::Error> {
        Self::try_parse_from(std::iter::once("pwt").chain(cmd.as_ref().split_whitespace()))
    }

    /// The logging args
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }

    /// Whether the command should only be printed
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The settings given on the command line
    pub fn settings(&self) -> GwtSettings {
        let mut settings = GwtSettings::default();
        if !self.modules.is_empty() {
            settings.modules = Some(self.modules.clone());
        }
        settings.compile.local_workers = self.workers.map(|workers| workers as usize);
        settings.compile.optimize = self.optimize;
        settings.compile.style = self.style;
        settings.compile.log_level = self.log_level;
        settings
    }

    /// Creates the project described by these args, with the gwt plugin applied
    pub fn project(&self) -> BuildResult<Project> {
        let mut project = match &self.project_dir {
            Some(dir) => Project::in_dir(dir)?,
            None => Project::new()?,
        };
        if let Some(build_dir) = &self.build_dir {
            project.set_build_dir(build_dir)?;
        }
        project.apply_plugin::<GwtPlugin>()?;

        let mut settings = self.settings();
        let file_settings = match &self.settings_file {
            Some(file) => GwtSettings::from_file(project.file(file))?,
            None => GwtSettings::find(project.project_dir())?,
        };
        settings.merge(file_settings);

        let project_dir = project.project_dir();
        let extension = project.require_extension_mut::<PutnamiExtension>()?;
        settings.apply_to(extension, &project_dir)?;
        Ok(project)
    }
}

/// Runs the gwt compile described by the args
pub fn run(args: &PwtArgs) -> BuildResult {
    let project = args.project()?;
    let mut task = GwtCompile::create(&project)?;
    if args.dry_run() {
        println!("{}", task.command_line(&project)?);
        return Ok(());
    }
    info!("running {}: {}", GwtCompile::NAME, task.description());
    task.task_action(&project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwt_core::lazy_evaluation::Provider;
    use std::fs;

    #[test]
    fn parse_compiler_flags() {
        let args =
            PwtArgs::try_command_line("-J 4 -O 2 --style pretty -m a.App --module b.App --dry-run")
                .unwrap();
        assert!(args.dry_run());
        let settings = args.settings();
        assert_eq!(settings.compile.local_workers, Some(4));
        assert_eq!(settings.compile.optimize, Some(2));
        assert_eq!(settings.compile.style, Some(CodeStyle::Pretty));
        assert_eq!(
            settings.modules,
            Some(vec!["a.App".to_string(), "b.App".to_string()])
        );
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(PwtArgs::try_command_line("-O 10").is_err());
        assert!(PwtArgs::try_command_line("-J 0").is_err());
        assert!(PwtArgs::try_command_line("--style ugly").is_err());
    }

    #[test]
    fn command_line_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pwt.toml"),
            "modules = [\"from.File\"]\n[compile]\noptimize = 9\nstyle = \"DETAILED\"\n",
        )
        .unwrap();
        let args = PwtArgs::try_command_line(format!(
            "--project-dir {} -O 1",
            dir.path().to_string_lossy()
        ))
        .unwrap();
        let project = args.project().unwrap();
        let extension = project.require_extension::<PutnamiExtension>().unwrap();
        assert_eq!(extension.compile.optimize.get(), 1);
        assert_eq!(extension.compile.style.get(), CodeStyle::Detailed);
        assert_eq!(extension.modules.get(), vec!["from.File".to_string()]);
    }
}
