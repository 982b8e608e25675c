//! Contains gwt related extensions

use crate::options::CompilerOptions;
use pwt_core::lazy_evaluation::{Prop, ProviderExt, VecProp};
use pwt_std::specs::java_spec::JavaOptions;
use std::path::PathBuf;

/// The directory under the build directory that holds everything the compiler produces
pub const OUTPUT_DIR: &str = "putnami";

/// The gwt plugin extension, registered as `putnami`
#[derive(Debug, Clone)]
pub struct PutnamiExtension {
    /// The gwt modules to compile
    pub modules: VecProp<String>,
    /// Options of the compiler
    pub compile: CompilerOptions,
    /// Settings of the virtual machine running the compiler
    pub dev: Prop<JavaOptions>,
    /// The compile class path of the project
    pub compile_classpath: VecProp<PathBuf>,
    /// The class path of the gwt sdk
    pub sdm_classpath: VecProp<PathBuf>,
}

impl PutnamiExtension {
    /// Creates a new extension whose output directories live under `build_dir`.
    ///
    /// Each output directory is derived from `build_dir` the first time it is read and keeps
    /// that value afterwards, so the build directory must be final before any output is read.
    pub fn new(build_dir: Prop<PathBuf>) -> Self {
        let mut compile = CompilerOptions::new();
        let output = |path: &'static str| {
            build_dir
                .clone()
                .map(move |dir| dir.join(OUTPUT_DIR).join(path))
        };
        compile.war = Prop::with_convention("war", output("out"));
        compile.work_dir = Prop::with_convention("workDir", output("work"));
        compile.gen = Prop::with_convention("gen", output("extra/gen"));
        compile.deploy = Prop::with_convention("deploy", output("extra/deploy"));
        compile.extra = Prop::with_convention("extra", output("extra"));
        compile.save_source_output =
            Prop::with_convention("saveSourceOutput", output("extra/source"));
        compile.missing_deps_file =
            Prop::with_convention("missingDepsFile", output("extra/missingDepsFile"));

        Self {
            modules: VecProp::new("modules"),
            compile,
            dev: Prop::with_convention("dev", JavaOptions::default),
            compile_classpath: VecProp::new("compileClasspath"),
            sdm_classpath: VecProp::new("sdmClasspath"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwt_core::lazy_evaluation::Provider;

    fn build_dir(path: &str) -> Prop<PathBuf> {
        let mut build_dir = Prop::new("buildDir");
        build_dir.set(path).unwrap();
        build_dir
    }

    #[test]
    fn outputs_follow_build_dir_until_read() {
        let mut build_dir = build_dir("/project/build");
        let extension = PutnamiExtension::new(build_dir.clone());
        assert_eq!(
            extension.compile.war.get(),
            PathBuf::from("/project/build/putnami/out")
        );
        build_dir.set("/other").unwrap();
        assert_eq!(
            extension.compile.war.get(),
            PathBuf::from("/project/build/putnami/out"),
            "war was already read"
        );
        assert_eq!(
            extension.compile.missing_deps_file.get(),
            PathBuf::from("/other/putnami/extra/missingDepsFile"),
            "missing deps file was never read"
        );
    }

    #[test]
    fn lists_start_empty() {
        let extension = PutnamiExtension::new(build_dir("build"));
        assert!(extension.modules.get().is_empty());
        assert!(extension.compile_classpath.get().is_empty());
        assert_eq!(extension.dev.get(), JavaOptions::default());
    }
}
