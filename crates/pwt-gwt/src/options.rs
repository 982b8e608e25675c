//! The options understood by the GWT compiler

use pwt_core::lazy_evaluation::{self, Prop, Provider};
use pwt_std::specs::java_spec::ArgValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ffi::OsString;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The highest optimization level the compiler accepts
pub const MAX_OPTIMIZE: u8 = 9;

/// How much the compiler logs. Levels are ordered from least to most verbose.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Trace,
    Debug,
    Spam,
    All,
}

/// The style of the emitted javascript
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum CodeStyle {
    #[default]
    Obfuscated,
    Pretty,
    Detailed,
}

/// How java method names are kept in the emitted javascript
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MethodNameDisplayMode {
    #[default]
    None,
    OnlyMethodName,
    Abbreviated,
    Full,
}

/// Which javascript interop semantics the compiler applies
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum JsInteropMode {
    #[default]
    None,
    Js,
    Closure,
}

/// Enums are written and read by their compiler names
macro_rules! compiler_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let name = String::deserialize(deserializer)?;
                    name.parse().map_err(|_| {
                        let expected = <$ty>::iter()
                            .map(|v| v.to_string())
                            .collect::<Vec<_>>()
                            .join(", ");
                        <D::Error as serde::de::Error>::custom(format!(
                            "unknown {} {:?}, expected one of {}",
                            stringify!($ty),
                            name,
                            expected
                        ))
                    })
                }
            }

            impl ArgValue for $ty {
                fn arg_value(&self) -> Option<OsString> {
                    Some(OsString::from(self.to_string()))
                }
            }
        )*
    };
}

compiler_name!(LogLevel, CodeStyle, MethodNameDisplayMode, JsInteropMode);

/// An option was given a value the compiler can't accept
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("optimize must be between 0 and {}, got {0}", MAX_OPTIMIZE)]
    OptimizeOutOfRange(u8),
    #[error("localWorkers must be at least 1")]
    NoLocalWorkers,
}

/// Every option passed to the GWT compiler.
///
/// Options without a value emit nothing. Unless set otherwise, options use the compiler's own
/// defaults and `local_workers` uses the number of logical cpus on the host.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    pub war: Prop<PathBuf>,
    pub work_dir: Prop<PathBuf>,
    pub gen: Prop<PathBuf>,
    pub deploy: Prop<PathBuf>,
    pub extra: Prop<PathBuf>,
    pub save_source_output: Prop<PathBuf>,
    pub missing_deps_file: Prop<PathBuf>,

    pub log_level: Prop<LogLevel>,
    pub local_workers: Prop<usize>,
    pub fail_on_error: Prop<bool>,
    pub source_level: Prop<String>,
    pub draft_compile: Prop<bool>,
    pub optimize: Prop<u8>,
    pub style: Prop<CodeStyle>,
    pub compile_report: Prop<bool>,
    pub incremental: Prop<bool>,
    pub check_assertions: Prop<bool>,
    pub check_casts: Prop<bool>,
    pub enforce_strict_resources: Prop<bool>,
    pub class_metadata: Prop<bool>,
    pub overlapping_source_warnings: Prop<bool>,
    pub save_source: Prop<bool>,
    pub method_name_display_mode: Prop<MethodNameDisplayMode>,
    pub closure_compiler: Prop<bool>,
    pub js_interop_mode: Prop<JsInteropMode>,
    /// Only validates the modules. Accepted for completeness, the compile never passes it on.
    pub validate_only: Prop<bool>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! follow_all {
    ($this:expr, $other:expr, $($field:ident),* $(,)?) => {
        $(
            $this.$field.set_convention($other.$field.clone())?;
        )*
    };
}

impl CompilerOptions {
    /// Creates options with the compiler's defaults
    pub fn new() -> Self {
        Self {
            war: Prop::new("war"),
            work_dir: Prop::new("workDir"),
            gen: Prop::new("gen"),
            deploy: Prop::new("deploy"),
            extra: Prop::new("extra"),
            save_source_output: Prop::new("saveSourceOutput"),
            missing_deps_file: Prop::new("missingDepsFile"),
            log_level: Prop::with_convention("logLevel", LogLevel::default),
            local_workers: Prop::with_convention("localWorkers", num_cpus::get),
            fail_on_error: Prop::with_convention("failOnError", || false),
            source_level: Prop::new("sourceLevel"),
            draft_compile: Prop::with_convention("draftCompile", || false),
            optimize: Prop::with_convention("optimize", || MAX_OPTIMIZE),
            style: Prop::with_convention("style", CodeStyle::default),
            compile_report: Prop::with_convention("compileReport", || false),
            incremental: Prop::with_convention("incremental", || false),
            check_assertions: Prop::with_convention("checkAssertions", || false),
            check_casts: Prop::with_convention("checkCasts", || true),
            enforce_strict_resources: Prop::with_convention("enforceStrictResources", || false),
            class_metadata: Prop::with_convention("classMetadata", || true),
            overlapping_source_warnings: Prop::with_convention(
                "overlappingSourceWarnings",
                || false,
            ),
            save_source: Prop::with_convention("saveSource", || false),
            method_name_display_mode: Prop::with_convention(
                "methodNameDisplayMode",
                MethodNameDisplayMode::default,
            ),
            closure_compiler: Prop::with_convention("closureCompiler", || false),
            js_interop_mode: Prop::with_convention("jsInteropMode", JsInteropMode::default),
            validate_only: Prop::with_convention("validateOnly", || false),
        }
    }

    /// Makes every option of this set fall back to the matching option of `other`.
    pub fn follow(&mut self, other: &CompilerOptions) -> Result<(), lazy_evaluation::Error> {
        follow_all!(
            self,
            other,
            war,
            work_dir,
            gen,
            deploy,
            extra,
            save_source_output,
            missing_deps_file,
            log_level,
            local_workers,
            fail_on_error,
            source_level,
            draft_compile,
            optimize,
            style,
            compile_report,
            incremental,
            check_assertions,
            check_casts,
            enforce_strict_resources,
            class_metadata,
            overlapping_source_warnings,
            save_source,
            method_name_display_mode,
            closure_compiler,
            js_interop_mode,
            validate_only,
        );
        Ok(())
    }

    /// Sets the optimization level, rejecting levels above [`MAX_OPTIMIZE`](MAX_OPTIMIZE)
    pub fn set_optimize(&mut self, level: u8) -> Result<(), OptionError> {
        if level > MAX_OPTIMIZE {
            return Err(OptionError::OptimizeOutOfRange(level));
        }
        self.optimize
            .set(level)
            .map_err(|_| OptionError::OptimizeOutOfRange(level))
    }

    /// Sets the number of local workers, rejecting zero
    pub fn set_local_workers(&mut self, workers: usize) -> Result<(), OptionError> {
        if workers == 0 {
            return Err(OptionError::NoLocalWorkers);
        }
        self.local_workers
            .set(workers)
            .map_err(|_| OptionError::NoLocalWorkers)
    }

    /// Checks values that were set directly on the properties
    pub fn validate(&self) -> Result<(), OptionError> {
        match self.optimize.try_get() {
            Some(level) if level > MAX_OPTIMIZE => {
                return Err(OptionError::OptimizeOutOfRange(level))
            }
            _ => {}
        }
        if self.local_workers.try_get() == Some(0) {
            return Err(OptionError::NoLocalWorkers);
        }
        Ok(())
    }
}
