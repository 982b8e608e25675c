//! The flag vocabulary of `com.google.gwt.dev.Compiler`.
//!
//! Boolean options are emitted through [`ToggleFlag`]s. A paired toggle always emits exactly
//! one of its two spellings, an additive toggle only emits its flag when enabled.

use pwt_std::specs::java_spec::JavaCommandBuilder;

/// The entry point of the compiler
pub const COMPILER_MAIN_CLASS: &str = "com.google.gwt.dev.Compiler";
/// Disables the unit cache that is persisted between runs
pub const NO_PERSISTENT_UNIT_CACHE: &str = "-Dgwt.persistentunitcache=false";

pub const WORK_DIR: &str = "-workDir";
pub const GEN: &str = "-gen";
pub const WAR: &str = "-war";
pub const DEPLOY: &str = "-deploy";
pub const EXTRA: &str = "-extra";
pub const LOG_LEVEL: &str = "-logLevel";
pub const LOCAL_WORKERS: &str = "-localWorkers";
pub const SOURCE_LEVEL: &str = "-sourceLevel";
pub const OPTIMIZE: &str = "-optimize";
pub const STYLE: &str = "-style";
pub const METHOD_NAME_DISPLAY_MODE: &str = "-XmethodNameDisplayMode";
pub const JS_INTEROP_MODE: &str = "-XjsInteropMode";

/// A boolean compiler option
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ToggleFlag {
    /// Emitted when the option is enabled
    pub on: &'static str,
    /// Emitted when the option is disabled. Additive toggles have none.
    pub off: Option<&'static str>,
}

impl ToggleFlag {
    /// A toggle that emits one of two spellings
    pub const fn paired(on: &'static str, off: &'static str) -> Self {
        Self { on, off: Some(off) }
    }

    /// A toggle that only emits when enabled
    pub const fn additive(on: &'static str) -> Self {
        Self { on, off: None }
    }

    /// Whether this toggle always emits a token
    pub fn is_paired(&self) -> bool {
        self.off.is_some()
    }

    /// The token emitted for a value, if any
    pub fn token(&self, enabled: bool) -> Option<&'static str> {
        if enabled {
            Some(self.on)
        } else {
            self.off
        }
    }

    /// Adds this toggle to a command
    pub fn apply(&self, builder: &mut JavaCommandBuilder, enabled: bool) {
        match self.off {
            Some(off) => {
                builder.add_arg_if(enabled, self.on, off);
            }
            None if enabled => {
                builder.add_arg(self.on);
            }
            None => {}
        }
    }
}

pub const FAIL_ON_ERROR: ToggleFlag = ToggleFlag::paired("-failOnError", "-nofailOnError");
pub const DRAFT_COMPILE: ToggleFlag = ToggleFlag::paired("-draftCompile", "-nodraftCompile");
pub const COMPILE_REPORT: ToggleFlag = ToggleFlag::paired("-compileReport", "-nocompileReport");
pub const INCREMENTAL: ToggleFlag = ToggleFlag::additive("-incremental");
pub const CHECK_ASSERTIONS: ToggleFlag =
    ToggleFlag::paired("-checkAssertions", "-nocheckAssertions");
pub const CHECK_CASTS: ToggleFlag = ToggleFlag::paired("-XcheckCasts", "-XnocheckCasts");
pub const ENFORCE_STRICT_RESOURCES: ToggleFlag =
    ToggleFlag::paired("-XenforceStrictResources", "-XnoenforceStrictResources");
pub const CLASS_METADATA: ToggleFlag = ToggleFlag::paired("-XclassMetadata", "-XnoclassMetadata");
pub const OVERLAPPING_SOURCE_WARNINGS: ToggleFlag =
    ToggleFlag::paired("-overlappingSourceWarnings", "-nooverlappingSourceWarnings");
pub const SAVE_SOURCE: ToggleFlag = ToggleFlag::paired("-saveSource", "-nosaveSource");
pub const CLOSURE_COMPILER: ToggleFlag =
    ToggleFlag::paired("-XclosureCompiler", "-XnoclosureCompiler");

/// Every boolean option by name, in the order they are emitted
pub static TOGGLES: &[(&str, ToggleFlag)] = &[
    ("fail_on_error", FAIL_ON_ERROR),
    ("draft_compile", DRAFT_COMPILE),
    ("compile_report", COMPILE_REPORT),
    ("incremental", INCREMENTAL),
    ("check_assertions", CHECK_ASSERTIONS),
    ("check_casts", CHECK_CASTS),
    ("enforce_strict_resources", ENFORCE_STRICT_RESOURCES),
    ("class_metadata", CLASS_METADATA),
    ("overlapping_source_warnings", OVERLAPPING_SOURCE_WARNINGS),
    ("save_source", SAVE_SOURCE),
    ("closure_compiler", CLOSURE_COMPILER),
];

/// Finds a toggle by option name
pub fn toggle(name: &str) -> Option<&'static ToggleFlag> {
    TOGGLES
        .iter()
        .find(|(toggle_name, _)| *toggle_name == name)
        .map(|(_, flag)| flag)
}
