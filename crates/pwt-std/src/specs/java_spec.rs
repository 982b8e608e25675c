//! Builds command lines for programs run on a java virtual machine

use crate::specs::exec_spec::{shell_escape, ExecSpecBuilder};
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// The separator placed between class path entries
pub const CLASS_PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// A value that can follow a flag on a command line.
///
/// A value that renders as nothing, like `None` or an empty string, is absent and its flag is
/// not emitted at all.
pub trait ArgValue {
    /// The rendered value, if any
    fn arg_value(&self) -> Option<OsString>;
}

impl ArgValue for str {
    fn arg_value(&self) -> Option<OsString> {
        (!self.is_empty()).then(|| OsString::from(self))
    }
}

impl ArgValue for String {
    fn arg_value(&self) -> Option<OsString> {
        self.as_str().arg_value()
    }
}

impl ArgValue for OsStr {
    fn arg_value(&self) -> Option<OsString> {
        (!self.is_empty()).then(|| self.to_os_string())
    }
}

impl ArgValue for OsString {
    fn arg_value(&self) -> Option<OsString> {
        self.as_os_str().arg_value()
    }
}

impl ArgValue for Path {
    fn arg_value(&self) -> Option<OsString> {
        self.as_os_str().arg_value()
    }
}

impl ArgValue for PathBuf {
    fn arg_value(&self) -> Option<OsString> {
        self.as_os_str().arg_value()
    }
}

impl<T: ArgValue> ArgValue for Option<T> {
    fn arg_value(&self) -> Option<OsString> {
        self.as_ref().and_then(ArgValue::arg_value)
    }
}

impl<T: ArgValue + ?Sized> ArgValue for &T {
    fn arg_value(&self) -> Option<OsString> {
        (**self).arg_value()
    }
}

macro_rules! integer_arg_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArgValue for $ty {
                fn arg_value(&self) -> Option<OsString> {
                    Some(OsString::from(self.to_string()))
                }
            }
        )*
    };
}

integer_arg_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Settings for the virtual machine itself, independent of the program it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaOptions {
    /// Maximum heap size, emitted as `-Xmx<size>`
    pub max_heap_size: Option<String>,
    /// Initial heap size, emitted as `-Xms<size>`
    pub min_heap_size: Option<String>,
    /// Maximum permanent generation size, emitted as `-XX:MaxPermSize=<size>`
    pub max_perm_size: Option<String>,
    /// Whether to open a debug socket
    pub debug_java: bool,
    /// The port of the debug socket
    pub debug_port: u16,
    /// Whether the vm waits for a debugger before starting
    pub debug_suspend: bool,
    /// Extra flags passed to the vm verbatim
    pub java_args: Vec<String>,
}

impl JavaOptions {
    /// The port the debug socket listens on unless another is set
    pub const DEFAULT_DEBUG_PORT: u16 = 8000;

    /// Renders these options as vm flags
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![];
        if let Some(size) = self.max_heap_size.as_deref().filter(|s| !s.is_empty()) {
            args.push(format!("-Xmx{}", size));
        }
        if let Some(size) = self.min_heap_size.as_deref().filter(|s| !s.is_empty()) {
            args.push(format!("-Xms{}", size));
        }
        if let Some(size) = self.max_perm_size.as_deref().filter(|s| !s.is_empty()) {
            args.push(format!("-XX:MaxPermSize={}", size));
        }
        if self.debug_java {
            let port = match self.debug_port {
                0 => Self::DEFAULT_DEBUG_PORT,
                port => port,
            };
            args.push("-Xdebug".to_string());
            args.push(format!(
                "-Xrunjdwp:transport=dt_socket,server=y,suspend={},address={}",
                if self.debug_suspend { "y" } else { "n" },
                port
            ));
        }
        args.extend(self.java_args.iter().cloned());
        args
    }
}

/// Accumulates a java invocation and renders it as an ordered list of tokens.
///
/// Tokens are always rendered as: vm flags, `-cp <class path>`, main class, then program
/// arguments in the order they were added.
///
/// # Example
/// ```
/// # use pwt_std::specs::java_spec::JavaCommandBuilder;
/// let mut builder = JavaCommandBuilder::new();
/// builder
///     .set_main_class("com.example.Main")
///     .add_java_args(["-Xmx512m"])
///     .add_arg_value("-level", Some(3))
///     .add_arg_value("-name", "")
///     .add_arg("module");
/// let tokens: Vec<String> = builder
///     .tokens()
///     .into_iter()
///     .map(|t| t.into_string().unwrap())
///     .collect();
/// assert_eq!(tokens, ["-Xmx512m", "com.example.Main", "-level", "3", "module"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JavaCommandBuilder {
    java_executable: Option<PathBuf>,
    main_class: Option<String>,
    java_args: Vec<OsString>,
    class_path: Vec<PathBuf>,
    args: Vec<OsString>,
}

impl JavaCommandBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific java executable instead of locating one
    pub fn set_java_executable<P: AsRef<Path>>(&mut self, java: P) -> &mut Self {
        self.java_executable = Some(java.as_ref().to_path_buf());
        self
    }

    /// Sets the main class. The last call wins.
    pub fn set_main_class<S: AsRef<str>>(&mut self, main_class: S) -> &mut Self {
        self.main_class = Some(main_class.as_ref().to_string());
        self
    }

    /// Appends an entry to the class path. Empty entries are skipped.
    pub fn add_class_path<P: AsRef<Path>>(&mut self, entry: P) -> &mut Self {
        let entry = entry.as_ref();
        if !entry.as_os_str().is_empty() {
            self.class_path.push(entry.to_path_buf());
        }
        self
    }

    /// Appends many entries to the class path
    pub fn add_class_paths<I, P>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for entry in entries {
            self.add_class_path(entry);
        }
        self
    }

    /// Adds flags for the vm, passed verbatim before the class path
    pub fn add_java_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.java_args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Adds the vm flags described by a set of [`JavaOptions`](JavaOptions)
    pub fn configure_java_args(&mut self, options: &JavaOptions) -> &mut Self {
        self.add_java_args(options.to_args())
    }

    /// Adds a single bare program argument
    pub fn add_arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Adds a flag followed by its value. Nothing is added when the value is absent or empty.
    pub fn add_arg_value<V: ArgValue>(&mut self, flag: &str, value: V) -> &mut Self {
        if let Some(value) = value.arg_value() {
            self.args.push(OsString::from(flag));
            self.args.push(value);
        }
        self
    }

    /// Adds `on` if `condition` is true, `off` otherwise. Always adds exactly one token.
    pub fn add_arg_if(&mut self, condition: bool, on: &str, off: &str) -> &mut Self {
        self.add_arg(if condition { on } else { off })
    }

    /// The class path as a single token, if any entries were added
    pub fn class_path(&self) -> Option<OsString> {
        if self.class_path.is_empty() {
            return None;
        }
        let mut joined = OsString::new();
        for (index, entry) in self.class_path.iter().enumerate() {
            if index > 0 {
                joined.push(CLASS_PATH_SEPARATOR);
            }
            joined.push(entry);
        }
        Some(joined)
    }

    /// The main class, if set
    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    /// All tokens following the java executable
    pub fn tokens(&self) -> Vec<OsString> {
        let mut tokens = self.java_args.clone();
        if let Some(class_path) = self.class_path() {
            tokens.push(OsString::from("-cp"));
            tokens.push(class_path);
        }
        if let Some(main_class) = &self.main_class {
            tokens.push(OsString::from(main_class));
        }
        tokens.extend(self.args.iter().cloned());
        tokens
    }

    /// The java executable used to run the command.
    ///
    /// Uses, in order, an explicitly set executable, `$JAVA_HOME/bin/java`, the `java` found
    /// on the `PATH`, and finally the bare name `java`.
    pub fn java_executable(&self) -> PathBuf {
        if let Some(java) = &self.java_executable {
            return java.clone();
        }
        let java_name = if cfg!(windows) { "java.exe" } else { "java" };
        if let Some(java_home) = std::env::var_os("JAVA_HOME").filter(|home| !home.is_empty()) {
            return PathBuf::from(java_home).join("bin").join(java_name);
        }
        match which::which("java") {
            Ok(java) => java,
            Err(e) => {
                debug!("java not found on the path ({}), using bare name", e);
                PathBuf::from("java")
            }
        }
    }

    /// Creates an exec spec builder that runs this command
    pub fn into_exec_spec(self) -> ExecSpecBuilder {
        ExecSpecBuilder::new()
            .with_exec(self.java_executable())
            .with_args(self.tokens())
    }
}

impl Display for JavaCommandBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", shell_escape(self.java_executable().as_os_str()))?;
        for token in self.tokens() {
            write!(f, " {}", shell_escape(&token))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(builder: &JavaCommandBuilder) -> Vec<String> {
        builder
            .tokens()
            .into_iter()
            .map(|token| token.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn arg_value_absent_when_empty() {
        let mut builder = JavaCommandBuilder::new();
        builder
            .add_arg_value("-a", Option::<String>::None)
            .add_arg_value("-b", "")
            .add_arg_value("-c", PathBuf::new())
            .add_arg_value("-d", "x")
            .add_arg_value("-e", 0_u8);
        assert_eq!(strings(&builder), ["-d", "x", "-e", "0"]);
    }

    #[test]
    fn arg_if_adds_exactly_one() {
        let mut builder = JavaCommandBuilder::new();
        builder.add_arg_if(true, "-on", "-off");
        builder.add_arg_if(false, "-on", "-off");
        assert_eq!(strings(&builder), ["-on", "-off"]);
    }

    #[test]
    fn class_path_joined_with_separator() {
        let mut builder = JavaCommandBuilder::new();
        builder.add_class_path("a").add_class_path("").add_class_path("b");
        let expected = format!("a{}b", CLASS_PATH_SEPARATOR);
        assert_eq!(strings(&builder), ["-cp", expected.as_str()]);
    }

    #[test]
    fn empty_class_path_omitted() {
        let mut builder = JavaCommandBuilder::new();
        builder.set_main_class("Main").add_arg("x");
        assert_eq!(strings(&builder), ["Main", "x"]);
    }

    #[test]
    fn tokens_ordered_regardless_of_insertion() {
        let mut builder = JavaCommandBuilder::new();
        builder
            .add_arg("-first")
            .set_main_class("Old")
            .add_class_path("lib.jar")
            .add_java_args(["-ea"])
            .set_main_class("Main")
            .add_arg("-second");
        assert_eq!(
            strings(&builder),
            ["-ea", "-cp", "lib.jar", "Main", "-first", "-second"]
        );
    }

    #[test]
    fn java_options_rendered() {
        let options = JavaOptions {
            max_heap_size: Some("1024m".to_string()),
            min_heap_size: Some("512m".to_string()),
            max_perm_size: Some("256m".to_string()),
            debug_java: true,
            debug_port: 8001,
            debug_suspend: true,
            java_args: vec!["-Dfoo=bar".to_string()],
        };
        assert_eq!(
            options.to_args(),
            [
                "-Xmx1024m",
                "-Xms512m",
                "-XX:MaxPermSize=256m",
                "-Xdebug",
                "-Xrunjdwp:transport=dt_socket,server=y,suspend=y,address=8001",
                "-Dfoo=bar"
            ]
        );
        assert!(JavaOptions::default().to_args().is_empty());
    }

    #[test]
    fn display_quotes_tokens() {
        let mut builder = JavaCommandBuilder::new();
        builder
            .set_java_executable("/usr/bin/java")
            .set_main_class("Main")
            .add_arg("has space");
        assert_eq!(builder.to_string(), "/usr/bin/java Main 'has space'");
    }

    #[test]
    fn explicit_executable_used_for_exec_spec() {
        let mut builder = JavaCommandBuilder::new();
        builder.set_java_executable("/opt/java/bin/java").set_main_class("Main");
        let spec = builder.into_exec_spec().build().unwrap();
        assert_eq!(spec.executable(), "/opt/java/bin/java");
        assert_eq!(spec.args(), [OsString::from("Main")]);
    }
}
