//! The exec spec helps with defining executables

use crate::error::ExecError;
use log::Level;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::string::FromUtf8Error;
use std::thread::{self, JoinHandle};

/// Input for exec
#[derive(Debug, Default, Clone)]
pub enum Input {
    /// No input
    #[default]
    Null,
    /// Get input bytes from a file
    File(PathBuf),
    /// Get input bytes from a byte vector
    Bytes(Vec<u8>),
}

impl From<&[u8]> for Input {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Input {
    fn from(c: Vec<u8>) -> Self {
        Self::Bytes(c)
    }
}

impl From<String> for Input {
    fn from(str: String) -> Self {
        Self::Bytes(str.into_bytes())
    }
}

impl From<&str> for Input {
    fn from(str: &str) -> Self {
        Self::Bytes(str.as_bytes().to_vec())
    }
}

impl From<&Path> for Input {
    fn from(p: &Path) -> Self {
        Self::File(p.to_path_buf())
    }
}

impl From<PathBuf> for Input {
    fn from(file: PathBuf) -> Self {
        Self::File(file)
    }
}

/// Output types for exec
#[derive(Debug, Clone)]
pub enum Output {
    /// Throw the output away
    Null,
    /// Stream the output into a file
    ///
    /// If append is true, then a new file isn't created if one at the path
    /// already exists. and text is appended. Otherwise a new file
    /// is created, replacing any old file.
    File {
        /// The path of the file to emit output to
        path: PathBuf,
        /// whether to append to the file or not
        append: bool,
    },
    /// Stream the output into the logger at a given level, one message per line
    Log(Level),
    /// Stream the output into a byte vector
    Bytes,
}

impl Output {
    /// Create a new output with a file as the target
    pub fn new<P: AsRef<Path>>(path: P, append: bool) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            append,
        }
    }
}

impl From<Level> for Output {
    fn from(lvl: Level) -> Self {
        Output::Log(lvl)
    }
}

impl From<&Path> for Output {
    fn from(path: &Path) -> Self {
        Self::new(path, false)
    }
}

impl From<PathBuf> for Output {
    fn from(path: PathBuf) -> Self {
        Self::File {
            path,
            append: false,
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::Log(Level::Info)
    }
}

/// The exec spec helps define something to execute by the project
#[derive(Debug, Default, Clone)]
pub struct ExecSpec {
    /// The working directory to run the executable in
    pub working_dir: PathBuf,
    /// The executable
    pub executable: OsString,
    /// The command line args for the executable
    pub clargs: Vec<OsString>,
    /// The environment variables for the executable.
    ///
    /// # Warning
    /// **ONLY** the environment variables in this map will be passed to the executable.
    pub env: HashMap<OsString, OsString>,
    /// The input to the program, if needed
    pub input: Input,
    /// Where the program's stdout is emitted
    pub output: Output,
    /// Where the program's stderr is emitted
    pub output_err: Output,
}

impl ExecSpec {
    /// The working directory of the exec spec. If the path is relative, then the relative
    /// path is calculated relative to the the base directory of a project.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The executable to run
    pub fn executable(&self) -> &OsStr {
        &self.executable
    }

    /// Command line args for the exec spec
    pub fn args(&self) -> &[OsString] {
        &self.clargs[..]
    }

    /// The environment variables for the exec spec
    pub fn env(&self) -> &HashMap<OsString, OsString> {
        &self.env
    }

    /// Try to executes an exec-spec, using the given path to resolve the current directory. If
    /// creating the program is successful, returns an [`ExecHandle`](ExecHandle). This is a
    /// non-blocking method, the program is waited on in a separate thread.
    ///
    /// # Error
    /// Returns [`LaunchFailure`](ExecError::LaunchFailure) if the program could not be started,
    /// for example when the executable does not exist.
    pub fn execute_spec<P>(self, path: P) -> Result<ExecHandle, ExecError>
    where
        P: AsRef<Path>,
    {
        let working_dir = self.resolve_working_dir(path.as_ref());
        ExecHandle::create(self, &working_dir)
    }

    /// Resolve a working directory
    fn resolve_working_dir(&self, path: &Path) -> PathBuf {
        if self.working_dir().is_absolute() {
            self.working_dir.to_path_buf()
        } else {
            path.join(&self.working_dir)
        }
    }
}

impl Display for ExecSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", shell_escape(&self.executable))?;
        for arg in &self.clargs {
            write!(f, " {}", shell_escape(arg))?;
        }
        Ok(())
    }
}

/// Quotes an argument so the rendered command line can be pasted into a posix shell
pub(crate) fn shell_escape(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || "'\"\\$`!*?&;|<>(){}#~".contains(c));
    if needs_quotes {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Builds exec specs
#[derive(Debug)]
pub struct ExecSpecBuilder {
    /// The working directory to run the executable in
    pub working_dir: Option<PathBuf>,
    /// The executable
    pub executable: Option<OsString>,
    /// The command line args for the executable
    pub clargs: Vec<OsString>,
    /// The environment variables for the executable. By default, the exec spec will
    /// inherit from the parent process.
    ///
    /// # Warning
    /// **ONLY** The environment variables in this map will be passed to the executable.
    pub env: HashMap<OsString, OsString>,
    stdin: Input,
    output: Output,
    output_err: Output,
}

/// An exec spec configuration error
#[derive(Debug, thiserror::Error)]
#[error("{}", error)]
pub struct ExecSpecBuilderError {
    error: String,
}

impl From<&str> for ExecSpecBuilderError {
    fn from(s: &str) -> Self {
        Self {
            error: s.to_string(),
        }
    }
}

impl Default for ExecSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecSpecBuilder {
    /// Create a new [ExecSpecBuilder](Self).
    pub fn new() -> Self {
        Self {
            working_dir: Some(PathBuf::new()),
            executable: None,
            clargs: vec![],
            env: Self::default_env(),
            stdin: Input::default(),
            output: Output::default(),
            output_err: Output::Log(Level::Warn),
        }
    }

    /// The environment of the current process. Variables that aren't valid unicode are kept as-is.
    pub fn default_env() -> HashMap<OsString, OsString> {
        std::env::vars_os().collect()
    }

    /// Changes the environment variables to the contents of this map.
    ///
    /// # Warning
    /// This will clear all previously set values in the environment map
    pub fn with_env<I, K, V>(&mut self, env: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.env.clear();
        self.extend_env(env)
    }

    /// Adds variables to the environment
    pub fn extend_env<I, K, V>(&mut self, env: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.env
            .extend(env.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add an arg to the command
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.clargs.push(arg.as_ref().to_os_string());
        self
    }

    /// Add many args to the command
    pub fn args<I, S: AsRef<OsStr>>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
    {
        self.clargs
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Add an arg to the command
    pub fn with_arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.arg(arg);
        self
    }

    /// Add many args to the command
    pub fn with_args<I, S: AsRef<OsStr>>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.args(args);
        self
    }

    /// Set the executable for the exec spec
    pub fn exec<E: AsRef<OsStr>>(&mut self, exec: E) -> &mut Self {
        self.executable = Some(exec.as_ref().to_os_string());
        self
    }

    /// Set the executable for the exec spec
    pub fn with_exec<E: AsRef<OsStr>>(mut self, exec: E) -> Self {
        self.exec(exec);
        self
    }

    /// Set the working directory for the exec spec. If the path is relative, it will be
    /// resolved to the project directory.
    pub fn working_dir<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.working_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the working directory for the exec spec.
    pub fn with_working_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.working_dir(path);
        self
    }

    /// Set the standard input for the executable. doesn't need to be set
    pub fn stdin<In>(&mut self, input: In) -> &mut Self
    where
        In: Into<Input>,
    {
        self.stdin = input.into();
        self
    }

    /// Set the standard input for the executable. doesn't need to be set
    pub fn with_stdin<In>(mut self, input: In) -> Self
    where
        In: Into<Input>,
    {
        self.stdin(input);
        self
    }

    /// Sets the output type for this exec spec
    pub fn stdout<O>(&mut self, output: O) -> &mut Self
    where
        O: Into<Output>,
    {
        self.output = output.into();
        self
    }

    /// Sets the output type for this exec spec
    pub fn with_stdout<O>(mut self, output: O) -> Self
    where
        O: Into<Output>,
    {
        self.stdout(output);
        self
    }

    /// Sets the error output type for this exec spec
    pub fn stderr<O>(&mut self, output: O) -> &mut Self
    where
        O: Into<Output>,
    {
        self.output_err = output.into();
        self
    }

    /// Sets the error output type for this exec spec
    pub fn with_stderr<O>(mut self, output: O) -> Self
    where
        O: Into<Output>,
    {
        self.stderr(output);
        self
    }

    /// Build the exec spec from the builder
    ///
    /// # Error
    /// Will return an error if the working directory or the executable isn't set.
    pub fn build(self) -> Result<ExecSpec, ExecSpecBuilderError> {
        Ok(ExecSpec {
            working_dir: self
                .working_dir
                .ok_or_else(|| ExecSpecBuilderError::from("Working directory not set"))?,
            executable: self
                .executable
                .ok_or_else(|| ExecSpecBuilderError::from("Executable not set"))?,
            clargs: self.clargs,
            env: self.env,
            input: self.stdin,
            output: self.output,
            output_err: self.output_err,
        })
    }
}

/// The observable state of a launched process
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExecState {
    /// The process may still be running
    Running,
    /// The process has terminated with the given exit code
    Terminated(i32),
}

/// A handle into a running exec spec. Can be joined to get the exit code and output.
///
/// A spec that has not been executed yet has no handle, so a handle is always either
/// [`Running`](ExecState::Running) or [`Terminated`](ExecState::Terminated).
#[derive(Debug)]
pub struct ExecHandle {
    executable: OsString,
    running: Option<JoinHandle<io::Result<Finished>>>,
    result: Option<ExecResult>,
}

impl ExecHandle {
    fn create(spec: ExecSpec, working_dir: &Path) -> Result<Self, ExecError> {
        let mut command = Command::new(&spec.executable);
        command
            .current_dir(working_dir)
            .env_clear()
            .envs(&spec.env)
            .args(spec.args());

        let input = match &spec.input {
            Input::Null => Stdio::null(),
            Input::File(file) => Stdio::from(File::open(file)?),
            Input::Bytes(b) => {
                let mut file = tempfile::tempfile()?;
                file.write_all(&b[..])?;
                file.seek(SeekFrom::Start(0))?;
                Stdio::from(file)
            }
        };
        command.stdin(input);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let realized_output = RealizedOutput::try_from(spec.output.clone())?;
        let realized_output_err = RealizedOutput::try_from(spec.output_err.clone())?;

        let running = execute(command, realized_output, realized_output_err)?;
        Ok(Self {
            executable: spec.executable,
            running: Some(running),
            result: None,
        })
    }

    /// The current state of the process. A process that terminated but was not joined yet is
    /// still reported as running.
    pub fn state(&self) -> ExecState {
        match &self.result {
            Some(result) => ExecState::Terminated(result.code),
            None => ExecState::Running,
        }
    }

    /// Blocks until the process terminates, then returns its exit code. Calling this again
    /// returns the same exit code.
    pub fn join(&mut self) -> Result<i32, ExecError> {
        if let Some(result) = &self.result {
            return Ok(result.code);
        }
        let running = self
            .running
            .take()
            .ok_or(ExecError::InvalidState("process output was lost"))?;
        let finished = running.join().map_err(|_| ExecError::OutputThread)??;
        let result = ExecResult::from(finished);
        let code = result.code;
        debug!(
            "{:?} finished with exit code {}",
            self.executable, code
        );
        self.result = Some(result);
        Ok(code)
    }

    /// Gets the exit code of the process without blocking.
    ///
    /// # Error
    /// Returns [`InvalidState`](ExecError::InvalidState) if the process has not terminated yet.
    pub fn exit_value(&mut self) -> Result<i32, ExecError> {
        if let Some(result) = &self.result {
            return Ok(result.code);
        }
        match &self.running {
            Some(running) if running.is_finished() => self.join(),
            _ => Err(ExecError::InvalidState("process has not terminated")),
        }
    }

    /// Wait for the exec spec handle to finish
    pub fn wait(mut self) -> Result<ExecResult, ExecError> {
        self.join()?;
        self.result
            .take()
            .ok_or(ExecError::InvalidState("process output was lost"))
    }

    /// Gets the result of the process, if it was joined
    pub fn result(&self) -> Option<&ExecResult> {
        self.result.as_ref()
    }
}

/// Everything produced by the waiting thread once the child exits
#[derive(Debug)]
struct Finished {
    status: ExitStatus,
    output: RealizedOutput,
    output_err: RealizedOutput,
}

fn execute(
    mut command: Command,
    mut output: RealizedOutput,
    mut output_err: RealizedOutput,
) -> Result<JoinHandle<io::Result<Finished>>, ExecError> {
    trace!("attempting to execute command: {:?}", command);
    trace!("working_dir: {:?}", command.get_current_dir());

    let executable = command.get_program().to_os_string();
    let mut spawned = command
        .spawn()
        .map_err(|source| ExecError::LaunchFailure { executable, source })?;

    Ok(thread::spawn(move || {
        let stdout = spawned.stdout.take();
        let stderr = spawned.stderr.take();

        let status = thread::scope(|scope| -> io::Result<ExitStatus> {
            let out_join = scope.spawn(|| forward(stdout, &mut output));
            let err_join = scope.spawn(|| forward(stderr, &mut output_err));

            let status = spawned.wait()?;
            out_join
                .join()
                .map_err(|_| io::Error::new(ErrorKind::Interrupted, "emitting to output failed"))??;
            err_join
                .join()
                .map_err(|_| io::Error::new(ErrorKind::Interrupted, "emitting to error failed"))??;
            Ok(status)
        })?;

        Ok(Finished {
            status,
            output,
            output_err,
        })
    }))
}

fn forward<R: Read>(source: Option<R>, sink: &mut RealizedOutput) -> io::Result<u64> {
    match source {
        Some(mut source) => {
            let copied = io::copy(&mut source, sink)?;
            sink.flush()?;
            Ok(copied)
        }
        None => Ok(0),
    }
}

impl TryFrom<Output> for RealizedOutput {
    type Error = io::Error;

    fn try_from(value: Output) -> Result<Self, Self::Error> {
        match value {
            Output::Null => Ok(Self::Null),
            Output::File { path, append } => {
                let file = File::options()
                    .create(true)
                    .write(true)
                    .append(append)
                    .truncate(!append)
                    .open(path)?;

                Ok(Self::File(file))
            }
            Output::Log(level) => Ok(Self::Log {
                level,
                pending: vec![],
            }),
            Output::Bytes => Ok(Self::Bytes(vec![])),
        }
    }
}

#[derive(Debug)]
enum RealizedOutput {
    Null,
    File(File),
    Log { level: Level, pending: Vec<u8> },
    Bytes(Vec<u8>),
}

impl RealizedOutput {
    fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RealizedOutput::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl Write for RealizedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RealizedOutput::Null => Ok(buf.len()),
            RealizedOutput::File(f) => f.write(buf),
            RealizedOutput::Log { level, pending } => {
                pending.extend_from_slice(buf);
                while let Some(end) = pending.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = pending.drain(..=end).collect();
                    log!(*level, "{}", String::from_utf8_lossy(&line).trim_end());
                }
                Ok(buf.len())
            }
            RealizedOutput::Bytes(b) => {
                b.extend(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RealizedOutput::File(file) => file.flush(),
            RealizedOutput::Log { level, pending } if !pending.is_empty() => {
                log!(*level, "{}", String::from_utf8_lossy(pending).trim_end());
                pending.clear();
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Gets the result of the exec spec
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    code: i32,
    bytes: Option<Vec<u8>>,
    bytes_err: Option<Vec<u8>>,
}

impl From<Finished> for ExecResult {
    fn from(finished: Finished) -> Self {
        Self {
            code: finished.status.code().unwrap_or(-1),
            bytes: finished.output.into_bytes(),
            bytes_err: finished.output_err.into_bytes(),
        }
    }
}

impl ExecResult {
    /// Creates a result with only an exit code
    pub fn with_code(code: i32) -> Self {
        Self {
            code,
            bytes: None,
            bytes_err: None,
        }
    }

    /// Gets the exit code for the exec spec. Processes killed by a signal report `-1`.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Gets whether the exec spec is a success
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Make this an error naming `step` if exit code is not success
    pub fn expect_success<S: AsRef<str>>(self, step: S) -> Result<Self, ExecError> {
        crate::error::ensure_success(step, self.code)?;
        Ok(self)
    }

    /// Gets the output, in bytes, if the original exec spec specified the bytes
    /// output type
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Try to convert the output bytes into a string
    pub fn utf8_string(&self) -> Option<Result<String, FromUtf8Error>> {
        self.bytes().map(|s| String::from_utf8(s.to_vec()))
    }

    /// Gets the error output, in bytes, if the original exec spec specified the bytes
    /// output type
    pub fn bytes_err(&self) -> Option<&[u8]> {
        self.bytes_err.as_deref()
    }

    /// Try to convert the error output bytes into a string
    pub fn utf8_string_err(&self) -> Option<Result<String, FromUtf8Error>> {
        self.bytes_err().map(|s| String::from_utf8(s.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_exec_spec() {
        let mut builder = ExecSpecBuilder::new();
        builder.exec("echo").arg("hello, world");
        let exec = builder.build().unwrap();
        assert_eq!(exec.executable, "echo");
        assert_eq!(exec.to_string(), "echo 'hello, world'");
    }

    #[test]
    fn missing_executable_is_a_builder_error() {
        assert!(ExecSpecBuilder::new().build().is_err());
    }

    #[test]
    fn can_execute_spec() {
        let spec = ExecSpecBuilder::new()
            .with_exec("echo")
            .with_args(["hello", "world"])
            .with_stdout(Output::Bytes)
            .build()
            .expect("Couldn't build exec spec");

        let result = { spec }.execute_spec("/").expect("Couldn't create handle");
        let wait = result.wait().expect("couldn't finish exec spec");
        assert!(wait.success());
        let string = wait.utf8_string().unwrap().unwrap();
        assert_eq!("hello world", string.trim());
    }

    #[test]
    fn invalid_exec_can_be_detected() {
        let spec = ExecSpecBuilder::new()
            .with_exec("please-dont-exist")
            .with_stdout(Output::Null)
            .build()
            .expect("couldn't build");

        let spawn = spec.execute_spec("/");

        assert!(
            matches!(spawn, Err(ExecError::LaunchFailure { .. })),
            "Should return a launch failure"
        );
    }

    #[cfg(unix)]
    #[test]
    fn join_caches_exit_code() {
        let spec = ExecSpecBuilder::new()
            .with_exec("sh")
            .with_args(["-c", "exit 3"])
            .build()
            .unwrap();
        let mut handle = spec.execute_spec("/").unwrap();
        assert_eq!(handle.join().unwrap(), 3);
        assert_eq!(handle.join().unwrap(), 3);
        assert_eq!(handle.exit_value().unwrap(), 3);
        assert_eq!(handle.state(), ExecState::Terminated(3));
    }

    #[cfg(unix)]
    #[test]
    fn exit_value_before_termination_is_invalid() {
        let spec = ExecSpecBuilder::new()
            .with_exec("sleep")
            .with_arg("2")
            .build()
            .unwrap();
        let mut handle = spec.execute_spec("/").unwrap();
        assert_eq!(handle.state(), ExecState::Running);
        assert!(matches!(
            handle.exit_value(),
            Err(ExecError::InvalidState(_))
        ));
        let code = handle.join().unwrap();
        assert_eq!(code, 0);
        assert_eq!(handle.exit_value().unwrap(), code);
    }

    #[cfg(unix)]
    #[test]
    fn stdin_and_stderr_are_routed() {
        let spec = ExecSpecBuilder::new()
            .with_exec("sh")
            .with_args(["-c", "cat; echo oops 1>&2"])
            .with_stdin("from stdin")
            .with_stdout(Output::Bytes)
            .with_stderr(Output::Bytes)
            .build()
            .unwrap();
        let result = spec.execute_spec("/").unwrap().wait().unwrap();
        assert_eq!(result.utf8_string().unwrap().unwrap(), "from stdin");
        assert_eq!(result.utf8_string_err().unwrap().unwrap().trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn relative_working_dir_resolved_against_path() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("inner")).unwrap();
        let spec = ExecSpecBuilder::new()
            .with_exec("pwd")
            .with_working_dir("inner")
            .with_stdout(Output::Bytes)
            .build()
            .unwrap();
        let result = spec.execute_spec(temp.path()).unwrap().wait().unwrap();
        let printed = PathBuf::from(result.utf8_string().unwrap().unwrap().trim());
        assert_eq!(
            printed.canonicalize().unwrap(),
            temp.path().join("inner").canonicalize().unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn inherits_non_unicode_environment() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff\xfe");
        std::env::set_var("PWT_NON_UNICODE_ENV", raw);
        let mut builder = ExecSpecBuilder::new();
        builder
            .exec("sh")
            .args(["-c", "printf %s \"$PWT_NON_UNICODE_ENV\" | wc -c"])
            .stdout(Output::Bytes);
        let spec = builder.build().unwrap();
        std::env::remove_var("PWT_NON_UNICODE_ENV");

        assert_eq!(
            spec.env().get(OsStr::new("PWT_NON_UNICODE_ENV")).map(OsString::as_os_str),
            Some(raw)
        );
        let result = spec.execute_spec("/").unwrap().wait().unwrap();
        assert_eq!(result.utf8_string().unwrap().unwrap().trim(), "2");
    }

    #[test]
    fn env_overrides_replace_inherited() {
        let mut builder = ExecSpecBuilder::new();
        builder.exec("env").with_env([("ONLY", "this")]);
        builder.extend_env([(OsString::from("AND"), OsString::from("that"))]);
        let spec = builder.build().unwrap();
        assert_eq!(spec.env().len(), 2);
        assert_eq!(spec.env()[OsStr::new("ONLY")], "this");
    }

    #[test]
    fn expect_success_names_step() {
        assert!(ExecResult::with_code(0).expect_success("step").is_ok());
        let err = ExecResult::with_code(2).expect_success("step").unwrap_err();
        assert_eq!(err.to_string(), "step (exit code 2)");
    }
}
