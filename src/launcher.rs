use crate::decode::OutputEncoding;
use crate::env::Environment;
use crate::error::LaunchError;
use crate::parser::{CommandLine, parse};
use crate::template::Template;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::debug;

/// Conventional process exit code: 0 is success, anything else a failure.
pub type ExitCode = i32;

/// How the standard streams of a launched process are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// stdin, stdout and stderr are pipes owned by the caller.
    Piped,
    /// The child shares the streams of the current process.
    Inherit,
}

impl StdioMode {
    fn stdio(self) -> Stdio {
        match self {
            StdioMode::Piped => Stdio::piped(),
            StdioMode::Inherit => Stdio::inherit(),
        }
    }
}

/// Text form of captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Result of a finished process whose output was captured.
#[derive(Debug, Clone)]
pub struct PipedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub decoded: DecodedOutput,
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal (Unix only).
    pub signal: Option<i32>,
}

/// Result of a finished process that shared our stdio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InheritedOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl PipedOutput {
    /// Shell-style exit code, see [`InheritedOutput::exit_code`].
    pub fn exit_code(&self) -> ExitCode {
        shell_exit_code(self.code, self.signal)
    }
}

impl InheritedOutput {
    fn from_status(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
            signal: terminating_signal(status),
        }
    }

    /// Shell-style exit code: `128 + signal` for signalled processes.
    pub fn exit_code(&self) -> ExitCode {
        shell_exit_code(self.code, self.signal)
    }
}

fn shell_exit_code(code: Option<i32>, signal: Option<i32>) -> ExitCode {
    match (code, signal) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => -1,
    }
}

#[cfg(unix)]
fn terminating_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: ExitStatus) -> Option<i32> {
    None
}

/// Starts processes described by command templates.
///
/// The template is parsed first; a parse failure is returned as
/// [`LaunchError::Parse`] and no process is created. The executable is then
/// resolved against the `PATH` of the launcher's [`Environment`], and the
/// parsed arguments are passed verbatim, without any shell in between.
///
/// ```no_run
/// use command_template::{Launcher, template};
///
/// let output = Launcher::default().exec(&template!("echo Hello, " {"world"} "!"))?;
/// assert_eq!(output.decoded.stdout, "Hello, world!\n");
/// # Ok::<(), command_template::LaunchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    env: Environment,
    encoding: OutputEncoding,
}

impl Launcher {
    pub fn new(env: Environment, encoding: OutputEncoding) -> Self {
        Self { env, encoding }
    }

    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Parses `template` and prepares a [`Command`] without starting it.
    pub fn command(&self, template: &Template, mode: StdioMode) -> Result<Command, LaunchError> {
        let line = parse(template)?;
        self.command_for(&line, mode)
    }

    /// Prepares a [`Command`] for an already parsed command line.
    pub fn command_for(&self, line: &CommandLine, mode: StdioMode) -> Result<Command, LaunchError> {
        let program = self.resolve(&line.executable)?;

        let mut cmd = Command::new(program);
        cmd.args(&line.arguments)
            .env_clear()
            .envs(&self.env.vars)
            .current_dir(&self.env.current_dir)
            .stdin(mode.stdio())
            .stdout(mode.stdio())
            .stderr(mode.stdio());
        Ok(cmd)
    }

    /// Starts the process with piped stdio and hands it over untouched.
    pub fn spawn(&self, template: &Template) -> Result<Child, LaunchError> {
        self.spawn_with(template, StdioMode::Piped)
    }

    /// Starts the process with inherited stdio and hands it over untouched.
    pub fn spawn_inherit(&self, template: &Template) -> Result<Child, LaunchError> {
        self.spawn_with(template, StdioMode::Inherit)
    }

    /// Runs the process to completion, capturing and decoding its output.
    pub fn exec(&self, template: &Template) -> Result<PipedOutput, LaunchError> {
        let child = self.spawn(template)?;
        let output = child.wait_with_output()?;
        let status = InheritedOutput::from_status(output.status);
        debug!(code = ?status.code, signal = ?status.signal, "process finished");

        let decoded = DecodedOutput {
            stdout: self.encoding.decode(&output.stdout),
            stderr: self.encoding.decode(&output.stderr),
        };
        Ok(PipedOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            decoded,
            success: status.success,
            code: status.code,
            signal: status.signal,
        })
    }

    /// Runs the process to completion with inherited stdio.
    pub fn exec_inherit(&self, template: &Template) -> Result<InheritedOutput, LaunchError> {
        let mut child = self.spawn_inherit(template)?;
        let status = InheritedOutput::from_status(child.wait()?);
        debug!(code = ?status.code, signal = ?status.signal, "process finished");
        Ok(status)
    }

    fn spawn_with(&self, template: &Template, mode: StdioMode) -> Result<Child, LaunchError> {
        let line = parse(template)?;
        let mut cmd = self.command_for(&line, mode)?;
        debug!(executable = %line.executable, arguments = ?line.arguments, ?mode, "spawning");
        cmd.spawn().map_err(|source| LaunchError::Spawn {
            executable: line.executable.clone(),
            source,
        })
    }

    fn resolve(&self, executable: &str) -> Result<PathBuf, LaunchError> {
        let search_paths = self.env.get_var("PATH").unwrap_or_default();
        find_command_path(
            OsStr::new(search_paths),
            &self.env.current_dir,
            Path::new(executable),
        )
        .ok_or_else(|| LaunchError::NotFound {
            executable: executable.to_string(),
        })
    }
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: used as is if it exists.
/// - Relative path with several components (`bin/tool`, `./tool`): looked up
///   under `current_dir`.
/// - Single component: searched in every directory of `search_paths`; on
///   Windows the `.exe` suffix may be omitted.
/// - Empty path: never found.
pub fn find_command_path(search_paths: &OsStr, current_dir: &Path, path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return find_by_path(path);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(name), None) if !path.starts_with(".") => {
            find_in_path(search_paths, name.as_os_str())
        }
        _ => find_by_path(&current_dir.join(path)),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths).find_map(|dir| {
        let candidate = dir.join(cmd);
        find_by_path(&candidate).or_else(|| {
            if cfg!(windows) && candidate.extension().is_none() {
                find_by_path(&candidate.with_extension("exe"))
            } else {
                None
            }
        })
    })
}

fn find_by_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// [`Launcher::exec`] with the current process environment.
pub fn exec(template: &Template) -> Result<PipedOutput, LaunchError> {
    Launcher::default().exec(template)
}

/// [`Launcher::exec_inherit`] with the current process environment.
pub fn exec_inherit(template: &Template) -> Result<InheritedOutput, LaunchError> {
    Launcher::default().exec_inherit(template)
}

/// [`Launcher::spawn`] with the current process environment.
pub fn spawn(template: &Template) -> Result<Child, LaunchError> {
    Launcher::default().spawn(template)
}

/// [`Launcher::spawn_inherit`] with the current process environment.
pub fn spawn_inherit(template: &Template) -> Result<Child, LaunchError> {
    Launcher::default().spawn_inherit(template)
}
