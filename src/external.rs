//! Launching external programs with redirected standard streams.

use crate::command::{Disposition, ExitCode};
use crate::env::Environment;
use crate::parser::{self, CommandLine, RedirectKind, RedirectionError};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};
use thiserror::Error;

/// Search path used when `PATH` is unset, as `execvp` does.
const DEFAULT_PATH: &str = "/bin:/usr/bin";

/// Errors raised while starting a program.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no command to run")]
    EmptyCommand,
    #[error("{0}: command not found")]
    NotFound(String),
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create process: {0}")]
    Fork(#[source] std::io::Error),
    #[error("waiting for {pid} failed: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure that stops a single command from running. None of these
/// affect the shell itself.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error(transparent)]
    Redirection(#[from] RedirectionError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// A program ready to launch: resolved executable, arguments, and the files
/// its standard input and output are connected to.
#[derive(Debug)]
pub struct ExternalCommand {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<File>,
    stdout: Option<File>,
    background: bool,
}

impl ExternalCommand {
    /// Opens the redirection targets of `line` and resolves its program.
    ///
    /// Files are opened in the order the redirections appear, so every
    /// target is created even when a later one of the same direction
    /// replaces it. The first file that cannot be opened aborts the command.
    pub fn prepare(line: CommandLine, env: &Environment) -> Result<Self, ExecError> {
        let mut stdin = None;
        let mut stdout = None;

        for redirect in &line.redirects {
            let path = env.current_dir.join(&redirect.target);
            let file = open_redirect(redirect.kind, &path).map_err(|source| {
                RedirectionError::Open {
                    path: redirect.target.clone(),
                    source,
                }
            })?;
            log::debug!("redirect {} {}", redirect.kind, path.display());
            match redirect.kind {
                RedirectKind::Input => stdin = Some(file),
                RedirectKind::Output | RedirectKind::Append => stdout = Some(file),
            }
        }

        let mut argv = line.argv.into_iter();
        let name = argv.next().ok_or(LaunchError::EmptyCommand)?;
        let search_paths = env.get_var("PATH").unwrap_or_else(|| DEFAULT_PATH.to_string());
        let program = find_command_path(OsStr::new(&search_paths), Path::new(&name))
            .map(|p| absolutize(&env.current_dir, &p))
            .ok_or_else(|| LaunchError::NotFound(name.clone()))?;

        Ok(Self {
            name,
            program,
            args: argv.collect(),
            stdin,
            stdout,
            background: line.background,
        })
    }

    /// Starts the program. A foreground command is waited for; a background
    /// command is left running and only its process id is reported.
    pub fn launch(self, env: &Environment) -> Result<Disposition, LaunchError> {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args).current_dir(&env.current_dir);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(&self.name);
        }
        if let Some(file) = self.stdin {
            command.stdin(Stdio::from(file));
        }
        if let Some(file) = self.stdout {
            command.stdout(Stdio::from(file));
        }

        let child = command.spawn().map_err(|source| match source.kind() {
            ErrorKind::WouldBlock | ErrorKind::OutOfMemory => LaunchError::Fork(source),
            ErrorKind::NotFound => LaunchError::NotFound(self.name.clone()),
            _ => LaunchError::Spawn {
                program: self.name.clone(),
                source,
            },
        })?;
        // `command` still owns the parent's copies of the redirected files.
        drop(command);
        log::debug!("started {} as pid {}", self.name, child.id());

        if self.background {
            Ok(Disposition::Background(child.id()))
        } else {
            wait_for(child).map(Disposition::Exited)
        }
    }
}

/// Runs an expanded word list as an external program.
pub fn execute_command(
    words: Vec<String>,
    background: bool,
    env: &Environment,
) -> Result<Disposition, ExecError> {
    let line = parser::parse_command(words, background)?;
    let command = ExternalCommand::prepare(line, env)?;
    Ok(command.launch(env)?)
}

fn open_redirect(kind: RedirectKind, path: &Path) -> std::io::Result<File> {
    match kind {
        RedirectKind::Input => File::open(path),
        RedirectKind::Output => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path),
        RedirectKind::Append => OpenOptions::new().append(true).create(true).open(path),
    }
}

fn wait_for(mut child: Child) -> Result<ExitCode, LaunchError> {
    let pid = child.id();
    let status = child
        .wait()
        .map_err(|source| LaunchError::Wait { pid, source })?;
    let code = match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    };
    log::debug!("pid {} finished with status {}", pid, code);
    Ok(code)
}

fn absolutize(current_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir.join(path)
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way `execvp` would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Any path containing a separator (e.g., `bin/sh`, `./foo`): returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable regular file.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) if !path.as_os_str().to_string_lossy().contains('/') => {
            find_in_path(search_paths, x.as_os_str()).map(Cow::Owned)
        }
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    for dir in std::env::split_paths(search_paths) {
        let path = dir.join(cmd);
        if is_executable(&path) {
            return Some(path);
        }
    }
    None
}

/// Regular file with at least one execute bit set; other entries are
/// skipped during the PATH search, as `execvp` does.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
