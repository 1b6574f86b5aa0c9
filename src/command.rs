use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Commands killed by a signal are reported as `128 + signal`, like POSIX shells do.
pub type ExitCode = i32;

/// Outcome of handing one command line to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A foreground command ran to completion with this status.
    Exited(ExitCode),
    /// A background command was started with this process id and not waited for.
    Background(u32),
    /// The command could not be started: bad redirection, unknown program,
    /// or process creation failure. A diagnostic has already been printed.
    LaunchFailed,
}

/// Object-safe trait for a command that runs inside the shell process itself.
pub trait ExecutableCommand {
    /// Executes the command. Diagnostics are written to `diag`.
    fn execute(self: Box<Self>, diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
