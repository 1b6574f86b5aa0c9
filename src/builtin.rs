use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Built-in commands handled by the shell itself, before expansion and
/// without starting a child process.
///
/// Arguments are taken as plain words: a leading `-` is not an option.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Builds the command from its arguments. `Err` holds a usage message.
    fn from_args(args: &[&str]) -> Result<Self, String>;

    /// Executes the command. Return value follows shell conventions.
    fn execute(self, diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        match T::execute(*self, diag, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(diag, "{:#}", e)?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, diag: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(diag, "{}", self.output)?;
        Ok(1)
    }
}

/// Creates builtin `T` when a command line names it.
pub(crate) struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(args) {
                Ok(cmd) => Box::new(cmd),
                Err(output) => Box::new(InvalidArgs { output }),
            })
        } else {
            None
        }
    }
}

/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[&str]) -> Result<Self, String> {
        match args {
            [] => Ok(Cd { target: None }),
            [target] => Ok(Cd {
                target: Some(target.to_string()),
            }),
            _ => Err("cd: Too many arguments".to_string()),
        }
    }

    fn execute(self, _diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match env.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => return Err(anyhow::anyhow!("cd: no target and HOME not set")),
            },
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", new_dir.display()))?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        log::debug!("cwd is now {}", canonical.display());
        env.current_dir = canonical;
        Ok(0)
    }
}

/// Exit the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(_args: &[&str]) -> Result<Self, String> {
        Ok(Exit)
    }

    fn execute(self, _diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        println!("Exiting the shell...");
        env.should_exit = true;
        Ok(0)
    }
}
