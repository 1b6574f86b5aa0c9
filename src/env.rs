use crate::command::ExitCode;
use crate::expand::ExpansionContext;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// State the shell carries from one command line to the next.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
    /// Process id substituted for `$$`.
    pub shell_pid: u32,
    /// Status of the last foreground command or builtin.
    pub last_status: Option<ExitCode>,
    /// Process id of the last background command.
    pub last_background_pid: Option<u32>,
}

impl Environment {
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
            shell_pid: std::process::id(),
            last_status: None,
            last_background_pid: None,
        }
    }

    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Snapshot of the values substituted for `$$`, `$?` and `$!`.
    pub fn expansion_context(&self) -> ExpansionContext {
        ExpansionContext {
            shell_pid: self.shell_pid,
            last_status: self.last_status,
            last_background_pid: self.last_background_pid,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
