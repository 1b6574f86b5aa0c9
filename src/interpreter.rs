use crate::builtin::{Cd, Exit, Factory};
use crate::command::{CommandFactory, Disposition, ExitCode};
use crate::env::Environment;
use crate::{expand, external, lexer};
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;

/// Prompt shown before every interactive line unless configured otherwise.
pub const DEFAULT_PROMPT: &str = "myshell> ";

/// A minimal line-oriented shell.
///
/// Every line is split into words, checked for a trailing `&` and for a
/// builtin, expanded, and finally run as an external program. The
/// interpreter keeps the [`Environment`] that carries `$?` and `$!` from one
/// line to the next.
///
/// Example
/// ```no_run
/// use minish::{Disposition, Interpreter};
/// let mut sh = Interpreter::default();
/// let res = sh.run_line("true").unwrap();
/// assert_eq!(res, Some(Disposition::Exited(0)));
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    prompt: String,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of builtin factories.
    pub fn new(builtins: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            builtins,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// True once the `exit` builtin has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interprets one input line.
    ///
    /// Returns `None` when the line held no command or only a builtin.
    /// Failures to start the command are reported on standard error and
    /// come back as [`Disposition::LaunchFailed`]; they never end the shell.
    pub fn run_line(&mut self, line: &str) -> Result<Option<Disposition>> {
        let mut words = lexer::split_into_words(line);
        let background = words.last().is_some_and(|w| w == "&");
        if background {
            words.pop();
        }
        if words.is_empty() {
            return Ok(None);
        }

        if let Some(status) = self.run_builtin(&words)? {
            self.env.last_status = Some(status);
            return Ok(None);
        }

        let argv = expand::expand_words(&words, &self.env.expansion_context());
        let disposition = match external::execute_command(argv, background, &self.env) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("minish: {}", e);
                Disposition::LaunchFailed
            }
        };

        match disposition {
            Disposition::Exited(code) => self.env.last_status = Some(code),
            Disposition::Background(pid) => {
                println!("Background process created with PID: {}", pid);
                self.env.last_background_pid = Some(pid);
            }
            Disposition::LaunchFailed if !background => self.env.last_status = Some(1),
            Disposition::LaunchFailed => {}
        }
        Ok(Some(disposition))
    }

    fn run_builtin(&mut self, words: &[String]) -> Result<Option<ExitCode>> {
        let Some((name, rest)) = words.split_first() else {
            return Ok(None);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        for factory in &self.builtins {
            if let Some(cmd) = factory.try_create(name, &args) {
                log::debug!("running builtin {}", name);
                let code = cmd.execute(&mut std::io::stderr(), &mut self.env)?;
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    /// Reads and runs lines from `input` until end of input or `exit`.
    ///
    /// Lines are read as raw bytes; invalid UTF-8 is replaced rather than
    /// ending the script.
    pub fn run_script<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = input
                .read_until(b'\n', &mut buf)
                .context("failed to read script line")?;
            if n == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.run_line(&line)?;
            if self.env.should_exit {
                return Ok(());
            }
        }
        println!("Exiting the shell...");
        Ok(())
    }

    /// Interactive read-eval-print loop on the terminal.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().context("cannot initialise line editor")?;
        while !self.env.should_exit {
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    self.run_line(&line)?;
                }
                Err(ReadlineError::Interrupted) => println!(),
                Err(ReadlineError::Eof) => {
                    println!("Exiting the shell...");
                    break;
                }
                Err(e) => return Err(e).context("failed to read input"),
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the builtins `exit` and `cd`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Cd>::default()),
        ])
    }
}
