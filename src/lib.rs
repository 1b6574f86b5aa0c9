//! The command-interpretation core of a small interactive shell.
//!
//! A raw input line goes through three stages: [`lexer`] splits it into
//! words, [`expand`] replaces the special parameters `$$`, `$?`, `$!` and
//! `${name}` inside each word, and [`external`] runs the result as a child
//! process after pulling out the `<`, `>` and `>>` redirections.
//!
//! The main entry point is [`Interpreter`], which ties the stages together
//! with the `cd` and `exit` builtins and carries `$?`/`$!` between lines.

pub mod builder;
mod builtin;
pub mod command;
pub mod env;
pub mod expand;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod param;
pub mod parser;
#[cfg(unix)]
pub mod signal;

pub use command::{Disposition, ExitCode};
pub use expand::{ExpansionContext, expand_word};
pub use external::execute_command;
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
pub use lexer::split_into_words;
