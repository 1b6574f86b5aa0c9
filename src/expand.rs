//! Parameter expansion of a single word.

use crate::builder::ExpansionBuilder;
use crate::command::ExitCode;
use crate::param::{self, ParamKind};

/// Values substituted for the special parameters during one expansion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionContext {
    /// Value of `$$`.
    pub shell_pid: u32,
    /// Value of `$?`; `None` until a foreground command has run.
    pub last_status: Option<ExitCode>,
    /// Value of `$!`; `None` until a background command has started.
    pub last_background_pid: Option<u32>,
}

impl ExpansionContext {
    /// Context for the current process with no command run yet.
    pub fn for_current_process() -> Self {
        Self {
            shell_pid: std::process::id(),
            last_status: None,
            last_background_pid: None,
        }
    }
}

/// Returns a new string with every parameter reference in `word` replaced.
///
/// `$$`, `$!` and `$?` become the decimal values from `ctx` (`$!` is empty
/// and `$?` is `0` when nothing has run yet). `${name}` becomes
/// `<Parameter: name>`; no environment lookup happens. A `$` that does not
/// start a reference is kept as is.
pub fn expand_word(word: &str, ctx: &ExpansionContext) -> String {
    let mut out = ExpansionBuilder::with_capacity(word.len());
    let mut pos = 0;

    while let Some(found) = param::scan(word, pos) {
        out.append_span(word, pos, found.start);
        match found.kind {
            ParamKind::ShellPid => {
                out.append(&ctx.shell_pid.to_string());
            }
            ParamKind::BackgroundPid => {
                if let Some(pid) = ctx.last_background_pid {
                    out.append(&pid.to_string());
                }
            }
            ParamKind::ExitStatus => {
                out.append(&ctx.last_status.unwrap_or(0).to_string());
            }
            ParamKind::Braced => {
                out.append("<Parameter: ")
                    .append(found.name(word).unwrap_or_default())
                    .append(">");
            }
        }
        pos = found.end;
    }
    out.append_span(word, pos, word.len());
    out.finish()
}

/// Expands every word of a command, preserving order.
pub fn expand_words<S: AsRef<str>>(words: &[S], ctx: &ExpansionContext) -> Vec<String> {
    let expanded: Vec<String> = words.iter().map(|w| expand_word(w.as_ref(), ctx)).collect();
    log::debug!("expanded argv: {:?}", expanded);
    expanded
}
