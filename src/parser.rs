//! Splitting an expanded word list into program arguments and redirections.

use thiserror::Error;

/// Kind of redirection
///
/// Defines the specific operation mode for an I/O redirection (`<`, `>`, `>>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// Input redirection (`<`): Reads standard input from a specified file.
    Input,
    /// Output redirection (`>`): Writes standard output to a file, **overwriting** the file if it exists.
    Output,
    /// Output redirection with append (`>>`): Writes standard output to a file, **appending** to the file if it exists.
    Append,
}

impl RedirectKind {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectKind::Input),
            ">" => Some(RedirectKind::Output),
            ">>" => Some(RedirectKind::Append),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RedirectKind::Input => "<",
            RedirectKind::Output => ">",
            RedirectKind::Append => ">>",
        }
    }
}

impl std::fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One redirection operator together with its target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub target: String,
}

/// An expanded command with its redirections pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name followed by its arguments, redirections removed.
    pub argv: Vec<String>,
    /// Redirections in the order they appeared.
    pub redirects: Vec<Redirect>,
    pub background: bool,
}

impl CommandLine {
    /// Last input redirection, which is the one that takes effect.
    pub fn input(&self) -> Option<&Redirect> {
        self.redirects.iter().rev().find(|r| r.kind == RedirectKind::Input)
    }

    /// Last output redirection (`>` or `>>`), which is the one that takes effect.
    pub fn output(&self) -> Option<&Redirect> {
        self.redirects.iter().rev().find(|r| r.kind != RedirectKind::Input)
    }
}

/// Errors raised while picking redirections out of a command.
#[derive(Error, Debug)]
pub enum RedirectionError {
    #[error("missing filename for '{0}' redirection")]
    MissingFilename(RedirectKind),
    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

struct CommandBuilder {
    words: Vec<String>,
    pos: usize,
}

impl CommandBuilder {
    fn from(words: Vec<String>) -> Self {
        CommandBuilder { words, pos: 0 }
    }

    fn consume(&mut self) -> Option<String> {
        let word = self.words.get_mut(self.pos).map(std::mem::take);
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    fn build(mut self, background: bool) -> Result<CommandLine, RedirectionError> {
        let mut argv = Vec::new();
        let mut redirects = Vec::new();

        while let Some(word) = self.consume() {
            match RedirectKind::from_token(&word) {
                Some(kind) => {
                    // Whatever follows is the filename, even another operator.
                    let target = self
                        .consume()
                        .ok_or(RedirectionError::MissingFilename(kind))?;
                    redirects.push(Redirect { kind, target });
                }
                None => argv.push(word),
            }
        }

        Ok(CommandLine {
            argv,
            redirects,
            background,
        })
    }
}

/// Separates the redirection operators `<`, `>` and `>>` and their filenames
/// from the rest of an expanded word list.
///
/// Operators are only recognized as standalone words. Every operator must be
/// followed by a filename.
pub fn parse_command(words: Vec<String>, background: bool) -> Result<CommandLine, RedirectionError> {
    CommandBuilder::from(words).build(background)
}
