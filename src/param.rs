//! Locating `$`-introduced parameter references inside a word.

/// Kind of a parameter reference found by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `$$`: process id of the shell itself.
    ShellPid,
    /// `$!`: process id of the most recent background command.
    BackgroundPid,
    /// `$?`: exit status of the most recent foreground command.
    ExitStatus,
    /// `${name}`: a named parameter.
    Braced,
}

/// A parameter reference located in a word.
///
/// `start..end` is the byte range the reference occupies in the unexpanded
/// word, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRef {
    pub kind: ParamKind,
    pub start: usize,
    pub end: usize,
}

impl ParamRef {
    /// Returns the enclosed name of a `${name}` reference, or `None` for the
    /// single-character parameters.
    pub fn name<'w>(&self, word: &'w str) -> Option<&'w str> {
        match self.kind {
            ParamKind::Braced => word.get(self.start + 2..self.end - 1),
            _ => None,
        }
    }
}

/// Finds the next parameter reference in `word` at or after byte `cursor`.
///
/// A `$` followed by anything other than `$`, `!`, `?` or a closed `{...}`
/// is not a reference; the search moves past it and keeps looking. Returns
/// `None` once no reference remains. The caller resumes scanning from the
/// returned reference's `end`.
pub fn scan(word: &str, cursor: usize) -> Option<ParamRef> {
    let bytes = word.as_bytes();
    let mut from = cursor;

    while let Some(offset) = bytes.get(from..)?.iter().position(|&b| b == b'$') {
        let start = from + offset;
        let kind = match bytes.get(start + 1) {
            Some(b'$') => Some((ParamKind::ShellPid, start + 2)),
            Some(b'!') => Some((ParamKind::BackgroundPid, start + 2)),
            Some(b'?') => Some((ParamKind::ExitStatus, start + 2)),
            Some(b'{') => bytes
                .get(start + 2..)
                .and_then(|rest| rest.iter().position(|&b| b == b'}'))
                .map(|close| (ParamKind::Braced, start + 2 + close + 1)),
            _ => None,
        };

        if let Some((kind, end)) = kind {
            return Some(ParamRef { kind, start, end });
        }
        from = start + 1;
    }
    None
}
