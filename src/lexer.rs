//! Lexical analysis of one raw input line into whitespace-separated words.

/// Upper bound on the number of words collected from a single line.
///
/// Tokens beyond this bound are silently dropped.
pub const MAX_WORDS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    Done,
}

struct LexingFSM<'a> {
    input: &'a [u8],
    pos: usize,
    state: LexingState,
    buffer: Vec<u8>,
    words: Vec<String>,
}

impl<'a> LexingFSM<'a> {
    /// Creates a new instance of the lexical analysis Finite State Machine.
    fn new(line: &'a str) -> Self {
        LexingFSM {
            input: line.as_bytes(),
            pos: 0,
            state: LexingState::Start,
            buffer: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Runs the machine until the input is exhausted, a comment starts, or
    /// [`MAX_WORDS`] words have been produced.
    fn make_words(mut self) -> Vec<String> {
        while self.state != LexingState::Done {
            let Some(ch) = self.read_byte() else {
                break;
            };
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch),
                LexingState::Done => {}
            }
        }

        if self.state == LexingState::ReadingWord {
            self.finish_word();
        }
        self.words
    }

    fn read_byte(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_start(&mut self, ch: u8) {
        match ch {
            c if is_blank(c) => {}
            b'#' => self.state = LexingState::Done,
            _ if self.words.len() == MAX_WORDS => {
                log::debug!("word limit of {} reached, rest of line discarded", MAX_WORDS);
                self.state = LexingState::Done;
            }
            c => {
                self.state = LexingState::ReadingWord;
                self.handle_word(c);
            }
        }
    }

    fn handle_word(&mut self, ch: u8) {
        match ch {
            c if is_blank(c) => {
                self.finish_word();
                self.state = LexingState::Start;
            }
            b'\\' => {
                // The escape and the escaped byte both stay in the word.
                self.buffer.push(ch);
                if let Some(next) = self.read_byte() {
                    self.buffer.push(next);
                }
            }
            c => self.buffer.push(c),
        }
    }

    fn finish_word(&mut self) {
        let bytes = std::mem::take(&mut self.buffer);
        // Splitting only happens on ASCII bytes, so each word is valid UTF-8
        // whenever the line was.
        self.words.push(String::from_utf8_lossy(&bytes).into_owned());
    }
}

/// Same set as C `isspace` in the "C" locale.
fn is_blank(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Splits a raw input line into words.
///
/// Leading whitespace is skipped and words are separated by runs of
/// whitespace. A word starting with `#` ends the line. A backslash keeps
/// itself and the following character in the word, so an escaped space does
/// not split. At most [`MAX_WORDS`] words are returned.
pub fn split_into_words(line: &str) -> Vec<String> {
    let words = LexingFSM::new(line).make_words();
    log::trace!("split {:?} into {:?}", line, words);
    words
}
