//! Incremental string accumulator used while expanding a word.

/// Growable buffer that an expansion appends literal spans and substituted
/// values to.
///
/// A builder is created fresh for every expansion, so it always starts
/// empty. [`reset`](Self::reset) detaches what has been built so far and
/// leaves the builder empty for reuse.
#[derive(Debug, Default)]
pub struct ExpansionBuilder {
    buf: String,
}

impl ExpansionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with room for `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Appends `text` to the end of the buffer.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Appends the byte range `start..end` of `source`.
    ///
    /// An out-of-range or non-char-boundary span appends nothing.
    pub fn append_span(&mut self, source: &str, start: usize, end: usize) -> &mut Self {
        if let Some(span) = source.get(start..end) {
            self.buf.push_str(span);
        }
        self
    }

    /// Detaches and returns the contents built so far, leaving the builder
    /// empty.
    pub fn reset(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the builder and returns the finished string.
    pub fn finish(self) -> String {
        self.buf
    }
}
