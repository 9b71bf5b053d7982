//! Accumulation of streamed response fragments.

/// Buffer concatenating response fragments in arrival order.
///
/// One accumulator belongs to one generation attempt; a new attempt starts
/// with a new, empty accumulator.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    buffer: String,
    fragments: usize,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` to the buffer.
    ///
    /// Empty fragments carry no content and are skipped. Returns `true` if the
    /// buffer changed.
    pub fn push(&mut self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }

        self.buffer.push_str(fragment);
        self.fragments += 1;
        true
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Number of content-bearing fragments appended.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the accumulator, returning the full response text.
    pub fn into_text(self) -> String {
        self.buffer
    }
}

impl<S: AsRef<str>> Extend<S> for Accumulator {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for fragment in iter {
            self.push(fragment.as_ref());
        }
    }
}
