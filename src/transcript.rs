use serde::{Deserialize, Serialize};

/// Append-only sequence of display lines representing the full session
/// history. Lines are only ever added, never edited or removed; blank lines
/// act as section separators and are part of the transcript proper.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Transcript {
    /// The accumulated lines, oldest first
    lines: Vec<String>,
}

impl Transcript {
    /// Create an empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single line
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Append a blank separator line followed by a message line
    pub fn notice(&mut self, text: impl Into<String>) {
        self.lines.push(String::new());
        self.lines.push(text.into());
    }

    /// Append a block of lines, preceded by a blank separator unless the
    /// transcript is still empty
    pub fn section(&mut self, block: Vec<String>) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.extend(block);
    }

    /// All accumulated lines, oldest first
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines accumulated so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been emitted yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
