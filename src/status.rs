//! Status text protocol
//!
//! Plain text where `\n` is a line break. Nothing else is interpreted;
//! hosts render each line as a text node.

/// The status panel's current text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPanel {
    text: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Rendered lines, one per `\n`-separated segment
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        status_lines(&self.text)
    }
}

pub fn status_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}
