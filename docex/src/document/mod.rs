use std::io;
use std::path::Path;

use crate::extract::Examples;

/// The raw text of a documentation file, plus the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a document from disk. The path's display form becomes its name.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(Document::new(path.display().to_string(), text))
    }

    /// Runnable examples in encounter order.
    pub fn examples(&self) -> Examples<'_> {
        Examples::new(&self.text)
    }
}

/// Convert a byte offset in `text` to a 1-based line number.
pub fn byte_offset_to_line(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}
