use std::ops::Range;

use crate::tags::Tags;

/// A fenced block whose normalized content is a runnable program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example<'a> {
    /// 1-based position among runnable examples only.
    pub ordinal: usize,
    /// Normalized source: fence and language tag removed, whitespace trimmed.
    pub source: &'a str,
    /// Byte span of `source` within the document.
    pub span: Range<usize>,
    /// 1-based document line on which `source` starts.
    pub line: usize,
    /// Settings from a tag comment directly above the fence.
    pub tags: Tags,
}

impl Example<'_> {
    /// The source with a right-aligned, 1-based line number before each line.
    pub fn numbered(&self) -> String {
        numbered(self.source)
    }
}

pub fn numbered(source: &str) -> String {
    source
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:3}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
