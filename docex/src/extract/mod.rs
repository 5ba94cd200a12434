//! Lightweight extraction of runnable examples from document text.
//!
//! The text is split on the fence delimiter and every fragment, prose
//! included, is classified by content alone: after trimming and dropping a
//! leading `go` tag it must start with `package main`.

use std::str::Split;

use crate::document::byte_offset_to_line;
use crate::example::Example;
use crate::tags::Tags;
use crate::{ENTRY_MARKER, FENCE, LANGUAGE_TAG};

/// Lazily yields the runnable examples of a document in encounter order.
pub fn examples(text: &str) -> Examples<'_> {
    Examples::new(text)
}

pub struct Examples<'a> {
    text: &'a str,
    fragments: Split<'a, &'static str>,
    /// Byte offset of the next fragment.
    offset: usize,
    /// Number of examples yielded so far.
    ordinal: usize,
    /// Fragments consumed so far. Even indexes lie outside fences.
    index: usize,
    /// Prose immediately before the current fragment, where tags live.
    prose: &'a str,
}

impl<'a> Examples<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Examples {
            text,
            fragments: text.split(FENCE),
            offset: 0,
            ordinal: 0,
            index: 0,
            prose: "",
        }
    }
}

impl<'a> Iterator for Examples<'a> {
    type Item = Example<'a>;

    fn next(&mut self) -> Option<Example<'a>> {
        for fragment in self.fragments.by_ref() {
            let fragment_start = self.offset;
            self.offset += fragment.len() + FENCE.len();
            let prose = std::mem::replace(&mut self.prose, "");
            self.index += 1;
            if self.index % 2 == 1 {
                self.prose = fragment;
            }

            let Some((skip, source)) = normalize(fragment) else {
                continue;
            };

            self.ordinal += 1;
            let start = fragment_start + skip;
            let example = Example {
                ordinal: self.ordinal,
                source,
                span: start..start + source.len(),
                line: byte_offset_to_line(self.text, start),
                tags: Tags::from_preceding(prose),
            };
            tracing::debug!(
                ordinal = example.ordinal,
                line = example.line,
                "found runnable example"
            );
            return Some(example);
        }
        None
    }
}

/// Classify one fragment. On success returns the offset of the normalized
/// source inside the fragment and the normalized source itself.
pub fn normalize(fragment: &str) -> Option<(usize, &str)> {
    let trimmed = fragment.trim();
    let leading = fragment.len() - fragment.trim_start().len();

    let untagged = trimmed.strip_prefix(LANGUAGE_TAG).unwrap_or(trimmed);
    let tag = trimmed.len() - untagged.len();

    let source = untagged.trim();
    let inner = untagged.len() - untagged.trim_start().len();

    source
        .starts_with(ENTRY_MARKER)
        .then_some((leading + tag + inner, source))
}
