pub mod document;
pub mod example;
pub mod extract;
pub mod tags;

pub use document::Document;
pub use example::Example;
pub use extract::{Examples, examples};
pub use tags::Tags;

/// Literal delimiter bounding a fenced block. Fences never nest.
pub const FENCE: &str = "```";

/// Language tag stripped from the front of a fenced block before classification.
pub const LANGUAGE_TAG: &str = "go";

/// Marker a normalized block must start with to count as a runnable example.
pub const ENTRY_MARKER: &str = "package main";
