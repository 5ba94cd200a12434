use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE: &str = "README.md";
pub const DEFAULT_COUNT: usize = 4;
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Resolved settings for one check run. Built once at the process boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Documents to scan for examples, checked in order.
    pub sources: Vec<PathBuf>,
    /// Number of runnable examples expected across all documents.
    pub expected_count: usize,
    /// Go executable used to run each example.
    pub toolchain: PathBuf,
    /// Per-example wall-clock limit. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Leave each example's temporary source file on disk.
    pub keep_sources: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            sources: vec![PathBuf::from(DEFAULT_SOURCE)],
            expected_count: DEFAULT_COUNT,
            toolchain: PathBuf::from(DEFAULT_TOOLCHAIN),
            timeout: None,
            keep_sources: false,
        }
    }
}
