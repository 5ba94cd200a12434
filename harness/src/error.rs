use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The document could not be read. Fatal for the whole check.
    #[error("cannot read '{}': {source}", .path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temporary source file could not be created, written or synced.
    #[error("cannot prepare temporary source file: {0}")]
    TempFile(#[source] io::Error),

    /// The toolchain process could not be started.
    #[error("could not launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The example ran longer than the configured limit and was killed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cannot write report: {0}")]
    Report(#[from] io::Error),
}
