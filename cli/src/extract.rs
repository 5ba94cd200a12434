//! `list` and `extract`: inspect a document's examples without running them.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use docex::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("output path '{}' must be a directory or nonexistent", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Print one line per example: ordinal and `document:line` location.
pub fn list_examples(document: &Document, out: &mut dyn Write) -> io::Result<usize> {
    let mut count = 0;
    for example in document.examples() {
        writeln!(out, "{:3}  {}:{}", example.ordinal, document.name, example.line)?;
        count += 1;
    }
    Ok(count)
}

/// Write each example to `<out_dir>/<stem>-<ordinal>.go` and return the paths written.
pub fn extract_examples(document: &Document, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    if out_dir.exists() && !out_dir.is_dir() {
        return Err(ExtractError::NotADirectory(out_dir.to_path_buf()));
    }
    std::fs::create_dir_all(out_dir).map_err(|source| ExtractError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let stem = Path::new(&document.name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("example");

    let mut written = Vec::new();
    for example in document.examples() {
        let path = out_dir.join(format!("{}-{:03}.go", stem, example.ordinal));
        std::fs::write(&path, format!("{}\n", example.source)).map_err(|source| {
            ExtractError::Io {
                path: path.clone(),
                source,
            }
        })?;
        tracing::debug!(ordinal = example.ordinal, path = %path.display(), "extracted example");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = "# Demo\n\n```go\npackage main\n\nfunc main() {}\n```\n\nprose\n\n```\nnot code\n```\n\n```go\npackage main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(1) }\n```\n";

    #[test]
    fn list_prints_ordinals_and_lines() {
        let document = Document::new("README.md", README);
        let mut out = Vec::new();
        let count = list_examples(&document, &mut out).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  1  README.md:4\n  2  README.md:16\n"
        );
    }

    #[test]
    fn extract_writes_numbered_files() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let out_dir = dir.path().join("out");
        let document = Document::new("docs/README.md", README);

        let written = extract_examples(&document, &out_dir).unwrap();
        assert_eq!(
            written,
            vec![out_dir.join("README-001.go"), out_dir.join("README-002.go")]
        );
        let first = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(first, "package main\n\nfunc main() {}\n");
    }

    #[test]
    fn extract_rejects_file_as_output_dir() {
        let file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        let document = Document::new("README.md", README);
        let err = extract_examples(&document, file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::NotADirectory(_)));
    }
}
