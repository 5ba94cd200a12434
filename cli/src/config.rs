use std::path::{Path, PathBuf};
use std::time::Duration;

use harness::CheckConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Documents to scan, in order.
    #[serde(default)]
    pub sources: Option<Vec<PathBuf>>,

    /// Expected number of runnable examples.
    #[serde(default)]
    pub count: Option<usize>,

    /// Go executable.
    #[serde(default)]
    pub toolchain: Option<PathBuf>,

    /// Per-example limit in seconds. Zero disables the limit.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Leave each example's temporary source file on disk.
    #[serde(default)]
    pub preserve_tmpfiles: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise an empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(FileConfig::default()),
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Empty when no document was named.
    pub sources: Vec<PathBuf>,
    pub count: Option<usize>,
    pub toolchain: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub preserve_tmpfiles: Option<bool>,
}

/// Merge overrides over the file config over the built-in defaults.
pub fn resolve(overrides: Overrides, file: FileConfig) -> CheckConfig {
    let defaults = CheckConfig::default();
    let timeout_secs = overrides.timeout_secs.or(file.timeout_secs);

    CheckConfig {
        sources: Some(overrides.sources)
            .filter(|sources| !sources.is_empty())
            .or(file.sources.filter(|sources| !sources.is_empty()))
            .unwrap_or(defaults.sources),
        expected_count: overrides
            .count
            .or(file.count)
            .unwrap_or(defaults.expected_count),
        toolchain: overrides
            .toolchain
            .or(file.toolchain)
            .unwrap_or(defaults.toolchain),
        timeout: match timeout_secs {
            Some(0) | None => defaults.timeout,
            Some(secs) => Some(Duration::from_secs(secs)),
        },
        keep_sources: overrides
            .preserve_tmpfiles
            .or(file.preserve_tmpfiles)
            .unwrap_or(defaults.keep_sources),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_given() {
        let config = resolve(Overrides::default(), FileConfig::default());
        assert_eq!(config, CheckConfig::default());
        assert_eq!(config.sources, vec![PathBuf::from("README.md")]);
        assert_eq!(config.expected_count, 4);
        assert!(!config.keep_sources);
    }

    #[test]
    fn overrides_beat_file() {
        let file: FileConfig = toml::from_str(
            "sources = [\"docs/guide.md\", \"docs/api.md\"]\ncount = 2\ntoolchain = \"/opt/go/bin/go\"\ntimeout_secs = 30\npreserve_tmpfiles = true\n",
        )
        .unwrap();
        let overrides = Overrides {
            count: Some(7),
            ..Overrides::default()
        };

        let config = resolve(overrides, file);
        assert_eq!(
            config.sources,
            vec![PathBuf::from("docs/guide.md"), PathBuf::from("docs/api.md")]
        );
        assert_eq!(config.expected_count, 7);
        assert!(config.keep_sources);
        assert_eq!(config.toolchain, PathBuf::from("/opt/go/bin/go"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Overrides::default()
        };
        let file = FileConfig {
            timeout_secs: Some(10),
            ..FileConfig::default()
        };
        assert_eq!(resolve(overrides, file).timeout, None);
    }

    #[test]
    fn unknown_keys_rejected() {
        let parsed: Result<FileConfig, _> = toml::from_str("source = \"README.md\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn named_sources_replace_configured_ones() {
        let file = FileConfig {
            sources: Some(vec![PathBuf::from("docs/guide.md")]),
            preserve_tmpfiles: Some(true),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            sources: vec![PathBuf::from("a.md"), PathBuf::from("b.md")],
            preserve_tmpfiles: Some(false),
            ..Overrides::default()
        };

        let config = resolve(overrides, file);
        assert_eq!(config.sources, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
        assert!(!config.keep_sources);
    }

    #[test]
    fn empty_source_list_falls_back_to_default() {
        let file: FileConfig = toml::from_str("sources = []\n").unwrap();
        let config = resolve(Overrides::default(), file);
        assert_eq!(config.sources, vec![PathBuf::from("README.md")]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FileConfig::load(Path::new("/nonexistent/docex.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docex.toml"), "{}", err);
    }
}
