//! Per-example settings written as a JSON object inside an HTML comment
//! directly above the fence:
//!
//! ```markdown
//! <!-- {"os": ["linux", "darwin"], "args": ["-v", "world"]} -->
//! ```
//!
//! Unrecognized keys are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tags {
    /// Operating systems (Go `GOOS` names) the example may run on.
    #[serde(default)]
    pub os: Option<OsList>,

    /// Arguments passed to the example program.
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OsList {
    One(String),
    Many(Vec<String>),
}

impl Tags {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Tags from the comment ending `prose`, or defaults when there is none.
    /// A malformed object is logged and treated as absent.
    pub fn from_preceding(prose: &str) -> Self {
        let Some(raw) = trailing_comment(prose) else {
            return Tags::default();
        };
        match Tags::parse(raw) {
            Ok(tags) => tags,
            Err(err) => {
                tracing::warn!(raw, %err, "failed to parse example tags");
                Tags::default()
            }
        }
    }

    pub fn allows_os(&self, os: &str) -> bool {
        match &self.os {
            None => true,
            Some(OsList::One(name)) => name == os,
            Some(OsList::Many(names)) => names.iter().any(|name| name == os),
        }
    }
}

/// The `{...}` body of an HTML comment that ends `prose` with nothing but
/// whitespace after it.
fn trailing_comment(prose: &str) -> Option<&str> {
    let body = prose.trim_end().strip_suffix("-->")?;
    let start = body.rfind("<!--")?;
    let inner = body[start + 4..].trim();
    (inner.starts_with('{') && inner.ends_with('}')).then_some(inner)
}

/// The running platform under its Go `GOOS` name.
pub fn current_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}
