// src/recipe/sources.rs

//! Version-to-source mapping data
//!
//! Each upstream release a recipe can build is pinned to one archive URL
//! and its SHA-256 digest:
//!
//! ```toml
//! [sources."3.24.0"]
//! url = "https://github.com/intel/ittapi/archive/refs/tags/v3.24.0.tar.gz"
//! sha256 = "..."
//! ```
//!
//! `url` may also be a local path or a `file://` URL for offline mirrors.

use crate::error::{Error, Result};
use crate::hash::is_sha256_hex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One pinned source archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub url: String,
    pub sha256: String,
}

impl SourceEntry {
    /// Last path segment of the URL
    pub fn filename(&self) -> &str {
        self.url
            .rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .unwrap_or("source.tar.gz")
    }

    /// Whether the URL needs the network
    pub fn is_remote(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

/// All pinned sources of a recipe, keyed by version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesData {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,
}

impl SourcesData {
    /// Look up the source pinned for `version`
    pub fn get(&self, version: &str) -> Result<&SourceEntry> {
        self.sources.get(version).ok_or_else(|| {
            Error::SourceFetchFailed(format!(
                "No source known for version {} (known versions: {})",
                version,
                self.versions().join(", ")
            ))
        })
    }

    pub fn versions(&self) -> Vec<&str> {
        self.sources.keys().map(|s| s.as_str()).collect()
    }
}

/// Parse sources data from a TOML string
pub fn parse_sources(content: &str) -> Result<SourcesData> {
    let data: SourcesData = toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid sources data: {}", e)))?;

    for (version, entry) in &data.sources {
        if entry.url.trim().is_empty() {
            return Err(Error::ParseError(format!(
                "Source for version {} has an empty url",
                version
            )));
        }
        if !is_sha256_hex(&entry.sha256) {
            return Err(Error::ParseError(format!(
                "Source for version {} has an invalid sha256: {}",
                version, entry.sha256
            )));
        }
    }

    Ok(data)
}

/// Parse sources data from a file
pub fn parse_sources_file(path: &Path) -> Result<SourcesData> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!(
            "Failed to read sources file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_sources(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_parse_sources() {
        let content = format!(
            r#"
[sources."3.24.0"]
url = "https://github.com/intel/ittapi/archive/refs/tags/v3.24.0.tar.gz"
sha256 = "{SHA}"

[sources."3.23.0"]
url = "https://github.com/intel/ittapi/archive/refs/tags/v3.23.0.tar.gz"
sha256 = "{SHA}"
"#
        );

        let data = parse_sources(&content).unwrap();
        assert_eq!(data.versions(), vec!["3.23.0", "3.24.0"]);

        let entry = data.get("3.24.0").unwrap();
        assert_eq!(entry.filename(), "v3.24.0.tar.gz");
        assert!(entry.is_remote());
    }

    #[test]
    fn test_unknown_version() {
        let data = parse_sources("").unwrap();
        let err = data.get("9.9.9").unwrap_err();
        assert!(matches!(err, Error::SourceFetchFailed(_)));
    }

    #[test]
    fn test_reject_bad_checksum() {
        let content = r#"
[sources."1.0"]
url = "https://example.com/x.tar.gz"
sha256 = "abc"
"#;
        assert!(parse_sources(content).is_err());
    }

    #[test]
    fn test_reject_empty_url() {
        let content = format!(
            r#"
[sources."1.0"]
url = " "
sha256 = "{SHA}"
"#
        );
        assert!(parse_sources(&content).is_err());
    }

    #[test]
    fn test_local_entry() {
        let entry = SourceEntry {
            url: "/srv/mirror/ittapi-3.24.0.tar.gz".to_string(),
            sha256: SHA.to_string(),
        };
        assert!(!entry.is_remote());
        assert_eq!(entry.filename(), "ittapi-3.24.0.tar.gz");
    }
}
