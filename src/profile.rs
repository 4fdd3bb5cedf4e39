// src/profile.rs

//! Profiles: reusable settings and option values
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! build_type = "Release"
//! compiler = "gcc"
//! "compiler.version" = "13"
//!
//! [options]
//! ptmark = true
//! ```

use crate::error::{Error, Result};
use crate::options::{OptionOverrides, parse_bool};
use crate::settings::Settings;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed profile file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

impl Profile {
    /// Parse a profile from TOML
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))
    }

    /// Load a profile file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read profile {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Apply the profile's settings on top of `settings`
    pub fn apply_settings(&self, settings: &mut Settings) -> Result<()> {
        for (key, value) in &self.settings {
            settings.set(key, value)?;
        }
        Ok(())
    }

    /// Record the profile's option values as overrides
    pub fn apply_options(&self, overrides: &mut OptionOverrides) -> Result<()> {
        for (name, value) in &self.options {
            let value = match value {
                toml::Value::Boolean(b) => *b,
                toml::Value::Integer(i) => *i != 0,
                toml::Value::String(s) => parse_bool(s)?,
                other => {
                    return Err(Error::ParseError(format!(
                        "Option {} must be a boolean, got {}",
                        name,
                        other.type_str()
                    )));
                }
            };
            overrides.insert(name.clone(), value);
        }
        Ok(())
    }
}
