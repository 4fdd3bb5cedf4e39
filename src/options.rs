// src/options.rs

//! Recipe options
//!
//! A recipe declares its boolean options with defaults. The host applies
//! user overrides on top, and a recipe may remove an option entirely when it
//! is meaningless for the platform. A removed option is absent, not merely
//! defaulted, so `get` returns `None` and `get_safe` falls back to the
//! caller's default.

use crate::error::{Error, Result};
use crate::settings::split_key_value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Set of boolean options for one recipe evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option with its default value
    pub fn with(mut self, name: &str, default: bool) -> Self {
        self.values.insert(name.to_string(), default);
        self
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Value of an option, or `default` if it does not exist
    pub fn get_safe(&self, name: &str, default: bool) -> bool {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set an existing option
    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::InvalidConfiguration(format!(
                "option '{}' doesn't exist (possible options: {})",
                name,
                self.names().join(", ")
            ))),
        }
    }

    /// Remove an option from the set
    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.values.remove(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sorted `name=True|False` lines
    pub fn canonical_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("{}={}", name, format_bool(value)))
            .collect()
    }
}

/// User-supplied option values, applied after the recipe's `config_options`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    values: Vec<(String, bool)>,
}

impl OptionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an override; later values for the same name win
    pub fn insert(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        self.values.retain(|(n, _)| *n != name);
        self.values.push((name, value));
    }

    /// Parse and record a `name=value` argument
    pub fn insert_arg(&mut self, arg: &str) -> Result<()> {
        let (name, value) = split_key_value(arg)?;
        self.insert(name, parse_bool(value)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply overrides to an option set
    ///
    /// `declared` is the recipe's full option declaration. An override for an
    /// option that was declared but removed for this platform is ignored;
    /// one for an option that was never declared is a configuration error.
    pub fn apply(&self, declared: &Options, options: &mut Options) -> Result<()> {
        for (name, value) in &self.values {
            if options.contains(name) {
                options.set(name, *value)?;
            } else if declared.contains(name) {
                warn!(
                    "Ignoring option {}={}: not applicable for this platform",
                    name,
                    format_bool(*value)
                );
            } else {
                return Err(Error::InvalidConfiguration(format!(
                    "option '{}' doesn't exist (possible options: {})",
                    name,
                    declared.names().join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Parse a boolean option value (`True`, `false`, `1`, `off`, ...)
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::ParseError(format!(
            "Invalid boolean option value: {}",
            other
        ))),
    }
}

fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
