// src/recipe/kitchen/config.rs

//! Configuration and result types for the Kitchen

use crate::error::{Error, Result};
use crate::options::Options;
use crate::recipe::PackageInfo;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the Kitchen
///
/// Every field has a default, so a config file only needs to name the
/// values it changes:
///
/// ```toml
/// source_cache = "/srv/ittcook/sources"
/// jobs = 8
/// cmake_generator = "Ninja"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Directory for downloaded source archives, keyed by checksum
    pub source_cache: PathBuf,
    /// Root under which packages are published
    pub output_dir: PathBuf,
    /// Number of parallel build jobs (0 lets the build tool decide)
    pub jobs: u32,
    /// Keep the temporary build tree after completion (for debugging)
    pub keep_builddir: bool,
    /// Explicit cmake executable; looked up on `PATH` when unset
    pub cmake_program: Option<PathBuf>,
    /// CMake generator passed with `-G`
    pub cmake_generator: Option<String>,
    /// Timeout for source downloads, in seconds
    pub download_timeout_secs: u64,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);
        let cache_root = dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".cache"));
        let data_root = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            source_cache: cache_root.join("ittcook").join("sources"),
            output_dir: data_root.join("ittcook").join("packages"),
            jobs,
            keep_builddir: false,
            cmake_program: None,
            cmake_generator: None,
            download_timeout_secs: 300,
        }
    }
}

impl KitchenConfig {
    /// Parse a configuration from TOML
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid config: {}", e)))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Resolved configuration of a recipe, before any build work
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub name: String,
    pub version: String,
    /// Settings after the recipe dropped what it does not depend on
    pub settings: Settings,
    /// Options after platform removal and user overrides
    pub options: Options,
    /// Digest of settings and options identifying the binary package
    pub package_id: String,
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CreateResult {
    /// Published package folder
    pub package_folder: PathBuf,
    pub package_id: String,
    /// Metadata written next to the artifacts
    pub package_info: PackageInfo,
    /// Build log
    pub log: String,
    /// Warnings generated during the run
    pub warnings: Vec<String>,
    /// Build tree, when `keep_builddir` is set
    pub build_dir: Option<PathBuf>,
}
