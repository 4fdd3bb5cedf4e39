// src/recipe/kitchen/mod.rs

//! Kitchen: the host that runs recipes
//!
//! The Kitchen calls a recipe's stages exactly once each, in a fixed order,
//! and owns everything around them:
//! - Resolving the configuration (options, settings, validation, package ID)
//! - Fetching and verifying source archives, with a checksum-keyed cache
//! - Invoking the external build tool
//! - Publishing the package folder only when every stage succeeded

mod archive;
mod cmake;
mod config;
mod cook;
mod copy;

pub use archive::{download_file, extract_archive, local_path};
pub use cmake::{BuildTool, CMake, CMakeToolchain, StepOutput, TOOLCHAIN_FILE, ToolchainValue};
pub use config::{CreateResult, Evaluation, KitchenConfig};
pub use cook::Cook;
pub use copy::{copy, copy_required};

use crate::error::{Error, Result};
use crate::hash::{sha256, verify_file_sha256};
use crate::options::{OptionOverrides, Options};
use crate::recipe::{Recipe, SourceEntry, SourcesData};
use crate::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Fetch-and-extract service offered to a recipe's `source` stage
pub trait SourceGetter {
    /// Fetch `entry`, verify it and extract it into `destination`
    fn get(&self, entry: &SourceEntry, destination: &Path, strip_root: bool) -> Result<()>;
}

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration
    pub fn new(config: KitchenConfig) -> Self {
        Self { config }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Resolve a recipe's configuration without doing any build work
    ///
    /// Runs `config_options`, applies user overrides, then `configure` and
    /// `validate`. A rejected combination surfaces here, before anything is
    /// fetched or built.
    pub fn evaluate(
        &self,
        recipe: &dyn Recipe,
        version: &str,
        settings: &Settings,
        overrides: &OptionOverrides,
    ) -> Result<Evaluation> {
        let name = recipe.description().name;
        let declared = recipe.default_options();
        let mut settings = settings.clone();
        let mut options = declared.clone();

        recipe.config_options(&settings, &mut options);
        overrides.apply(&declared, &mut options)?;
        recipe.configure(&mut settings, &mut options);
        recipe.validate(&settings, &options)?;

        let package_id = package_id(&settings, &options);
        debug!(
            "Resolved {}/{}: package id {}",
            name,
            version,
            &package_id[..16]
        );

        Ok(Evaluation {
            name: name.to_string(),
            version: version.to_string(),
            settings,
            options,
            package_id,
        })
    }

    /// Cook a recipe and publish the resulting package
    ///
    /// This is the main entry point for building from source.
    ///
    /// ## Cooking Process
    /// 1. **Evaluate**: resolve options and settings, validate
    /// 2. **Prep**: fetch and extract the pinned source archive
    /// 3. **Season**: generate the CMake toolchain
    /// 4. **Simmer**: configure and build with the external tool
    /// 5. **Plate**: copy artifacts into a staging folder, write metadata
    ///    and publish atomically
    ///
    /// Any failure aborts the run. The temporary build tree and the staging
    /// folder are removed on every exit path, so a failed run never leaves a
    /// partial package behind.
    pub fn create(
        &self,
        recipe: &dyn Recipe,
        version: &str,
        settings: &Settings,
        overrides: &OptionOverrides,
        sources: &SourcesData,
        tool: &dyn BuildTool,
    ) -> Result<CreateResult> {
        info!("Cooking {} version {}", recipe.description().name, version);

        let evaluation = self.evaluate(recipe, version, settings, overrides)?;
        let source = sources.get(version)?.clone();

        let mut cook = Cook::new(self, recipe, evaluation, source)?;

        info!("Prep: fetching ingredients...");
        cook.prep()?;

        info!("Seasoning: generating toolchain...");
        let toolchain = cook.season()?;

        info!("Simmering: running build...");
        cook.simmer(&toolchain, tool)?;

        info!("Plating: packaging artifacts...");
        cook.plate(&self.config.output_dir)
    }

    /// Fetch the source archive for a version without building
    ///
    /// Warms the source cache so a later `create` does not need the network.
    pub fn fetch(&self, recipe: &dyn Recipe, version: &str, sources: &SourcesData) -> Result<PathBuf> {
        info!(
            "Fetching sources for {} version {}",
            recipe.description().name,
            version
        );
        let entry = sources.get(version)?;
        self.fetch_source(entry)
    }

    /// Check whether the source for a version is already cached
    pub fn source_cached(&self, entry: &SourceEntry) -> bool {
        self.cache_path(entry).exists()
    }

    fn cache_path(&self, entry: &SourceEntry) -> PathBuf {
        self.config
            .source_cache
            .join(format!("sha256_{}", entry.sha256.to_lowercase()))
    }

    /// Fetch a source archive (with caching)
    pub(crate) fn fetch_source(&self, entry: &SourceEntry) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.source_cache)?;
        let cached_path = self.cache_path(entry);

        if cached_path.exists() {
            debug!("Using cached source: {}", cached_path.display());
            if verify_file_sha256(&cached_path, &entry.sha256)?.is_ok() {
                return Ok(cached_path);
            }
            warn!("Cached file checksum mismatch, re-downloading");
            fs::remove_file(&cached_path)?;
        }

        if entry.is_remote() {
            info!("Downloading: {}", entry.url);
        } else {
            info!("Copying local source: {}", entry.url);
        }
        let temp_path = cached_path.with_extension("tmp");
        if let Err(e) = self.download_verified(entry, &temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &cached_path)?;
        Ok(cached_path)
    }

    fn download_verified(&self, entry: &SourceEntry, temp_path: &Path) -> Result<()> {
        download_file(&entry.url, temp_path, self.config.download_timeout())?;
        verify_file_sha256(temp_path, &entry.sha256)?.map_err(|mismatch| {
            Error::ChecksumMismatch {
                expected: mismatch.expected,
                actual: mismatch.actual,
            }
        })
    }
}

impl SourceGetter for Kitchen {
    fn get(&self, entry: &SourceEntry, destination: &Path, strip_root: bool) -> Result<()> {
        let archive = self.fetch_source(entry)?;
        extract_archive(&archive, destination, strip_root)?;
        debug!(
            "Extracted {} to {}",
            entry.filename(),
            destination.display()
        );
        Ok(())
    }
}

/// Digest identifying a binary package built from these settings and options
pub fn package_id(settings: &Settings, options: &Options) -> String {
    let mut data = String::from("[settings]\n");
    for line in settings.canonical_lines() {
        data.push_str(&line);
        data.push('\n');
    }
    data.push_str("[options]\n");
    for line in options.canonical_lines() {
        data.push_str(&line);
        data.push('\n');
    }
    sha256(data.as_bytes())
}
