// src/recipe/mod.rs

//! Recipe system for packaging third-party libraries from source
//!
//! A recipe describes how to fetch, configure, build and repackage one
//! upstream library. It exposes its pipeline as named stages that the
//! [`Kitchen`] calls exactly once each, in a fixed order:
//!
//! 1. `config_options` - drop options meaningless for the platform
//! 2. user option overrides are applied by the host
//! 3. `configure` - drop settings the package does not depend on
//! 4. `validate` - reject contradictory option combinations
//! 5. `layout` - source/build/generators folders
//! 6. `source` - fetch and extract the pinned archive
//! 7. `generate` - write the CMake toolchain input
//! 8. `build` - configure then build with the external build tool
//! 9. `package` - copy artifacts into the package folder
//! 10. `package_info` - consumption metadata
//!
//! # Culinary Terminology
//!
//! - **Recipe**: how to turn one upstream release into a package
//! - **Kitchen**: the host that runs recipes
//! - **Cook**: one run of a recipe, owning its temporary build tree
//! - **Plate**: publish the finished package folder

mod ittapi;
pub mod kitchen;
mod layout;
mod package_info;
mod sources;

pub use ittapi::IttApi;
pub use kitchen::{
    BuildTool, CMake, CMakeToolchain, CreateResult, Evaluation, Kitchen, KitchenConfig,
    SourceGetter, StepOutput, ToolchainValue,
};
pub use layout::Layout;
pub use package_info::{Component, PackageInfo, library_filename};
pub use sources::{SourceEntry, SourcesData, parse_sources, parse_sources_file};

use crate::error::Result;
use crate::options::Options;
use crate::settings::Settings;
use serde::Serialize;
use std::path::Path;

/// Descriptive metadata of a recipe
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDescription {
    pub name: &'static str,
    pub license: &'static str,
    pub url: &'static str,
    pub homepage: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
}

/// State visible to the stages that run after `layout`
#[derive(Debug, Clone)]
pub struct RecipeContext {
    /// Resolved upstream version
    pub version: String,
    /// Normalized settings (after `configure`)
    pub settings: Settings,
    /// Final options (after `validate`); read-only from here on
    pub options: Options,
    /// Folder layout of this run
    pub layout: Layout,
    /// Source archive pinned for `version`
    pub source: SourceEntry,
}

/// A packaging recipe
///
/// Default implementations leave options and settings untouched, accept
/// every configuration and use the conventional CMake layout with a `src`
/// source folder.
pub trait Recipe {
    /// Name, license and descriptive fields
    fn description(&self) -> &RecipeDescription;

    /// Declared options with their defaults
    fn default_options(&self) -> Options;

    /// Remove options that do not apply to the platform
    fn config_options(&self, _settings: &Settings, _options: &mut Options) {}

    /// Remove settings the package does not depend on
    fn configure(&self, _settings: &mut Settings, _options: &mut Options) {}

    /// Reject invalid configurations before any build work
    fn validate(&self, _settings: &Settings, _options: &Options) -> Result<()> {
        Ok(())
    }

    /// Compute the folder layout under `base`
    fn layout(&self, base: &Path, settings: &Settings) -> Layout {
        Layout::cmake(base, "src", settings)
    }

    /// Fetch sources into `ctx.layout.source`
    fn source(&self, ctx: &RecipeContext, getter: &dyn SourceGetter) -> Result<()>;

    /// Produce the toolchain input for the external build tool
    fn generate(&self, ctx: &RecipeContext) -> Result<CMakeToolchain>;

    /// Configure then build
    fn build(
        &self,
        ctx: &RecipeContext,
        toolchain_file: &Path,
        tool: &dyn BuildTool,
    ) -> Result<Vec<StepOutput>> {
        let configured = tool.configure(&ctx.layout, toolchain_file, &ctx.settings)?;
        let built = tool.build(&ctx.layout, &ctx.settings)?;
        Ok(vec![configured, built])
    }

    /// Copy build outputs, headers and licenses into `package_folder`
    fn package(&self, ctx: &RecipeContext, package_folder: &Path) -> Result<()>;

    /// Consumption metadata for the finished package
    fn package_info(&self, settings: &Settings, options: &Options) -> PackageInfo;
}
