// src/commands/create.rs

//! Create command - fetch, build and package a version

use crate::cli::ConfigurationArgs;
use anyhow::{Context, Result};
use ittcook::recipe::{CMake, IttApi, Kitchen, Recipe, parse_sources_file};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{load_kitchen_config, resolve_configuration};

/// Build and package a version
///
/// # Arguments
/// * `version` - Upstream version to build
/// * `sources_path` - Sources data file
/// * `configuration` - Profile, settings and option overrides
/// * `config_path` - Kitchen configuration file
/// * `output_dir` - Package root override
/// * `source_cache` - Source cache override
/// * `jobs` - Parallel build jobs (None = from config)
/// * `keep_builddir` - Keep build directory after completion
/// * `cmake` - cmake executable override
#[allow(clippy::too_many_arguments)]
pub fn cmd_create(
    version: &str,
    sources_path: &str,
    configuration: &ConfigurationArgs,
    config_path: Option<&str>,
    output_dir: Option<&str>,
    source_cache: Option<&str>,
    jobs: Option<u32>,
    keep_builddir: bool,
    cmake: Option<&str>,
) -> Result<()> {
    let recipe = IttApi::new();

    let mut config = load_kitchen_config(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(dir) = source_cache {
        config.source_cache = PathBuf::from(dir);
    }
    if let Some(j) = jobs {
        config.jobs = j;
    }
    if let Some(program) = cmake {
        config.cmake_program = Some(PathBuf::from(program));
    }
    config.keep_builddir |= keep_builddir;

    let (settings, overrides) = resolve_configuration(configuration)?;

    let sources = parse_sources_file(Path::new(sources_path))
        .with_context(|| format!("Failed to read sources: {}", sources_path))?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let tool = CMake::from_config(&config)?;
    let kitchen = Kitchen::new(config);

    println!(
        "Cooking {} {} for {} {} ({})",
        recipe.description().name,
        version,
        settings.os,
        settings.arch,
        settings.build_type
    );

    let result = kitchen
        .create(&recipe, version, &settings, &overrides, &sources, &tool)
        .with_context(|| format!("Failed to create {}/{}", recipe.description().name, version))?;

    println!("\n[COMPLETE] Package: {}", result.package_folder.display());
    println!("  package id: {}", result.package_id);
    println!("  libs: {}", result.package_info.libs().join(", "));
    let system_libs = result.package_info.system_libs();
    if !system_libs.is_empty() {
        println!("  system libs: {}", system_libs.join(", "));
    }
    if let Some(build_dir) = &result.build_dir {
        println!("  build directory kept at: {}", build_dir.display());
    }

    if !result.warnings.is_empty() {
        println!("\nBuild warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "Successfully created {} {} at {}",
        recipe.description().name,
        version,
        result.package_folder.display()
    );

    Ok(())
}
