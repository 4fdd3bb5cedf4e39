// src/commands/fetch.rs

//! Fetch command - download and verify sources without building

use anyhow::{Context, Result};
use ittcook::recipe::{IttApi, Kitchen, Recipe, parse_sources_file};
use std::path::{Path, PathBuf};

use super::load_kitchen_config;

/// Fetch a version's source archive into the source cache
pub fn cmd_fetch(
    version: &str,
    sources_path: &str,
    config_path: Option<&str>,
    source_cache: Option<&str>,
) -> Result<()> {
    let recipe = IttApi::new();

    let mut config = load_kitchen_config(config_path)?;
    if let Some(dir) = source_cache {
        config.source_cache = PathBuf::from(dir);
    }

    let sources = parse_sources_file(Path::new(sources_path))
        .with_context(|| format!("Failed to read sources: {}", sources_path))?;

    let kitchen = Kitchen::new(config);
    let entry = sources.get(version)?;
    let already_cached = kitchen.source_cached(entry);

    let path = kitchen
        .fetch(&recipe, version, &sources)
        .with_context(|| format!("Failed to fetch sources for {}", recipe.description().name))?;

    if already_cached {
        println!("[OK] Source already cached: {}", path.display());
    } else {
        println!("[COMPLETE] Fetched {} -> {}", entry.url, path.display());
    }

    Ok(())
}
