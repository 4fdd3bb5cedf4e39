// src/commands/info.rs

//! Info command - show the resolved configuration without building

use crate::cli::ConfigurationArgs;
use anyhow::{Context, Result};
use ittcook::recipe::{IttApi, Kitchen, Recipe};
use serde_json::json;

use super::{load_kitchen_config, resolve_configuration};

/// Print the resolved settings, options, package id and metadata preview
pub fn cmd_info(
    version: &str,
    configuration: &ConfigurationArgs,
    config_path: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let recipe = IttApi::new();
    let kitchen = Kitchen::new(load_kitchen_config(config_path)?);
    let (settings, overrides) = resolve_configuration(configuration)?;

    let evaluation = kitchen
        .evaluate(&recipe, version, &settings, &overrides)
        .with_context(|| format!("Invalid configuration for {}", recipe.description().name))?;
    let package_info = recipe.package_info(&evaluation.settings, &evaluation.options);

    if as_json {
        let value = json!({
            "recipe": recipe.description(),
            "evaluation": evaluation,
            "package_info": package_info,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let description = recipe.description();
    println!("{}/{}", description.name, version);
    println!("  license: {}", description.license);
    println!("  homepage: {}", description.homepage);
    println!("  package id: {}", evaluation.package_id);

    println!("\n[settings]");
    for line in evaluation.settings.canonical_lines() {
        println!("  {}", line);
    }

    println!("\n[options]");
    for line in evaluation.options.canonical_lines() {
        println!("  {}", line);
    }

    println!("\n[package_info]");
    for (key, value) in &package_info.properties {
        println!("  {} = {}", key, value);
    }
    for (name, component) in &package_info.components {
        println!("  component {}:", name);
        println!("    libs: {}", component.libs.join(", "));
        if !component.system_libs.is_empty() {
            println!("    system_libs: {}", component.system_libs.join(", "));
        }
        for (key, value) in &component.properties {
            println!("    {} = {}", key, value);
        }
    }

    Ok(())
}
