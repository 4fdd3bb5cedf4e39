// src/commands/mod.rs
//! Command handlers for the ittcook CLI

mod create;
mod fetch;
mod info;

pub use create::cmd_create;
pub use fetch::cmd_fetch;
pub use info::cmd_info;

use crate::cli::ConfigurationArgs;
use anyhow::{Context, Result};
use ittcook::options::OptionOverrides;
use ittcook::profile::Profile;
use ittcook::recipe::KitchenConfig;
use ittcook::settings::Settings;
use std::path::Path;
use tracing::debug;

/// Load the kitchen configuration, falling back to defaults
pub(crate) fn load_kitchen_config(path: Option<&str>) -> Result<KitchenConfig> {
    match path {
        Some(path) => KitchenConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path)),
        None => Ok(KitchenConfig::default()),
    }
}

/// Resolve settings and option overrides
///
/// Host detection first, then the profile, then `-s`/`-o` arguments.
pub(crate) fn resolve_configuration(
    args: &ConfigurationArgs,
) -> Result<(Settings, OptionOverrides)> {
    let mut settings = Settings::detect();
    let mut overrides = OptionOverrides::new();

    if let Some(path) = &args.profile {
        let profile = Profile::load(Path::new(path))
            .with_context(|| format!("Failed to load profile: {}", path))?;
        profile.apply_settings(&mut settings)?;
        profile.apply_options(&mut overrides)?;
    }

    for arg in &args.settings {
        settings
            .apply_arg(arg)
            .with_context(|| format!("Invalid setting: {}", arg))?;
    }
    for arg in &args.options {
        overrides
            .insert_arg(arg)
            .with_context(|| format!("Invalid option: {}", arg))?;
    }

    debug!("Settings: {}", settings.canonical_lines().join(", "));
    Ok((settings, overrides))
}
