// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for a single recipe run

use super::{BuildTool, CreateResult, Evaluation, Kitchen, StepOutput};
use crate::error::{Error, Result};
use crate::recipe::{PackageInfo, Recipe, RecipeContext, SourceEntry, library_filename};
use crate::settings::Os;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Name of the metadata file written into every package folder
pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a dyn Recipe,
    package_id: String,
    ctx: RecipeContext,
    /// Temporary tree holding sources and build folders
    build_dir: TempDir,
    /// Build log accumulator
    log: String,
    warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(
        kitchen: &'a Kitchen,
        recipe: &'a dyn Recipe,
        evaluation: Evaluation,
        source: SourceEntry,
    ) -> Result<Self> {
        let build_dir = tempfile::Builder::new()
            .prefix("ittcook-build-")
            .tempdir()
            .map_err(|e| Error::IoError(format!("Failed to create build directory: {}", e)))?;

        let layout = recipe.layout(build_dir.path(), &evaluation.settings);
        debug!(
            "Layout: source {}, build {}",
            layout.source.display(),
            layout.build.display()
        );

        let ctx = RecipeContext {
            version: evaluation.version,
            settings: evaluation.settings,
            options: evaluation.options,
            layout,
            source,
        };

        Ok(Self {
            kitchen,
            recipe,
            package_id: evaluation.package_id,
            ctx,
            build_dir,
            log: String::new(),
            warnings: Vec::new(),
        })
    }

    /// Phase 1: Prep - fetch and extract sources
    pub(super) fn prep(&mut self) -> Result<()> {
        fs::create_dir_all(&self.ctx.layout.source)?;
        self.recipe.source(&self.ctx, self.kitchen)?;
        self.log_line(&format!("Fetched source: {}", self.ctx.source.url));
        Ok(())
    }

    /// Phase 2: Season - write the toolchain for the build tool
    pub(super) fn season(&mut self) -> Result<PathBuf> {
        let toolchain = self.recipe.generate(&self.ctx)?;
        let path = toolchain.generate(&self.ctx.layout.generators)?;
        self.log_line(&format!("Generated toolchain: {}", path.display()));
        Ok(path)
    }

    /// Phase 3: Simmer - configure and build
    pub(super) fn simmer(&mut self, toolchain: &Path, tool: &dyn BuildTool) -> Result<()> {
        let outputs = self.recipe.build(&self.ctx, toolchain, tool)?;
        for output in &outputs {
            self.log_build_output(output);
        }
        Ok(())
    }

    /// Phase 4: Plate - package the result and publish it
    ///
    /// Artifacts are assembled in a staging folder next to the final
    /// location and renamed into place only after the metadata check
    /// passes. The staging folder is removed on failure.
    pub(super) fn plate(mut self, output_dir: &Path) -> Result<CreateResult> {
        let name = self.recipe.description().name;
        let final_dir = output_dir
            .join(name)
            .join(&self.ctx.version)
            .join(&self.package_id);
        let parent = final_dir
            .parent()
            .ok_or_else(|| Error::IoError("Package folder has no parent".to_string()))?;
        fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(parent)
            .map_err(|e| Error::IoError(format!("Failed to create staging directory: {}", e)))?;
        let package_folder = staging.path().join("package");
        fs::create_dir_all(&package_folder)?;

        self.recipe.package(&self.ctx, &package_folder)?;

        let info = self.recipe.package_info(&self.ctx.settings, &self.ctx.options);
        check_published_libs(&info, &package_folder, self.ctx.settings.os)?;

        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| Error::IoError(format!("Failed to serialize package info: {}", e)))?;
        fs::write(package_folder.join(PACKAGE_INFO_FILE), json)?;

        publish(&package_folder, &final_dir, &staging.path().join("previous"))?;

        self.log_line(&format!("Packaged: {}", final_dir.display()));
        info!("Cooked: {}", final_dir.display());

        let build_dir = if self.kitchen.config.keep_builddir {
            let kept = self.build_dir.keep();
            info!("Keeping build directory: {}", kept.display());
            Some(kept)
        } else {
            None
        };

        Ok(CreateResult {
            package_folder: final_dir,
            package_id: self.package_id,
            package_info: info,
            log: self.log,
            warnings: self.warnings,
            build_dir,
        })
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log build step output (stdout/stderr) with a phase header
    fn log_build_output(&mut self, output: &StepOutput) {
        self.log_line(&format!("=== {} ===", output.phase));
        if !output.stdout.is_empty() {
            self.log.push_str(&output.stdout);
            self.log.push('\n');
        }
        if !output.stderr.is_empty() {
            self.log.push_str(&output.stderr);
            self.log.push('\n');
            self.warnings
                .push(format!("{} phase wrote to stderr", output.phase));
        }
    }
}

/// Move `package_folder` to `final_dir`
///
/// An existing package is first moved to `aside` and only discarded (with
/// the staging folder) once the new one is in place. If the swap fails the
/// previous package is restored.
fn publish(package_folder: &Path, final_dir: &Path, aside: &Path) -> Result<()> {
    if !final_dir.exists() {
        fs::rename(package_folder, final_dir)?;
        return Ok(());
    }

    debug!("Replacing existing package: {}", final_dir.display());
    fs::rename(final_dir, aside)?;
    if let Err(e) = fs::rename(package_folder, final_dir) {
        fs::rename(aside, final_dir)?;
        return Err(Error::PackagingFailed(format!(
            "Failed to publish {}: {}",
            final_dir.display(),
            e
        )));
    }
    Ok(())
}

/// Check that every library named in the metadata was packaged
fn check_published_libs(info: &PackageInfo, package_folder: &Path, os: Os) -> Result<()> {
    for (component_name, component) in &info.components {
        for lib in &component.libs {
            let filename = library_filename(lib, os);
            let found = component
                .libdirs
                .iter()
                .any(|dir| package_folder.join(dir).join(&filename).is_file());
            if !found {
                return Err(Error::PackagingFailed(format!(
                    "Component {} declares library {} but {} was not packaged",
                    component_name, lib, filename
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_existing_package() {
        let dir = tempfile::tempdir().unwrap();
        let final_dir = dir.path().join("final");
        let new_pkg = dir.path().join("new");
        fs::create_dir_all(&final_dir).unwrap();
        fs::write(final_dir.join("old.txt"), b"old").unwrap();
        fs::create_dir_all(&new_pkg).unwrap();
        fs::write(new_pkg.join("new.txt"), b"new").unwrap();

        publish(&new_pkg, &final_dir, &dir.path().join("aside")).unwrap();
        assert!(final_dir.join("new.txt").is_file());
        assert!(!final_dir.join("old.txt").exists());
        assert!(dir.path().join("aside/old.txt").is_file());
    }

    #[test]
    fn test_publish_failure_restores_previous_package() {
        let dir = tempfile::tempdir().unwrap();
        let final_dir = dir.path().join("final");
        fs::create_dir_all(&final_dir).unwrap();
        fs::write(final_dir.join("old.txt"), b"old").unwrap();

        let missing = dir.path().join("missing");
        let err = publish(&missing, &final_dir, &dir.path().join("aside")).unwrap_err();
        assert!(matches!(err, Error::PackagingFailed(_)));
        assert_eq!(fs::read(final_dir.join("old.txt")).unwrap(), b"old");
        assert!(!dir.path().join("aside").exists());
    }

    #[test]
    fn test_check_published_libs() {
        let dir = tempfile::tempdir().unwrap();
        let mut info = PackageInfo::new("demo");
        info.component_mut("core").libs.push("core".to_string());

        let err = check_published_libs(&info, dir.path(), Os::Linux).unwrap_err();
        assert!(matches!(err, Error::PackagingFailed(_)));

        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/libcore.a"), b"!<arch>\n").unwrap();
        assert!(check_published_libs(&info, dir.path(), Os::Linux).is_ok());

        // Windows expects the .lib spelling
        assert!(check_published_libs(&info, dir.path(), Os::Windows).is_err());
    }
}
