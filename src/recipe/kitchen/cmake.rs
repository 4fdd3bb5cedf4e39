// src/recipe/kitchen/cmake.rs

//! CMake toolchain generation and invocation

use super::KitchenConfig;
use crate::error::{Error, Result};
use crate::recipe::{Layout, RecipeContext};
use crate::settings::{BuildType, Settings};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// File name of the generated toolchain
pub const TOOLCHAIN_FILE: &str = "ittcook_toolchain.cmake";

/// Value of a toolchain cache variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl ToolchainValue {
    fn render(&self, name: &str) -> String {
        match self {
            Self::Int(v) => format!(
                "set({} \"{}\" CACHE STRING \"Variable {} ittcook-toolchain defined\")",
                name, v, name
            ),
            Self::Bool(v) => format!(
                "set({} {} CACHE BOOL \"Variable {} ittcook-toolchain defined\")",
                name,
                if *v { "ON" } else { "OFF" },
                name
            ),
            Self::Str(v) => format!(
                "set({} \"{}\" CACHE STRING \"Variable {} ittcook-toolchain defined\")",
                name,
                v.replace('\\', "/").replace('"', "\\\""),
                name
            ),
        }
    }
}

/// Toolchain input consumed by CMake through `CMAKE_TOOLCHAIN_FILE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeToolchain {
    /// Build type pinned for single-config generators
    pub build_type: Option<BuildType>,
    /// `CMAKE_POSITION_INDEPENDENT_CODE`, when the recipe has an fPIC option
    pub fpic: Option<bool>,
    /// Recipe-defined cache variables
    pub variables: BTreeMap<String, ToolchainValue>,
}

impl CMakeToolchain {
    /// Toolchain seeded from the run's settings and options
    pub fn new(ctx: &RecipeContext) -> Self {
        Self {
            build_type: (!ctx.layout.multi_config).then_some(ctx.settings.build_type),
            fpic: ctx.options.get("fPIC"),
            variables: BTreeMap::new(),
        }
    }

    /// Render the toolchain file content
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated by ittcook, do not edit\n\n");

        if let Some(build_type) = self.build_type {
            let _ = writeln!(
                out,
                "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Choose the type of build.\" FORCE)",
                build_type
            );
        }
        if let Some(fpic) = self.fpic {
            let _ = writeln!(
                out,
                "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"Position independent code\")",
                if fpic { "ON" } else { "OFF" }
            );
        }
        for (name, value) in &self.variables {
            let _ = writeln!(out, "{}", value.render(name));
        }

        out
    }

    /// Write the toolchain file into `generators_dir`
    pub fn generate(&self, generators_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(generators_dir)?;
        let path = generators_dir.join(TOOLCHAIN_FILE);
        fs::write(&path, self.render())
            .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!("Wrote toolchain: {}", path.display());
        Ok(path)
    }
}

/// Captured output of one external build step
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    pub phase: String,
    pub stdout: String,
    pub stderr: String,
}

/// External build tool driven through a configure/build protocol
pub trait BuildTool {
    /// Generate the build tree from the sources and toolchain
    fn configure(
        &self,
        layout: &Layout,
        toolchain_file: &Path,
        settings: &Settings,
    ) -> Result<StepOutput>;

    /// Build the configured tree
    fn build(&self, layout: &Layout, settings: &Settings) -> Result<StepOutput>;
}

/// The `cmake` command line tool
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
    generator: Option<String>,
    jobs: u32,
}

impl CMake {
    pub fn new(program: PathBuf, generator: Option<String>, jobs: u32) -> Self {
        Self {
            program,
            generator,
            jobs,
        }
    }

    /// Locate cmake from the config or `PATH`
    pub fn from_config(config: &KitchenConfig) -> Result<Self> {
        let program = match &config.cmake_program {
            Some(program) => program.clone(),
            None => which::which("cmake")
                .map_err(|e| Error::ToolNotFound(format!("cmake: {}", e)))?,
        };
        debug!("Using cmake: {}", program.display());
        Ok(Self::new(program, config.cmake_generator.clone(), config.jobs))
    }

    pub fn configure_args(&self, layout: &Layout, toolchain_file: &Path) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            layout.source.display().to_string(),
            "-B".to_string(),
            layout.build.display().to_string(),
            format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain_file.display()),
        ];
        if let Some(generator) = &self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }
        args
    }

    pub fn build_args(&self, layout: &Layout, settings: &Settings) -> Vec<String> {
        let mut args = vec!["--build".to_string(), layout.build.display().to_string()];
        if layout.multi_config {
            args.push("--config".to_string());
            args.push(settings.build_type.to_string());
        }
        if self.jobs > 0 {
            args.push("--parallel".to_string());
            args.push(self.jobs.to_string());
        }
        args
    }

    fn run(&self, phase: &str, args: &[String], workdir: &Path) -> Result<StepOutput> {
        info!("Running cmake {} phase", phase);
        debug!("Command: {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| Error::BuildFailed(format!("Failed to run cmake {}: {}", phase, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(Error::BuildFailed(format!(
                "cmake {} phase failed with exit code {:?}\nstderr: {}",
                phase,
                output.status.code(),
                stderr
            )));
        }

        Ok(StepOutput {
            phase: phase.to_string(),
            stdout,
            stderr,
        })
    }
}

impl BuildTool for CMake {
    fn configure(
        &self,
        layout: &Layout,
        toolchain_file: &Path,
        _settings: &Settings,
    ) -> Result<StepOutput> {
        fs::create_dir_all(&layout.build)?;
        self.run("configure", &self.configure_args(layout, toolchain_file), &layout.build)
    }

    fn build(&self, layout: &Layout, settings: &Settings) -> Result<StepOutput> {
        self.run("build", &self.build_args(layout, settings), &layout.build)
    }
}
