// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use ittcook::Result;
use ittcook::hash::sha256_file;
use ittcook::recipe::{BuildTool, Kitchen, KitchenConfig, Layout, SourcesData, StepOutput};
use ittcook::settings::Settings;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Upstream-like source tree of an ittapi release
pub const SOURCE_FILES: &[(&str, &str)] = &[
    ("CMakeLists.txt", "project(ittapi C)\n"),
    ("src/ittnotify/ittnotify_static.c", "int __itt_api_version;\n"),
    ("include/ittnotify.h", "#define ITT_MAJOR 3\n"),
    ("include/jitprofiling.h", "/* jit */\n"),
    ("include/libittnotify.h", "/* lib */\n"),
    ("include/legacy/ittnotify.h", "/* legacy */\n"),
    ("include/fortran/ittnotify.f90", "! fortran\n"),
    ("LICENSES/BSD-3-Clause.txt", "BSD 3-Clause License\n"),
    ("LICENSES/GPL-2.0-only.txt", "GNU GENERAL PUBLIC LICENSE Version 2\n"),
    ("LICENSES/GPL-3.0-only.txt", "GNU GENERAL PUBLIC LICENSE Version 3\n"),
];

/// Headers a package built from [`SOURCE_FILES`] must contain
pub const EXPECTED_HEADERS: &[&str] = &[
    "ittnotify.h",
    "jitprofiling.h",
    "legacy/ittnotify.h",
    "libittnotify.h",
];

/// Write a `.tar.gz` whose entries all live under `root/`
pub fn make_source_archive(path: &Path, root: &str, files: &[(&str, &str)]) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, format!("{}/{}", root, name), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// A temporary workspace with a source archive, its sources data and a
/// Kitchen whose cache and output live inside the workspace
pub struct Fixture {
    pub dir: TempDir,
    pub archive: PathBuf,
    pub sources: SourcesData,
    pub kitchen: Kitchen,
}

impl Fixture {
    pub fn new(version: &str) -> Self {
        Self::with_files(version, SOURCE_FILES)
    }

    pub fn with_files(version: &str, files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join(format!("v{}.tar.gz", version));
        make_source_archive(&archive, &format!("ittapi-{}", version), files);

        let sources_toml = format!(
            "[sources.\"{}\"]\nurl = \"{}\"\nsha256 = \"{}\"\n",
            version,
            archive.display(),
            sha256_file(&archive).unwrap()
        );
        let sources = ittcook::recipe::parse_sources(&sources_toml).unwrap();

        let kitchen = Kitchen::new(KitchenConfig {
            source_cache: dir.path().join("cache"),
            output_dir: dir.path().join("packages"),
            jobs: 1,
            ..Default::default()
        });

        Self {
            dir,
            archive,
            sources,
            kitchen,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("packages")
    }
}

/// Build tool stand-in that records its inputs and writes the library
/// where upstream's CMake project would
#[derive(Default)]
pub struct FakeCMake {
    /// Fail the named phase ("configure" or "build")
    pub fail_phase: Option<&'static str>,
    /// Finish without producing the library
    pub skip_artifact: bool,
    /// Toolchain file content seen at configure time
    pub toolchain: Mutex<Option<String>>,
    /// Phases run, in order
    pub calls: Mutex<Vec<String>>,
    /// Whether the sources were extracted before configure ran
    pub saw_sources: Mutex<bool>,
}

impl FakeCMake {
    pub fn failing(phase: &'static str) -> Self {
        Self {
            fail_phase: Some(phase),
            ..Default::default()
        }
    }

    pub fn toolchain(&self) -> String {
        self.toolchain.lock().unwrap().clone().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn step(&self, phase: &str) -> Result<StepOutput> {
        self.calls.lock().unwrap().push(phase.to_string());
        if self.fail_phase == Some(phase) {
            return Err(ittcook::Error::BuildFailed(format!(
                "cmake {} phase failed with exit code Some(1)",
                phase
            )));
        }
        Ok(StepOutput {
            phase: phase.to_string(),
            stdout: format!("-- {} done", phase),
            stderr: String::new(),
        })
    }
}

impl BuildTool for FakeCMake {
    fn configure(
        &self,
        layout: &Layout,
        toolchain_file: &Path,
        _settings: &Settings,
    ) -> Result<StepOutput> {
        *self.toolchain.lock().unwrap() = Some(fs::read_to_string(toolchain_file)?);
        *self.saw_sources.lock().unwrap() = layout.source.join("CMakeLists.txt").is_file();
        self.step("configure")
    }

    fn build(&self, layout: &Layout, settings: &Settings) -> Result<StepOutput> {
        let output = self.step("build")?;
        if !self.skip_artifact {
            let (dir, name) = if settings.is_windows() {
                (
                    layout.build.join("bin").join(settings.build_type.as_str()),
                    "libittnotify.lib",
                )
            } else {
                (layout.build.join("bin"), "libittnotify.a")
            };
            fs::create_dir_all(&dir)?;
            fs::write(dir.join(name), b"!<arch>\n")?;
        }
        Ok(output)
    }
}

/// Relative paths of all files under `dir`, sorted
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
