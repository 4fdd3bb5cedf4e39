// src/recipe/layout.rs

//! Conventional CMake project layout

use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Folders used by one recipe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Root of the run's temporary tree
    pub base: PathBuf,
    /// Extracted upstream sources
    pub source: PathBuf,
    /// CMake binary directory
    pub build: PathBuf,
    /// Generated toolchain files
    pub generators: PathBuf,
    /// Whether the generator builds several configurations in one tree
    pub multi_config: bool,
}

impl Layout {
    /// CMake layout with sources under `base/<src_folder>`
    ///
    /// Single-configuration generators get one build folder per build type
    /// (`build/Release`); multi-configuration generators (MSVC) share
    /// `build/` and select the configuration at build time.
    pub fn cmake(base: &Path, src_folder: &str, settings: &Settings) -> Self {
        let multi_config = settings.compiler.is_msvc();
        let build = if multi_config {
            base.join("build")
        } else {
            base.join("build").join(settings.build_type.as_str())
        };

        Self {
            base: base.to_path_buf(),
            source: base.join(src_folder),
            generators: build.join("generators"),
            build,
            multi_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BuildType, Os};

    #[test]
    fn test_single_config_layout() {
        let settings = Settings::for_os(Os::Linux, "x86_64");
        let layout = Layout::cmake(Path::new("/tmp/run"), "src", &settings);

        assert!(!layout.multi_config);
        assert_eq!(layout.source, PathBuf::from("/tmp/run/src"));
        assert_eq!(layout.build, PathBuf::from("/tmp/run/build/Release"));
        assert_eq!(layout.generators, PathBuf::from("/tmp/run/build/Release/generators"));
    }

    #[test]
    fn test_multi_config_layout() {
        let mut settings = Settings::for_os(Os::Windows, "x86_64");
        settings.build_type = BuildType::Debug;
        let layout = Layout::cmake(Path::new("/tmp/run"), "src", &settings);

        assert!(layout.multi_config);
        assert_eq!(layout.build, PathBuf::from("/tmp/run/build"));
        assert_eq!(layout.generators, PathBuf::from("/tmp/run/build/generators"));
    }
}
