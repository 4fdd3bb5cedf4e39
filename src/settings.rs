// src/settings.rs

//! Platform descriptor for a recipe run
//!
//! Settings describe the platform the package is built for: operating
//! system, architecture, compiler and build type. They are supplied by the
//! host (detected from the running machine, then overridden by a profile and
//! `-s key=value` arguments) and read by the recipe to branch its copy and
//! metadata logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    FreeBSD,
    Android,
}

impl Os {
    /// Name used in profiles and package IDs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Macos => "Macos",
            Self::FreeBSD => "FreeBSD",
            Self::Android => "Android",
        }
    }

    /// Map a `std::env::consts::OS` value
    fn from_host(os: &str) -> Option<Self> {
        match os {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Macos),
            "freebsd" => Some(Self::FreeBSD),
            "android" => Some(Self::Android),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "freebsd" => Ok(Self::FreeBSD),
            "android" => Ok(Self::Android),
            _ => Err(Error::ParseError(format!(
                "Unknown os: {} (expected Linux, Windows, Macos, FreeBSD or Android)",
                s
            ))),
        }
    }
}

/// CMake build type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            _ => Err(Error::ParseError(format!("Unknown build_type: {}", s))),
        }
    }
}

/// Compiler sub-settings
///
/// `libcxx` and `cppstd` are optional so a recipe without C++ code can
/// drop them from consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub libcxx: Option<String>,
    #[serde(default)]
    pub cppstd: Option<String>,
}

impl CompilerSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            libcxx: None,
            cppstd: None,
        }
    }

    /// Whether this compiler drives a multi-configuration generator
    pub fn is_msvc(&self) -> bool {
        matches!(self.name.as_str(), "msvc" | "Visual Studio")
    }
}

/// Complete platform descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub arch: String,
    pub compiler: CompilerSettings,
    pub build_type: BuildType,
}

impl Settings {
    /// Settings for the given os with that platform's usual compiler
    pub fn for_os(os: Os, arch: impl Into<String>) -> Self {
        let compiler = match os {
            Os::Windows => CompilerSettings {
                name: "msvc".to_string(),
                version: Some("193".to_string()),
                libcxx: None,
                cppstd: None,
            },
            Os::Macos => CompilerSettings {
                name: "apple-clang".to_string(),
                version: None,
                libcxx: Some("libc++".to_string()),
                cppstd: None,
            },
            _ => CompilerSettings {
                name: "gcc".to_string(),
                version: None,
                libcxx: Some("libstdc++11".to_string()),
                cppstd: None,
            },
        };

        Self {
            os,
            arch: arch.into(),
            compiler,
            build_type: BuildType::default(),
        }
    }

    /// Detect settings for the running machine
    pub fn detect() -> Self {
        let os = Os::from_host(std::env::consts::OS).unwrap_or_else(|| {
            tracing::warn!(
                "Unrecognized host os {}, assuming Linux",
                std::env::consts::OS
            );
            Os::Linux
        });
        let arch = match std::env::consts::ARCH {
            "aarch64" => "armv8",
            "arm" => "armv7",
            other => other,
        };
        Self::for_os(os, arch)
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Apply one `key=value` setting
    ///
    /// Keys: `os`, `arch`, `build_type`, `compiler`, `compiler.version`,
    /// `compiler.libcxx`, `compiler.cppstd`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim() {
            "os" => self.os = value.parse()?,
            "arch" => self.arch = value.to_string(),
            "build_type" => self.build_type = value.parse()?,
            "compiler" => self.compiler.name = value.to_string(),
            "compiler.version" => self.compiler.version = Some(value.to_string()),
            "compiler.libcxx" => self.compiler.libcxx = Some(value.to_string()),
            "compiler.cppstd" => self.compiler.cppstd = Some(value.to_string()),
            other => {
                return Err(Error::ParseError(format!("Unknown setting: {}", other)));
            }
        }
        Ok(())
    }

    /// Apply a `key=value` argument string
    pub fn apply_arg(&mut self, arg: &str) -> Result<()> {
        let (key, value) = split_key_value(arg)?;
        self.set(key, value)
    }

    /// Sorted `key=value` lines of every setting still under consideration
    pub fn canonical_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("arch={}", self.arch),
            format!("build_type={}", self.build_type),
            format!("compiler={}", self.compiler.name),
            format!("os={}", self.os),
        ];
        if let Some(version) = &self.compiler.version {
            lines.push(format!("compiler.version={}", version));
        }
        if let Some(libcxx) = &self.compiler.libcxx {
            lines.push(format!("compiler.libcxx={}", libcxx));
        }
        if let Some(cppstd) = &self.compiler.cppstd {
            lines.push(format!("compiler.cppstd={}", cppstd));
        }
        lines.sort();
        lines
    }
}

/// Split a `key=value` argument
pub fn split_key_value(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| Error::ParseError(format!("Expected key=value, got: {}", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_parse() {
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("windows".parse::<Os>().unwrap(), Os::Windows);
        assert!("Plan9".parse::<Os>().is_err());
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("RelWithDebInfo".parse::<BuildType>().unwrap(), BuildType::RelWithDebInfo);
        assert_eq!(BuildType::default(), BuildType::Release);
        assert!("Fast".parse::<BuildType>().is_err());
    }

    #[test]
    fn test_for_os_defaults() {
        let linux = Settings::for_os(Os::Linux, "x86_64");
        assert_eq!(linux.compiler.name, "gcc");
        assert!(linux.compiler.libcxx.is_some());
        assert!(!linux.compiler.is_msvc());

        let windows = Settings::for_os(Os::Windows, "x86_64");
        assert!(windows.is_windows());
        assert!(windows.compiler.is_msvc());
    }

    #[test]
    fn test_set_args() {
        let mut settings = Settings::for_os(Os::Linux, "x86_64");
        settings.apply_arg("os=Windows").unwrap();
        settings.apply_arg("build_type=Debug").unwrap();
        settings.apply_arg("compiler.cppstd=17").unwrap();
        assert_eq!(settings.os, Os::Windows);
        assert_eq!(settings.build_type, BuildType::Debug);
        assert_eq!(settings.compiler.cppstd.as_deref(), Some("17"));

        assert!(settings.apply_arg("compiler.runtime=MD").is_err());
        assert!(settings.apply_arg("no-equals").is_err());
        assert!(settings.apply_arg("=Linux").is_err());
    }

    #[test]
    fn test_canonical_lines_skip_removed() {
        let mut settings = Settings::for_os(Os::Linux, "x86_64");
        settings.compiler.cppstd = Some("17".to_string());
        assert!(settings.canonical_lines().iter().any(|l| l.starts_with("compiler.cppstd")));

        settings.compiler.libcxx = None;
        settings.compiler.cppstd = None;
        let lines = settings.canonical_lines();
        assert!(!lines.iter().any(|l| l.starts_with("compiler.libcxx")));
        assert!(!lines.iter().any(|l| l.starts_with("compiler.cppstd")));
        assert!(lines.contains(&"os=Linux".to_string()));
    }
}
