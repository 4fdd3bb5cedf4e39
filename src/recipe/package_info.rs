// src/recipe/package_info.rs

//! Consumption metadata published with a package
//!
//! Downstream build systems read this to find the package's include and
//! library directories, the libraries to link and the system libraries they
//! need. Properties carry the current naming scheme (`cmake_file_name`,
//! `cmake_target_name`, `pkg_config_name`); `names` carries the deprecated
//! per-generator aliases older consumers still look up.

use crate::settings::Os;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separately linkable unit of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Library link names, without platform prefix or extension
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default)]
    pub system_libs: Vec<String>,
    pub includedirs: Vec<String>,
    pub libdirs: Vec<String>,
    /// Legacy per-generator aliases
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl Default for Component {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            libs: Vec::new(),
            system_libs: Vec::new(),
            includedirs: vec!["include".to_string()],
            libdirs: vec!["lib".to_string()],
            names: BTreeMap::new(),
        }
    }
}

impl Component {
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub fn set_name(&mut self, generator: &str, name: &str) {
        self.names.insert(generator.to_string(), name.to_string());
    }
}

/// Metadata for a whole package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Legacy per-generator aliases
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
}

impl PackageInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: BTreeMap::new(),
            names: BTreeMap::new(),
            components: BTreeMap::new(),
        }
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub fn set_name(&mut self, generator: &str, name: &str) {
        self.names.insert(generator.to_string(), name.to_string());
    }

    /// Get or create a component
    pub fn component_mut(&mut self, name: &str) -> &mut Component {
        self.components.entry(name.to_string()).or_default()
    }

    /// Library link names across all components
    pub fn libs(&self) -> Vec<&str> {
        self.components
            .values()
            .flat_map(|c| c.libs.iter().map(|s| s.as_str()))
            .collect()
    }

    /// System library dependencies across all components, deduplicated
    pub fn system_libs(&self) -> Vec<&str> {
        let mut libs: Vec<&str> = self
            .components
            .values()
            .flat_map(|c| c.system_libs.iter().map(|s| s.as_str()))
            .collect();
        libs.sort_unstable();
        libs.dedup();
        libs
    }
}

/// File name of a static library link name on the given platform
///
/// On Windows the link name is the file stem (`libittnotify` ->
/// `libittnotify.lib`); elsewhere the linker adds `lib` and `.a`.
pub fn library_filename(lib: &str, os: Os) -> String {
    match os {
        Os::Windows => format!("{}.lib", lib),
        _ => format!("lib{}.a", lib),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_defaults() {
        let mut info = PackageInfo::new("demo");
        let component = info.component_mut("core");
        assert_eq!(component.includedirs, vec!["include"]);
        assert_eq!(component.libdirs, vec!["lib"]);
        component.libs.push("core".to_string());

        // Second lookup returns the same component
        info.component_mut("core").system_libs.push("m".to_string());
        assert_eq!(info.components.len(), 1);
        assert_eq!(info.libs(), vec!["core"]);
        assert_eq!(info.system_libs(), vec!["m"]);
    }

    #[test]
    fn test_system_libs_dedup() {
        let mut info = PackageInfo::new("demo");
        info.component_mut("a").system_libs.push("dl".to_string());
        info.component_mut("b").system_libs.push("dl".to_string());
        assert_eq!(info.system_libs(), vec!["dl"]);
    }

    #[test]
    fn test_library_filename() {
        assert_eq!(library_filename("ittnotify", Os::Linux), "libittnotify.a");
        assert_eq!(library_filename("ittnotify", Os::Macos), "libittnotify.a");
        assert_eq!(library_filename("libittnotify", Os::Windows), "libittnotify.lib");
    }

    #[test]
    fn test_json_shape() {
        let mut info = PackageInfo::new("demo");
        info.set_property("cmake_file_name", "DEMO");
        info.set_name("pkg_config", "demo");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["properties"]["cmake_file_name"], "DEMO");
        assert_eq!(json["names"]["pkg_config"], "demo");
    }
}
