// src/recipe/ittapi.rs

//! Recipe for the Intel Instrumentation and Tracing Technology API
//!
//! Builds the static `ittnotify` collector library with upstream's CMake
//! project and packages it together with the public headers and both
//! license texts (the library is dual licensed).

use super::kitchen::{CMakeToolchain, SourceGetter, ToolchainValue, copy_required};
use super::{PackageInfo, Recipe, RecipeContext, RecipeDescription};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::settings::Settings;
use std::path::Path;
use tracing::debug;

/// Toolchain variable toggling Intel Processor Trace marker support
pub const IPT_SUPPORT_VARIABLE: &str = "ITT_API_IPT_SUPPORT";

const DESCRIPTION: RecipeDescription = RecipeDescription {
    name: "ittapi",
    license: "dual licensed under GPLv2 and 3-Clause BSD licenses",
    url: "https://github.com/conan-io/conan-center-index",
    homepage: "https://github.com/intel/ittapi",
    description: "The Instrumentation and Tracing Technology (ITT) API enables your application \
                  to generate and control the collection of trace data during its execution \
                  across different Intel tools.",
    topics: &["itt", "ittapi", "vtune", "profiler", "profiling"],
};

const LICENSE_FILES: [&str; 2] = ["BSD-3-Clause.txt", "GPL-2.0-only.txt"];

/// The ittapi recipe
#[derive(Debug, Clone, Copy, Default)]
pub struct IttApi;

impl IttApi {
    pub fn new() -> Self {
        Self
    }

    /// Value passed as `ITT_API_IPT_SUPPORT`
    pub fn ipt_support(options: &Options) -> i64 {
        if options.get_safe("ptmark", false) { 1 } else { 0 }
    }
}

impl Recipe for IttApi {
    fn description(&self) -> &RecipeDescription {
        &DESCRIPTION
    }

    fn default_options(&self) -> Options {
        Options::new().with("fPIC", true).with("ptmark", false)
    }

    fn config_options(&self, settings: &Settings, options: &mut Options) {
        if settings.is_windows() {
            options.remove("fPIC");
        }
    }

    fn configure(&self, settings: &mut Settings, _options: &mut Options) {
        // Plain C library: no C++ runtime or standard to track
        settings.compiler.libcxx = None;
        settings.compiler.cppstd = None;
    }

    fn validate(&self, _settings: &Settings, options: &Options) -> Result<()> {
        if !options.get_safe("fPIC", true) {
            return Err(Error::InvalidConfiguration(
                "fPIC is always enabled by underlying CMake file.".to_string(),
            ));
        }
        Ok(())
    }

    fn source(&self, ctx: &RecipeContext, getter: &dyn SourceGetter) -> Result<()> {
        getter.get(&ctx.source, &ctx.layout.source, true)
    }

    fn generate(&self, ctx: &RecipeContext) -> Result<CMakeToolchain> {
        let mut toolchain = CMakeToolchain::new(ctx);
        toolchain.variables.insert(
            IPT_SUPPORT_VARIABLE.to_string(),
            ToolchainValue::Int(Self::ipt_support(&ctx.options)),
        );
        Ok(toolchain)
    }

    fn package(&self, ctx: &RecipeContext, package_folder: &Path) -> Result<()> {
        let lib_dir = package_folder.join("lib");
        if ctx.settings.is_windows() {
            let src = ctx
                .layout
                .build
                .join("bin")
                .join(ctx.settings.build_type.as_str());
            copy_required("libittnotify.lib", &src, &lib_dir)?;
        } else {
            copy_required("libittnotify.a", &ctx.layout.build.join("bin"), &lib_dir)?;
        }

        let headers = copy_required(
            "*.h",
            &ctx.layout.source.join("include"),
            &package_folder.join("include"),
        )?;
        debug!("Packaged {} header(s)", headers.len());

        let licenses_src = ctx.layout.source.join("LICENSES");
        let licenses_dst = package_folder.join("licenses");
        for license in LICENSE_FILES {
            copy_required(license, &licenses_src, &licenses_dst)?;
        }

        Ok(())
    }

    fn package_info(&self, settings: &Settings, _options: &Options) -> PackageInfo {
        let mut info = PackageInfo::new(DESCRIPTION.name);
        info.set_property("cmake_file_name", "ITT");
        info.set_property("pkg_config_name", "itt");

        let ittnotify = info.component_mut("ittnotify");
        ittnotify.set_property("cmake_target_name", "ITT::ittnotify");
        if settings.is_windows() {
            ittnotify.libs = vec!["libittnotify".to_string()];
        } else {
            ittnotify.libs = vec!["ittnotify".to_string()];
            ittnotify.system_libs = vec!["dl".to_string()];
        }
        ittnotify.set_name("cmake_find_package", "ittnotify");
        ittnotify.set_name("cmake_find_package_multi", "ittnotify");

        // Deprecated aliases for older consumers
        info.set_name("cmake_find_package", "ITT");
        info.set_name("cmake_find_package_multi", "ITT");
        info.set_name("pkg_config", "itt");

        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Os;

    fn configured(os: Os) -> (Settings, Options) {
        let recipe = IttApi::new();
        let mut settings = Settings::for_os(os, "x86_64");
        let mut options = recipe.default_options();
        recipe.config_options(&settings, &mut options);
        recipe.configure(&mut settings, &mut options);
        (settings, options)
    }

    #[test]
    fn test_fpic_removed_on_windows() {
        let (_, options) = configured(Os::Windows);
        assert!(!options.contains("fPIC"));
        assert_eq!(options.get("ptmark"), Some(false));
    }

    #[test]
    fn test_fpic_defaulted_elsewhere() {
        for os in [Os::Linux, Os::Macos, Os::FreeBSD, Os::Android] {
            let (_, options) = configured(os);
            assert_eq!(options.get("fPIC"), Some(true), "{os}");
        }
    }

    #[test]
    fn test_configure_drops_cxx_settings() {
        let (settings, _) = configured(Os::Linux);
        assert_eq!(settings.compiler.libcxx, None);
        assert_eq!(settings.compiler.cppstd, None);
    }

    #[test]
    fn test_validate_rejects_disabled_fpic() {
        let recipe = IttApi::new();
        for os in [Os::Linux, Os::Macos, Os::FreeBSD, Os::Android] {
            for ptmark in [false, true] {
                let (settings, mut options) = configured(os);
                options.set("fPIC", false).unwrap();
                options.set("ptmark", ptmark).unwrap();
                let err = recipe.validate(&settings, &options).unwrap_err();
                assert!(matches!(err, Error::InvalidConfiguration(_)));
            }
        }
    }

    #[test]
    fn test_validate_accepts_defaults_and_windows() {
        let recipe = IttApi::new();
        for os in [Os::Linux, Os::Windows] {
            let (settings, options) = configured(os);
            assert!(recipe.validate(&settings, &options).is_ok());
        }
    }

    #[test]
    fn test_ipt_support_value() {
        let mut options = IttApi::new().default_options();
        assert_eq!(IttApi::ipt_support(&options), 0);
        options.set("ptmark", true).unwrap();
        assert_eq!(IttApi::ipt_support(&options), 1);
    }

    #[test]
    fn test_package_info_linux() {
        let (settings, options) = configured(Os::Linux);
        let info = IttApi::new().package_info(&settings, &options);

        assert_eq!(info.name, "ittapi");
        assert_eq!(info.properties["cmake_file_name"], "ITT");
        assert_eq!(info.properties["pkg_config_name"], "itt");
        assert_eq!(info.libs(), vec!["ittnotify"]);
        assert_eq!(info.system_libs(), vec!["dl"]);

        let component = &info.components["ittnotify"];
        assert_eq!(component.properties["cmake_target_name"], "ITT::ittnotify");
        assert_eq!(component.names["cmake_find_package"], "ittnotify");
        assert_eq!(info.names["cmake_find_package_multi"], "ITT");
        assert_eq!(info.names["pkg_config"], "itt");
    }

    #[test]
    fn test_package_info_windows() {
        let (settings, options) = configured(Os::Windows);
        let info = IttApi::new().package_info(&settings, &options);
        assert_eq!(info.libs(), vec!["libittnotify"]);
        assert!(info.system_libs().is_empty());
    }
}
