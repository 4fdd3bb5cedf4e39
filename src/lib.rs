// src/lib.rs

//! ittcook: packaging recipe host for the Intel ITT API
//!
//! Fetches a pinned ittapi source release, builds it with CMake and
//! repackages the static `ittnotify` library, its headers and license
//! texts into a package folder together with consumption metadata.
//!
//! # Architecture
//!
//! - [`recipe::Recipe`]: the named pipeline stages a recipe implements
//! - [`recipe::IttApi`]: the ittapi recipe
//! - [`recipe::Kitchen`]: the host that runs the stages in a fixed order
//! - [`settings`] / [`options`] / [`profile`]: the configuration a run is
//!   evaluated against

mod error;
pub mod hash;
pub mod options;
pub mod profile;
pub mod recipe;
pub mod settings;

pub use error::{Error, ErrorKind, Result};
pub use options::{OptionOverrides, Options};
pub use profile::Profile;
pub use recipe::{CreateResult, IttApi, Kitchen, KitchenConfig, PackageInfo, Recipe};
pub use settings::{BuildType, CompilerSettings, Os, Settings};
