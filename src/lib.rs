// src/lib.rs

//! Pantry: recipes for vendoring third-party C++ libraries
//!
//! Pantry builds Boost, fmt and Qt from archives in a local source
//! repository and installs each into a package folder described by a
//! metadata file that downstream build systems consume.
//!
//! # Architecture
//!
//! - Settings and options: target platform, compiler and boolean toggles,
//!   resolved per recipe before anything runs
//! - Recipes: pure functions from a build context to ordered tool
//!   invocations and consumer metadata
//! - Kitchen: unpacks sources, runs the lifecycle, plates the package
//! - Package ids: SHA-256 over everything that shapes the binaries

mod error;
pub mod files;
pub mod lifecycle;
pub mod metadata;
pub mod options;
pub mod package_id;
pub mod profile;
pub mod recipe;
pub mod settings;
pub mod source;

pub use error::{Error, Result};
pub use lifecycle::{Lifecycle, LifecycleState, ProcessRunner, Step, StepRunner};
pub use metadata::{CppInfo, FindMode, PackageMetadata, METADATA_FILE};
pub use options::{OptionDecl, OptionSet};
pub use profile::Profile;
pub use recipe::{
    all_recipes, find_recipe, BuildContext, Cook, CookPlan, CookResult, Kitchen, KitchenConfig,
    Recipe, RecipeInfo,
};
pub use settings::{Arch, BuildSettings, BuildType, Compiler, CompilerKind, Os, RuntimeMode};
pub use source::{ArchiveNaming, SourceLocator, SourceSpec};
