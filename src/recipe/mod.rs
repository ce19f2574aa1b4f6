// src/recipe/mod.rs

//! Recipes for the vendored third-party libraries
//!
//! A recipe describes how one library is turned into a package:
//! - Which source archives it needs and where they are unpacked
//! - Which options it understands
//! - The ordered lifecycle steps that drive the library's own build tooling
//! - How the installed tree is tidied up and described for consumers
//!
//! Recipes never run anything themselves. They compute steps and metadata
//! from a [`BuildContext`]; the [`Kitchen`](kitchen::Kitchen) does the
//! running. Every flag list is derived from the context by a plain function
//! at the moment a step is built, so the same inputs always give the same
//! tokens in the same order.
//!
//! # Recipes
//!
//! | Recipe | Build tooling | Lifecycle |
//! |--------|---------------|-----------|
//! | `boost` | bootstrap script + b2 | bootstrap, build, install |
//! | `fmt` | CMake | generate, build, install |
//! | `qt` | configure + make, then qmake | per-module configure/qmake, build, install |

pub mod boost;
pub mod fmt;
pub mod kitchen;
pub mod qt;

pub use boost::Boost;
pub use fmt::Fmt;
pub use kitchen::{Cook, CookPlan, CookResult, Kitchen, KitchenConfig};
pub use qt::Qt;

use crate::error::{Error, Result};
use crate::lifecycle::Step;
use crate::metadata::PackageMetadata;
use crate::options::{OptionDecl, OptionSet};
use crate::package_id::PackageIdFilter;
use crate::settings::{BuildSettings, BuildType, Os};
use crate::source::SourceSpec;
use std::path::{Path, PathBuf};

/// Ordered command-line tokens for a wrapped build tool
pub type FlagList = Vec<String>;

/// Descriptive metadata of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
    pub homepage: &'static str,
    pub description: &'static str,
    pub license: &'static str,
}

/// Folder layout relative to the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub source: PathBuf,
    pub build: PathBuf,
}

impl Layout {
    /// Build inside the source tree
    pub fn in_source() -> Self {
        Self {
            source: PathBuf::from("src"),
            build: PathBuf::from("src"),
        }
    }

    /// Build in `out/<BuildType>` next to the sources
    pub fn out_of_source(build_type: BuildType) -> Self {
        Self {
            source: PathBuf::from("src"),
            build: Path::new("out").join(build_type.to_string()),
        }
    }
}

/// Absolute folders of one cook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folders {
    pub source: PathBuf,
    pub build: PathBuf,
    pub package: PathBuf,
}

impl Folders {
    pub fn new(work_dir: &Path, layout: &Layout, package: impl Into<PathBuf>) -> Self {
        Self {
            source: work_dir.join(&layout.source),
            build: work_dir.join(&layout.build),
            package: package.into(),
        }
    }

    pub fn package_lib(&self) -> PathBuf {
        self.package.join("lib")
    }

    pub fn package_bin(&self) -> PathBuf {
        self.package.join("bin")
    }

    pub fn package_licenses(&self) -> PathBuf {
        self.package.join("licenses")
    }
}

/// Everything a recipe may read while computing steps and metadata
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub settings: BuildSettings,
    /// Options after resolution
    pub options: OptionSet,
    pub folders: Folders,
    /// Parallel job budget handed to the wrapped tools
    pub jobs: u32,
    /// Operating system pantry runs on (selects script and tool names)
    pub host: Os,
}

impl BuildContext {
    /// Pick the Windows or Unix spelling of a host tool
    pub fn host_tool(&self, unix: &str, windows: &str) -> String {
        if self.host == Os::Windows {
            windows.to_string()
        } else {
            unix.to_string()
        }
    }
}

/// A build description for one library
pub trait Recipe {
    fn info(&self) -> &'static RecipeInfo;

    /// Options this recipe understands and their defaults
    fn options(&self) -> &'static [OptionDecl];

    fn layout(&self, build_type: BuildType) -> Layout;

    /// Source archives, unpacked in order
    fn sources(&self) -> Vec<SourceSpec>;

    /// The lifecycle steps, in execution order
    ///
    /// Fails with an unsupported configuration error before anything runs if
    /// the settings have no mapping for this recipe's tooling.
    fn steps(&self, ctx: &BuildContext) -> Result<Vec<Step>>;

    /// Tidy the installed tree: licenses, redundant build-system files
    fn package(&self, ctx: &BuildContext) -> Result<()>;

    /// Fill in consumer-facing metadata after a successful install
    fn package_info(&self, ctx: &BuildContext, metadata: &mut PackageMetadata) -> Result<()>;

    /// Inputs left out of the package id
    fn package_id_filter(&self) -> PackageIdFilter {
        PackageIdFilter::default()
    }
}

/// All known recipes
pub fn all_recipes() -> Vec<Box<dyn Recipe>> {
    vec![Box::new(Boost), Box::new(Fmt), Box::new(Qt)]
}

/// Recipe by name
pub fn find_recipe(name: &str) -> Result<Box<dyn Recipe>> {
    all_recipes()
        .into_iter()
        .find(|r| r.info().name == name)
        .ok_or_else(|| Error::UnknownRecipe(name.to_string()))
}
