// src/metadata.rs

//! Package metadata published after a successful install
//!
//! The metadata tells downstream build-system integration how to consume a
//! package: which libraries to link, which system libraries and defines come
//! along, and how logical components depend on each other. It is written
//! once, as `pantryinfo.json`, into the package folder.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// File name of the published metadata inside a package folder
pub const METADATA_FILE: &str = "pantryinfo.json";

/// File extensions counted as libraries when scanning `lib`
const LIB_EXTENSIONS: &[&str] = &["so", "lib", "a", "dylib", "bc"];

/// How consumers should locate the package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindMode {
    /// Consumers use the generated description
    #[default]
    Config,
    /// Consumers rely on the library's own installed config files
    None,
}

/// Link information for the package root or one component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInfo {
    /// Consumer-facing target, e.g. `fmt::fmt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default)]
    pub libs: Vec<String>,
    #[serde(default)]
    pub system_libs: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    /// Names of other components of the same package this one needs
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Everything downstream tooling needs to consume a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub package_id: String,
    /// Base name of the generated build-system description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg_config_name: Option<String>,
    #[serde(default)]
    pub find_mode: FindMode,
    /// Settings the package was built with, for reference
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub options: BTreeMap<String, bool>,
    /// Link information that applies to the whole package
    #[serde(default)]
    pub cpp_info: CppInfo,
    #[serde(default)]
    pub components: BTreeMap<String, CppInfo>,
    /// Whether the package turns off compiler-driven automatic linking
    #[serde(default)]
    pub disables_autolinking: bool,
}

impl PackageMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            package_id: package_id.into(),
            file_name: None,
            pkg_config_name: None,
            find_mode: FindMode::Config,
            settings: BTreeMap::new(),
            options: BTreeMap::new(),
            cpp_info: CppInfo::default(),
            components: BTreeMap::new(),
            disables_autolinking: false,
        }
    }

    /// Component by name, created empty on first use
    pub fn component(&mut self, name: &str) -> &mut CppInfo {
        self.components.entry(name.to_string()).or_default()
    }

    /// Component requirements that name a component which does not exist
    pub fn dangling_requires(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for (name, component) in &self.components {
            for req in &component.requires {
                if !self.components.contains_key(req) {
                    dangling.push((name.clone(), req.clone()));
                }
            }
        }
        dangling
    }

    /// Write the metadata into `package_folder`
    pub fn write(&self, package_folder: &Path) -> Result<std::path::PathBuf> {
        let path = package_folder.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!("Published package metadata: {}", path.display());
        Ok(path)
    }

    /// Read metadata back from a package folder
    pub fn read(package_folder: &Path) -> Result<Self> {
        let content = fs::read_to_string(package_folder.join(METADATA_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Library names produced in `folder`, sorted
///
/// Files with a library extension are counted; the `lib` prefix is stripped
/// except for `.lib` import libraries. Versioned names like `libfoo.so.1`
/// are skipped in favour of their unversioned link. A missing folder yields
/// an empty list.
pub fn collect_libs(folder: &Path) -> Result<Vec<String>> {
    if !folder.is_dir() {
        warn!("Library folder does not exist: {}", folder.display());
        return Ok(Vec::new());
    }

    let mut libs = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            continue;
        };
        if !LIB_EXTENSIONS.contains(&ext) {
            continue;
        }
        let name = match stem.strip_prefix("lib") {
            Some(rest) if ext != "lib" => rest,
            _ => stem,
        };
        if !libs.iter().any(|l| l == name) {
            libs.push(name.to_string());
        }
    }

    libs.sort();
    debug!("Collected {} libraries from {}", libs.len(), folder.display());
    Ok(libs)
}
