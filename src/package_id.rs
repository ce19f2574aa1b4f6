// src/package_id.rs

//! Package identity: a content hash of everything that shapes the binaries
//!
//! Two cooks with the same recipe, settings and resolved options produce the
//! same package id and therefore share a package folder. Recipes may exclude
//! inputs that do not change the produced binaries (a consumer-side define,
//! or the build type for a toolkit that installs both variants).

use crate::options::OptionSet;
use crate::settings::BuildSettings;
use sha2::{Digest, Sha256};

/// Inputs a recipe leaves out of its package id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageIdFilter {
    pub exclude_options: &'static [&'static str],
    pub exclude_build_type: bool,
}

/// Canonical text the package id is computed from
pub fn package_id_text(
    name: &str,
    version: &str,
    settings: &BuildSettings,
    options: &OptionSet,
    filter: &PackageIdFilter,
) -> String {
    let mut text = format!("[requires]\n{}/{}\n[settings]\n", name, version);

    let mut pairs = settings.describe();
    if filter.exclude_build_type {
        pairs.retain(|(k, _)| k != "build_type");
    }
    pairs.sort();
    for (key, value) in pairs {
        text.push_str(&format!("{}={}\n", key, value));
    }

    text.push_str("[options]\n");
    for (key, value) in options.iter() {
        if filter.exclude_options.iter().any(|o| *o == key) {
            continue;
        }
        text.push_str(&format!("{}={}\n", key, value));
    }

    text
}

/// SHA-256 package id as lowercase hex
pub fn compute_package_id(
    name: &str,
    version: &str,
    settings: &BuildSettings,
    options: &OptionSet,
    filter: &PackageIdFilter,
) -> String {
    let text = package_id_text(name, version, settings, options, filter);
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
