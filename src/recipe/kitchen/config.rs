// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::error::{Error, Result};
use crate::metadata::PackageMetadata;
use crate::settings::Os;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Directory holding the vendored source archives
    pub source_repo: Option<PathBuf>,
    /// Parent of the per-cook working directories
    pub build_root: PathBuf,
    /// Parent of the package folders
    pub package_root: PathBuf,
    /// Number of parallel jobs handed to the build tools
    pub jobs: u32,
    /// Keep the working directory after a successful cook (for debugging)
    pub keep_builddir: bool,
    /// Operating system the build tools run on
    pub host: Os,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let cache = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        let data = dirs::data_local_dir().unwrap_or_else(|| cache.clone());

        Self {
            source_repo: None,
            build_root: cache.join("pantry").join("build"),
            package_root: data.join("pantry").join("packages"),
            jobs,
            keep_builddir: false,
            host: Os::host(),
        }
    }
}

/// On-disk form of [`KitchenConfig`]; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KitchenConfigFile {
    source_repo: Option<PathBuf>,
    build_root: Option<PathBuf>,
    package_root: Option<PathBuf>,
    jobs: Option<u32>,
    keep_builddir: Option<bool>,
}

impl KitchenConfig {
    /// Default location of the config file (`<config dir>/pantry/kitchen.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pantry").join("kitchen.toml"))
    }

    /// Parse a TOML config, filling unset keys from the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: KitchenConfigFile =
            toml::from_str(content).map_err(|e| Error::Config(format!("kitchen config: {}", e)))?;

        let mut config = Self::default();
        if let Some(repo) = file.source_repo {
            config.source_repo = Some(repo);
        }
        if let Some(root) = file.build_root {
            config.build_root = root;
        }
        if let Some(root) = file.package_root {
            config.package_root = root;
        }
        if let Some(jobs) = file.jobs {
            if jobs == 0 {
                return Err(Error::Config("kitchen config: jobs must be at least 1".to_string()));
            }
            config.jobs = jobs;
        }
        if let Some(keep) = file.keep_builddir {
            config.keep_builddir = keep;
        }
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading kitchen config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The configured source repository, or a configuration error
    pub fn require_source_repo(&self) -> Result<&Path> {
        self.source_repo.as_deref().ok_or_else(|| {
            Error::Config("no source repository configured (set --source-repo or PANTRY_SOURCE_REPO)".to_string())
        })
    }

    /// Package folder for one binary configuration
    pub fn package_folder(&self, name: &str, version: &str, package_id: &str) -> PathBuf {
        self.package_root.join(name).join(version).join(package_id)
    }

    /// Working directory for one binary configuration
    pub fn work_dir(&self, name: &str, version: &str, package_id: &str) -> PathBuf {
        let short: String = package_id.chars().take(16).collect();
        self.build_root.join(name).join(version).join(short)
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    pub package_id: String,
    /// Folder the package was installed into
    pub package_folder: PathBuf,
    /// Published consumer metadata
    pub metadata: PackageMetadata,
    /// Path of the metadata file inside the package folder
    pub metadata_path: PathBuf,
    /// Names of the lifecycle steps that ran, in order
    pub steps_run: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_config_default() {
        let config = KitchenConfig::default();
        assert!(config.jobs > 0);
        assert!(!config.keep_builddir);
        assert!(config.source_repo.is_none());
        assert!(config.build_root.ends_with("pantry/build"));
    }

    #[test]
    fn test_from_toml() {
        let config = KitchenConfig::from_toml(
            r#"
            source_repo = "/srv/sources"
            package_root = "/opt/pantry"
            jobs = 2
            keep_builddir = true
            "#,
        )
        .unwrap();

        assert_eq!(config.source_repo, Some(PathBuf::from("/srv/sources")));
        assert_eq!(config.package_root, PathBuf::from("/opt/pantry"));
        assert_eq!(config.jobs, 2);
        assert!(config.keep_builddir);
        assert_eq!(config.build_root, KitchenConfig::default().build_root);
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            KitchenConfig::from_toml("jobs = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            KitchenConfig::from_toml("sandbox = true"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_require_source_repo() {
        let config = KitchenConfig::default();
        assert!(matches!(config.require_source_repo(), Err(Error::Config(_))));

        let config = KitchenConfig {
            source_repo: Some(PathBuf::from("/srv/sources")),
            ..Default::default()
        };
        assert_eq!(config.require_source_repo().unwrap(), Path::new("/srv/sources"));
    }

    #[test]
    fn test_folder_naming() {
        let config = KitchenConfig {
            build_root: PathBuf::from("/b"),
            package_root: PathBuf::from("/p"),
            ..Default::default()
        };
        let id = "0123456789abcdef0123456789abcdef";
        assert_eq!(
            config.package_folder("fmt", "8.1.1", id),
            PathBuf::from("/p/fmt/8.1.1").join(id)
        );
        assert_eq!(
            config.work_dir("fmt", "8.1.1", id),
            PathBuf::from("/b/fmt/8.1.1/0123456789abcdef")
        );
    }
}
