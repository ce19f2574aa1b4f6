// src/profile.rs

//! Build profiles: settings and option overrides for one cook
//!
//! A profile starts from the host defaults and is refined by a TOML file
//! and then by individual `key=value` settings from the command line:
//!
//! ```toml
//! [settings]
//! os = "Windows"
//! arch = "x86_64"
//! build_type = "Release"
//!
//! [settings.compiler]
//! name = "msvc"
//! version = "193"
//! runtime = "MT"
//!
//! [options]
//! shared = false
//! ```

use crate::error::{Error, Result};
use crate::settings::{parse_setting, BuildSettings, Compiler, CompilerKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    settings: SettingsSection,
    #[serde(default)]
    options: BTreeMap<String, bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    os: Option<String>,
    arch: Option<String>,
    build_type: Option<String>,
    compiler: Option<CompilerSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompilerSection {
    name: Option<String>,
    version: Option<String>,
    runtime: Option<String>,
}

/// Settings plus option overrides for a cook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub settings: BuildSettings,
    /// Overrides merged onto the recipe's option defaults
    pub options: BTreeMap<String, bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(BuildSettings::host_default())
    }
}

impl Profile {
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            settings,
            options: BTreeMap::new(),
        }
    }

    /// Parse a TOML profile on top of the host defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ProfileFile =
            toml::from_str(content).map_err(|e| Error::Config(format!("profile: {}", e)))?;

        let mut profile = Self::default();
        let settings = file.settings;

        if let Some(os) = settings.os {
            profile.apply_setting("os", &os)?;
        }
        if let Some(arch) = settings.arch {
            profile.apply_setting("arch", &arch)?;
        }
        if let Some(build_type) = settings.build_type {
            profile.apply_setting("build_type", &build_type)?;
        }
        if let Some(compiler) = settings.compiler {
            if let Some(name) = compiler.name {
                profile.apply_setting("compiler", &name)?;
            }
            if let Some(version) = compiler.version {
                profile.apply_setting("compiler.version", &version)?;
            }
            if let Some(runtime) = compiler.runtime {
                profile.apply_setting("compiler.runtime", &runtime)?;
            }
        }

        profile.options = file.options;
        Ok(profile)
    }

    /// Load a TOML profile file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading profile from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Set one setting by key
    ///
    /// Setting `compiler` starts a new compiler identity, clearing any
    /// version and runtime picked up earlier.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let settings = &mut self.settings;
        match key {
            "os" => settings.os = parse_setting("os", value)?,
            "arch" => settings.arch = parse_setting("arch", value)?,
            "build_type" => settings.build_type = parse_setting("build_type", value)?,
            "compiler" => {
                let kind: CompilerKind = parse_setting("compiler", value)?;
                settings.compiler = Compiler::new(kind);
            }
            "compiler.version" => settings.compiler.version = Some(value.trim().to_string()),
            "compiler.runtime" => {
                settings.compiler.runtime = Some(parse_setting("compiler.runtime", value)?)
            }
            other => return Err(Error::Config(format!("unknown setting '{}'", other))),
        }
        Ok(())
    }

    /// Apply a `key=value` setting as given on the command line
    pub fn apply_setting_spec(&mut self, spec: &str) -> Result<()> {
        let (key, value) = spec
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("setting must be key=value: {}", spec)))?;
        self.apply_setting(key.trim(), value)
    }

    pub fn set_option(&mut self, name: impl Into<String>, value: bool) {
        self.options.insert(name.into(), value);
    }
}
