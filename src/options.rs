// src/options.rs

//! Recipe options and the option resolver
//!
//! Every recipe declares the boolean options it understands together with
//! their defaults. User overrides are merged onto those defaults, then
//! [`resolve`] drops the options that carry no meaning for the requested
//! settings. The resolver never mutates its input.

use crate::error::{Error, Result};
use crate::settings::{BuildSettings, Os};
use std::collections::BTreeMap;
use std::fmt;

/// Build a shared library instead of a static one
pub const SHARED: &str = "shared";
/// Compile position-independent code
pub const FPIC: &str = "fPIC";

/// An option a recipe understands, with its default value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub default: bool,
}

impl OptionDecl {
    pub const fn new(name: &'static str, default: bool) -> Self {
        Self { name, default }
    }
}

/// A set of named boolean options
///
/// Used both for the raw options (defaults plus overrides) and for the
/// resolved set handed to the flag compilers. Iteration order is sorted by
/// name so anything derived from it stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: BTreeMap<String, bool>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `overrides` onto the declared defaults
    ///
    /// Fails if an override names an option the recipe does not declare.
    pub fn with_defaults(
        recipe: &str,
        decls: &[OptionDecl],
        overrides: &BTreeMap<String, bool>,
    ) -> Result<Self> {
        let mut values: BTreeMap<String, bool> = decls
            .iter()
            .map(|d| (d.name.to_string(), d.default))
            .collect();

        for (name, value) in overrides {
            match values.get_mut(name) {
                Some(slot) => *slot = *value,
                None => {
                    return Err(Error::InvalidOption {
                        recipe: recipe.to_string(),
                        option: name.clone(),
                    })
                }
            }
        }

        Ok(Self { values })
    }

    /// Builder-style insert, mostly for tests
    pub fn with(mut self, name: &str, value: bool) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Value of an option, `None` if it is not part of the set
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Value of an option, treating an absent option as false
    pub fn enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn shared(&self) -> bool {
        self.enabled(SHARED)
    }

    /// Position-independent code setting, if meaningful for this build
    pub fn fpic(&self) -> Option<bool> {
        self.get(FPIC)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// A copy without the named option
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(name);
        Self { values }
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Resolve raw options against the target settings
///
/// `fPIC` is undefined on Windows and implied by shared builds, so it is
/// removed in both cases. Everything else passes through.
pub fn resolve(raw: &OptionSet, settings: &BuildSettings) -> OptionSet {
    if settings.os == Os::Windows || raw.shared() {
        raw.without(FPIC)
    } else {
        raw.clone()
    }
}

/// Parse a `name=value` override as given on the command line
pub fn parse_override(spec: &str) -> Result<(String, bool)> {
    let (name, value) = spec
        .split_once('=')
        .ok_or_else(|| Error::Config(format!("option override must be name=value: {}", spec)))?;

    let value = match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        other => {
            return Err(Error::Config(format!(
                "option '{}' expects a boolean, got '{}'",
                name.trim(),
                other
            )))
        }
    };

    Ok((name.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Arch, BuildType, Compiler, CompilerKind};

    const DECLS: &[OptionDecl] = &[OptionDecl::new(SHARED, false), OptionDecl::new(FPIC, true)];

    fn settings(os: Os) -> BuildSettings {
        BuildSettings::new(
            os,
            Arch::X86_64,
            Compiler::new(CompilerKind::Gcc),
            BuildType::Release,
        )
    }

    #[test]
    fn test_defaults_and_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert(SHARED.to_string(), true);

        let options = OptionSet::with_defaults("fmt", DECLS, &overrides).unwrap();
        assert!(options.shared());
        assert_eq!(options.fpic(), Some(true));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("with_ssl".to_string(), true);

        let err = OptionSet::with_defaults("boost", DECLS, &overrides).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { ref option, .. } if option == "with_ssl"));
    }

    #[test]
    fn test_windows_drops_fpic() {
        for shared in [false, true] {
            for fpic in [false, true] {
                let raw = OptionSet::new().with(SHARED, shared).with(FPIC, fpic);
                let resolved = resolve(&raw, &settings(Os::Windows));
                assert!(!resolved.contains(FPIC));
            }
        }
    }

    #[test]
    fn test_shared_drops_fpic() {
        let raw = OptionSet::new().with(SHARED, true).with(FPIC, true);
        let resolved = resolve(&raw, &settings(Os::Linux));
        assert!(!resolved.contains(FPIC));
        assert!(resolved.shared());
    }

    #[test]
    fn test_static_linux_keeps_everything() {
        let raw = OptionSet::new()
            .with(SHARED, false)
            .with(FPIC, false)
            .with("with_fmt_alias", true);
        let resolved = resolve(&raw, &settings(Os::Linux));
        assert_eq!(resolved, raw);
        // input untouched
        assert!(raw.contains(FPIC));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("shared=True").unwrap(), ("shared".to_string(), true));
        assert_eq!(parse_override(" fPIC = off").unwrap(), ("fPIC".to_string(), false));
        assert!(parse_override("shared").is_err());
        assert!(parse_override("shared=maybe").is_err());
    }
}
