// src/settings.rs

//! Build settings: the target platform and compiler a recipe is cooked for
//!
//! Settings are supplied once per cook (from a profile or the command line)
//! and are read-only afterwards. Parsing accepts the conventional spellings
//! (`Linux`, `x86_64`, `Visual Studio`, `MT`, ...). A value with no known
//! mapping is reported as an unsupported configuration before anything runs.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    #[strum(serialize = "FreeBSD")]
    FreeBsd,
    Android,
    #[strum(serialize = "iOS")]
    Ios,
}

impl Os {
    /// The operating system pantry itself is running on
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "macos" => Self::Macos,
            "freebsd" => Self::FreeBsd,
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Linux,
        }
    }
}

/// Target CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum Arch {
    #[strum(serialize = "x86")]
    X86,
    #[strum(serialize = "x86_64")]
    X86_64,
    #[strum(serialize = "armv7")]
    Armv7,
    #[strum(serialize = "armv8")]
    Armv8,
    #[strum(serialize = "ppc64le")]
    Ppc64le,
    #[strum(serialize = "riscv64")]
    Riscv64,
    #[strum(serialize = "s390x")]
    S390x,
    #[strum(serialize = "wasm")]
    Wasm,
}

impl Arch {
    /// True for every architecture spelled with an `x86` prefix
    pub fn is_x86_family(&self) -> bool {
        self.as_ref().starts_with("x86")
    }

    /// Pointer width in bits
    pub fn bits(&self) -> u32 {
        match self {
            Self::X86_64 | Self::Armv8 | Self::Ppc64le | Self::Riscv64 | Self::S390x => 64,
            Self::X86 | Self::Armv7 | Self::Wasm => 32,
        }
    }
}

/// Compiler family
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CompilerKind {
    #[strum(serialize = "msvc")]
    Msvc,
    #[strum(serialize = "Visual Studio")]
    VisualStudio,
    #[strum(serialize = "gcc")]
    Gcc,
    #[strum(serialize = "clang")]
    Clang,
    #[strum(serialize = "apple-clang")]
    AppleClang,
    #[strum(serialize = "intel-cc")]
    IntelCc,
    /// Any compiler pantry has no special handling for
    #[strum(default)]
    Other(String),
}

impl CompilerKind {
    /// Canonical spelling of this compiler
    pub fn name(&self) -> &str {
        match self {
            Self::Msvc => "msvc",
            Self::VisualStudio => "Visual Studio",
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::IntelCc => "intel-cc",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// MSVC runtime library selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum RuntimeMode {
    #[strum(to_string = "MT", serialize = "static")]
    MT,
    #[strum(to_string = "MTd", serialize = "static-debug")]
    MTd,
    #[strum(to_string = "MD", serialize = "dynamic")]
    MD,
    #[strum(to_string = "MDd", serialize = "dynamic-debug")]
    MDd,
}

impl RuntimeMode {
    /// Whether the C/C++ runtime is linked statically
    pub fn is_static(&self) -> bool {
        matches!(self, Self::MT | Self::MTd)
    }
}

/// Compiler identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compiler {
    pub kind: CompilerKind,
    pub version: Option<String>,
    pub runtime: Option<RuntimeMode>,
}

impl Compiler {
    pub fn new(kind: CompilerKind) -> Self {
        Self {
            kind,
            version: None,
            runtime: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeMode) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Microsoft's compiler under either of its names
    pub fn is_msvc(&self) -> bool {
        matches!(self.kind, CompilerKind::Msvc | CompilerKind::VisualStudio)
    }

    /// MSVC with a statically linked runtime
    pub fn wants_static_runtime(&self) -> bool {
        self.is_msvc() && self.runtime.is_some_and(|r| r.is_static())
    }
}

/// Compilation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Complete set of settings for one cook
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildSettings {
    pub os: Os,
    pub arch: Arch,
    pub compiler: Compiler,
    pub build_type: BuildType,
}

impl BuildSettings {
    pub fn new(os: Os, arch: Arch, compiler: Compiler, build_type: BuildType) -> Self {
        Self {
            os,
            arch,
            compiler,
            build_type,
        }
    }

    /// Settings for the machine pantry runs on: gcc (msvc on Windows), Release
    pub fn host_default() -> Self {
        let os = Os::host();
        let arch = match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "aarch64" => Arch::Armv8,
            "arm" => Arch::Armv7,
            "powerpc64" => Arch::Ppc64le,
            "riscv64" => Arch::Riscv64,
            "s390x" => Arch::S390x,
            _ => Arch::X86_64,
        };
        let compiler = match os {
            Os::Windows => Compiler::new(CompilerKind::Msvc).with_runtime(RuntimeMode::MD),
            Os::Macos | Os::Ios => Compiler::new(CompilerKind::AppleClang),
            _ => Compiler::new(CompilerKind::Gcc),
        };
        Self::new(os, arch, compiler, BuildType::Release)
    }

    /// Settings as `key=value` pairs in a fixed order
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("os".to_string(), self.os.to_string()),
            ("arch".to_string(), self.arch.to_string()),
            ("compiler".to_string(), self.compiler.kind.to_string()),
        ];
        if let Some(version) = &self.compiler.version {
            pairs.push(("compiler.version".to_string(), version.clone()));
        }
        if let Some(runtime) = self.compiler.runtime {
            pairs.push(("compiler.runtime".to_string(), runtime.to_string()));
        }
        pairs.push(("build_type".to_string(), self.build_type.to_string()));
        pairs
    }
}

/// Parse one setting value, reporting unknown values as unsupported
pub fn parse_setting<T: FromStr>(what: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::unsupported(what, value))
}
