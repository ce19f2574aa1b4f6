// src/recipe/fmt.rs

//! fmt: CMake generate, build and install

use super::{BuildContext, FlagList, Layout, Recipe, RecipeInfo};
use crate::error::{Error, Result};
use crate::files::{copy_matching, rmdir};
use crate::lifecycle::Step;
use crate::metadata::{collect_libs, PackageMetadata};
use crate::options::{OptionDecl, OptionSet, FPIC, SHARED};
use crate::package_id::PackageIdFilter;
use crate::settings::{Arch, BuildSettings, BuildType, CompilerKind, Os, RuntimeMode};
use crate::source::{ArchiveNaming, SourceSpec};
use std::path::Path;

static INFO: RecipeInfo = RecipeInfo {
    name: "fmt",
    version: "8.1.1",
    url: "https://github.com/JaySinco/conan",
    homepage: "https://github.com/fmtlib/fmt",
    description: "A safe and fast alternative to printf and IOStreams",
    license: "MIT",
};

/// Adds the `FMT_STRING_ALIAS=1` define for consumers
pub const WITH_FMT_ALIAS: &str = "with_fmt_alias";

static OPTIONS: &[OptionDecl] = &[
    OptionDecl::new(SHARED, false),
    OptionDecl::new(FPIC, true),
    OptionDecl::new(WITH_FMT_ALIAS, false),
];

/// Cache variables fmt's own CMake project understands
const FMT_VARIABLES: &[(&str, &str)] = &[
    ("FMT_DOC", "OFF"),
    ("FMT_TEST", "OFF"),
    ("FMT_INSTALL", "ON"),
    ("FMT_LIB_DIR", "lib"),
];

pub struct Fmt;

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Visual Studio generator platform for `-A`
pub fn msvc_platform(arch: Arch) -> Result<&'static str> {
    match arch {
        Arch::X86 => Ok("Win32"),
        Arch::X86_64 => Ok("x64"),
        Arch::Armv7 => Ok("ARM"),
        Arch::Armv8 => Ok("ARM64"),
        other => Err(Error::unsupported("msvc platform", other.to_string())),
    }
}

/// Value for `CMAKE_MSVC_RUNTIME_LIBRARY`
pub fn msvc_runtime_library(runtime: RuntimeMode) -> &'static str {
    match runtime {
        RuntimeMode::MT => "MultiThreaded",
        RuntimeMode::MTd => "MultiThreadedDebug",
        RuntimeMode::MD => "MultiThreadedDLL",
        RuntimeMode::MDd => "MultiThreadedDebugDLL",
    }
}

/// Flags for `cmake` configuring the build tree
pub fn generate_flags(
    settings: &BuildSettings,
    options: &OptionSet,
    source: &Path,
    build: &Path,
    package: &Path,
) -> Result<FlagList> {
    let mut flags = vec![
        "-S".to_string(),
        source.display().to_string(),
        "-B".to_string(),
        build.display().to_string(),
    ];

    flags.push(format!("-DCMAKE_BUILD_TYPE={}", settings.build_type));
    flags.push(format!("-DCMAKE_INSTALL_PREFIX={}", package.display()));
    flags.push(format!("-DBUILD_SHARED_LIBS={}", on_off(options.shared())));

    if let Some(fpic) = options.fpic() {
        flags.push(format!("-DCMAKE_POSITION_INDEPENDENT_CODE={}", on_off(fpic)));
    }

    if settings.compiler.is_msvc() {
        if let Some(runtime) = settings.compiler.runtime {
            flags.push(format!(
                "-DCMAKE_MSVC_RUNTIME_LIBRARY={}",
                msvc_runtime_library(runtime)
            ));
        }
        flags.push("-A".to_string());
        flags.push(msvc_platform(settings.arch)?.to_string());
    }

    let gnu_like = matches!(settings.compiler.kind, CompilerKind::Gcc | CompilerKind::Clang);
    if gnu_like && settings.arch.is_x86_family() {
        let width = if settings.arch.bits() == 64 { "-m64" } else { "-m32" };
        flags.push(format!("-DCMAKE_C_FLAGS={}", width));
        flags.push(format!("-DCMAKE_CXX_FLAGS={}", width));
    }

    for (name, value) in FMT_VARIABLES {
        flags.push(format!("-D{}={}", name, value));
    }

    Ok(flags)
}

/// Flags for `cmake --build`
pub fn build_flags(settings: &BuildSettings, build: &Path, jobs: u32) -> FlagList {
    vec![
        "--build".to_string(),
        build.display().to_string(),
        "--config".to_string(),
        settings.build_type.to_string(),
        "--parallel".to_string(),
        jobs.to_string(),
    ]
}

/// Flags for `cmake --install`
pub fn install_flags(settings: &BuildSettings, build: &Path, package: &Path) -> FlagList {
    vec![
        "--install".to_string(),
        build.display().to_string(),
        "--config".to_string(),
        settings.build_type.to_string(),
        "--prefix".to_string(),
        package.display().to_string(),
    ]
}

impl Recipe for Fmt {
    fn info(&self) -> &'static RecipeInfo {
        &INFO
    }

    fn options(&self) -> &'static [OptionDecl] {
        OPTIONS
    }

    fn layout(&self, build_type: BuildType) -> Layout {
        Layout::out_of_source(build_type)
    }

    fn sources(&self) -> Vec<SourceSpec> {
        vec![SourceSpec::new(INFO.name, INFO.version, ArchiveNaming::Simple)]
    }

    fn steps(&self, ctx: &BuildContext) -> Result<Vec<Step>> {
        let folders = &ctx.folders;
        let cmake = ctx.host_tool("cmake", "cmake.exe");

        let generate = Step::new("generate", &cmake, &folders.build).args(generate_flags(
            &ctx.settings,
            &ctx.options,
            &folders.source,
            &folders.build,
            &folders.package,
        )?);
        let build = Step::new("build", &cmake, &folders.build)
            .args(build_flags(&ctx.settings, &folders.build, ctx.jobs));
        let install = Step::new("install", &cmake, &folders.build)
            .args(install_flags(&ctx.settings, &folders.build, &folders.package));

        Ok(vec![generate, build, install])
    }

    fn package(&self, ctx: &BuildContext) -> Result<()> {
        copy_matching(&ctx.folders.source, "LICENSE.rst", &ctx.folders.package_licenses())?;
        let lib = ctx.folders.package_lib();
        rmdir(&lib.join("pkgconfig"))?;
        rmdir(&lib.join("cmake"))?;
        Ok(())
    }

    fn package_info(&self, ctx: &BuildContext, metadata: &mut PackageMetadata) -> Result<()> {
        metadata.file_name = Some("fmt".to_string());
        metadata.pkg_config_name = Some("fmt".to_string());

        let info = &mut metadata.cpp_info;
        info.target_name = Some("fmt::fmt".to_string());
        info.libs = collect_libs(&ctx.folders.package_lib())?;

        if matches!(ctx.settings.os, Os::Linux | Os::FreeBsd) {
            info.system_libs.push("m".to_string());
        }
        if ctx.options.enabled(WITH_FMT_ALIAS) {
            info.defines.push("FMT_STRING_ALIAS=1".to_string());
        }
        if ctx.options.shared() {
            info.defines.push("FMT_SHARED".to_string());
        }

        Ok(())
    }

    fn package_id_filter(&self) -> PackageIdFilter {
        PackageIdFilter {
            exclude_options: &[WITH_FMT_ALIAS],
            exclude_build_type: false,
        }
    }
}
