// src/recipe/boost.rs

//! Boost: bootstrap script, then b2 builds and installs in one tree

use super::{BuildContext, FlagList, Layout, Recipe, RecipeInfo};
use crate::error::{Error, Result};
use crate::files::{copy_matching, rmdir};
use crate::lifecycle::Step;
use crate::metadata::{collect_libs, PackageMetadata};
use crate::options::{OptionDecl, OptionSet, FPIC, SHARED};
use crate::settings::{Arch, BuildSettings, BuildType, Compiler, CompilerKind, Os};
use crate::source::{ArchiveNaming, SourceSpec};
use tracing::debug;

static INFO: RecipeInfo = RecipeInfo {
    name: "boost",
    version: "1.79.0",
    url: "https://github.com/JaySinco/conan",
    homepage: "https://www.boost.org",
    description: "Boost provides free peer-reviewed portable C++ source libraries",
    license: "BSL-1.0",
};

static OPTIONS: &[OptionDecl] = &[OptionDecl::new(SHARED, false), OptionDecl::new(FPIC, true)];

pub struct Boost;

/// b2 toolset for a compiler, `None` to let b2 detect one
pub fn toolset(compiler: &Compiler) -> Option<&'static str> {
    match compiler.kind {
        CompilerKind::Msvc | CompilerKind::VisualStudio => Some("msvc"),
        CompilerKind::Gcc => Some("gcc"),
        CompilerKind::Clang => Some("clang"),
        _ => None,
    }
}

/// b2 `architecture=` value
pub fn b2_architecture(arch: Arch) -> Result<&'static str> {
    if arch.is_x86_family() {
        return Ok("x86");
    }
    match arch {
        Arch::Armv7 | Arch::Armv8 => Ok("arm"),
        Arch::Ppc64le => Ok("power"),
        Arch::Riscv64 => Ok("riscv"),
        Arch::S390x => Ok("s390x"),
        other => Err(Error::unsupported("b2 architecture", other.to_string())),
    }
}

/// b2 `address-model=` value
pub fn address_model(arch: Arch) -> &'static str {
    if arch.bits() == 64 {
        "64"
    } else {
        "32"
    }
}

/// Flags for the bootstrap script
pub fn bootstrap_flags(settings: &BuildSettings) -> FlagList {
    let mut flags = vec!["--without-libraries=python".to_string()];
    if let Some(toolset) = toolset(&settings.compiler) {
        flags.push(format!("--with-toolset={}", toolset));
    }
    flags
}

/// Flags shared by the b2 build and install invocations
pub fn build_flags(settings: &BuildSettings, options: &OptionSet, jobs: u32) -> Result<FlagList> {
    let mut flags = Vec::new();

    if settings.build_type == BuildType::Debug {
        flags.push("variant=debug".to_string());
    } else {
        flags.push("variant=release".to_string());
    }

    if settings.compiler.is_msvc() {
        let runtime = if settings.compiler.wants_static_runtime() {
            "static"
        } else {
            "shared"
        };
        flags.push(format!("runtime-link={}", runtime));
    }

    let link = if options.shared() { "shared" } else { "static" };
    flags.push(format!("link={}", link));
    flags.push(format!("architecture={}", b2_architecture(settings.arch)?));
    flags.push(format!("address-model={}", address_model(settings.arch)));
    flags.push("threading=multi".to_string());

    if options.fpic() == Some(true) {
        flags.push("cxxflags=-fPIC".to_string());
    }

    flags.push(format!("-j{}", jobs));
    flags.push("--abbreviate-paths".to_string());
    flags.push("--layout=system".to_string());
    flags.push("-q".to_string());

    Ok(flags)
}

impl Boost {
    fn b2(&self, ctx: &BuildContext) -> std::path::PathBuf {
        ctx.folders.source.join(ctx.host_tool("b2", "b2.exe"))
    }
}

impl Recipe for Boost {
    fn info(&self) -> &'static RecipeInfo {
        &INFO
    }

    fn options(&self) -> &'static [OptionDecl] {
        OPTIONS
    }

    fn layout(&self, _build_type: BuildType) -> Layout {
        Layout::in_source()
    }

    fn sources(&self) -> Vec<SourceSpec> {
        vec![SourceSpec::new(INFO.name, INFO.version, ArchiveNaming::Simple)]
    }

    fn steps(&self, ctx: &BuildContext) -> Result<Vec<Step>> {
        let bootstrap = ctx
            .folders
            .source
            .join(ctx.host_tool("bootstrap.sh", "bootstrap.bat"));
        let workdir = &ctx.folders.build;

        let bootstrap = Step::new("bootstrap", bootstrap, workdir)
            .args(bootstrap_flags(&ctx.settings));

        let build = Step::new("build", self.b2(ctx), workdir)
            .args(build_flags(&ctx.settings, &ctx.options, ctx.jobs)?);

        let install = Step::new("install", self.b2(ctx), workdir)
            .args(build_flags(&ctx.settings, &ctx.options, ctx.jobs)?)
            .arg("install")
            .arg(format!("--prefix={}", ctx.folders.package.display()));

        Ok(vec![bootstrap, build, install])
    }

    fn package(&self, ctx: &BuildContext) -> Result<()> {
        copy_matching(&ctx.folders.source, "LICENSE_1_0.txt", &ctx.folders.package_licenses())?;
        rmdir(&ctx.folders.package_lib().join("cmake"))?;
        Ok(())
    }

    fn package_info(&self, ctx: &BuildContext, metadata: &mut PackageMetadata) -> Result<()> {
        metadata.file_name = Some("Boost".to_string());
        metadata.disables_autolinking = true;

        let autolink = metadata.component("disable_autolinking");
        autolink.target_name = Some("Boost::disable_autolinking".to_string());
        autolink.defines.push("BOOST_ALL_NO_LIB".to_string());

        let headers = metadata.component("headers");
        headers.target_name = Some("Boost::headers".to_string());
        headers.requires.push("disable_autolinking".to_string());

        let libs = collect_libs(&ctx.folders.package_lib())?;
        debug!("Boost libraries: {}", libs.join(", "));

        let all = metadata.component("all");
        all.libs = libs;
        all.requires.push("disable_autolinking".to_string());
        if ctx.settings.compiler.is_msvc() {
            all.system_libs.push("bcrypt".to_string());
        } else if ctx.settings.os == Os::Linux {
            all.system_libs.push("rt".to_string());
            all.system_libs.push("pthread".to_string());
        }

        Ok(())
    }
}
