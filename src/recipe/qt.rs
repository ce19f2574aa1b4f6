// src/recipe/qt.rs

//! Qt: qtbase through configure and make, qttools through the installed qmake
//!
//! Both modules are unpacked side by side under the source folder and built
//! inside their own trees. qttools depends on the `qmake` that the qtbase
//! install step drops into the package folder, so the order is fixed.

use super::{BuildContext, FlagList, Layout, Recipe, RecipeInfo};
use crate::error::Result;
use crate::files::{copy_matching, remove_files_by_mask};
use crate::lifecycle::Step;
use crate::metadata::{collect_libs, FindMode, PackageMetadata};
use crate::options::{OptionDecl, OptionSet, FPIC, SHARED};
use crate::package_id::PackageIdFilter;
use crate::settings::{BuildSettings, BuildType};
use crate::source::{ArchiveNaming, SourceSpec};
use std::path::Path;
use tracing::debug;

static INFO: RecipeInfo = RecipeInfo {
    name: "qt",
    version: "5.15.3",
    url: "https://github.com/JaySinco/dev-setup",
    homepage: "https://download.qt.io/official_releases/qt/",
    description: "Qt is a cross-platform framework for graphical user interfaces",
    license: "LGPL-3.0",
};

static OPTIONS: &[OptionDecl] = &[OptionDecl::new(SHARED, false), OptionDecl::new(FPIC, true)];

const QTBASE: &str = "qtbase";
const QTTOOLS: &str = "qttools";

pub struct Qt;

/// Flags for qtbase's `configure`
///
/// `-static` and `-shared` occupy the same slot; a static build against a
/// static MSVC runtime also asks for `-static-runtime`.
pub fn configure_flags(settings: &BuildSettings, options: &OptionSet, package: &Path) -> FlagList {
    let mut flags = vec![
        format!("--prefix={}", package.display()),
        "--nomake=examples".to_string(),
        "--nomake=tests".to_string(),
        "-confirm-license".to_string(),
        "-opensource".to_string(),
    ];

    if options.shared() {
        flags.push("-shared".to_string());
    } else {
        flags.push("-static".to_string());
        if settings.compiler.wants_static_runtime() {
            flags.push("-static-runtime".to_string());
        }
    }

    if settings.build_type == BuildType::Debug {
        flags.push("-debug".to_string());
    } else {
        flags.push("-release".to_string());
    }

    flags.push("--opengl=desktop".to_string());
    flags.push("--c++std=c++17".to_string());
    flags
}

/// Flags for make/jom
pub fn make_flags(jobs: u32) -> FlagList {
    vec![format!("-j{}", jobs)]
}

impl Qt {
    fn make_steps(&self, ctx: &BuildContext, module: &str) -> Vec<Step> {
        let make = ctx.host_tool("make", "jom");
        let workdir = ctx.folders.source.join(module);
        vec![
            Step::new(format!("{}:build", module), &make, &workdir).args(make_flags(ctx.jobs)),
            Step::new(format!("{}:install", module), &make, &workdir).arg("install"),
        ]
    }
}

impl Recipe for Qt {
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
        [QTBASE, QTTOOLS]
            .iter()
            .map(|module| {
                SourceSpec::new(*module, INFO.version, ArchiveNaming::Everywhere).into_subdir(*module)
            })
            .collect()
    }

    fn steps(&self, ctx: &BuildContext) -> Result<Vec<Step>> {
        let qtbase = ctx.folders.source.join(QTBASE);
        let configure = qtbase.join(ctx.host_tool("configure", "configure.bat"));
        let qmake = ctx.folders.package_bin().join(ctx.host_tool("qmake", "qmake.exe"));

        let mut steps = vec![Step::new(format!("{}:configure", QTBASE), configure, &qtbase)
            .args(configure_flags(&ctx.settings, &ctx.options, &ctx.folders.package))];
        steps.extend(self.make_steps(ctx, QTBASE));
        steps.push(Step::new(
            format!("{}:qmake", QTTOOLS),
            qmake,
            ctx.folders.source.join(QTTOOLS),
        ));
        steps.extend(self.make_steps(ctx, QTTOOLS));

        Ok(steps)
    }

    fn package(&self, ctx: &BuildContext) -> Result<()> {
        let pdbs = remove_files_by_mask(&ctx.folders.package_lib(), "*.pdb*")?
            + remove_files_by_mask(&ctx.folders.package_bin(), "*.pdb")?;
        debug!("Removed {} debug symbol files", pdbs);

        copy_matching(
            &ctx.folders.source.join(QTBASE),
            "LICENSE*",
            &ctx.folders.package_licenses(),
        )?;
        Ok(())
    }

    fn package_info(&self, ctx: &BuildContext, metadata: &mut PackageMetadata) -> Result<()> {
        metadata.find_mode = FindMode::None;
        metadata.cpp_info.libs = collect_libs(&ctx.folders.package_lib())?;
        Ok(())
    }

    fn package_id_filter(&self) -> PackageIdFilter {
        PackageIdFilter {
            exclude_options: &[],
            exclude_build_type: true,
        }
    }
}
