// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for a single recipe

use crate::error::Result;
use crate::lifecycle::{Lifecycle, Step};
use crate::metadata::PackageMetadata;
use crate::options::OptionSet;
use crate::recipe::{BuildContext, Recipe};
use crate::source::{SourceLocator, SourceSpec};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{CookResult, Kitchen};

/// Everything a cook will do, computed up front
#[derive(Debug, Clone)]
pub struct CookPlan {
    pub name: &'static str,
    pub version: &'static str,
    pub package_id: String,
    /// Working directory holding sources and build trees
    pub work_dir: PathBuf,
    /// Options before resolution (defaults plus overrides)
    pub raw_options: OptionSet,
    pub sources: Vec<SourceSpec>,
    pub context: BuildContext,
    pub steps: Vec<Step>,
}

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a dyn Recipe,
    plan: CookPlan,
    locator: SourceLocator,
    steps_run: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(
        kitchen: &'a Kitchen,
        recipe: &'a dyn Recipe,
        plan: CookPlan,
        locator: SourceLocator,
    ) -> Self {
        Self {
            kitchen,
            recipe,
            plan,
            locator,
            steps_run: Vec::new(),
        }
    }

    /// Phase 1: Prep - check every archive exists, then start from fresh folders
    pub(super) fn prep(&mut self) -> Result<()> {
        for spec in &self.plan.sources {
            self.locator.locate(&spec.name, &spec.version, spec.naming)?;
        }

        let folders = &self.plan.context.folders;
        reset_dir(&self.plan.work_dir)?;
        reset_dir(&folders.package)?;
        fs::create_dir_all(&folders.source)?;
        fs::create_dir_all(&folders.build)?;

        debug!("Working directory: {}", self.plan.work_dir.display());
        Ok(())
    }

    /// Phase 2: Unpack sources into the source folder
    pub(super) fn unpack(&mut self) -> Result<()> {
        let source = &self.plan.context.folders.source;
        for spec in &self.plan.sources {
            let dest = self.locator.unpack(spec, source)?;
            debug!("Unpacked {} to {}", spec.file_name(), dest.display());
        }
        Ok(())
    }

    /// Phase 3: Simmer - run the lifecycle steps
    pub(super) fn simmer(&mut self) -> Result<()> {
        let mut lifecycle = Lifecycle::new(self.kitchen.runner());
        let outcome = lifecycle.run(&self.plan.steps);
        self.steps_run = lifecycle.completed().to_vec();

        if outcome.is_err() {
            warn!(
                "Keeping working directory for inspection: {}",
                self.plan.work_dir.display()
            );
        }
        outcome
    }

    /// Phase 4: Plate - tidy the install tree and publish metadata
    pub(super) fn plate(&mut self) -> Result<CookResult> {
        let ctx = &self.plan.context;
        self.recipe.package(ctx)?;

        let mut metadata = PackageMetadata::new(self.plan.name, self.plan.version, &self.plan.package_id);
        metadata.settings = ctx.settings.describe().into_iter().collect::<BTreeMap<_, _>>();
        metadata.options = ctx
            .options
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        self.recipe.package_info(ctx, &mut metadata)?;

        for (component, missing) in metadata.dangling_requires() {
            warn!("Component {} requires unknown component {}", component, missing);
        }

        let metadata_path = metadata.write(&ctx.folders.package)?;
        info!(
            "Cooked {}/{} into {}",
            self.plan.name,
            self.plan.version,
            ctx.folders.package.display()
        );

        Ok(CookResult {
            package_id: self.plan.package_id.clone(),
            package_folder: ctx.folders.package.clone(),
            metadata,
            metadata_path,
            steps_run: self.steps_run.clone(),
        })
    }

    /// Remove the working directory unless the kitchen keeps it
    pub(super) fn clean_up(&self) {
        if self.kitchen.config.keep_builddir {
            info!("Keeping working directory: {}", self.plan.work_dir.display());
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.plan.work_dir) {
            warn!(
                "Failed to remove working directory {}: {}",
                self.plan.work_dir.display(),
                e
            );
        }
    }
}

/// Remove `dir` if present and create it empty
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!("Clearing {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}
