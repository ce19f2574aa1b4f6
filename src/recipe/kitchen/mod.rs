// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked
//!
//! The Kitchen turns a recipe plus a profile into an installed package:
//! - Resolve options and compute the package id
//! - Check that every source archive is present, then unpack them
//! - Run the recipe's lifecycle steps through a [`StepRunner`]
//! - Tidy the install tree and publish the package metadata
//!
//! Planning is separate from cooking. [`Kitchen::plan`] computes every step
//! without touching the filesystem, so an unsupported configuration is
//! reported before any tool runs and the plan can be shown as a dry run.

mod config;
mod cook;

pub use config::{CookResult, KitchenConfig};
pub use cook::{Cook, CookPlan};

use super::{BuildContext, Folders, Recipe};
use crate::error::Result;
use crate::lifecycle::{ProcessRunner, StepRunner};
use crate::options::{resolve, OptionSet};
use crate::package_id::compute_package_id;
use crate::profile::Profile;
use crate::source::SourceLocator;
use tracing::{debug, info};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    runner: Box<dyn StepRunner>,
}

impl Kitchen {
    /// Create a Kitchen that runs steps as child processes
    pub fn new(config: KitchenConfig) -> Self {
        Self::with_runner(config, Box::new(ProcessRunner::new()))
    }

    /// Create a Kitchen with a custom step runner
    pub fn with_runner(config: KitchenConfig, runner: Box<dyn StepRunner>) -> Self {
        Self { config, runner }
    }

    pub(crate) fn runner(&self) -> &dyn StepRunner {
        self.runner.as_ref()
    }

    /// Compute everything a cook would do, without doing it
    pub fn plan(&self, recipe: &dyn Recipe, profile: &Profile) -> Result<CookPlan> {
        let info = recipe.info();
        let settings = profile.settings.clone();

        let raw = OptionSet::with_defaults(info.name, recipe.options(), &profile.options)?;
        let options = resolve(&raw, &settings);
        debug!("Resolved options for {}: {}", info.name, options);

        let package_id = compute_package_id(
            info.name,
            info.version,
            &settings,
            &options,
            &recipe.package_id_filter(),
        );

        let work_dir = self.config.work_dir(info.name, info.version, &package_id);
        let package = self
            .config
            .package_folder(info.name, info.version, &package_id);
        let layout = recipe.layout(settings.build_type);

        let context = BuildContext {
            folders: Folders::new(&work_dir, &layout, package),
            settings,
            options,
            jobs: self.config.jobs,
            host: self.config.host,
        };
        let steps = recipe.steps(&context)?;

        Ok(CookPlan {
            name: info.name,
            version: info.version,
            package_id,
            work_dir,
            raw_options: raw,
            sources: recipe.sources(),
            context,
            steps,
        })
    }

    /// Cook a recipe: prep, unpack, simmer, plate
    pub fn cook(&self, recipe: &dyn Recipe, profile: &Profile) -> Result<CookResult> {
        let info = recipe.info();
        info!("Cooking {} version {}", info.name, info.version);

        let plan = self.plan(recipe, profile)?;
        let locator = SourceLocator::new(self.config.require_source_repo()?);
        info!("Package id: {}", plan.package_id);

        let mut cook = Cook::new(self, recipe, plan, locator);

        // Phase 1: Prep - find ingredients, fresh folders
        info!("Prep: checking ingredients...");
        cook.prep()?;

        // Phase 2: Unpack sources
        info!("Unpacking sources...");
        cook.unpack()?;

        // Phase 3: Simmer - run the lifecycle
        info!("Simmering: running build...");
        cook.simmer()?;

        // Phase 4: Plate - tidy the install tree and publish metadata
        info!("Plating: publishing package metadata...");
        let result = cook.plate()?;

        cook.clean_up();
        Ok(result)
    }
}
