//! Loaded platform data: config, active catalog and exercise lookup chain.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::catalog::sample_catalog;
use crate::core::listing::{
    Criteria, ExerciseSort, ListView, ResourceSort, SubmissionSort, apply,
};
use crate::core::lookup::{CatalogSource, ExerciseDirectory, Found};
use crate::core::stats::{Dashboard, dashboard};
use crate::core::types::{Catalog, Exercise, Resource, Submission};
use crate::io::catalog_store::load_catalog;
use crate::io::config::{MootConfig, load_config};
use crate::report::{ReportSelection, report_for};

pub const BUILTIN_SOURCE: &str = "builtin";

/// Calendar day used for date windows. Both front ends count days in UTC.
pub fn calendar_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

pub struct Library {
    config: MootConfig,
    catalog: Catalog,
    catalog_path: Option<PathBuf>,
    directory: ExerciseDirectory,
}

impl Library {
    /// Load config from `config_path` (missing file means defaults) and the
    /// catalog it points at, falling back to the built-in sample data.
    pub fn open(config_path: &Path) -> Result<Self> {
        let config = load_config(config_path)
            .with_context(|| format!("load config {}", config_path.display()))?;
        let Some(catalog_path) = config.resolved_catalog_path(config_path) else {
            debug!("no catalog configured; using built-in sample data");
            return Ok(Self::builtin(config));
        };
        let catalog = load_catalog(&catalog_path)?;
        info!(path = %catalog_path.display(), "using catalog file");
        let directory = ExerciseDirectory::new()
            .with_source(CatalogSource::new(
                catalog_path.display().to_string(),
                catalog.clone(),
            ))
            .with_source(CatalogSource::new(BUILTIN_SOURCE, sample_catalog()));
        Ok(Self {
            config,
            catalog,
            catalog_path: Some(catalog_path),
            directory,
        })
    }

    /// Library over the built-in sample catalog only.
    pub fn builtin(config: MootConfig) -> Self {
        let catalog = sample_catalog();
        let directory = ExerciseDirectory::new()
            .with_source(CatalogSource::new(BUILTIN_SOURCE, catalog.clone()));
        Self {
            config,
            catalog,
            catalog_path: None,
            directory,
        }
    }

    pub fn config(&self) -> &MootConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog file in use, or `None` for the built-in data.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    pub fn exercises(
        &self,
        criteria: &Criteria<ExerciseSort>,
        today: NaiveDate,
    ) -> ListView<Exercise> {
        let view = apply(&self.catalog.exercises, criteria, today);
        debug!(shown = view.items.len(), total = view.total, "exercise view");
        view
    }

    pub fn submissions(
        &self,
        criteria: &Criteria<SubmissionSort>,
        today: NaiveDate,
    ) -> ListView<Submission> {
        let view = apply(&self.catalog.submissions, criteria, today);
        debug!(shown = view.items.len(), total = view.total, "submission view");
        view
    }

    pub fn resources(
        &self,
        criteria: &Criteria<ResourceSort>,
        today: NaiveDate,
    ) -> ListView<Resource> {
        let view = apply(&self.catalog.resources, criteria, today);
        debug!(shown = view.items.len(), total = view.total, "resource view");
        view
    }

    pub fn exercise(&self, id: u32) -> Option<Found<'_>> {
        self.directory.find(id)
    }

    pub fn exercise_name(&self, id: u32) -> String {
        self.directory.display_name(id)
    }

    pub fn lookup_sources(&self) -> Vec<&str> {
        self.directory.sources()
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        dashboard(&self.catalog, today)
    }

    pub fn report(&self, submission_id: Option<&str>) -> ReportSelection {
        report_for(&self.catalog, submission_id)
    }
}
