//! Feedback report lookup and text rendering.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{DEFAULT_REPORT_ID, default_report};
use crate::core::types::{Catalog, FeedbackReport};

const REPORT_TEMPLATE: &str = include_str!("templates/report.txt");

/// Shown for export and PDF download requests.
pub const EXPORT_NOT_IMPLEMENTED: &str = "Report export is not yet implemented.";

/// Report chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSelection {
    pub report: FeedbackReport,
    /// Id the caller asked for, if any.
    pub requested: Option<String>,
    /// True when `requested` was absent or unknown and the default was used.
    pub fallback: bool,
}

/// Exact match by submission id, else the default report.
///
/// The default is the catalog's own `SUB-001` report when present, otherwise
/// the built-in sample report.
pub fn report_for(catalog: &Catalog, submission_id: Option<&str>) -> ReportSelection {
    if let Some(report) = submission_id.and_then(|id| catalog.report(id)) {
        return ReportSelection {
            report: report.clone(),
            requested: submission_id.map(str::to_string),
            fallback: false,
        };
    }
    debug!(requested = ?submission_id, "falling back to default report");
    let report = catalog
        .report(DEFAULT_REPORT_ID)
        .cloned()
        .unwrap_or_else(default_report);
    ReportSelection {
        report,
        requested: submission_id.map(str::to_string),
        fallback: submission_id.is_some(),
    }
}

/// Text renderer for reports.
pub struct ReportRenderer {
    env: Environment<'static>,
}

impl ReportRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template("report", REPORT_TEMPLATE)
            .context("load report template")?;
        Ok(Self { env })
    }

    pub fn render(&self, selection: &ReportSelection) -> Result<String> {
        let template = self.env.get_template("report")?;
        let rendered = template
            .render(context! {
                report => &selection.report,
                requested => selection.requested.as_deref(),
                fallback => selection.fallback,
            })
            .context("render report")?;
        Ok(rendered)
    }
}
