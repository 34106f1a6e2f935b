//! Dashboard summary derived from the catalog.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::listing::{Criteria, DateRange, SubmissionSort, apply};
use crate::core::types::{Catalog, Submission, SubmissionStatus};

/// Number of submissions listed under "recent activity".
pub const RECENT_ACTIVITY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub exercises_available: usize,
    pub total_submissions: usize,
    pub analyzed_submissions: usize,
    /// Mean score of analyzed submissions, rounded to one decimal.
    pub average_score: Option<f64>,
    pub submissions_last_30_days: usize,
    pub recent: Vec<Submission>,
}

pub fn dashboard(catalog: &Catalog, today: NaiveDate) -> Dashboard {
    let scores: Vec<u32> = catalog
        .submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Analyzed)
        .filter_map(|s| s.score)
        .collect();
    let average_score = if scores.is_empty() {
        None
    } else {
        let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let last_30 = Criteria::default().with_date_range(DateRange::Last30Days);
    let submissions_last_30_days = apply(&catalog.submissions, &last_30, today).items.len();

    let by_recency = Criteria::default().with_sort(Some(SubmissionSort::Recent));
    let mut recent = apply(&catalog.submissions, &by_recency, today).items;
    recent.truncate(RECENT_ACTIVITY_LEN);

    Dashboard {
        exercises_available: catalog.exercises.len(),
        total_submissions: catalog.submissions.len(),
        analyzed_submissions: catalog
            .submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Analyzed)
            .count(),
        average_score,
        submissions_last_30_days,
        recent,
    }
}
