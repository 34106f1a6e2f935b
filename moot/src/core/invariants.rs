//! Semantic catalog invariants not expressible via JSON Schema.

use std::collections::HashSet;
use std::hash::Hash;

use crate::core::types::{Catalog, SubmissionStatus};

/// Highest exercise rating shown in the library.
pub const MAX_RATING: f64 = 5.0;
/// Highest overall or submission score.
pub const MAX_SCORE: u32 = 100;

/// Check semantic invariants not expressible in JSON Schema:
/// - No duplicate ids within a collection
/// - Ratings within `0..=5`
/// - Scores no greater than 100
/// - Analyzed submissions carry a score
/// - Rubric rows never exceed their maximum
///
/// Submissions may reference exercises that do not exist; those are named
/// by the lookup chain instead of rejected here.
pub fn validate_catalog(catalog: &Catalog) -> Vec<String> {
    let mut errors = Vec::new();

    for id in duplicates(catalog.exercises.iter().map(|e| e.id)) {
        errors.push(format!("duplicate exercise id {}", id));
    }
    for id in duplicates(catalog.submissions.iter().map(|s| s.id.clone())) {
        errors.push(format!("duplicate submission id '{}'", id));
    }
    for id in duplicates(catalog.resources.iter().map(|r| r.id)) {
        errors.push(format!("duplicate resource id {}", id));
    }
    for id in duplicates(catalog.reports.iter().map(|r| r.submission_id.clone())) {
        errors.push(format!("duplicate report for submission '{}'", id));
    }

    for exercise in &catalog.exercises {
        if !(0.0..=MAX_RATING).contains(&exercise.rating) {
            errors.push(format!(
                "exercise {}: rating {} outside 0..={}",
                exercise.id, exercise.rating, MAX_RATING
            ));
        }
        if exercise.completions > exercise.attempts {
            errors.push(format!(
                "exercise {}: completions {} exceed attempts {}",
                exercise.id, exercise.completions, exercise.attempts
            ));
        }
    }

    for submission in &catalog.submissions {
        match submission.score {
            Some(score) if score > MAX_SCORE => errors.push(format!(
                "submission '{}': score {} exceeds {}",
                submission.id, score, MAX_SCORE
            )),
            None if submission.status == SubmissionStatus::Analyzed => errors.push(format!(
                "submission '{}': analyzed submissions must have a score",
                submission.id
            )),
            _ => {}
        }
    }

    for report in &catalog.reports {
        if report.overall_score > MAX_SCORE {
            errors.push(format!(
                "report '{}': overall score {} exceeds {}",
                report.submission_id, report.overall_score, MAX_SCORE
            ));
        }
        for row in &report.rubric {
            if row.score > row.max_score {
                errors.push(format!(
                    "report '{}': rubric '{}' score {} exceeds max {}",
                    report.submission_id, row.name, row.score, row.max_score
                ));
            }
        }
    }

    errors
}

/// Ids seen more than once, in first-repeat order.
fn duplicates<T: Eq + Hash + Clone>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for id in ids {
        if !seen.insert(id.clone()) && !repeated.contains(&id) {
            repeated.push(id);
        }
    }
    repeated
}
