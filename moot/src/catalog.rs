//! Built-in sample catalog.
//!
//! Used whenever no catalog file is configured, and as the last entry of the
//! exercise lookup chain.

use chrono::NaiveDate;

use crate::core::types::{
    Catalog, Difficulty, Exercise, FeedbackReport, Resource, ResourceStatus, ResourceType,
    RubricCriterion, Submission, SubmissionStatus,
};

/// Submission id of the report shown when no (or an unknown) id is requested.
pub const DEFAULT_REPORT_ID: &str = "SUB-001";

pub fn sample_catalog() -> Catalog {
    Catalog {
        exercises: sample_exercises(),
        submissions: sample_submissions(),
        resources: sample_resources(),
        reports: vec![default_report()],
    }
}

fn sample_exercises() -> Vec<Exercise> {
    vec![
        exercise(
            1,
            "Contract Formation - Offer and Acceptance",
            "Argue whether a binding agreement arose from an exchange of emails between two traders.",
            "Contract Law",
            Difficulty::Beginner,
            "30 mins",
            4.8,
            1240,
            980,
        ),
        exercise(
            2,
            "Negligence Case - Duty of Care",
            "Represent the claimant in a negligence action against a local council after a playground injury.",
            "Tort Law",
            Difficulty::Intermediate,
            "45 mins",
            4.5,
            2105,
            1523,
        ),
        exercise(
            3,
            "Criminal Appeal - Mens Rea",
            "Challenge a conviction on the ground that the trial judge misdirected the jury on intention.",
            "Criminal Law",
            Difficulty::Advanced,
            "60 mins",
            4.9,
            876,
            512,
        ),
        exercise(
            4,
            "Judicial Review - Procedural Fairness",
            "Seek to quash a licensing decision made without giving the applicant a hearing.",
            "Public Law",
            Difficulty::Advanced,
            "50 mins",
            4.7,
            654,
            401,
        ),
        exercise(
            5,
            "Easements - Right of Way",
            "Advise a landowner disputing an access route claimed by prescription over twenty years.",
            "Land Law",
            Difficulty::Intermediate,
            "40 mins",
            4.3,
            532,
            377,
        ),
        exercise(
            6,
            "Breach of Trust - Trustee Investments",
            "Defend trustees accused of imprudent investment of a family settlement fund.",
            "Equity & Trusts",
            Difficulty::Beginner,
            "35 mins",
            4.6,
            745,
            602,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: u32,
    title: &str,
    description: &str,
    subject: &str,
    difficulty: Difficulty,
    time: &str,
    rating: f64,
    attempts: u32,
    completions: u32,
) -> Exercise {
    Exercise {
        id,
        title: title.to_string(),
        description: description.to_string(),
        subject: subject.to_string(),
        difficulty,
        time: time.to_string(),
        rating,
        attempts,
        completions,
    }
}

fn sample_submissions() -> Vec<Submission> {
    vec![
        submission(
            "SUB-001",
            2,
            "Negligence Case - Duty of Care",
            "Tort Law",
            day(2025, 6, 10),
            2,
            SubmissionStatus::Analyzed,
            Some(82),
            Some("B+"),
        ),
        submission(
            "SUB-002",
            1,
            "Contract Formation - Offer and Acceptance",
            "Contract Law",
            day(2025, 5, 28),
            1,
            SubmissionStatus::Analyzed,
            Some(91),
            Some("A"),
        ),
        submission(
            "SUB-003",
            3,
            "Criminal Appeal - Mens Rea",
            "Criminal Law",
            day(2025, 6, 12),
            1,
            SubmissionStatus::Processing,
            None,
            None,
        ),
        submission(
            "SUB-004",
            4,
            "Judicial Review - Procedural Fairness",
            "Public Law",
            day(2025, 4, 2),
            1,
            SubmissionStatus::Failed,
            None,
            None,
        ),
        submission(
            "SUB-005",
            2,
            "Negligence Case - Duty of Care",
            "Tort Law",
            day(2025, 4, 20),
            1,
            SubmissionStatus::Analyzed,
            Some(68),
            Some("C+"),
        ),
        submission(
            "SUB-006",
            6,
            "Breach of Trust - Trustee Investments",
            "Equity & Trusts",
            day(2025, 3, 15),
            1,
            SubmissionStatus::Analyzed,
            Some(75),
            Some("B"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn submission(
    id: &str,
    exercise_id: u32,
    exercise_name: &str,
    subject: &str,
    submission_date: NaiveDate,
    version: u32,
    status: SubmissionStatus,
    score: Option<u32>,
    grade: Option<&str>,
) -> Submission {
    Submission {
        id: id.to_string(),
        exercise_id,
        exercise_name: exercise_name.to_string(),
        subject: subject.to_string(),
        submission_date,
        version,
        status,
        score,
        grade: grade.map(str::to_string),
    }
}

fn sample_resources() -> Vec<Resource> {
    vec![
        resource(
            1,
            "Westlaw Case Search",
            ResourceType::LegalDatabase,
            "Case Law",
            day(2025, 6, 11),
            None,
        ),
        resource(
            2,
            "Tort Law Subject Guide",
            ResourceType::SubjectGuide,
            "Tort Law",
            day(2025, 6, 9),
            Some(ResourceStatus::InProgress),
        ),
        resource(
            3,
            "Structuring Oral Submissions",
            ResourceType::Tutorial,
            "Advocacy Skills",
            day(2025, 5, 30),
            Some(ResourceStatus::Completed),
        ),
        resource(
            4,
            "Answering Judicial Questions",
            ResourceType::Tutorial,
            "Advocacy Skills",
            day(2025, 4, 18),
            Some(ResourceStatus::Bookmarked),
        ),
        resource(
            5,
            "Contract Law Subject Guide",
            ResourceType::SubjectGuide,
            "Contract Law",
            day(2025, 3, 3),
            Some(ResourceStatus::Completed),
        ),
        resource(
            6,
            "LexisNexis Legislation",
            ResourceType::LegalDatabase,
            "Statutes",
            day(2025, 5, 21),
            None,
        ),
    ]
}

fn resource(
    id: u32,
    name: &str,
    resource_type: ResourceType,
    category: &str,
    accessed_date: NaiveDate,
    status: Option<ResourceStatus>,
) -> Resource {
    Resource {
        id,
        name: name.to_string(),
        resource_type,
        category: category.to_string(),
        accessed_date,
        status,
    }
}

/// Sample report for the default submission.
pub fn default_report() -> FeedbackReport {
    FeedbackReport {
        submission_id: DEFAULT_REPORT_ID.to_string(),
        exercise_name: "Negligence Case - Duty of Care".to_string(),
        submitted_on: day(2025, 6, 10),
        overall_score: 82,
        grade: "B+".to_string(),
        summary: "A well-organised submission with a clear roadmap. Authority on the \
                  duty of care was applied accurately, but rebuttal of the council's \
                  policy arguments was brief."
            .to_string(),
        rubric: vec![
            criterion(
                "Legal Knowledge",
                22,
                25,
                "Caparo and Robinson applied correctly to the facts.",
            ),
            criterion(
                "Structure & Organisation",
                21,
                25,
                "Roadmap given up front; signposting slipped in the second ground.",
            ),
            criterion(
                "Advocacy & Delivery",
                20,
                25,
                "Measured pace and good eye contact; some reliance on notes.",
            ),
            criterion(
                "Responding to Questions",
                19,
                25,
                "Answered directly but did not return to the submission afterwards.",
            ),
        ],
        strengths: vec![
            "Clear statement of the orders sought".to_string(),
            "Accurate citation of leading authorities".to_string(),
        ],
        improvements: vec![
            "Address the public policy counter-argument head on".to_string(),
            "Link answers to judicial questions back to your grounds".to_string(),
        ],
    }
}

fn criterion(name: &str, score: u32, max_score: u32, feedback: &str) -> RubricCriterion {
    RubricCriterion {
        name: name.to_string(),
        score,
        max_score,
        feedback: feedback.to_string(),
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    // Invalid literals fall back to the epoch; see `sample_dates_are_real_dates`.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
