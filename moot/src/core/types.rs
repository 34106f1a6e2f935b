//! Shared record types for the practice catalog.
//!
//! Records are loaded once and never mutated afterwards. List views borrow
//! them and hand back new vectors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exercise difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Sort rank: Beginner < Intermediate < Advanced.
    pub fn rank(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }
}

/// A practice moot scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub difficulty: Difficulty,
    /// Display duration, formatted as `"<N> mins"`.
    pub time: String,
    pub rating: f64,
    pub attempts: u32,
    pub completions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Analyzed,
    Processing,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyzed => "Analyzed",
            Self::Processing => "Processing",
            Self::Failed => "Failed",
        }
    }
}

/// A user's recorded attempt against an exercise.
///
/// `exercise_id` is not enforced against the catalog; see
/// [`crate::core::lookup`] for how missing exercises are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub exercise_id: u32,
    pub exercise_name: String,
    pub subject: String,
    pub submission_date: NaiveDate,
    pub version: u32,
    pub status: SubmissionStatus,
    pub score: Option<u32>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    LegalDatabase,
    SubjectGuide,
    Tutorial,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LegalDatabase => "LegalDatabase",
            Self::SubjectGuide => "SubjectGuide",
            Self::Tutorial => "Tutorial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceStatus {
    Completed,
    InProgress,
    Bookmarked,
}

impl ResourceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "InProgress",
            Self::Bookmarked => "Bookmarked",
        }
    }
}

/// A learning resource the user has opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub category: String,
    pub accessed_date: NaiveDate,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
}

/// One scored row of a feedback rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
}

/// Static feedback report shown for an analyzed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub submission_id: String,
    pub exercise_name: String,
    pub submitted_on: NaiveDate,
    pub overall_score: u32,
    pub grade: String,
    pub summary: String,
    pub rubric: Vec<RubricCriterion>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// The full in-memory dataset served by the CLI and the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
    pub submissions: Vec<Submission>,
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub reports: Vec<FeedbackReport>,
}

impl Catalog {
    pub fn exercise(&self, id: u32) -> Option<&Exercise> {
        self.exercises.iter().find(|exercise| exercise.id == id)
    }

    pub fn report(&self, submission_id: &str) -> Option<&FeedbackReport> {
        self.reports
            .iter()
            .find(|report| report.submission_id == submission_id)
    }
}
