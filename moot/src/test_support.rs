//! Test-only builders for catalog records and wizard files.

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::core::types::{
    Difficulty, Exercise, Resource, ResourceStatus, ResourceType, Submission, SubmissionStatus,
};
use crate::core::upload::FileMeta;
use crate::core::wizard::SubmissionPayload;
use crate::io::transport::Transport;

/// Calendar date from literal parts. Panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Fixed instant `secs` seconds after 2025-06-15T09:00:00Z.
pub fn instant(secs: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2025, 6, 15, 9, 0, 0)
        .single()
        .expect("valid base instant");
    base + Duration::seconds(secs)
}

/// Create a deterministic exercise with default fields.
pub fn exercise(id: u32, title: &str, rating: f64) -> Exercise {
    Exercise {
        id,
        title: title.to_string(),
        description: format!("{} description", title),
        subject: "General".to_string(),
        difficulty: Difficulty::Beginner,
        time: "30 mins".to_string(),
        rating,
        attempts: 10,
        completions: 5,
    }
}

/// Create an analyzed (or processing, when unscored) submission.
pub fn submission(id: &str, submission_date: NaiveDate, score: Option<u32>) -> Submission {
    Submission {
        id: id.to_string(),
        exercise_id: 1,
        exercise_name: format!("{} exercise", id),
        subject: "General".to_string(),
        submission_date,
        version: 1,
        status: if score.is_some() {
            SubmissionStatus::Analyzed
        } else {
            SubmissionStatus::Processing
        },
        score,
        grade: None,
    }
}

pub fn resource(id: u32, name: &str, accessed_date: NaiveDate) -> Resource {
    Resource {
        id,
        name: name.to_string(),
        resource_type: ResourceType::SubjectGuide,
        category: "General".to_string(),
        accessed_date,
        status: Some(ResourceStatus::InProgress),
    }
}

pub fn mp4(name: &str, size: u64) -> FileMeta {
    FileMeta::new(name, "video/mp4", size)
}

pub fn pdf(name: &str) -> FileMeta {
    FileMeta::new(name, "application/pdf", 2048)
}

/// Transport that records calls instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Mutex<Vec<String>>,
    fail_uploads: bool,
    fail_submit: bool,
}

impl RecordingTransport {
    /// Records every call and then fails it.
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail_uploads: true,
            fail_submit: true,
        }
    }

    /// Accepts uploads but fails the final submit.
    pub fn failing_submit() -> Self {
        Self {
            events: Mutex::default(),
            fail_uploads: false,
            fail_submit: true,
        }
    }

    /// `upload <name>` and `submit <reference>` entries in call order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("transport log").clone()
    }

    fn record(&self, event: String, fail: bool) -> Result<()> {
        self.events.lock().expect("transport log").push(event.clone());
        if fail {
            return Err(anyhow!("transport unavailable: {}", event));
        }
        Ok(())
    }
}

impl Transport for RecordingTransport {
    fn upload(&self, file: &FileMeta) -> Result<()> {
        self.record(format!("upload {}", file.name), self.fail_uploads)
    }

    fn submit(&self, payload: &SubmissionPayload) -> Result<()> {
        self.record(format!("submit {}", payload.reference), self.fail_submit)
    }
}
