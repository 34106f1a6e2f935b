//! Submission wizard state machine.
//!
//! One [`Wizard`] owns one in-flight [`Draft`]. The machine moves
//! `UploadAndDetails -> ReviewAndSubmit -> Submitted`, with `back` returning
//! from review to the first step. Every rejected operation leaves the wizard
//! exactly as it was, so callers can surface the error and let the user retry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::upload::{FileMeta, UploadPolicy};

/// Display-only description counter limit. Not enforced on submit.
pub const DESCRIPTION_SOFT_LIMIT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    UploadAndDetails,
    ReviewAndSubmit,
    /// Terminal: the draft has been frozen into a payload.
    Submitted,
}

/// Field that must be filled before leaving the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Video,
    Description,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Description => f.write_str("description"),
        }
    }
}

/// Recoverable wizard validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("invalid file type for '{name}': expected one of {expected}")]
    InvalidFileType { name: String, expected: String },

    #[error("'{name}' is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("missing required field: {0}")]
    MissingRequiredField(RequiredField),

    #[error("no case file at index {index} ({len} attached)")]
    CaseFileIndexOutOfRange { index: usize, len: usize },

    #[error("submission can only be sent from the review step")]
    NotOnReviewStep,

    #[error("submission has already been sent")]
    AlreadySubmitted,
}

/// In-progress submission contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub video: Option<FileMeta>,
    pub skeleton_argument: Option<FileMeta>,
    pub case_files: Vec<FileMeta>,
    pub description: String,
    /// First successful upload into this draft.
    pub upload_timestamp: Option<DateTime<Utc>>,
}

/// Outcome of a case-file batch. Rejections are warnings, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFileBatch {
    pub accepted: usize,
    pub rejected: Vec<String>,
}

impl CaseFileBatch {
    pub fn warning(&self) -> Option<String> {
        match self.rejected.len() {
            0 => None,
            1 => Some(format!(
                "skipped 1 file with an unsupported type: {}",
                self.rejected[0]
            )),
            n => Some(format!(
                "skipped {} files with unsupported types: {}",
                n,
                self.rejected.join(", ")
            )),
        }
    }
}

/// Frozen submission produced by a successful `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub reference: String,
    pub exercise_id: u32,
    pub video: FileMeta,
    pub skeleton_argument: Option<FileMeta>,
    pub case_files: Vec<FileMeta>,
    pub description: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Wizard {
    exercise_id: u32,
    step: WizardStep,
    draft: Draft,
    #[serde(skip)]
    policy: UploadPolicy,
}

impl Wizard {
    pub fn new(exercise_id: u32, policy: UploadPolicy) -> Self {
        Self {
            exercise_id,
            step: WizardStep::UploadAndDetails,
            draft: Draft::default(),
            policy,
        }
    }

    pub fn exercise_id(&self) -> u32 {
        self.exercise_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Characters used against the soft description limit.
    pub fn description_counter(&self) -> (usize, usize) {
        (self.draft.description.chars().count(), DESCRIPTION_SOFT_LIMIT)
    }

    pub fn attach_video(&mut self, file: FileMeta, now: DateTime<Utc>) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.policy.accepts_video_type(&file) {
            return Err(WizardError::InvalidFileType {
                name: file.name,
                expected: self.policy.video_mime_types.join(", "),
            });
        }
        if file.size > self.policy.max_video_bytes {
            return Err(WizardError::FileTooLarge {
                name: file.name,
                size: file.size,
                limit: self.policy.max_video_bytes,
            });
        }
        self.draft.video = Some(file);
        self.touch_upload_timestamp(now);
        Ok(())
    }

    pub fn attach_skeleton_argument(&mut self, file: FileMeta) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.policy.accepts_document(&file) {
            return Err(WizardError::InvalidFileType {
                name: file.name,
                expected: self.policy.document_extensions.join(", "),
            });
        }
        self.draft.skeleton_argument = Some(file);
        Ok(())
    }

    /// Append every acceptable file; report the rest without failing the batch.
    pub fn attach_case_files(
        &mut self,
        files: Vec<FileMeta>,
        now: DateTime<Utc>,
    ) -> Result<CaseFileBatch, WizardError> {
        self.ensure_open()?;
        let (accepted, rejected): (Vec<FileMeta>, Vec<FileMeta>) = files
            .into_iter()
            .partition(|file| self.policy.accepts_document(file));

        let batch = CaseFileBatch {
            accepted: accepted.len(),
            rejected: rejected.into_iter().map(|file| file.name).collect(),
        };
        if !accepted.is_empty() {
            self.draft.case_files.extend(accepted);
            self.touch_upload_timestamp(now);
        }
        Ok(batch)
    }

    pub fn remove_case_file(&mut self, index: usize) -> Result<FileMeta, WizardError> {
        self.ensure_open()?;
        let len = self.draft.case_files.len();
        if index >= len {
            return Err(WizardError::CaseFileIndexOutOfRange { index, len });
        }
        Ok(self.draft.case_files.remove(index))
    }

    /// Replace the description verbatim.
    pub fn update_description(&mut self, text: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_open()?;
        self.draft.description = text.into();
        Ok(())
    }

    /// Advance to review once a video and a non-blank description are present.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_open()?;
        if self.step == WizardStep::UploadAndDetails {
            if self.draft.video.is_none() {
                return Err(WizardError::MissingRequiredField(RequiredField::Video));
            }
            if self.draft.description.trim().is_empty() {
                return Err(WizardError::MissingRequiredField(RequiredField::Description));
            }
            self.step = WizardStep::ReviewAndSubmit;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_open()?;
        self.step = WizardStep::UploadAndDetails;
        Ok(self.step)
    }

    /// Freeze the draft into a payload and close the wizard.
    ///
    /// The draft is cleared; every later mutation fails with
    /// [`WizardError::AlreadySubmitted`].
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<SubmissionPayload, WizardError> {
        self.ensure_open()?;
        if self.step != WizardStep::ReviewAndSubmit {
            return Err(WizardError::NotOnReviewStep);
        }
        // Review is only reachable with a video attached.
        let Some(video) = self.draft.video.clone() else {
            return Err(WizardError::MissingRequiredField(RequiredField::Video));
        };

        let draft = std::mem::take(&mut self.draft);
        self.step = WizardStep::Submitted;

        let reference = submission_reference(self.exercise_id, &video, &draft.case_files, now);
        Ok(SubmissionPayload {
            reference,
            exercise_id: self.exercise_id,
            video,
            skeleton_argument: draft.skeleton_argument,
            case_files: draft.case_files,
            description: draft.description,
            uploaded_at: draft.upload_timestamp,
            submitted_at: now,
        })
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        Ok(())
    }

    fn touch_upload_timestamp(&mut self, now: DateTime<Utc>) {
        if self.draft.upload_timestamp.is_none() {
            self.draft.upload_timestamp = Some(now);
        }
    }
}

/// Stable short reference derived from the payload identity.
fn submission_reference(
    exercise_id: u32,
    video: &FileMeta,
    case_files: &[FileMeta],
    submitted_at: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(exercise_id.to_be_bytes());
    hasher.update(video.name.as_bytes());
    hasher.update(video.size.to_be_bytes());
    for file in case_files {
        hasher.update(file.name.as_bytes());
    }
    hasher.update(submitted_at.to_rfc3339().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("MOOT-{}", digest[..12].to_ascii_uppercase())
}
