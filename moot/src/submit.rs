//! Non-interactive submission: drive one wizard session from file paths.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::core::wizard::{SubmissionPayload, Wizard};
use crate::io::files::inspect_file;
use crate::io::transport::Transport;
use crate::library::Library;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub exercise_id: u32,
    pub video: PathBuf,
    pub skeleton_argument: Option<PathBuf>,
    pub case_files: Vec<PathBuf>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub payload: SubmissionPayload,
    pub exercise_name: String,
    /// Non-fatal notices, e.g. skipped case files.
    pub warnings: Vec<String>,
}

/// Walk the wizard from upload to submit.
///
/// Wizard rejections surface as [`crate::core::wizard::WizardError`] inside
/// the returned error; nothing is sent once one occurs. Attachments are
/// staged on a copy of the wizard and kept only after the transport accepted
/// the upload. Transport failures are plain errors, not rejections.
#[instrument(skip_all, fields(exercise_id = request.exercise_id))]
pub fn run_submission<T: Transport>(
    library: &Library,
    transport: &T,
    request: &SubmitRequest,
    mut clock: impl FnMut() -> DateTime<Utc>,
) -> Result<SubmitOutcome> {
    let exercise_name = library.exercise_name(request.exercise_id);
    let mut wizard = Wizard::new(request.exercise_id, library.config().upload.policy());
    let mut warnings = Vec::new();

    let video = inspect_file(&request.video)?;
    let mut staged = wizard.clone();
    staged.attach_video(video.clone(), clock())?;
    transport.upload(&video).context("upload video")?;
    wizard = staged;

    if let Some(path) = &request.skeleton_argument {
        let skeleton = inspect_file(path)?;
        let mut staged = wizard.clone();
        staged.attach_skeleton_argument(skeleton.clone())?;
        transport.upload(&skeleton).context("upload skeleton argument")?;
        wizard = staged;
    }

    if !request.case_files.is_empty() {
        let files = request
            .case_files
            .iter()
            .map(|path| inspect_file(path))
            .collect::<Result<Vec<_>>>()?;
        let mut staged = wizard.clone();
        let batch = staged.attach_case_files(files, clock())?;
        if let Some(warning) = batch.warning() {
            warn!(skipped = batch.rejected.len(), "{}", warning);
            warnings.push(warning);
        }
        let attached = &staged.draft().case_files;
        for file in &attached[attached.len() - batch.accepted..] {
            transport.upload(file).context("upload case file")?;
        }
        wizard = staged;
    }

    wizard.update_description(request.description.as_str())?;
    wizard.next()?;
    let payload = wizard.submit(clock())?;
    transport.submit(&payload).context("send submission")?;
    info!(reference = %payload.reference, "submission complete");

    Ok(SubmitOutcome {
        payload,
        exercise_name,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use crate::core::wizard::{RequiredField, WizardError};
    use crate::io::config::MootConfig;
    use crate::test_support::{RecordingTransport, instant};

    fn touch(dir: &Path, name: &str, bytes: usize) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; bytes]).expect("write file");
        path
    }

    fn request(dir: &Path) -> SubmitRequest {
        SubmitRequest {
            exercise_id: 2,
            video: touch(dir, "argument.mp4", 4096),
            skeleton_argument: Some(touch(dir, "skeleton.docx", 512)),
            case_files: vec![touch(dir, "brief.pdf", 256), touch(dir, "brief.exe", 64)],
            description: "Submissions for the appellant on duty of care.".to_string(),
        }
    }

    #[test]
    fn full_submission_skips_unsupported_case_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let transport = RecordingTransport::default();

        let outcome = run_submission(&library, &transport, &request(temp.path()), || instant(0))
            .expect("submit");

        assert_eq!(outcome.exercise_name, "Negligence Case - Duty of Care");
        assert_eq!(outcome.payload.case_files.len(), 1);
        assert_eq!(outcome.payload.case_files[0].name, "brief.pdf");
        assert_eq!(outcome.payload.uploaded_at, Some(instant(0)));
        assert_eq!(
            outcome.warnings,
            vec!["skipped 1 file with an unsupported type: brief.exe".to_string()]
        );
        assert_eq!(
            transport.events(),
            vec![
                "upload argument.mp4".to_string(),
                "upload skeleton.docx".to_string(),
                "upload brief.pdf".to_string(),
                format!("submit {}", outcome.payload.reference),
            ]
        );
    }

    #[test]
    fn blank_description_is_rejected_before_send() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let transport = RecordingTransport::default();
        let mut req = request(temp.path());
        req.description = "   ".to_string();

        let err = run_submission(&library, &transport, &req, || instant(0)).expect_err("blank");
        assert_eq!(
            err.downcast_ref::<WizardError>(),
            Some(&WizardError::MissingRequiredField(RequiredField::Description))
        );
        assert!(transport.events().iter().all(|event| !event.starts_with("submit")));
    }

    #[test]
    fn non_video_is_rejected_without_upload() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let transport = RecordingTransport::default();
        let mut req = request(temp.path());
        req.video = touch(temp.path(), "argument.pdf", 100);

        let err = run_submission(&library, &transport, &req, || instant(0)).expect_err("pdf");
        assert!(matches!(
            err.downcast_ref::<WizardError>(),
            Some(WizardError::InvalidFileType { .. })
        ));
        assert!(transport.events().is_empty());
    }

    #[test]
    fn unknown_exercise_uses_fallback_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let mut req = request(temp.path());
        req.exercise_id = 77;

        let outcome = run_submission(&library, &RecordingTransport::default(), &req, || {
            instant(5)
        })
        .expect("submit");
        assert_eq!(outcome.exercise_name, "Exercise #77");
        assert_eq!(outcome.payload.submitted_at, instant(5));
    }

    #[test]
    fn transport_failure_is_not_a_rejection() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let transport = RecordingTransport::failing();

        let err = run_submission(&library, &transport, &request(temp.path()), || instant(0))
            .expect_err("transport down");
        assert!(err.downcast_ref::<WizardError>().is_none());
        assert!(format!("{:#}", err).contains("upload video"));
        assert_eq!(transport.events(), vec!["upload argument.mp4".to_string()]);
    }

    #[test]
    fn failed_send_reports_submission_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let library = Library::builtin(MootConfig::default());
        let transport = RecordingTransport::failing_submit();

        let err = run_submission(&library, &transport, &request(temp.path()), || instant(0))
            .expect_err("send fails");
        assert!(err.downcast_ref::<WizardError>().is_none());
        assert!(format!("{:#}", err).contains("send submission"));
        assert!(transport.events().last().is_some_and(|e| e.starts_with("submit MOOT-")));
    }
}
