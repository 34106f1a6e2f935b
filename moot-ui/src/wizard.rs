//! Handlers for the single in-progress submission.
//!
//! The session lives in [`AppState::session`]. Each handler locks it for its
//! whole duration, so uploads for the session are processed one at a time.
//! Changes that involve the transport are applied to a copy of the wizard and
//! stored only once the transport call succeeded.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, post, put};
use moot::core::upload::FileMeta;
use moot::core::wizard::{
    CaseFileBatch, DESCRIPTION_SOFT_LIMIT, Draft, SubmissionPayload, Wizard, WizardStep,
};
use serde::{Deserialize, Serialize};
use tokio::sync::MutexGuard;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::{AppState, Session};

pub fn wizard_router() -> Router<AppState> {
    Router::new()
        .route(
            "/wizard",
            post(start_session).get(get_session).delete(discard_session),
        )
        .route("/wizard/video", post(attach_video))
        .route("/wizard/skeleton", post(attach_skeleton))
        .route("/wizard/case-files", post(attach_case_files))
        .route("/wizard/case-files/{index}", delete(remove_case_file))
        .route("/wizard/description", put(update_description))
        .route("/wizard/next", post(next_step))
        .route("/wizard/back", post(previous_step))
        .route("/wizard/submit", post(submit))
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub exercise_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct CaseFilesRequest {
    pub files: Vec<FileMeta>,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DescriptionCounter {
    pub length: usize,
    pub limit: usize,
}

/// Client-facing snapshot of the session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub exercise_id: u32,
    pub exercise_name: String,
    pub step: WizardStep,
    pub draft: Draft,
    pub description: DescriptionCounter,
}

impl SessionView {
    fn of(session: &Session) -> Self {
        let (length, limit) = session.wizard.description_counter();
        Self {
            exercise_id: session.wizard.exercise_id(),
            exercise_name: session.exercise_name.clone(),
            step: session.wizard.step(),
            draft: session.wizard.draft().clone(),
            description: DescriptionCounter { length, limit },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseFilesResponse {
    #[serde(flatten)]
    pub batch: CaseFileBatch,
    pub warning: Option<String>,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub exercise_name: String,
    pub payload: SubmissionPayload,
}

type SessionGuard<'a> = MutexGuard<'a, Option<Session>>;

fn open_session<'a, 'g>(guard: &'g mut SessionGuard<'a>) -> Result<&'g mut Session, ApiError> {
    guard.as_mut().ok_or_else(ApiError::no_session)
}

/// Run the transport upload off the async runtime.
async fn upload(state: &AppState, file: FileMeta) -> Result<(), ApiError> {
    let transport = state.transport.clone();
    tokio::task::spawn_blocking(move || transport.upload(&file))
        .await
        .map_err(|err| ApiError::Internal(err.into()))??;
    Ok(())
}

/// POST /api/wizard - open a session for an exercise.
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let mut guard = state.session.lock().await;
    let active = guard
        .as_ref()
        .filter(|existing| existing.wizard.step() != WizardStep::Submitted);
    if let Some(existing) = active {
        return Err(ApiError::Conflict(format!(
            "a submission for exercise {} is already in progress",
            existing.wizard.exercise_id()
        )));
    }
    let session = Session {
        wizard: Wizard::new(request.exercise_id, state.library.config().upload.policy()),
        exercise_name: state.library.exercise_name(request.exercise_id),
    };
    info!(exercise_id = request.exercise_id, "submission session opened");
    let view = SessionView::of(&session);
    *guard = Some(session);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/wizard
pub async fn get_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    Ok(Json(SessionView::of(session)))
}

/// DELETE /api/wizard - drop the draft.
pub async fn discard_session(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut guard = state.session.lock().await;
    if guard.take().is_none() {
        return Err(ApiError::no_session());
    }
    info!("submission session discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/wizard/video
pub async fn attach_video(
    State(state): State<AppState>,
    Json(file): Json<FileMeta>,
) -> Result<Json<SessionView>, ApiError> {
    let now = state.now();
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    let mut staged = session.wizard.clone();
    staged.attach_video(file.clone(), now)?;
    upload(&state, file).await?;
    session.wizard = staged;
    Ok(Json(SessionView::of(session)))
}

/// POST /api/wizard/skeleton
pub async fn attach_skeleton(
    State(state): State<AppState>,
    Json(file): Json<FileMeta>,
) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    let mut staged = session.wizard.clone();
    staged.attach_skeleton_argument(file.clone())?;
    upload(&state, file).await?;
    session.wizard = staged;
    Ok(Json(SessionView::of(session)))
}

/// POST /api/wizard/case-files - accepted files are attached, the rest reported.
pub async fn attach_case_files(
    State(state): State<AppState>,
    Json(request): Json<CaseFilesRequest>,
) -> Result<Json<CaseFilesResponse>, ApiError> {
    let now = state.now();
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    let mut staged = session.wizard.clone();
    let batch = staged.attach_case_files(request.files, now)?;
    let warning = batch.warning();
    if let Some(warning) = &warning {
        warn!(skipped = batch.rejected.len(), "{}", warning);
    }
    let attached = &staged.draft().case_files;
    let added = attached[attached.len() - batch.accepted..].to_vec();
    for file in added {
        upload(&state, file).await?;
    }
    session.wizard = staged;
    Ok(Json(CaseFilesResponse {
        batch,
        warning,
        session: SessionView::of(session),
    }))
}

/// DELETE /api/wizard/case-files/{index}
pub async fn remove_case_file(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    session.wizard.remove_case_file(index)?;
    Ok(Json(SessionView::of(session)))
}

/// PUT /api/wizard/description
pub async fn update_description(
    State(state): State<AppState>,
    Json(request): Json<DescriptionRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    session.wizard.update_description(request.description)?;
    Ok(Json(SessionView::of(session)))
}

/// POST /api/wizard/next
pub async fn next_step(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    session.wizard.next()?;
    Ok(Json(SessionView::of(session)))
}

/// POST /api/wizard/back
pub async fn previous_step(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, ApiError> {
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    session.wizard.back()?;
    Ok(Json(SessionView::of(session)))
}

/// POST /api/wizard/submit - freeze the draft and send it.
///
/// A failed send leaves the session on the review step with its draft.
pub async fn submit(State(state): State<AppState>) -> Result<Json<SubmitResponse>, ApiError> {
    let now = state.now();
    let mut guard = state.session.lock().await;
    let session = open_session(&mut guard)?;
    let mut staged = session.wizard.clone();
    let payload = staged.submit(now)?;

    let transport = state.transport.clone();
    let sent = payload.clone();
    tokio::task::spawn_blocking(move || transport.submit(&sent))
        .await
        .map_err(|err| ApiError::Internal(err.into()))??;
    session.wizard = staged;
    info!(reference = %payload.reference, "submission sent");

    Ok(Json(SubmitResponse {
        exercise_name: session.exercise_name.clone(),
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use moot::io::config::MootConfig;
    use moot::library::Library;
    use moot::test_support::{RecordingTransport, instant, mp4, pdf};

    use super::*;

    fn state_with(transport: Arc<RecordingTransport>) -> AppState {
        AppState::with_clock(
            Library::builtin(MootConfig::default()),
            transport,
            Arc::new(|| instant(0)),
        )
    }

    async fn start(state: &AppState, exercise_id: u32) -> Result<SessionView, ApiError> {
        start_session(State(state.clone()), Json(StartRequest { exercise_id }))
            .await
            .map(|(_, Json(view))| view)
    }

    #[tokio::test]
    async fn second_start_conflicts_until_submitted() {
        let state = state_with(Arc::new(RecordingTransport::default()));
        let view = start(&state, 2).await.expect("start");
        assert_eq!(view.exercise_name, "Negligence Case - Duty of Care");
        assert_eq!(view.description.limit, DESCRIPTION_SOFT_LIMIT);

        let err = start(&state, 3).await.expect_err("conflict");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn mutations_without_session_conflict() {
        let state = state_with(Arc::new(RecordingTransport::default()));
        let err = next_step(State(state.clone())).await.expect_err("no session");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        let err = discard_session(State(state)).await.expect_err("no session");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn document_as_video_is_rejected_without_upload() {
        let transport = Arc::new(RecordingTransport::default());
        let state = state_with(transport.clone());
        start(&state, 2).await.expect("start");

        let err = attach_video(State(state.clone()), Json(pdf("argument.pdf")))
            .await
            .expect_err("pdf video");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "invalid_file_type");
        assert!(transport.events().is_empty());

        let Json(view) = get_session(State(state)).await.expect("session");
        assert!(view.draft.video.is_none());
    }

    #[tokio::test]
    async fn full_flow_submits_once() {
        let transport = Arc::new(RecordingTransport::default());
        let state = state_with(transport.clone());
        start(&state, 2).await.expect("start");

        attach_video(State(state.clone()), Json(mp4("argument.mp4", 4096)))
            .await
            .expect("video");
        let Json(batch) = attach_case_files(
            State(state.clone()),
            Json(CaseFilesRequest {
                files: vec![
                    pdf("brief.pdf"),
                    FileMeta::new("brief.exe", "application/octet-stream", 10),
                ],
            }),
        )
        .await
        .expect("case files");
        assert_eq!(batch.batch.accepted, 1);
        assert_eq!(batch.batch.rejected, vec!["brief.exe".to_string()]);
        assert_eq!(batch.session.draft.case_files.len(), 1);

        let err = next_step(State(state.clone())).await.expect_err("no description");
        assert_eq!(err.code(), "missing_required_field");

        update_description(
            State(state.clone()),
            Json(DescriptionRequest {
                description: "Appellant's submissions.".to_string(),
            }),
        )
        .await
        .expect("description");
        let Json(view) = next_step(State(state.clone())).await.expect("next");
        assert_eq!(view.step, WizardStep::ReviewAndSubmit);

        let Json(sent) = submit(State(state.clone())).await.expect("submit");
        assert_eq!(sent.payload.case_files.len(), 1);
        assert_eq!(sent.payload.submitted_at, instant(0));
        assert_eq!(
            transport.events(),
            vec![
                "upload argument.mp4".to_string(),
                "upload brief.pdf".to_string(),
                format!("submit {}", sent.payload.reference),
            ]
        );

        let err = submit(State(state.clone())).await.expect_err("already sent");
        assert_eq!(err.code(), "already_submitted");

        // A finished session can be replaced.
        start(&state, 1).await.expect("restart");
    }

    #[tokio::test]
    async fn remove_case_file_out_of_range() {
        let state = state_with(Arc::new(RecordingTransport::default()));
        start(&state, 1).await.expect("start");
        let err = remove_case_file(State(state), Path(0))
            .await
            .expect_err("empty");
        assert_eq!(err.code(), "case_file_not_found");
    }

    #[tokio::test]
    async fn failed_upload_leaves_draft_unchanged() {
        let transport = Arc::new(RecordingTransport::failing());
        let state = state_with(transport.clone());
        start(&state, 2).await.expect("start");

        let err = attach_video(State(state.clone()), Json(mp4("argument.mp4", 4096)))
            .await
            .expect_err("upload fails");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(transport.events(), vec!["upload argument.mp4".to_string()]);

        let Json(view) = get_session(State(state)).await.expect("session");
        assert!(view.draft.video.is_none());
        assert!(view.draft.upload_timestamp.is_none());
    }

    #[tokio::test]
    async fn failed_send_keeps_session_on_review() {
        let state = state_with(Arc::new(RecordingTransport::failing_submit()));
        start(&state, 2).await.expect("start");
        attach_video(State(state.clone()), Json(mp4("argument.mp4", 4096)))
            .await
            .expect("video");
        update_description(
            State(state.clone()),
            Json(DescriptionRequest {
                description: "Respondent's submissions.".to_string(),
            }),
        )
        .await
        .expect("description");
        next_step(State(state.clone())).await.expect("next");

        let err = submit(State(state.clone())).await.expect_err("send fails");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let Json(view) = get_session(State(state)).await.expect("session");
        assert_eq!(view.step, WizardStep::ReviewAndSubmit);
        assert_eq!(
            view.draft.video.as_ref().map(|video| video.name.as_str()),
            Some("argument.mp4")
        );
        assert_eq!(view.draft.description, "Respondent's submissions.");
    }
}
