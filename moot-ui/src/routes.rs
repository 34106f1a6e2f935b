//! HTTP route handlers for the catalog views.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use moot::core::icons::{Icon, IconResource};
use moot::core::listing::{
    ALL, Criteria, DateRange, ExerciseSort, ListView, ResourceSort, SubmissionSort,
};
use moot::core::stats::Dashboard;
use moot::core::types::{Exercise, Resource, Submission};
use moot::report::{EXPORT_NOT_IMPLEMENTED, ReportSelection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::wizard;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/dashboard", get(get_dashboard))
        .route("/exercises", get(list_exercises))
        .route("/exercises/{id}", get(get_exercise))
        .route("/submissions", get(list_submissions))
        .route("/resources", get(list_resources))
        .route("/reports", get(get_report))
        .route("/reports/export", post(export_report))
        .merge(wizard::wizard_router())
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseQuery {
    pub search: Option<String>,
    pub subject: Option<String>,
    pub difficulty: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub subject: Option<String>,
    pub range: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub range: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub submission: Option<String>,
}

/// List row with its icon resolved for display.
#[derive(Debug, Serialize)]
pub struct Row<T> {
    #[serde(flatten)]
    pub item: T,
    pub icon: IconResource,
}

#[derive(Debug, Serialize)]
pub struct RowView<T> {
    pub items: Vec<Row<T>>,
    pub total: usize,
}

impl<T> RowView<T> {
    fn from_view(view: ListView<T>, icon: impl Fn(&T) -> Icon) -> Self {
        Self {
            items: view
                .items
                .into_iter()
                .map(|item| Row {
                    icon: icon(&item).resource(),
                    item,
                })
                .collect(),
            total: view.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExerciseDetail {
    #[serde(flatten)]
    pub exercise: Exercise,
    pub icon: IconResource,
    pub source: String,
}

fn filter_value(raw: Option<String>) -> String {
    raw.unwrap_or_else(|| ALL.to_string())
}

fn date_range(raw: Option<&str>) -> Result<DateRange, ApiError> {
    match raw {
        None => Ok(DateRange::All),
        Some(raw) => DateRange::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("range must be 'all' or 'last30days', got '{}'", raw))
        }),
    }
}

fn sort_key<K>(raw: Option<&str>, parse: impl Fn(&str) -> Option<K>) -> Option<K> {
    let raw = raw?;
    let key = parse(raw);
    if key.is_none() {
        debug!(sort = raw, "unknown sort key; keeping catalog order");
    }
    key
}

/// GET /api/dashboard
async fn get_dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.library.dashboard(state.today()))
}

/// GET /api/exercises?search&subject&difficulty&sort
pub async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Json<RowView<Exercise>>, ApiError> {
    let criteria = Criteria::default()
        .with_search(query.search.unwrap_or_default())
        .with_filter("subject", filter_value(query.subject))
        .with_filter("difficulty", filter_value(query.difficulty))
        .with_sort(sort_key(query.sort.as_deref(), ExerciseSort::parse));
    let view = state.library.exercises(&criteria, state.today());
    Ok(Json(RowView::from_view(view, |e| Icon::for_subject(&e.subject))))
}

/// GET /api/exercises/{id}
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ExerciseDetail>, ApiError> {
    let found = state.library.exercise(id).ok_or_else(|| {
        ApiError::NotFound(format!(
            "no exercise {} ({})",
            id,
            state.library.exercise_name(id)
        ))
    })?;
    Ok(Json(ExerciseDetail {
        exercise: found.exercise.clone(),
        icon: Icon::for_subject(&found.exercise.subject).resource(),
        source: found.source.to_string(),
    }))
}

/// GET /api/submissions?search&status&subject&range&sort
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> Result<Json<RowView<Submission>>, ApiError> {
    let criteria = Criteria::default()
        .with_search(query.search.unwrap_or_default())
        .with_filter("status", filter_value(query.status))
        .with_filter("subject", filter_value(query.subject))
        .with_date_range(date_range(query.range.as_deref())?)
        .with_sort(sort_key(query.sort.as_deref(), SubmissionSort::parse));
    let view = state.library.submissions(&criteria, state.today());
    Ok(Json(RowView::from_view(view, |s| Icon::for_status(s.status))))
}

/// GET /api/resources?search&type&category&status&range&sort
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<RowView<Resource>>, ApiError> {
    let criteria = Criteria::default()
        .with_search(query.search.unwrap_or_default())
        .with_filter("type", filter_value(query.resource_type))
        .with_filter("category", filter_value(query.category))
        .with_filter("status", filter_value(query.status))
        .with_date_range(date_range(query.range.as_deref())?)
        .with_sort(sort_key(query.sort.as_deref(), ResourceSort::parse));
    let view = state.library.resources(&criteria, state.today());
    Ok(Json(RowView::from_view(view, |r| {
        Icon::for_resource_type(r.resource_type)
    })))
}

/// GET /api/reports?submission=
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Json<ReportSelection> {
    Json(state.library.report(query.submission.as_deref()))
}

/// POST /api/reports/export
async fn export_report() -> ApiError {
    ApiError::NotImplemented(EXPORT_NOT_IMPLEMENTED.to_string())
}
