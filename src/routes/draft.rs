use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::models::{AvailabilityWindow, LessonType, SwimStyle, TimeOfDay, Weekday};
use crate::services::availability::AvailabilityModel;
use crate::services::submission::{SubmissionOutcome, SubmissionPhase};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/options", get(get_options))
        .route("/draft", get(get_draft))
        .route("/draft/name", put(set_name))
        .route("/draft/lesson_type", put(set_lesson_type))
        .route("/draft/swim_styles/:style", post(toggle_swim_style))
        .route("/draft/days/:day", post(set_day).delete(remove_day))
        .route("/draft/pending/start", put(choose_start))
        .route("/draft/pending/end", put(choose_end))
        .route("/draft/pending", delete(cancel_pending))
        .route("/draft/reset", post(reset))
        .route("/draft/submit", post(submit))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub lesson_types: Vec<OptionEntry>,
    pub swim_styles: Vec<OptionEntry>,
    pub days: Vec<Weekday>,
    pub times: Vec<TimeOfDay>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    #[serde(flatten)]
    pub model: AvailabilityModel,
    /// One entry per selectable day, for the day buttons.
    pub days: Vec<DaySummary>,
    pub phase: SubmissionPhase,
    pub last_outcome: Option<SubmissionOutcome>,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub day: Weekday,
    pub set: bool,
    pub windows: Vec<AvailabilityWindow>,
}

#[derive(Debug, Serialize)]
pub struct CommittedWindowResponse {
    pub committed: AvailabilityWindow,
    #[serde(flatten)]
    pub draft: DraftResponse,
}

#[derive(Debug, Deserialize)]
pub struct SetNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetLessonTypeRequest {
    /// `null` clears the selection.
    pub lesson_type: Option<LessonType>,
}

#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    pub time: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        lesson_types: LessonType::ALL
            .into_iter()
            .map(|t| OptionEntry {
                value: t.as_str(),
                label: t.label(),
            })
            .collect(),
        swim_styles: SwimStyle::ALL
            .into_iter()
            .map(|s| OptionEntry {
                value: s.as_str(),
                label: s.label(),
            })
            .collect(),
        days: Weekday::AVAILABILITY.to_vec(),
        times: AvailabilityModel::time_options(),
    })
}

fn snapshot(state: &AppState) -> DraftResponse {
    let model = state.session.draft().get();
    let days = Weekday::AVAILABILITY
        .into_iter()
        .map(|day| DaySummary {
            day,
            set: model.is_day_set(day),
            windows: model.windows_for(day),
        })
        .collect();

    DraftResponse {
        model,
        days,
        phase: state.session.phase(),
        last_outcome: state.session.last_outcome(),
    }
}

fn parse_day(raw: &str) -> AppResult<Weekday> {
    raw.parse().map_err(|_| {
        AppError::BadRequest(i18n::t_with("validation.unknown_weekday", &[("day", raw)]))
    })
}

fn parse_time(raw: &str) -> AppResult<TimeOfDay> {
    raw.parse().map_err(|_| {
        AppError::Validation(i18n::t_with("validation.invalid_time", &[("time", raw)]))
    })
}

async fn get_draft(State(state): State<Arc<AppState>>) -> Json<DraftResponse> {
    Json(snapshot(&state))
}

async fn set_name(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetNameRequest>,
) -> Json<DraftResponse> {
    state.session.draft().update(|m| m.set_name(body.name));
    Json(snapshot(&state))
}

async fn set_lesson_type(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetLessonTypeRequest>,
) -> Json<DraftResponse> {
    state
        .session
        .draft()
        .update(|m| m.set_lesson_type(body.lesson_type));
    Json(snapshot(&state))
}

async fn toggle_swim_style(
    State(state): State<Arc<AppState>>,
    Path(style): Path<String>,
) -> AppResult<Json<DraftResponse>> {
    let style = SwimStyle::parse(&style).ok_or_else(|| {
        AppError::BadRequest(i18n::t_with(
            "validation.unknown_swim_style",
            &[("style", style.as_str())],
        ))
    })?;
    state.session.draft().update(|m| m.toggle_swim_style(style));
    Ok(Json(snapshot(&state)))
}

async fn set_day(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> AppResult<Json<DraftResponse>> {
    let day = parse_day(&day)?;
    state.session.draft().try_update(|m| m.set_day(day))?;
    Ok(Json(snapshot(&state)))
}

async fn remove_day(
    State(state): State<Arc<AppState>>,
    Path(day): Path<String>,
) -> AppResult<Json<DraftResponse>> {
    let day = parse_day(&day)?;
    let removed = state.session.draft().update(|m| m.remove_day(day));
    tracing::debug!("Removed {} windows for {}", removed, day);
    Ok(Json(snapshot(&state)))
}

async fn choose_start(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TimeRequest>,
) -> AppResult<Json<DraftResponse>> {
    let time = parse_time(&body.time)?;
    state.session.draft().try_update(|m| m.choose_start(time))?;
    Ok(Json(snapshot(&state)))
}

async fn choose_end(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TimeRequest>,
) -> AppResult<Json<CommittedWindowResponse>> {
    let time = parse_time(&body.time)?;
    let committed = state.session.draft().try_update(|m| m.choose_end(time))?;
    Ok(Json(CommittedWindowResponse {
        committed,
        draft: snapshot(&state),
    }))
}

async fn cancel_pending(State(state): State<Arc<AppState>>) -> Json<DraftResponse> {
    state.session.draft().update(AvailabilityModel::cancel_pending);
    Json(snapshot(&state))
}

async fn reset(State(state): State<Arc<AppState>>) -> Json<DraftResponse> {
    state.session.draft().update(AvailabilityModel::reset);
    Json(snapshot(&state))
}

/// Outcomes are reported in the body; the status mirrors them
/// (200 succeeded, 422 rejected, 502 failed).
async fn submit(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let outcome = state.session.submit().await?;
    let status = match &outcome {
        SubmissionOutcome::Succeeded { .. } => StatusCode::OK,
        SubmissionOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(outcome)))
}

#[cfg(test)]
mod tests {
    use crate::routes::tests::{call, test_state};
    use crate::services::submission::tests::FakeApi;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn options_list_picker_values() {
        let app = crate::routes::app(test_state(FakeApi::accepting(0)));
        let (status, body) = call(&app, Method::GET, "/api/options", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], json!(["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday"]));
        assert_eq!(body["times"][0], "08:00");
        assert_eq!(body["times"].as_array().unwrap().len(), 14);
        assert_eq!(body["lesson_types"][2]["label"], "Prefer Group");
    }

    #[tokio::test]
    async fn builds_a_window_step_by_step() {
        let app = crate::routes::app(test_state(FakeApi::accepting(0)));

        let (status, _) = call(&app, Method::POST, "/api/draft/days/Monday", None).await;
        assert_eq!(status, StatusCode::OK);
        call(&app, Method::PUT, "/api/draft/pending/start", Some(json!({"time": "08:00"}))).await;

        let (status, body) =
            call(&app, Method::PUT, "/api/draft/pending/end", Some(json!({"time": "07:00"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "End time must be after start time.");

        let (status, body) =
            call(&app, Method::PUT, "/api/draft/pending/end", Some(json!({"time": "10:00"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["committed"], json!({"day": "Monday", "start": "08:00", "end": "10:00"}));
        assert_eq!(body["draft"]["availability"].as_array().unwrap().len(), 1);
        assert!(body["pending"].is_null());
        assert_eq!(body["days"][1]["day"], "Monday");
        assert_eq!(body["days"][1]["set"], true);
        assert_eq!(body["days"][0]["set"], false);
    }

    #[tokio::test]
    async fn rejects_unknown_and_weekend_days() {
        let app = crate::routes::app(test_state(FakeApi::accepting(0)));

        let (status, body) = call(&app, Method::POST, "/api/draft/days/Friday", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = call(&app, Method::POST, "/api/draft/days/Funday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::POST, "/api/draft/swim_styles/doggy", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn incomplete_submit_is_rejected_without_network() {
        let state = test_state(FakeApi::accepting(0));
        let app = crate::routes::app(state);

        call(&app, Method::PUT, "/api/draft/name", Some(json!({"name": "Dana"}))).await;
        let (status, body) = call(&app, Method::POST, "/api/draft/submit", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["outcome"], "rejected");
        assert_eq!(body["message"], "Please complete all fields.");

        let (_, draft) = call(&app, Method::GET, "/api/draft", None).await;
        assert_eq!(draft["draft"]["name"], "Dana");
        assert_eq!(draft["phase"], "idle");
        assert_eq!(draft["last_outcome"]["outcome"], "rejected");
    }

    #[tokio::test]
    async fn complete_submit_succeeds_and_resets() {
        let app = crate::routes::app(test_state(FakeApi::accepting(3)));

        call(&app, Method::PUT, "/api/draft/name", Some(json!({"name": "Dana"}))).await;
        call(
            &app,
            Method::PUT,
            "/api/draft/lesson_type",
            Some(json!({"lesson_type": "private"})),
        )
        .await;
        call(&app, Method::POST, "/api/draft/swim_styles/backstroke", None).await;
        call(&app, Method::POST, "/api/draft/days/Sunday", None).await;
        call(&app, Method::PUT, "/api/draft/pending/start", Some(json!({"time": "16:00"}))).await;
        call(&app, Method::PUT, "/api/draft/pending/end", Some(json!({"time": "18:00"}))).await;

        let (status, body) = call(&app, Method::POST, "/api/draft/submit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "succeeded");
        assert_eq!(body["student_count"], 3);

        let (_, draft) = call(&app, Method::GET, "/api/draft", None).await;
        assert_eq!(draft["draft"]["name"], "");
        assert!(draft["draft"]["lesson_type"].is_null());
    }
}
