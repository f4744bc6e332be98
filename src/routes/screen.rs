use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::session::Screen;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/screen", get(get_screen).put(set_screen))
        .route("/screen/stream", get(screen_stream))
        .route("/students/count", get(get_count).post(refresh_count))
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub screen: Screen,
    pub student_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetScreenRequest {
    pub screen: Screen,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// `None` until the first successful fetch.
    pub count: Option<u32>,
    pub screen: Screen,
}

fn screen_response(state: &AppState) -> ScreenResponse {
    ScreenResponse {
        screen: state.session.screen(),
        student_count: state.session.student_count(),
    }
}

async fn get_screen(State(state): State<Arc<AppState>>) -> Json<ScreenResponse> {
    Json(screen_response(&state))
}

/// Opening the schedule screen fetches a fresh snapshot; a failed fetch is
/// reported, but the screen has switched regardless.
async fn set_screen(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetScreenRequest>,
) -> AppResult<Json<ScreenResponse>> {
    tracing::debug!("Navigating to {:?}", body.screen);
    state.session.set_screen(body.screen).await?;
    Ok(Json(screen_response(&state)))
}

/// Emits the current screen, then one `screen` event per change.
async fn screen_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.session.subscribe_screen();

    let stream = futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let screen = *rx.borrow_and_update();
        let event = Event::default().event("screen").json_data(screen);
        Some((event, (rx, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn get_count(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.session.student_count(),
        screen: state.session.screen(),
    })
}

async fn refresh_count(State(state): State<Arc<AppState>>) -> AppResult<Json<CountResponse>> {
    let count = state.session.refresh_student_count().await?;
    Ok(Json(CountResponse {
        count: Some(count),
        screen: state.session.screen(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::routes::tests::{call, test_state};
    use crate::services::submission::tests::FakeApi;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn navigates_between_screens() {
        let api = FakeApi::accepting(0);
        let empty = json!({"assigned_lessons": [], "unassigned_lessons": []});
        *api.schedule.lock().unwrap() = Some(empty);
        let app = crate::routes::app(test_state(api));

        let (_, body) = call(&app, Method::GET, "/api/screen", None).await;
        assert_eq!(body["screen"], "submission");

        let (status, body) =
            call(&app, Method::PUT, "/api/screen", Some(json!({"screen": "schedule"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["screen"], "schedule");

        let (_, health) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(health["schedule_loaded"], true);
    }

    #[tokio::test]
    async fn schedule_fetch_failure_on_navigation_is_reported() {
        let app = crate::routes::app(test_state(FakeApi::accepting(0)));

        let (status, _) =
            call(&app, Method::PUT, "/api/screen", Some(json!({"screen": "schedule"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (_, body) = call(&app, Method::GET, "/api/screen", None).await;
        assert_eq!(body["screen"], "schedule");
    }

    #[tokio::test]
    async fn count_refresh_at_capacity_switches_screen() {
        let app = crate::routes::app(test_state(FakeApi::accepting(31)));

        let (_, body) = call(&app, Method::GET, "/api/students/count", None).await;
        assert!(body["count"].is_null());

        let (status, body) = call(&app, Method::POST, "/api/students/count", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 31);
        assert_eq!(body["screen"], "schedule");
    }

    #[tokio::test]
    async fn count_failure_is_bad_gateway() {
        let api = FakeApi::accepting(0);
        *api.count.lock().unwrap() = Err(AppError::SchedulerApi("down".to_string()));
        let app = crate::routes::app(test_state(api));

        let (status, body) = call(&app, Method::POST, "/api/students/count", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SCHEDULER_API_ERROR");
    }
}
