use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, AppResult};
use crate::models::{EventDetails, LessonId, ScheduleView};
use crate::services::overflow::UnassignedOverflowView;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schedule", get(get_schedule))
        .route("/schedule/refresh", post(refresh_schedule))
        .route("/schedule/events/:id", get(get_event_details))
        .route("/schedule/unassigned", get(get_unassigned))
        .route("/schedule/unassigned/toggle", post(toggle_unassigned))
}

/// Loads the schedule on first access.
async fn get_schedule(State(state): State<Arc<AppState>>) -> AppResult<Json<ScheduleView>> {
    let view = state.session.schedule_or_load().await?;
    Ok(Json(ScheduleView::clone(&view)))
}

async fn refresh_schedule(State(state): State<Arc<AppState>>) -> AppResult<Json<ScheduleView>> {
    let view = state.session.load_schedule().await?;
    Ok(Json(ScheduleView::clone(&view)))
}

async fn get_event_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<LessonId>,
) -> AppResult<Json<EventDetails>> {
    let view = state.session.schedule_or_load().await?;
    view.events
        .iter()
        .find(|e| e.id == id)
        .map(|e| Json(e.details()))
        .ok_or_else(|| AppError::NotFound(format!("Lesson {}", id)))
}

fn render_unassigned(view: &ScheduleView, expanded: bool) -> AppResult<Json<serde_json::Value>> {
    let render = UnassignedOverflowView::new(&view.unassigned, expanded).render();
    let body = serde_json::to_value(render).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(body))
}

async fn get_unassigned(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<serde_json::Value>> {
    let view = state.session.schedule_or_load().await?;
    render_unassigned(&view, state.session.overflow_expanded())
}

async fn toggle_unassigned(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<serde_json::Value>> {
    let view = state.session.schedule_or_load().await?;
    let expanded = state.session.toggle_overflow();
    render_unassigned(&view, expanded)
}
