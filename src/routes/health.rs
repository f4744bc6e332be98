use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::services::init::redact_url;
use crate::services::session::Screen;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub scheduler: String,
    pub screen: Screen,
    pub schedule_loaded: bool,
}

/// Liveness only: a down scheduling service does not make this unhealthy.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        scheduler: redact_url(&state.config.scheduler.base_url),
        screen: state.session.screen(),
        schedule_loaded: state.session.schedule().is_some(),
    };

    (StatusCode::OK, Json(response))
}
