use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod draft;
pub mod health;
pub mod schedule;
pub mod screen;

/// Full router without CORS; the CORS origin is applied by `main`.
pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(draft::router())
        .merge(screen::router())
        .merge(schedule::router());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
