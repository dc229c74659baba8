//! HTTP server module

mod api;
mod integrity;
mod quiz;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::AppState;

pub use api::HealthResponse;
pub use integrity::{ClearSessionResponse, LogReceivedResponse};

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/assessment/quiz/answer", post(quiz::answer))
        .route("/assessment/integrity-log", post(integrity::record))
        .route(
            "/assessment/integrity-logs/:session_id",
            get(integrity::list),
        )
        .route(
            "/assessment/clear-session/:session_id",
            post(integrity::clear_session),
        )
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
