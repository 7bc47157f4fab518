//! HTTP routes for the tutoring API.
//!
//! Handlers are thin: they decode JSON, call [`TutorService`], and encode
//! the result. All domain behaviour lives in the tutor crate.
//!
//! [`TutorService`]: lingo_tutor_tutor::TutorService

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    routing::{delete, get, post},
};
use lingo_tutor_core::LanguageInfo;
use lingo_tutor_tutor::{
    NewSessionRequest, NewSessionResponse, ResetRequest, ResolveSessionRequest,
    ResolveSessionResponse, SweepReport, TurnRequest, TurnResponse,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Lingo AI Backend";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: &'static [LanguageInfo],
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Builds the API router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/session", post(resolve_session))
        .route("/api/session/new", post(new_session))
        .route("/api/session/reset", post(reset_session))
        .route("/api/session/{id}", delete(end_session))
        .route("/api/languages", get(languages))
        .route("/api/maintenance/sweep", post(sweep))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let response = state.tutor.submit_turn(request).await?;
    Ok(Json(response))
}

async fn resolve_session(
    State(state): State<AppState>,
    Json(request): Json<ResolveSessionRequest>,
) -> Json<ResolveSessionResponse> {
    Json(state.tutor.resolve_session(request).await)
}

async fn new_session(
    State(state): State<AppState>,
    Json(request): Json<NewSessionRequest>,
) -> Json<NewSessionResponse> {
    Json(state.tutor.new_session(request).await)
}

async fn reset_session(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.tutor.reset(request).await?;
    Ok(Json(MessageResponse {
        message: "Conversation reset successfully",
    }))
}

async fn end_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.tutor.end_session(&id).await {
        tracing::info!(session_id = %id, "session ended");
    }
    StatusCode::NO_CONTENT
}

async fn languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: state.tutor.languages(),
    })
}

async fn sweep(State(state): State<AppState>) -> Json<SweepReport> {
    let report = state.tutor.sweep_expired().await;
    if report.removed_count > 0 {
        tracing::info!(removed_sessions = report.removed_count, "manual session sweep");
    }
    Json(report)
}
