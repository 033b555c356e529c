// src/handlers/session.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::Config, error::AppError, extractors::AppPath, state::SessionStore,
    utils::render::render,
};

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Starts a new quiz session.
///
/// Idle sessions past the configured TTL are evicted first.
/// Returns 201 Created with the session id and the welcome view.
pub async fn create_session(
    State(sessions): State<SessionStore>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let evicted = sessions.purge_idle(config.session_ttl()).await;
    if evicted > 0 {
        tracing::info!("Evicted {} idle sessions", evicted);
    }

    let session_id = sessions.create().await;
    let view = sessions.with_session(session_id, |state| render(state)).await?;

    tracing::info!("Session {} created", session_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "session_id": session_id,
            "view": view,
        })),
    ))
}

/// Returns the view for the session's current phase.
pub async fn get_session(
    State(sessions): State<SessionStore>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.with_session(session_id, |state| render(state)).await?;
    Ok(Json(view))
}

/// Ends a session and discards its quiz.
pub async fn delete_session(
    State(sessions): State<SessionStore>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !sessions.remove(session_id).await {
        return Err(AppError::NotFound(format!("Session {} not found", session_id)));
    }
    tracing::info!("Session {} ended", session_id);
    Ok(StatusCode::NO_CONTENT)
}
