// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{quiz, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Session lifecycle and quiz interaction routes under `/api/sessions`.
/// * Body limit on the generation route sized for PDF uploads.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let session_routes = Router::new()
        .route("/", post(session::create_session))
        .route(
            "/{id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route(
            "/{id}/quiz",
            post(quiz::generate_quiz)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/{id}/answers/{question}", put(quiz::select_answer))
        .route("/{id}/questions/{question}/hint", get(quiz::get_hint))
        .route("/{id}/submit", post(quiz::submit_quiz));

    Router::new()
        .route("/api/health", get(session::health))
        .nest("/api/sessions", session_routes)
        .fallback(session::route_not_found)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
