// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::MAX_CONTENT_CHARS,
    error::{AppError, SessionError},
    extractors::{AppJson, AppPath},
    models::{
        quiz::GenerateQuizRequest,
        session::SelectAnswerRequest,
        view::SessionView,
    },
    state::SessionStore,
    utils::{
        extract::{ContentSource, resolve_content},
        gemini::QuizGenerator,
        render::{on_select, render, reveal_hint},
    },
};

/// Reads the multipart generation form.
///
/// Fields: `file` (PDF), `text`, `num_questions`, `difficulty`. Unknown fields are ignored.
async fn read_generate_form(mut multipart: Multipart) -> Result<GenerateQuizRequest, AppError> {
    let mut req = GenerateQuizRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                req.document = Some(bytes.to_vec());
            }
            "text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                req.text = Some(text);
            }
            "num_questions" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                req.num_questions = raw.trim().parse().map_err(|_| {
                    AppError::BadRequest(format!("Invalid number of questions '{}'", raw))
                })?;
            }
            "difficulty" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                req.difficulty = raw.parse().map_err(AppError::BadRequest)?;
            }
            other => {
                tracing::debug!("Ignoring unknown form field '{}'", other);
            }
        }
    }

    Ok(req)
}

/// Generates a new quiz for the session from an uploaded PDF or pasted text.
///
/// * Extracts and truncates the source material.
/// * Makes one call to the generator.
/// * On success replaces the session's quiz, answers, score and submitted flag.
/// * On any failure the session is left exactly as it was.
pub async fn generate_quiz(
    State(sessions): State<SessionStore>,
    State(generator): State<Arc<dyn QuizGenerator>>,
    AppPath(session_id): AppPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = read_generate_form(multipart?).await?;

    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !sessions.contains(session_id).await {
        return Err(AppError::NotFound(format!("Session {} not found", session_id)));
    }

    let source = ContentSource {
        document: req.document,
        text: req.text,
    };
    let content = resolve_content(source, MAX_CONTENT_CHARS)
        .await
        .inspect_err(|e| tracing::warn!("Session {}: no usable content: {}", session_id, e))?;

    let quiz = generator
        .generate(&content, req.num_questions, req.difficulty)
        .await
        .map_err(|e| {
            tracing::warn!("Session {}: quiz generation failed: {:?}", session_id, e);
            AppError::from(e)
        })?;

    let difficulty = req.difficulty;
    let view = sessions
        .with_session(session_id, |state| {
            state.install_quiz(quiz, difficulty);
            render(state)
        })
        .await?;

    tracing::info!("Session {}: quiz generated ({})", session_id, difficulty);

    Ok((StatusCode::CREATED, Json(view)))
}

/// Records or clears the selected option for one question.
/// Rejected once the quiz has been submitted.
pub async fn select_answer(
    State(sessions): State<SessionStore>,
    AppPath((session_id, question)): AppPath<(Uuid, usize)>,
    AppJson(req): AppJson<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions
        .with_session(session_id, |state| -> Result<SessionView, SessionError> {
            on_select(state, question, req.option)?;
            Ok(render(state))
        })
        .await??;

    Ok(Json(view))
}

/// Reveals the hint for one question.
pub async fn get_hint(
    State(sessions): State<SessionStore>,
    AppPath((session_id, question)): AppPath<(Uuid, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let hint = sessions
        .with_session(session_id, |state| reveal_hint(state, question))
        .await??;

    Ok(Json(hint))
}

/// Submits the quiz: grades the answers and switches the session to review mode.
pub async fn submit_quiz(
    State(sessions): State<SessionStore>,
    AppPath(session_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions
        .with_session(session_id, |state| -> Result<SessionView, SessionError> {
            let score = state.submit()?;
            tracing::info!(
                "Session {}: quiz submitted, score {}/{}",
                session_id,
                score,
                state.answers().len()
            );
            Ok(render(state))
        })
        .await??;

    Ok(Json(view))
}
