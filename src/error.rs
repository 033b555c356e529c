// src/error.rs

use axum::{
    Json,
    extract::multipart::MultipartRejection,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Failure of the transport to the generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The endpoint rejected the access key (HTTP 403).
    Forbidden,
    /// Any other network or HTTP failure.
    Other(String),
}

/// Errors produced while turning source material into a quiz.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Neither a document nor text was supplied.
    NoContent,
    /// No access key configured for the generation endpoint.
    MissingCredential,
    Transport(TransportError),
    /// The call succeeded but the body did not have the expected shape.
    MalformedResponse(String),
}

impl GenerationError {
    /// Stable identifier reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::NoContent => "no_content",
            GenerationError::MissingCredential => "missing_credential",
            GenerationError::Transport(TransportError::Forbidden) => "forbidden",
            GenerationError::Transport(TransportError::Other(_)) => "transport",
            GenerationError::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NoContent => write!(
                f,
                "Please upload a file or paste text content to generate a quiz."
            ),
            GenerationError::MissingCredential => write!(
                f,
                "API key not found. Please make sure GEMINI_API_KEY is configured."
            ),
            GenerationError::Transport(TransportError::Forbidden) => write!(
                f,
                "Gemini API request error: access forbidden (403). Check your API key and permissions."
            ),
            GenerationError::Transport(TransportError::Other(msg)) => {
                write!(f, "Gemini API request error: {}", msg)
            }
            GenerationError::MalformedResponse(msg) => write!(
                f,
                "The API returned an invalid response ({}). Please try generating the quiz again.",
                msg
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::FORBIDDEN) {
            return GenerationError::Transport(TransportError::Forbidden);
        }
        if err.is_decode() {
            return GenerationError::MalformedResponse(err.to_string());
        }
        GenerationError::Transport(TransportError::Other(err.to_string()))
    }
}

/// The uploaded document could not be turned into text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionError(pub String);

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing PDF: {}", self.0)
    }
}

impl std::error::Error for ExtractionError {}

/// Rejected session transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No quiz has been generated yet.
    NoQuiz,
    /// The quiz was already submitted and is read-only.
    AlreadySubmitted,
    QuestionOutOfRange { index: usize, len: usize },
    OptionOutOfRange { question: usize, index: usize, len: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoQuiz => write!(f, "No quiz has been generated for this session."),
            SessionError::AlreadySubmitted => {
                write!(f, "The quiz has already been submitted and is read-only.")
            }
            SessionError::QuestionOutOfRange { index, len } => write!(
                f,
                "Question {} does not exist (quiz has {} questions).",
                index, len
            ),
            SessionError::OptionOutOfRange {
                question,
                index,
                len,
            } => write!(
                f,
                "Option {} does not exist for question {} ({} options).",
                index, question, len
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., answering a submitted quiz)
    Conflict(String),

    // 400 / 502 / 503 depending on the kind
    Generation(GenerationError),

    // 422 Unprocessable Entity
    Extraction(ExtractionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => f.write_str(msg),
            AppError::Generation(e) => write!(f, "{}", e),
            AppError::Extraction(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with a status code and a stable `kind`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Generation(err) => {
                let status = match &err {
                    GenerationError::NoContent => StatusCode::BAD_REQUEST,
                    GenerationError::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
                    GenerationError::Transport(_) | GenerationError::MalformedResponse(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, err.kind(), err.to_string())
            }
            AppError::Extraction(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "extraction", err.to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Extraction(err)
    }
}

/// Out-of-range indices are client mistakes; everything else is a state conflict.
impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::QuestionOutOfRange { .. } | SessionError::OptionOutOfRange { .. } => {
                AppError::BadRequest(err.to_string())
            }
            SessionError::NoQuiz | SessionError::AlreadySubmitted => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// A route declared without the parameters its handler extracts is a server bug.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::MissingPathParams(e) => AppError::InternalServerError(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
