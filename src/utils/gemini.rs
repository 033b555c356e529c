// src/utils/gemini.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::{
    config::Config,
    error::{GenerationError, TransportError},
    models::quiz::{Difficulty, Quiz},
};

/// Produces a quiz from source material.
///
/// Implemented by [`GeminiClient`]; the trait lets the HTTP layer run against
/// any generator.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(
        &self,
        content: &str,
        count: u8,
        difficulty: Difficulty,
    ) -> Result<Quiz, GenerationError>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    api_url: Url,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, String> {
        let api_url = Url::parse(&config.gemini_api_url)
            .map_err(|e| format!("Invalid GEMINI_API_URL '{}': {}", config.gemini_api_url, e))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            api_url,
            api_key: config.gemini_api_key.clone(),
        })
    }
}

#[async_trait]
impl QuizGenerator for GeminiClient {
    /// Issues exactly one request. Nothing is retried or cached.
    async fn generate(
        &self,
        content: &str,
        count: u8,
        difficulty: Difficulty,
    ) -> Result<Quiz, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GenerationError::MissingCredential)?;

        let payload = build_payload(content, count, difficulty);

        tracing::info!(
            "Requesting {} {} questions from Gemini ({} chars of content)",
            count,
            difficulty,
            content.chars().count()
        );

        let res = self
            .http
            .post(self.api_url.clone())
            .header("X-Goog-Api-Key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::FORBIDDEN {
            return Err(GenerationError::Transport(TransportError::Forbidden));
        }
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(GenerationError::Transport(TransportError::Other(format!(
                "{}: {}",
                status, text
            ))));
        }

        let body = res.text().await?;
        let quiz = parse_response(&body)?;

        tracing::info!("Gemini returned {} questions", quiz.len());
        Ok(quiz)
    }
}

/// Response envelope of `generateContent`; only the path we read is modelled.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

/// Extracts `candidates[0].content.parts[0].text` and parses it as a quiz.
pub fn parse_response(body: &str) -> Result<Quiz, GenerationError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let text = envelope
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response contained no candidate text".to_string())
        })?;

    Quiz::from_json(text)
}

fn system_prompt(content: &str, count: u8, difficulty: Difficulty) -> String {
    format!(
        "You are an expert quiz generator. Your task is to analyze the provided text content \
         and generate a quiz of exactly {count} multiple-choice questions.\n\
         The quiz must be of '{difficulty}' difficulty.\n\
         Each question must have between 3 and 5 answer options, and exactly one option \
         must be marked correct with isCorrect set to true.\n\
         Every option needs a short rationale explaining why it is right or wrong.\n\
         Add a short study hint to each question that points towards the answer without \
         revealing it.\n\
         Only use facts stated in the content below.\n\n\
         Content for Quiz Generation:\n---\n{content}\n---\n"
    )
}

/// JSON schema the model's output must follow.
fn quiz_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": {"type": "STRING"},
                        "answerOptions": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "text": {"type": "STRING"},
                                    "rationale": {"type": "STRING"},
                                    "isCorrect": {"type": "BOOLEAN"}
                                },
                                "required": ["text", "rationale", "isCorrect"],
                                "propertyOrdering": ["text", "rationale", "isCorrect"]
                            }
                        },
                        "hint": {"type": "STRING"}
                    },
                    "required": ["question", "answerOptions"],
                    "propertyOrdering": ["question", "answerOptions", "hint"]
                }
            }
        },
        "required": ["questions"]
    })
}

/// Request body for one quiz generation call.
pub fn build_payload(content: &str, count: u8, difficulty: Difficulty) -> Value {
    json!({
        "contents": [{"parts": [{"text": "Generate the quiz based on the instructions."}]}],
        "systemInstruction": {"parts": [{"text": system_prompt(content, count, difficulty)}]},
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": quiz_schema()
        }
    })
}
