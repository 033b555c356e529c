// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
use quizgen::{config::Config, routes, state::AppState, utils::gemini::GeminiClient};
use serde_json::{Value, json};

pub const TEST_API_KEY: &str = "test-api-key";

/// A request received by the mock generation endpoint.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub api_key: Option<String>,
    pub payload: Value,
}

/// In-process stand-in for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct MockGemini {
    pub url: String,
    response: Arc<Mutex<(StatusCode, String)>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGemini {
    pub fn set_response(&self, status: StatusCode, body: impl Into<String>) {
        *self.response.lock().unwrap() = (status, body.into());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

pub async fn spawn_mock_gemini(status: StatusCode, body: impl Into<String>) -> MockGemini {
    let response = Arc::new(Mutex::new((status, body.into())));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let handler_response = response.clone();
    let handler_calls = calls.clone();
    let app = Router::new().route(
        "/v1beta/generate",
        post(move |headers: HeaderMap, Json(payload): Json<Value>| {
            let response = handler_response.clone();
            let calls = handler_calls.clone();
            async move {
                let api_key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                calls.lock().unwrap().push(RecordedCall { api_key, payload });
                let (status, body) = response.lock().unwrap().clone();
                (status, body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockGemini {
        url: format!(
            "http://127.0.0.1:{}/v1beta/generate",
            port
        ),
        response,
        calls,
    }
}

/// Spawns the app on a random port, generating through `gemini_url`.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app(gemini_url: &str, api_key: Option<&str>) -> String {
    let config = Config {
        gemini_api_key: api_key.map(str::to_string),
        gemini_api_url: gemini_url.to_string(),
        generation_timeout_secs: 10,
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let generator = GeminiClient::new(&config).expect("Failed to build generator");
    let state = AppState::new(config, Arc::new(generator));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Three questions; the correct option of question `i` is option `i`.
pub fn sample_quiz() -> Value {
    let question = |n: usize, correct: usize, hint: Option<&str>| {
        let mut q = json!({
            "question": format!("Question {}", n),
            "answerOptions": (0..3).map(|i| json!({
                "text": format!("Option {}", i),
                "rationale": format!("Rationale {}", i),
                "isCorrect": i == correct,
            })).collect::<Vec<_>>(),
        });
        if let Some(h) = hint {
            q["hint"] = json!(h);
        }
        q
    };

    json!({
        "questions": [
            question(1, 0, Some("Starts at the beginning")),
            question(2, 1, None),
            question(3, 2, Some("Think last")),
        ]
    })
}

/// Wraps a quiz document the way `generateContent` returns it.
pub fn gemini_envelope(quiz: &Value) -> String {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": quiz.to_string()}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Builds a one-page PDF showing `text` in Helvetica, with a valid xref table.
/// The text must be plain ASCII without parentheses or backslashes.
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    pdf.into_bytes()
}

pub async fn create_session(client: &reqwest::Client, address: &str) -> String {
    let response = client
        .post(format!("{}/api/sessions", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    body["session_id"]
        .as_str()
        .expect("session_id missing")
        .to_string()
}

pub fn text_form(text: &str, num_questions: &str, difficulty: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("text", text.to_string())
        .text("num_questions", num_questions.to_string())
        .text("difficulty", difficulty.to_string())
}

pub async fn generate(
    client: &reqwest::Client,
    address: &str,
    session_id: &str,
    form: reqwest::multipart::Form,
) -> reqwest::Response {
    client
        .post(format!("{}/api/sessions/{}/quiz", address, session_id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request")
}

pub async fn get_view(client: &reqwest::Client, address: &str, session_id: &str) -> Value {
    client
        .get(format!("{}/api/sessions/{}", address, session_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

pub async fn select(
    client: &reqwest::Client,
    address: &str,
    session_id: &str,
    question: usize,
    option: Option<usize>,
) -> reqwest::Response {
    client
        .put(format!(
            "{}/api/sessions/{}/answers/{}",
            address, session_id, question
        ))
        .json(&json!({ "option": option }))
        .send()
        .await
        .unwrap()
}

pub fn pdf_form(
    pdf: Vec<u8>,
    text: &str,
    num_questions: &str,
    difficulty: &str,
) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(pdf)
        .file_name("notes.pdf")
        .mime_str("application/pdf")
        .unwrap();
    text_form(text, num_questions, difficulty).part("file", part)
}
