// src/utils/extract.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, ExtractionError, GenerationError};

static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    // Blank-line runs collapse to one paragraph break, other runs to a space.
    Regex::new(r"[ \t\r\f\v]*\n[ \t\r\f\v]*(\n[ \t\r\f\v]*)+|[ \t\r\f\v]+").expect("valid regex")
});

/// Source material supplied with a generation request.
#[derive(Debug, Default)]
pub struct ContentSource {
    /// Raw bytes of an uploaded PDF.
    pub document: Option<Vec<u8>>,
    /// Pasted study notes.
    pub text: Option<String>,
}

/// Extracts text from a PDF held in memory.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError(e.to_string()))
}

/// Collapses the whitespace noise PDF extraction leaves behind.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUNS
        .replace_all(text.trim(), |caps: &regex::Captures| {
            if caps[0].contains('\n') {
                "\n\n"
            } else {
                " "
            }
        })
        .into_owned()
}

/// Keeps at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Turns the supplied source into the bounded plain text sent to the generator.
///
/// A document takes precedence over pasted text. PDF parsing runs on the
/// blocking pool. A parser panic is reported as an extraction error, a
/// cancelled task as an internal error.
pub async fn resolve_content(source: ContentSource, max_chars: usize) -> Result<String, AppError> {
    let text = match (source.document, source.text) {
        (Some(bytes), _) if !bytes.is_empty() => {
            let extracted = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
                .await
                .map_err(|e| {
                    if e.is_panic() {
                        tracing::warn!("PDF parser panicked: {:?}", e);
                        AppError::from(ExtractionError(
                            "the document could not be parsed".to_string(),
                        ))
                    } else {
                        AppError::InternalServerError(format!("PDF extraction task failed: {}", e))
                    }
                })??;

            let normalized = normalize_whitespace(&extracted);
            if normalized.is_empty() {
                return Err(ExtractionError(
                    "the document contains no extractable text".to_string(),
                )
                .into());
            }
            normalized
        }
        (_, Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
        _ => return Err(GenerationError::NoContent.into()),
    };

    Ok(truncate_chars(&text, max_chars).to_string())
}
