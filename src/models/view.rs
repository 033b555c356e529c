// src/models/view.rs

use serde::Serialize;

use crate::{models::quiz::Difficulty, utils::grading::PerformanceBand};

/// What a client should display for a session, tagged by `mode`.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionView {
    Welcome(WelcomeView),
    Active(ActiveQuizView),
    Review(ReviewView),
}

/// Landing screen shown before any quiz exists.
#[derive(Debug, Serialize)]
pub struct WelcomeView {
    pub message: &'static str,
    pub steps: Vec<&'static str>,
    pub min_questions: u8,
    pub max_questions: u8,
    pub default_questions: u8,
    pub max_content_chars: usize,
    pub difficulties: Vec<Difficulty>,
}

#[derive(Debug, Serialize)]
pub struct ActiveQuizView {
    pub difficulty: Difficulty,
    pub total_questions: usize,
    pub answered: usize,
    pub questions: Vec<ActiveQuestionView>,
}

/// An answerable question. The hint is fetched separately, on demand.
#[derive(Debug, Serialize)]
pub struct ActiveQuestionView {
    pub index: usize,
    pub number: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub has_hint: bool,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub difficulty: Difficulty,
    pub summary: ResultSummary,
    pub questions: Vec<ReviewQuestionView>,
}

#[derive(Debug, Serialize)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub band: PerformanceBand,
    pub feedback: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReviewQuestionView {
    pub index: usize,
    pub number: usize,
    pub prompt: String,
    pub options: Vec<ReviewOptionView>,
    pub selected: Option<usize>,
    pub answered_correctly: bool,
    /// Rationale of the correct option.
    pub rationale: String,
    pub hint: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewOptionView {
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMark {
    Correct,
    /// The user's selection, when it differs from the correct option.
    Incorrect,
    Plain,
}

/// Response body of the hint endpoint.
#[derive(Debug, Serialize)]
pub struct HintView {
    pub index: usize,
    pub hint: String,
}
