// src/models/quiz.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{config::DEFAULT_QUESTIONS, error::GenerationError};

/// Difficulty label passed to the generator. Influences the instruction only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}'. Expected Easy, Medium or Hard.", other)),
        }
    }
}

/// One selectable answer choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    /// Label shown to the user.
    pub text: String,

    /// Explanation, only revealed in review mode.
    pub rationale: String,

    pub is_correct: bool,
}

/// A generated multiple-choice question.
///
/// Field names follow the response schema sent to the generator
/// (`question`, `answerOptions`, `hint`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,

    #[serde(rename = "answerOptions")]
    #[validate(length(min = 1, message = "A question must have at least one answer option."))]
    pub options: Vec<AnswerOption>,

    #[serde(default)]
    pub hint: Option<String>,
}

impl Question {
    /// Index of the correct option.
    ///
    /// The first option flagged correct wins. `None` when no option is flagged,
    /// in which case the question can never be answered correctly.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|opt| opt.is_correct)
    }

    /// Whether `selected` is the correct option for this question.
    pub fn is_correct_choice(&self, selected: usize) -> bool {
        self.correct_index() == Some(selected)
    }

    /// The hint, treating a blank hint as absent.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}

/// An ordered, immutable set of questions produced by one generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Quiz {
    #[validate(nested)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parses the JSON document produced by the generator
    /// (`{"questions": [...]}`) and checks its structure.
    pub fn from_json(raw: &str) -> Result<Self, GenerationError> {
        let quiz: Quiz = serde_json::from_str(raw)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        quiz.validate()
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(quiz)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

/// Parsed generation form (multipart: `file`, `text`, `num_questions`, `difficulty`).
#[derive(Debug, Validate)]
pub struct GenerateQuizRequest {
    #[validate(range(
        min = 1,
        max = 20,
        message = "Number of questions must be between 1 and 20."
    ))]
    pub num_questions: u8,

    pub difficulty: Difficulty,

    /// Pasted study notes.
    #[validate(length(max = 20000, message = "Pasted text is limited to 20000 characters."))]
    pub text: Option<String>,

    /// Raw bytes of an uploaded PDF.
    pub document: Option<Vec<u8>>,
}

impl Default for GenerateQuizRequest {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_QUESTIONS,
            difficulty: Difficulty::default(),
            text: None,
            document: None,
        }
    }
}
