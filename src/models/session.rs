// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::SessionError,
    models::quiz::{Difficulty, Quiz},
    utils::grading::grade,
};

/// Per-question record of the user's current selection.
///
/// Dense: one slot per question of the quiz it was created for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerMap(Vec<Option<usize>>);

impl AnswerMap {
    /// An all-unset map for a quiz with `len` questions.
    pub fn unset(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selection for `question`, `None` when unset or out of range.
    pub fn get(&self, question: usize) -> Option<usize> {
        self.0.get(question).copied().flatten()
    }

    /// Replaces a single slot. Option indices are not checked here.
    pub fn set(&mut self, question: usize, option: Option<usize>) -> Result<(), SessionError> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(question)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question,
                len,
            })?;
        *slot = option;
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Which screen a session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No quiz yet.
    Idle,
    /// Quiz present, not yet submitted.
    Active,
    /// Quiz submitted and graded. Read-only until the next generation.
    Review,
}

/// State owned by a single user session.
#[derive(Debug, Clone)]
pub struct SessionState {
    quiz: Option<Quiz>,
    answers: AnswerMap,
    submitted: bool,
    score: usize,
    difficulty: Difficulty,
    last_active: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            quiz: None,
            answers: AnswerMap::default(),
            submitted: false,
            score: 0,
            difficulty: Difficulty::default(),
            last_active: Utc::now(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.quiz, self.submitted) {
            (None, _) => SessionPhase::Idle,
            (Some(_), false) => SessionPhase::Active,
            (Some(_), true) => SessionPhase::Review,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Installs a freshly generated quiz, discarding everything about the previous one.
    ///
    /// Valid from every phase.
    pub fn install_quiz(&mut self, quiz: Quiz, difficulty: Difficulty) {
        self.answers = AnswerMap::unset(quiz.len());
        self.quiz = Some(quiz);
        self.submitted = false;
        self.score = 0;
        self.difficulty = difficulty;
    }

    /// Records (or clears, with `None`) the selection for one question.
    pub fn select(&mut self, question: usize, option: Option<usize>) -> Result<(), SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::NoQuiz)?;
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let q = quiz.get(question).ok_or(SessionError::QuestionOutOfRange {
            index: question,
            len: quiz.len(),
        })?;

        if let Some(index) = option {
            if index >= q.options.len() {
                return Err(SessionError::OptionOutOfRange {
                    question,
                    index,
                    len: q.options.len(),
                });
            }
        }

        self.answers.set(question, option)
    }

    /// Grades the current answers and locks the quiz. Returns the score.
    pub fn submit(&mut self) -> Result<usize, SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::NoQuiz)?;
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        self.score = grade(quiz, &self.answers);
        self.submitted = true;
        Ok(self.score)
    }
}

/// DTO for changing one selection. `null` clears the choice.
#[derive(Debug, Deserialize)]
pub struct SelectAnswerRequest {
    pub option: Option<usize>,
}
