// src/utils/grading.rs

use serde::Serialize;

use crate::models::{quiz::Quiz, session::AnswerMap};

/// Counts the questions whose selected option is the correct one.
///
/// Unset answers and stale out-of-range indices count as incorrect.
/// The result is always within `0..=quiz.len()`.
pub fn grade(quiz: &Quiz, answers: &AnswerMap) -> usize {
    quiz.questions
        .iter()
        .enumerate()
        .filter(|(i, question)| {
            answers
                .get(*i)
                .is_some_and(|selected| question.is_correct_choice(selected))
        })
        .count()
}

/// Score as a percentage of the question count. An empty quiz scores 0.
pub fn score_percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (score as f64 / total as f64) * 100.0
}

/// Feedback bucket shown with the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// 80% and above.
    Mastery,
    /// 50% and above.
    SolidEffort,
    NeedsReview,
}

impl PerformanceBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            PerformanceBand::Mastery
        } else if percentage >= 50.0 {
            PerformanceBand::SolidEffort
        } else {
            PerformanceBand::NeedsReview
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceBand::Mastery => "Mastery Achieved!",
            PerformanceBand::SolidEffort => "Solid Effort!",
            PerformanceBand::NeedsReview => "Needs Review!",
        }
    }
}
