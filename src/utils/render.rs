// src/utils/render.rs

use crate::{
    config::{DEFAULT_QUESTIONS, MAX_CONTENT_CHARS, MAX_QUESTIONS, MIN_QUESTIONS},
    error::SessionError,
    models::{
        quiz::{Difficulty, Question, Quiz},
        session::{AnswerMap, SessionPhase, SessionState},
        view::{
            ActiveQuestionView, ActiveQuizView, HintView, OptionMark, ResultSummary,
            ReviewOptionView, ReviewQuestionView, ReviewView, SessionView, WelcomeView,
        },
    },
    utils::{
        grading::{PerformanceBand, score_percentage},
        html::clean_html,
    },
};

pub const ACTIVE_HINT_PLACEHOLDER: &str = "Hint not available.";
pub const REVIEW_HINT_PLACEHOLDER: &str = "Hint not available for this question.";
pub const NO_CORRECT_OPTION_RATIONALE: &str = "No option was marked correct for this question.";

const WELCOME_MESSAGE: &str =
    "Welcome! Use the quiz control panel to create your custom AI quiz.";

const WELCOME_STEPS: [&str; 3] = [
    "Provide Content: upload a document or paste text.",
    "Set Parameters: choose the number of questions and the difficulty level (Easy, Medium, or Hard).",
    "Launch: click Generate New Quiz to launch the AI generator.",
];

/// Builds the view for the session's current phase. Never mutates the session.
pub fn render(state: &SessionState) -> SessionView {
    match (state.phase(), state.quiz()) {
        (SessionPhase::Active, Some(quiz)) => {
            SessionView::Active(render_active(quiz, state.answers(), state.difficulty()))
        }
        (SessionPhase::Review, Some(quiz)) => SessionView::Review(render_review(
            quiz,
            state.answers(),
            state.score(),
            state.difficulty(),
        )),
        _ => SessionView::Welcome(render_welcome()),
    }
}

/// Records a selection made in the active view.
pub fn on_select(
    state: &mut SessionState,
    question: usize,
    option: Option<usize>,
) -> Result<(), SessionError> {
    state.select(question, option)
}

/// Reveals the hint of one question, with a placeholder when there is none.
pub fn reveal_hint(state: &SessionState, question: usize) -> Result<HintView, SessionError> {
    let quiz = state.quiz().ok_or(SessionError::NoQuiz)?;
    let q = quiz.get(question).ok_or(SessionError::QuestionOutOfRange {
        index: question,
        len: quiz.len(),
    })?;

    Ok(HintView {
        index: question,
        hint: clean_html(q.hint().unwrap_or(ACTIVE_HINT_PLACEHOLDER)),
    })
}

fn render_welcome() -> WelcomeView {
    WelcomeView {
        message: WELCOME_MESSAGE,
        steps: WELCOME_STEPS.to_vec(),
        min_questions: MIN_QUESTIONS,
        max_questions: MAX_QUESTIONS,
        default_questions: DEFAULT_QUESTIONS,
        max_content_chars: MAX_CONTENT_CHARS,
        difficulties: Difficulty::ALL.to_vec(),
    }
}

/// A stored selection is only shown if it still points at an existing option.
fn visible_selection(question: &Question, answers: &AnswerMap, index: usize) -> Option<usize> {
    answers
        .get(index)
        .filter(|&selected| selected < question.options.len())
}

pub(crate) fn render_active(
    quiz: &Quiz,
    answers: &AnswerMap,
    difficulty: Difficulty,
) -> ActiveQuizView {
    let questions: Vec<ActiveQuestionView> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| ActiveQuestionView {
            index: i,
            number: i + 1,
            prompt: clean_html(&q.prompt),
            options: q.options.iter().map(|opt| clean_html(&opt.text)).collect(),
            selected: visible_selection(q, answers, i),
            has_hint: q.hint().is_some(),
        })
        .collect();

    ActiveQuizView {
        difficulty,
        total_questions: quiz.len(),
        answered: questions.iter().filter(|q| q.selected.is_some()).count(),
        questions,
    }
}

pub(crate) fn render_review(
    quiz: &Quiz,
    answers: &AnswerMap,
    score: usize,
    difficulty: Difficulty,
) -> ReviewView {
    let questions = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let correct = q.correct_index();
            let selected = visible_selection(q, answers, i);

            let options = q
                .options
                .iter()
                .enumerate()
                .map(|(j, opt)| {
                    let mark = if Some(j) == correct {
                        OptionMark::Correct
                    } else if Some(j) == selected {
                        OptionMark::Incorrect
                    } else {
                        OptionMark::Plain
                    };
                    ReviewOptionView {
                        text: clean_html(&opt.text),
                        mark,
                    }
                })
                .collect();

            let rationale = correct
                .and_then(|c| q.options.get(c))
                .map(|opt| opt.rationale.as_str())
                .unwrap_or(NO_CORRECT_OPTION_RATIONALE);

            ReviewQuestionView {
                index: i,
                number: i + 1,
                prompt: clean_html(&q.prompt),
                options,
                selected,
                answered_correctly: selected.is_some() && selected == correct,
                rationale: clean_html(rationale),
                hint: clean_html(q.hint().unwrap_or(REVIEW_HINT_PLACEHOLDER)),
            }
        })
        .collect();

    let total = quiz.len();
    let percentage = score_percentage(score, total);
    let band = PerformanceBand::from_percentage(percentage);

    ReviewView {
        difficulty,
        summary: ResultSummary {
            score,
            total,
            percentage,
            band,
            feedback: band.message(),
        },
        questions,
    }
}
