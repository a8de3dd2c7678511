//! One quiz attempt: the per-question answer/check/advance cycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Choice, Question};
use crate::report::Report;

/// Error from a session operation. All variants are recoverable caller
/// errors; the session is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The filter yielded zero questions; no session was created.
    EmptySelection,
    /// Answer or advance on a session whose questions are exhausted.
    Completed,
    /// Advance requested before the current answer was checked.
    NotChecked,
    /// Report requested before the session completed.
    NotCompleted,
    /// An operation needing a live session found none.
    NoSession,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptySelection => {
                write!(f, "no questions match the selected filters")
            }
            SessionError::Completed => write!(f, "the quiz is already finished"),
            SessionError::NotChecked => {
                write!(f, "check the current answer before moving on")
            }
            SessionError::NotCompleted => {
                write!(f, "the quiz is not finished yet")
            }
            SessionError::NoSession => write!(f, "no quiz is running"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Feedback shown after checking an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Incorrect {
        correct: Choice,
        correct_text: String,
        justification: Option<String>,
    },
}

impl Feedback {
    fn for_answer(question: &Question, choice: Choice) -> Self {
        if choice == question.correct_choice {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct: question.correct_choice,
                correct_text: question.choice_text(question.correct_choice).to_string(),
                justification: question.trimmed_justification().map(String::from),
            }
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }

    /// The user-facing message, in the source bank's language.
    pub fn message(&self) -> String {
        match self {
            Feedback::Correct => "Bonne réponse !".to_string(),
            Feedback::Incorrect {
                correct,
                correct_text,
                ..
            } => format!(
                "Mauvaise réponse. La bonne réponse était : {} - {}",
                correct, correct_text
            ),
        }
    }

    pub fn justification(&self) -> Option<&str> {
        match self {
            Feedback::Correct => None,
            Feedback::Incorrect { justification, .. } => justification.as_deref(),
        }
    }
}

/// One quiz attempt over a fixed draw of questions.
///
/// The draw happens once at start; the session then only moves forward:
/// answers may be rewritten freely until `advance` commits the current
/// question's score, after which the cursor never returns to it.
///
/// Serializable as a whole: the snapshot/resume feature writes the struct
/// verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    questions: Vec<Question>,
    cursor: usize,
    answers: Vec<Option<Choice>>,
    feedback: Vec<Option<Feedback>>,
    checked: Vec<bool>,
    score: usize,
    #[serde(rename = "start_time")]
    started_at: DateTime<Utc>,
}

impl Session {
    /// Begin a session over an already-drawn question sequence.
    ///
    /// Fails with `EmptySelection` when the draw is empty; callers keep
    /// whatever state they had.
    pub fn start(questions: Vec<Question>, now: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let len = questions.len();
        Ok(Self {
            questions,
            cursor: 0,
            answers: vec![None; len],
            feedback: vec![None; len],
            checked: vec![false; len],
            score: 0,
            started_at: now,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<Choice>] {
        &self.answers
    }

    /// The question under the cursor, None once completed.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Feedback for the question under the cursor, None until checked.
    pub fn current_feedback(&self) -> Option<&Feedback> {
        self.feedback.get(self.cursor)?.as_ref()
    }

    /// Record and check an answer for the current question.
    ///
    /// Allowed repeatedly before `advance`: a later submission overwrites
    /// the earlier one, feedback included.
    pub fn submit_answer(&mut self, choice: Choice) -> Result<&Feedback, SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        let feedback = Feedback::for_answer(&self.questions[self.cursor], choice);
        self.answers[self.cursor] = Some(choice);
        self.checked[self.cursor] = true;
        Ok(self.feedback[self.cursor].insert(feedback))
    }

    /// Commit the current question and move to the next.
    ///
    /// The score delta is evaluated here, not at submit time, so the last
    /// recorded answer always wins. Advancing an unchecked question is
    /// rejected rather than silently scored.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        if !self.checked[self.cursor] {
            return Err(SessionError::NotChecked);
        }
        if self.answers[self.cursor] == Some(self.questions[self.cursor].correct_choice) {
            self.score += 1;
        }
        self.cursor += 1;
        Ok(())
    }

    /// Build the final report. Pure; valid only once completed.
    pub fn report(&self, now: DateTime<Utc>) -> Result<Report, SessionError> {
        if !self.is_completed() {
            return Err(SessionError::NotCompleted);
        }
        Ok(Report::build(
            &self.questions,
            &self.answers,
            self.score,
            now - self.started_at,
        ))
    }
}
