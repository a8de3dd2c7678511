//! # amf-quiz
//!
//! Quiz engine for the AMF certification exam: an immutable question bank
//! loaded from a CSV table, and a session state machine that draws a
//! random subset, checks answers one at a time and produces a final score
//! report. Training mode samples freely over user filters; exam mode draws
//! a fixed composition (per-chapter quotas, per-category targets).
//!
//! The crate contains no UI: a shell (CLI, web, whatever) drives a
//! [`QuizApp`] with user actions and renders from its state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use amf_quiz::{Choice, QuestionBank, QuizApp, QuizError, QuizMode, FilterCriteria};
//!
//! fn main() -> Result<(), QuizError> {
//!     let bank = QuestionBank::load("questions_amf.csv")?;
//!     let mut app = QuizApp::new(bank);
//!
//!     let mode = QuizMode::Training {
//!         criteria: FilterCriteria {
//!             themes: app.bank().themes().into_iter().collect(),
//!             sub_themes: Default::default(),
//!             categories: app.bank().categories().into_iter().collect(),
//!         },
//!         sample_size: 10,
//!     };
//!     app.start(&mode, &mut rand::thread_rng())?;
//!
//!     while let Some(question) = app.session().and_then(|s| s.current_question()) {
//!         println!("{}", question.text);
//!         let feedback = app.submit_answer(Choice::A)?;
//!         println!("{}", feedback.message());
//!         app.advance()?;
//!     }
//!
//!     let report = app.report()?;
//!     println!("Score : {} / {}", report.score, report.total);
//!     Ok(())
//! }
//! ```

mod app;
mod bank;
mod data;
mod models;
mod report;
mod session;
mod storage;

use std::fmt;

pub use app::{ExamBlueprint, QuizApp, QuizMode};
pub use bank::{FilterCriteria, QuestionBank};
pub use data::{LoadError, load_questions_from_csv, load_questions_from_reader};
pub use models::{AppState, Choice, Question};
pub use report::{GroupStat, Report, ReportRow};
pub use session::{Feedback, Session, SessionError};
pub use storage::{
    StorageError, append_score, detail_file_name, load_snapshot, remove_snapshot, save_snapshot,
    write_detail_file,
};

/// Error type for quiz operations.
#[derive(Debug)]
pub enum QuizError {
    /// Error loading the question table.
    Load(LoadError),
    /// Invalid session operation (empty selection, unchecked advance, ...).
    Session(SessionError),
    /// Error persisting scores, details or the session snapshot.
    Storage(StorageError),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::Load(e) => write!(f, "Failed to load questions: {}", e),
            QuizError::Session(e) => write!(f, "Session error: {}", e),
            QuizError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Load(e) => Some(e),
            QuizError::Session(e) => Some(e),
            QuizError::Storage(e) => Some(e),
        }
    }
}

impl From<LoadError> for QuizError {
    fn from(err: LoadError) -> Self {
        QuizError::Load(err)
    }
}

impl From<SessionError> for QuizError {
    fn from(err: SessionError) -> Self {
        QuizError::Session(err)
    }
}

impl From<StorageError> for QuizError {
    fn from(err: StorageError) -> Self {
        QuizError::Storage(err)
    }
}
