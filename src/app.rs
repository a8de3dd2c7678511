//! The quiz engine façade: one bank, at most one live session.
//!
//! The UI shell holds a `QuizApp` and drives it with user actions; every
//! mutable bit of quiz state lives in the session owned here, never in
//! ambient globals.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::QuizError;
use crate::bank::{FilterCriteria, QuestionBank};
use crate::models::{AppState, Choice, Question};
use crate::report::Report;
use crate::session::{Feedback, Session, SessionError};
use crate::storage;

/// Fixed composition of an exam draw: per-chapter quotas, then per-category
/// targets applied to the stratified result. Empty targets skip the second
/// pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamBlueprint {
    pub quota_by_theme: BTreeMap<String, usize>,
    #[serde(default)]
    pub target_by_category: BTreeMap<String, usize>,
}

/// How `start` computes the drawn questions. The training and exam
/// variants of the source are two configurations of the same engine.
#[derive(Debug, Clone)]
pub enum QuizMode {
    /// Free draw over user-chosen filters.
    Training {
        criteria: FilterCriteria,
        sample_size: usize,
    },
    /// Stratified draw with a fixed composition.
    Exam { blueprint: ExamBlueprint },
}

/// The engine: owns the read-only bank and the optional live session.
pub struct QuizApp {
    bank: QuestionBank,
    session: Option<Session>,
}

impl QuizApp {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            session: None,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> AppState {
        match &self.session {
            None => AppState::Idle,
            Some(s) if s.is_completed() => AppState::Completed,
            Some(_) => AppState::InProgress,
        }
    }

    /// Draw questions per the mode and begin a fresh session.
    ///
    /// On `EmptySelection` the previous state (idle or an earlier session)
    /// is left untouched; on success any earlier session is replaced.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        mode: &QuizMode,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let drawn = self.draw(mode, rng);
        let session = Session::start(drawn, Utc::now())?;
        self.session = Some(session);
        Ok(())
    }

    fn draw<R: Rng + ?Sized>(&self, mode: &QuizMode, rng: &mut R) -> Vec<Question> {
        match mode {
            QuizMode::Training {
                criteria,
                sample_size,
            } => self.bank.filter(criteria).sample(*sample_size, rng),
            QuizMode::Exam { blueprint } => {
                if blueprint.target_by_category.is_empty() {
                    self.bank.stratified_sample(&blueprint.quota_by_theme, rng)
                } else {
                    self.bank.stratified_sample_with_category_targets(
                        &blueprint.quota_by_theme,
                        &blueprint.target_by_category,
                        rng,
                    )
                }
            }
        }
    }

    /// Record and check an answer for the current question.
    pub fn submit_answer(&mut self, choice: Choice) -> Result<&Feedback, SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NoSession)?
            .submit_answer(choice)
    }

    /// Commit the current question and move on.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NoSession)?
            .advance()
    }

    /// Build the final report for a completed session.
    pub fn report(&self) -> Result<Report, SessionError> {
        self.session
            .as_ref()
            .ok_or(SessionError::NoSession)?
            .report(Utc::now())
    }

    /// Discard the session and return to the filter screen.
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Append the score row and write the per-question detail file.
    ///
    /// Both land under `dir`; the two writes are independent, there is no
    /// transaction across them. Returns the detail file path.
    pub fn save_results<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, QuizError> {
        let report = self.report()?;
        let saved_at = Utc::now();
        let dir = dir.as_ref();
        storage::append_score(dir.join("scores.csv"), &report, saved_at)?;
        let detail_path = storage::write_detail_file(dir, &report, saved_at)?;
        Ok(detail_path)
    }

    /// Snapshot the live session for resume-after-interruption.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<(), QuizError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        storage::save_snapshot(path, session)?;
        Ok(())
    }

    /// Restore the session from a snapshot file, if one exists and no
    /// session is currently live. Returns whether a session was restored.
    pub fn resume_from_snapshot<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, QuizError> {
        if self.session.is_some() {
            return Ok(false);
        }
        match storage::load_snapshot(path)? {
            Some(session) => {
                self.session = Some(session);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn question(theme: &str, category: &str, text: &str, correct: Choice) -> Question {
        Question {
            theme: theme.to_string(),
            sub_theme: "Déontologie".to_string(),
            category: category.to_string(),
            text: text.to_string(),
            choice_a: "Un".to_string(),
            choice_b: "Deux".to_string(),
            choice_c: "Trois".to_string(),
            correct_choice: correct,
            justification: None,
        }
    }

    fn app() -> QuizApp {
        QuizApp::new(QuestionBank::new(vec![
            question("1", "C", "q1", Choice::A),
            question("1", "C", "q2", Choice::B),
            question("1", "C", "q3", Choice::C),
            question("2", "A", "q4", Choice::A),
        ]))
    }

    fn training(themes: &[&str], categories: &[&str], sample_size: usize) -> QuizMode {
        QuizMode::Training {
            criteria: FilterCriteria {
                themes: themes.iter().map(|s| s.to_string()).collect(),
                sub_themes: BTreeSet::new(),
                categories: categories.iter().map(|s| s.to_string()).collect(),
            },
            sample_size,
        }
    }

    #[test]
    fn test_full_training_run() {
        let mut app = app();
        assert_eq!(app.state(), AppState::Idle);

        // Theme 1 / category C holds 3 questions; asking for 10 yields all 3.
        let mut rng = StdRng::seed_from_u64(1);
        app.start(&training(&["1"], &["C"], 10), &mut rng).unwrap();
        assert_eq!(app.state(), AppState::InProgress);
        assert_eq!(app.session().unwrap().total(), 3);

        while app.state() == AppState::InProgress {
            let correct = app.session().unwrap().current_question().unwrap().correct_choice;
            let feedback = app.submit_answer(correct).unwrap();
            assert!(feedback.is_correct());
            app.advance().unwrap();
        }

        assert_eq!(app.state(), AppState::Completed);
        let report = app.report().unwrap();
        assert_eq!(report.score, 3);
        assert_eq!(report.total, 3);
        assert_eq!(report.by_group[0].key, "C / Déontologie");
        assert_eq!(report.by_group[0].correct, 3);
        assert_eq!(report.by_group[0].total, 3);
    }

    #[test]
    fn test_empty_selection_leaves_state_untouched() {
        let mut app = app();
        let mut rng = StdRng::seed_from_u64(1);

        // Nothing in theme 3.
        let err = app.start(&training(&["3"], &["C"], 5), &mut rng).unwrap_err();
        assert_eq!(err, SessionError::EmptySelection);
        assert_eq!(app.state(), AppState::Idle);

        // A live session survives a failed restart too.
        app.start(&training(&["1"], &["C"], 2), &mut rng).unwrap();
        let before = app.session().unwrap().total();
        let err = app.start(&training(&["3"], &["C"], 5), &mut rng).unwrap_err();
        assert_eq!(err, SessionError::EmptySelection);
        assert_eq!(app.session().unwrap().total(), before);
    }

    #[test]
    fn test_exam_mode_draw() {
        let mut app = app();
        let mut blueprint = ExamBlueprint::default();
        blueprint.quota_by_theme.insert("1".to_string(), 2);
        blueprint.quota_by_theme.insert("2".to_string(), 5);

        let mut rng = StdRng::seed_from_u64(9);
        app.start(&QuizMode::Exam { blueprint }, &mut rng).unwrap();
        // Theme 2 holds a single question: 2 + 1.
        assert_eq!(app.session().unwrap().total(), 3);
    }

    #[test]
    fn test_operations_without_session() {
        let mut app = app();
        assert_eq!(app.submit_answer(Choice::A).unwrap_err(), SessionError::NoSession);
        assert_eq!(app.advance().unwrap_err(), SessionError::NoSession);
        assert_eq!(app.report().unwrap_err(), SessionError::NoSession);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut app = app();
        let mut rng = StdRng::seed_from_u64(1);
        app.start(&training(&["1"], &["C"], 2), &mut rng).unwrap();
        app.reset();
        assert_eq!(app.state(), AppState::Idle);
    }

    #[test]
    fn test_save_results_writes_both_files() {
        let mut app = app();
        let mut rng = StdRng::seed_from_u64(1);
        app.start(&training(&["1"], &["C"], 2), &mut rng).unwrap();
        while app.state() == AppState::InProgress {
            app.submit_answer(Choice::A).unwrap();
            app.advance().unwrap();
        }

        let dir = std::env::temp_dir().join(format!("amf_quiz_app_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let detail_path = app.save_results(&dir).unwrap();
        assert!(detail_path.exists());
        assert!(dir.join("scores.csv").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_snapshot_resume_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "amf_quiz_app_snapshot_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut app = app();
        let mut rng = StdRng::seed_from_u64(1);
        app.start(&training(&["1"], &["C"], 3), &mut rng).unwrap();
        app.submit_answer(Choice::A).unwrap();
        app.advance().unwrap();
        app.save_snapshot(&path).unwrap();
        let score_before = app.session().unwrap().score();

        let mut restored = QuizApp::new(QuestionBank::new(Vec::new()));
        assert!(restored.resume_from_snapshot(&path).unwrap());
        assert_eq!(restored.state(), AppState::InProgress);
        assert_eq!(restored.session().unwrap().cursor(), 1);
        assert_eq!(restored.session().unwrap().score(), score_before);

        // A live session is never clobbered by a resume.
        assert!(!restored.resume_from_snapshot(&path).unwrap());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_resume_without_snapshot_is_silent() {
        let path = std::env::temp_dir().join(format!(
            "amf_quiz_app_no_snapshot_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut app = app();
        assert!(!app.resume_from_snapshot(&path).unwrap());
        assert_eq!(app.state(), AppState::Idle);
    }
}
