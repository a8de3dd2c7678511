//! The immutable question bank: filtering and random draws.
//!
//! The bank is loaded once per process and never mutated; every quiz draws
//! its questions from here. All sampling is without replacement within one
//! draw and deterministic under a seeded rng.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::{self, LoadError};
use crate::models::Question;

/// Attribute predicates for selecting a subset of the bank.
///
/// `themes` and `categories` are strict memberships: an empty set matches
/// nothing, so callers pass the full list to mean "all chapters" / "all
/// types" (the filter controls are pre-populated from the bank for exactly
/// this reason). `sub_themes` is the optional refinement: empty means
/// unconstrained.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub themes: BTreeSet<String>,
    pub sub_themes: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterCriteria {
    fn matches(&self, question: &Question) -> bool {
        self.themes.contains(&question.theme)
            && self.categories.contains(&question.category)
            && (self.sub_themes.is_empty() || self.sub_themes.contains(&question.sub_theme))
    }
}

/// The full set of loaded questions, read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load the bank from a CSV file with the AMF column layout.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Ok(Self::new(data::load_questions_from_csv(path)?))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Distinct chapter identifiers, sorted.
    pub fn themes(&self) -> Vec<String> {
        self.distinct(|q| &q.theme)
    }

    /// Distinct question-type codes, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.distinct(|q| &q.category)
    }

    /// Distinct sub-themes of the given chapters, sorted. The UI shell uses
    /// this to narrow the sub-theme control after chapters are picked.
    pub fn sub_themes(&self, themes: &BTreeSet<String>) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .questions
            .iter()
            .filter(|q| themes.contains(&q.theme))
            .map(|q| q.sub_theme.as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    fn distinct<F>(&self, key: F) -> Vec<String>
    where
        F: Fn(&Question) -> &String,
    {
        let set: BTreeSet<&str> = self.questions.iter().map(|q| key(q).as_str()).collect();
        set.into_iter().map(String::from).collect()
    }

    /// The subset of questions matching all supplied predicates, in bank
    /// order.
    pub fn filter(&self, criteria: &FilterCriteria) -> QuestionBank {
        QuestionBank::new(
            self.questions
                .iter()
                .filter(|q| criteria.matches(q))
                .cloned()
                .collect(),
        )
    }

    /// Draw `min(n, len)` questions without replacement, uniformly at
    /// random. Result order is the shuffle order, not bank order.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Question> {
        let mut drawn = self.questions.clone();
        drawn.shuffle(rng);
        drawn.truncate(n.min(drawn.len()));
        drawn
    }

    /// Draw `min(quota, available)` questions per theme, then shuffle the
    /// concatenation. A theme with fewer questions than its quota
    /// contributes everything it has; there is no backfill from other
    /// themes.
    pub fn stratified_sample<R: Rng + ?Sized>(
        &self,
        quota_by_theme: &BTreeMap<String, usize>,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut drawn = Vec::new();
        for (theme, quota) in quota_by_theme {
            let mut pool: Vec<Question> = self
                .questions
                .iter()
                .filter(|q| &q.theme == theme)
                .cloned()
                .collect();
            pool.shuffle(rng);
            pool.truncate((*quota).min(pool.len()));
            drawn.extend(pool);
        }
        drawn.shuffle(rng);
        drawn
    }

    /// Exam-mode draw: stratified by theme, then down-sampled per category
    /// to fixed targets, then shuffled. Categories without a target are
    /// dropped; the net count may fall short of the targets if the
    /// stratified draw did not produce enough of a category.
    pub fn stratified_sample_with_category_targets<R: Rng + ?Sized>(
        &self,
        quota_by_theme: &BTreeMap<String, usize>,
        target_by_category: &BTreeMap<String, usize>,
        rng: &mut R,
    ) -> Vec<Question> {
        let stratified = self.stratified_sample(quota_by_theme, rng);

        let mut drawn = Vec::new();
        for (category, target) in target_by_category {
            let mut pool: Vec<Question> = stratified
                .iter()
                .filter(|q| &q.category == category)
                .cloned()
                .collect();
            pool.shuffle(rng);
            pool.truncate((*target).min(pool.len()));
            drawn.extend(pool);
        }
        drawn.shuffle(rng);
        drawn
    }
}
