//! Final score report derived from a completed session.

use std::collections::BTreeMap;

use chrono::TimeDelta;

use crate::models::{Choice, Question};

/// One per-question line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub theme: String,
    pub sub_theme: String,
    pub category: String,
    pub question: String,
    /// "L - texte", or "Aucune" when the question was never answered.
    pub your_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Correct/total for one grouping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStat {
    pub key: String,
    pub correct: usize,
    pub total: usize,
}

/// Read-only summary of a completed session. Derived on demand, never
/// stored; building it twice from the same session yields the same value.
#[derive(Debug, Clone)]
pub struct Report {
    pub score: usize,
    pub total: usize,
    pub elapsed: TimeDelta,
    pub rows: Vec<ReportRow>,
    /// Correct/total per "categorie / sous-thème".
    pub by_group: Vec<GroupStat>,
    /// Correct/total per chapter.
    pub by_theme: Vec<GroupStat>,
}

impl Report {
    pub(crate) fn build(
        questions: &[Question],
        answers: &[Option<Choice>],
        score: usize,
        elapsed: TimeDelta,
    ) -> Self {
        let rows: Vec<ReportRow> = questions
            .iter()
            .zip(answers)
            .map(|(question, answer)| {
                let is_correct = *answer == Some(question.correct_choice);
                ReportRow {
                    theme: question.theme.clone(),
                    sub_theme: question.sub_theme.clone(),
                    category: question.category.clone(),
                    question: question.text.clone(),
                    your_answer: match answer {
                        Some(choice) => question.labeled_choice(*choice),
                        None => "Aucune".to_string(),
                    },
                    correct_answer: question.labeled_choice(question.correct_choice),
                    is_correct,
                }
            })
            .collect();

        let by_group = group_stats(&rows, |row| format!("{} / {}", row.category, row.sub_theme));
        let by_theme = group_stats(&rows, |row| row.theme.clone());

        Self {
            score,
            total: questions.len(),
            elapsed,
            rows,
            by_group,
            by_theme,
        }
    }

    /// Elapsed time for display, "3 min 25 sec".
    pub fn elapsed_display(&self) -> String {
        let (minutes, seconds) = self.elapsed_parts();
        format!("{} min {} sec", minutes, seconds)
    }

    /// Elapsed time for the score log, "3:25".
    pub fn elapsed_compact(&self) -> String {
        let (minutes, seconds) = self.elapsed_parts();
        format!("{}:{:02}", minutes, seconds)
    }

    fn elapsed_parts(&self) -> (i64, i64) {
        let seconds = self.elapsed.num_seconds().max(0);
        (seconds / 60, seconds % 60)
    }
}

fn group_stats<F>(rows: &[ReportRow], key: F) -> Vec<GroupStat>
where
    F: Fn(&ReportRow) -> String,
{
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_insert((0, 0));
        if row.is_correct {
            entry.0 += 1;
        }
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(key, (correct, total))| GroupStat {
            key,
            correct,
            total,
        })
        .collect()
}
