use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::StorageError;
use crate::report::Report;

/// File name for one save, derived from the timestamp with separators
/// replaced for filesystem safety.
pub fn detail_file_name(saved_at: DateTime<Utc>) -> String {
    format!("details_{}.csv", saved_at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write one fresh detail file listing every question of the session with
/// the chosen and correct answers. Returns the path written.
pub fn write_detail_file<P: AsRef<Path>>(
    dir: P,
    report: &Report,
    saved_at: DateTime<Utc>,
) -> Result<PathBuf, StorageError> {
    let path = dir.as_ref().join(detail_file_name(saved_at));
    let date = saved_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "date",
        "categorie",
        "sous_theme",
        "question",
        "votre_reponse",
        "bonne_reponse",
        "resultat",
    ])?;
    for row in &report.rows {
        writer.write_record([
            date.as_str(),
            row.category.as_str(),
            row.sub_theme.as_str(),
            row.question.as_str(),
            row.your_answer.as_str(),
            row.correct_answer.as_str(),
            if row.is_correct { "correct" } else { "faux" },
        ])?;
    }
    writer.flush()?;
    Ok(path)
}
