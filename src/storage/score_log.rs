use std::fs::OpenOptions;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::StorageError;
use crate::report::Report;

/// Append one summary row to the score history, creating the file (with
/// its header) on first save. A missing log is "no prior history", not an
/// error.
pub fn append_score<P: AsRef<Path>>(
    path: P,
    report: &Report,
    saved_at: DateTime<Utc>,
) -> Result<(), StorageError> {
    let path = path.as_ref();
    let is_new = !path.exists();

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer.write_record(["date", "score", "total", "duration"])?;
    }
    writer.write_record([
        saved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        report.score.to_string(),
        report.total.to_string(),
        report.elapsed_compact(),
    ])?;
    writer.flush()?;
    Ok(())
}
