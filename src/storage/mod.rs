//! Persistence collaborators: score history, per-save detail files and the
//! session snapshot used for resume-after-interruption.
//!
//! Everything here is fire-and-forget flat-file output; there is no
//! locking and no transaction across the score log and the detail file.

mod detail;
mod score_log;
mod snapshot;

use std::fmt;
use std::io;

pub use detail::{detail_file_name, write_detail_file};
pub use score_log::append_score;
pub use snapshot::{load_snapshot, remove_snapshot, save_snapshot};

/// Error writing or reading one of the flat files.
#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {}", e),
            StorageError::Csv(e) => write!(f, "storage CSV error: {}", e),
            StorageError::Json(e) => write!(f, "snapshot JSON error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Csv(e) => Some(e),
            StorageError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        StorageError::Csv(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Json(err)
    }
}
