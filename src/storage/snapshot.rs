use std::io;
use std::path::Path;

use super::StorageError;
use crate::session::Session;

/// Write the whole session as a JSON snapshot, overwriting any previous
/// one. The snapshot carries the cursor, score, answers, start time and
/// the full drawn question table, so a restart can resume exactly where
/// the user left off.
pub fn save_snapshot<P: AsRef<Path>>(path: P, session: &Session) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Restore a session from a snapshot file. A missing file means there is
/// nothing to resume and yields `Ok(None)`.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Option<Session>, StorageError> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

/// Delete the snapshot, typically after a completed session has been
/// saved. A missing file is not an error.
pub fn remove_snapshot<P: AsRef<Path>>(path: P) -> Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Choice, Question};

    fn session() -> Session {
        let questions = vec![
            Question {
                theme: "1".to_string(),
                sub_theme: "Déontologie".to_string(),
                category: "C".to_string(),
                text: "Q1 ?".to_string(),
                choice_a: "Un".to_string(),
                choice_b: "Deux".to_string(),
                choice_c: "Trois".to_string(),
                correct_choice: Choice::A,
                justification: None,
            },
            Question {
                theme: "1".to_string(),
                sub_theme: "Déontologie".to_string(),
                category: "C".to_string(),
                text: "Q2 ?".to_string(),
                choice_a: "Un".to_string(),
                choice_b: "Deux".to_string(),
                choice_c: "Trois".to_string(),
                correct_choice: Choice::B,
                justification: None,
            },
        ];
        Session::start(questions, Utc::now()).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("amf_quiz_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = temp_path("snapshot.json");
        let mut session = session();
        session.submit_answer(Choice::A).unwrap();
        session.advance().unwrap();

        save_snapshot(&path, &session).unwrap();
        let restored = load_snapshot(&path).unwrap().expect("snapshot present");

        assert_eq!(restored.cursor(), 1);
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.total(), 2);
        assert_eq!(restored.started_at(), session.started_at());

        remove_snapshot(&path).unwrap();
    }

    #[test]
    fn test_missing_snapshot_is_not_an_error() {
        let path = temp_path("snapshot_missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_snapshot(&path).unwrap().is_none());
        remove_snapshot(&path).unwrap();
    }
}
