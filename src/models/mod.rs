mod question;

pub use question::{Choice, Question};

/// Top-level state of the application, derived from whether a session
/// exists and whether its cursor has reached the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// No quiz running; filter controls are shown.
    Idle,
    /// A session exists and questions remain.
    InProgress,
    /// All drawn questions have been advanced past.
    Completed,
}
