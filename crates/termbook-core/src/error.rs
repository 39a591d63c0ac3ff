//! Registry and snapshot error types.
//!
//! Every failed lookup or conflicting mutation is reported as a value so the
//! calling layer decides how to surface it. No variant implies that state was
//! partially changed.

use std::path::PathBuf;

use thiserror::Error;

/// Outcomes of registry operations that did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registration was attempted with an id that is already taken.
    #[error("Student already exists: {0}")]
    StudentExists(String),

    /// No student is registered under the id.
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    /// The student has no results recorded under the term.
    #[error("Term not found for update: {term} (student {student_id})")]
    TermNotFound { student_id: String, term: String },

    /// The term exists but has no mark for the subject.
    #[error("Subject not found for update: {subject} in {term} (student {student_id})")]
    SubjectNotFound {
        student_id: String,
        term: String,
        subject: String,
    },

    /// A mark was NaN or infinite. Snapshots cannot carry such values.
    #[error("Mark for {subject} must be a finite number")]
    NonFiniteMark { subject: String },

    /// Recording the deltas would push an attendance counter past `i64` range.
    #[error("Attendance counters for {0} would overflow")]
    AttendanceOverflow(String),
}

impl RegistryError {
    /// Returns `true` if the failure is an unknown student id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::StudentNotFound(_))
    }
}

/// Errors raised while reading or writing a registry snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot source does not exist. The registry is left untouched.
    #[error("File {} not found.", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing the snapshot failed.
    #[error("snapshot I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot exists but is not a valid registry document.
    #[error("malformed snapshot {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    /// Returns `true` if the failure should be reported and then ignored.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SnapshotError::NotFound(_))
    }
}
