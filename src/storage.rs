//! Local persistence for learning states.
//!
//! Every record lives in one SQLite database, `~/.pathway/pathway.sqlite`
//! unless configured otherwise:
//!
//! ```text
//! pathway.sqlite
//!   learning_state   # one row per (student, course), with a revision counter
//!   attempt          # append-only attempt log, ordered by seq
//! ```
//!
//! Writers use optimistic concurrency: a save names the revision it loaded
//! and fails if someone else saved in between.

mod attempts;
mod learning_state;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusqlite::Connection;

use crate::model::StudentLearningState;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no learning state for student {student} in course {course}")]
    NotFound { student: String, course: String },

    #[error("learning state already exists for student {student} in course {course}")]
    AlreadyExists { student: String, course: String },

    #[error(
        "learning state for student {student} in course {course} changed since it was loaded \
         (expected revision {expected}, found {found})"
    )]
    Conflict {
        student: String,
        course: String,
        expected: u64,
        found: u64,
    },

    #[error("attempt history is append-only: {stored} attempts stored, {given} given")]
    HistoryRewritten { stored: usize, given: usize },

    #[error("attempt history is append-only: stored attempt {seq} was changed")]
    HistoryEdited { seq: usize },

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A learning state as loaded, with the revision needed to save it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored {
    pub state: StudentLearningState,
    pub revision: u64,
}

/// SQLite-backed storage for learning states.
pub struct Storage {
    conn: Connection,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS learning_state (
    student_id       TEXT    NOT NULL,
    course_id        TEXT    NOT NULL,
    topic_confidence TEXT    NOT NULL,
    topic_mastery    TEXT    NOT NULL,
    lab_status       TEXT    NOT NULL,
    current_path     TEXT    NOT NULL,
    last_active      TEXT    NOT NULL,
    revision         INTEGER NOT NULL,
    PRIMARY KEY (student_id, course_id)
);
CREATE TABLE IF NOT EXISTS attempt (
    student_id   TEXT    NOT NULL,
    course_id    TEXT    NOT NULL,
    seq          INTEGER NOT NULL,
    topic_id     TEXT    NOT NULL,
    attempted_at TEXT    NOT NULL,
    score        REAL    NOT NULL,
    confidence   REAL    NOT NULL,
    PRIMARY KEY (student_id, course_id, seq)
);
";

impl Storage {
    /// Opens (or creates) the database at `path`.
    ///
    /// The parent directory is created if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns the default database path: `~/.pathway/pathway.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pathway").join("pathway.sqlite"))
    }
}
