//! Attempt log storage: append and load attempts.
//!
//! Rows are only ever inserted. `seq` is the attempt's position in the
//! student's history for the course, starting at zero.

use jiff::Timestamp;
use rusqlite::{Connection, params};

use crate::model::Attempt;

use super::{Result, Storage, StorageError};

impl Storage {
    /// Loads the full attempt log for a student in a course, oldest first.
    ///
    /// An unknown student or course yields an empty log.
    pub fn load_attempts(&self, student: &str, course: &str) -> Result<Vec<Attempt>> {
        load(&self.conn, student, course)
    }
}

pub(super) fn load(conn: &Connection, student: &str, course: &str) -> Result<Vec<Attempt>> {
    let mut stmt = conn.prepare(
        "SELECT topic_id, attempted_at, score, confidence FROM attempt
         WHERE student_id = ?1 AND course_id = ?2
         ORDER BY seq",
    )?;
    let rows = stmt.query_map(params![student, course], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, f64>(3)?,
        ))
    })?;

    let mut attempts = Vec::new();
    for row in rows {
        let (topic_id, attempted_at, score, confidence) = row?;
        let timestamp = attempted_at
            .parse::<Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid attempted_at: {e}")))?;
        attempts.push(Attempt {
            topic_id,
            timestamp,
            score,
            confidence,
        });
    }
    Ok(attempts)
}

/// Appends `attempts`, numbering them from `first_seq`.
pub(super) fn append(
    conn: &Connection,
    student: &str,
    course: &str,
    first_seq: usize,
    attempts: &[Attempt],
) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO attempt (student_id, course_id, seq, topic_id, attempted_at, score, confidence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for (offset, attempt) in attempts.iter().enumerate() {
        stmt.execute(params![
            student,
            course,
            first_seq + offset,
            &attempt.topic_id,
            attempt.timestamp.to_string(),
            attempt.score,
            attempt.confidence,
        ])?;
    }
    Ok(())
}
