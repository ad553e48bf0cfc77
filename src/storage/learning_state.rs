//! Learning state storage: create, load, and save progression records.

use jiff::Timestamp;
use rusqlite::{OptionalExtension, params};
use tracing::info;

use crate::model::StudentLearningState;

use super::{Result, Storage, StorageError, Stored, attempts};

impl Storage {
    /// Stores a new learning state, including its attempt history.
    ///
    /// Returns the revision to pass to the next [`save_state`](Self::save_state).
    pub fn create_state(&self, state: &StudentLearningState) -> Result<u64> {
        let tx = self.conn.unchecked_transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM learning_state WHERE student_id = ?1 AND course_id = ?2",
                params![&state.student_id, &state.course_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(StorageError::AlreadyExists {
                student: state.student_id.clone(),
                course: state.course_id.clone(),
            });
        }

        let revision = 1;
        let columns = Columns::from_state(state)?;
        tx.execute(
            "INSERT INTO learning_state
             (student_id, course_id, topic_confidence, topic_mastery, lab_status,
              current_path, last_active, revision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &state.student_id,
                &state.course_id,
                columns.topic_confidence,
                columns.topic_mastery,
                columns.lab_status,
                columns.current_path,
                columns.last_active,
                revision,
            ],
        )?;
        attempts::append(
            &tx,
            &state.student_id,
            &state.course_id,
            0,
            &state.attempt_history,
        )?;
        tx.commit()?;

        info!(
            student = %state.student_id,
            course = %state.course_id,
            "created learning state"
        );
        Ok(revision)
    }

    /// Saves a learning state loaded at revision `expected`.
    ///
    /// Fails with [`StorageError::Conflict`] if the stored revision moved on.
    /// The stored attempts must be an unchanged prefix of the state's
    /// history: a shorter history fails with
    /// [`StorageError::HistoryRewritten`], a changed entry with
    /// [`StorageError::HistoryEdited`]. Only attempts past the stored ones
    /// are written.
    pub fn save_state(&self, state: &StudentLearningState, expected: u64) -> Result<u64> {
        let tx = self.conn.unchecked_transaction()?;

        let found: Option<u64> = tx
            .query_row(
                "SELECT revision FROM learning_state WHERE student_id = ?1 AND course_id = ?2",
                params![&state.student_id, &state.course_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(found) = found else {
            return Err(StorageError::NotFound {
                student: state.student_id.clone(),
                course: state.course_id.clone(),
            });
        };
        if found != expected {
            return Err(StorageError::Conflict {
                student: state.student_id.clone(),
                course: state.course_id.clone(),
                expected,
                found,
            });
        }

        let logged = attempts::load(&tx, &state.student_id, &state.course_id)?;
        let stored = logged.len();
        let given = state.attempt_history.len();
        if given < stored {
            return Err(StorageError::HistoryRewritten { stored, given });
        }
        if let Some(seq) = logged
            .iter()
            .zip(&state.attempt_history)
            .position(|(stored_attempt, attempt)| stored_attempt != attempt)
        {
            return Err(StorageError::HistoryEdited { seq });
        }

        let revision = found + 1;
        let columns = Columns::from_state(state)?;
        tx.execute(
            "UPDATE learning_state
             SET topic_confidence = ?1, topic_mastery = ?2, lab_status = ?3,
                 current_path = ?4, last_active = ?5, revision = ?6
             WHERE student_id = ?7 AND course_id = ?8",
            params![
                columns.topic_confidence,
                columns.topic_mastery,
                columns.lab_status,
                columns.current_path,
                columns.last_active,
                revision,
                &state.student_id,
                &state.course_id,
            ],
        )?;
        attempts::append(
            &tx,
            &state.student_id,
            &state.course_id,
            stored,
            &state.attempt_history[stored..],
        )?;
        tx.commit()?;

        info!(
            student = %state.student_id,
            course = %state.course_id,
            revision,
            new_attempts = given - stored,
            "saved learning state"
        );
        Ok(revision)
    }

    /// Loads a learning state, if one exists.
    pub fn find_state(&self, student: &str, course: &str) -> Result<Option<Stored>> {
        let row = self
            .conn
            .query_row(
                "SELECT topic_confidence, topic_mastery, lab_status, current_path,
                        last_active, revision
                 FROM learning_state WHERE student_id = ?1 AND course_id = ?2",
                params![student, course],
                |row| {
                    Ok((
                        Columns {
                            topic_confidence: row.get(0)?,
                            topic_mastery: row.get(1)?,
                            lab_status: row.get(2)?,
                            current_path: row.get(3)?,
                            last_active: row.get(4)?,
                        },
                        row.get::<_, u64>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((columns, revision)) = row else {
            return Ok(None);
        };

        let last_active = columns
            .last_active
            .parse::<Timestamp>()
            .map_err(|e| StorageError::Corrupt(format!("invalid last_active: {e}")))?;

        let state = StudentLearningState {
            student_id: student.to_string(),
            course_id: course.to_string(),
            topic_confidence: serde_json::from_str(&columns.topic_confidence)?,
            topic_mastery: serde_json::from_str(&columns.topic_mastery)?,
            attempt_history: attempts::load(&self.conn, student, course)?,
            lab_status: serde_json::from_str(&columns.lab_status)?,
            last_active,
            current_path: serde_json::from_str(&columns.current_path)?,
        };
        Ok(Some(Stored { state, revision }))
    }

    /// Loads a learning state that must exist.
    pub fn load_state(&self, student: &str, course: &str) -> Result<Stored> {
        self.find_state(student, course)?
            .ok_or_else(|| StorageError::NotFound {
                student: student.to_string(),
                course: course.to_string(),
            })
    }
}

/// The `learning_state` columns that hold serialized values.
struct Columns {
    topic_confidence: String,
    topic_mastery: String,
    lab_status: String,
    current_path: String,
    last_active: String,
}

impl Columns {
    fn from_state(state: &StudentLearningState) -> Result<Self> {
        Ok(Self {
            topic_confidence: serde_json::to_string(&state.topic_confidence)?,
            topic_mastery: serde_json::to_string(&state.topic_mastery)?,
            lab_status: serde_json::to_string(&state.lab_status)?,
            current_path: serde_json::to_string(&state.current_path)?,
            last_active: state.last_active.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::engine::record_attempt;
    use crate::model::LabStatus;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("data").join("pathway.sqlite")).unwrap();
        (dir, storage)
    }

    fn at(seconds: i64) -> Timestamp {
        Timestamp::new(seconds, 0).unwrap()
    }

    fn sample_state() -> StudentLearningState {
        let mut state = StudentLearningState::new("ada", "owasp", at(1_000_000_000));
        state.lab_status.insert("lab-1".into(), LabStatus::Available);
        state.current_path = vec!["bac-1".into(), "bac-2".into()];
        record_attempt(&state, "bac-1", 0.9, 0.9, at(1_000_000_100))
    }

    #[test]
    fn create_and_load_state() {
        let (_dir, storage) = test_storage();
        let state = sample_state();

        let revision = storage.create_state(&state).unwrap();
        let loaded = storage.load_state("ada", "owasp").unwrap();

        assert_eq!(revision, 1);
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.state, state);
    }

    #[test]
    fn create_duplicate_state_fails() {
        let (_dir, storage) = test_storage();
        let state = sample_state();

        storage.create_state(&state).unwrap();
        let err = storage.create_state(&state).unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[test]
    fn find_missing_state_is_none() {
        let (_dir, storage) = test_storage();

        assert!(storage.find_state("ada", "owasp").unwrap().is_none());
        let err = storage.load_state("ada", "owasp").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn save_appends_new_attempts_and_bumps_revision() {
        let (_dir, storage) = test_storage();
        let state = sample_state();
        storage.create_state(&state).unwrap();

        let Stored { state, revision } = storage.load_state("ada", "owasp").unwrap();
        let state = record_attempt(&state, "bac-2", 0.3, 0.5, at(1_000_000_200));
        let state = record_attempt(&state, "bac-2", 0.9, 0.95, at(1_000_000_300));
        let revision = storage.save_state(&state, revision).unwrap();

        assert_eq!(revision, 2);
        let loaded = storage.load_state("ada", "owasp").unwrap();
        assert_eq!(loaded.state, state);
        assert_eq!(storage.load_attempts("ada", "owasp").unwrap().len(), 3);
    }

    #[test]
    fn stale_revision_conflicts() {
        let (_dir, storage) = test_storage();
        storage.create_state(&sample_state()).unwrap();

        let first = storage.load_state("ada", "owasp").unwrap();
        let second = storage.load_state("ada", "owasp").unwrap();

        let a = record_attempt(&first.state, "bac-2", 0.9, 0.9, at(1_000_000_200));
        storage.save_state(&a, first.revision).unwrap();

        let b = record_attempt(&second.state, "bac-2", 0.1, 0.1, at(1_000_000_201));
        let err = storage.save_state(&b, second.revision).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Conflict {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn shrinking_history_is_rejected() {
        let (_dir, storage) = test_storage();
        storage.create_state(&sample_state()).unwrap();

        let Stored {
            mut state,
            revision,
        } = storage.load_state("ada", "owasp").unwrap();
        state.attempt_history.clear();

        let err = storage.save_state(&state, revision).unwrap_err();
        assert!(matches!(
            err,
            StorageError::HistoryRewritten {
                stored: 1,
                given: 0
            }
        ));
    }

    #[test]
    fn edited_history_is_rejected() {
        let (_dir, storage) = test_storage();
        storage.create_state(&sample_state()).unwrap();

        let Stored { state, revision } = storage.load_state("ada", "owasp").unwrap();
        let mut state = record_attempt(&state, "bac-2", 0.5, 0.5, at(1_000_000_200));
        state.attempt_history[0].score = 0.1;

        let err = storage.save_state(&state, revision).unwrap_err();
        assert!(matches!(err, StorageError::HistoryEdited { seq: 0 }));
        assert_eq!(storage.load_attempts("ada", "owasp").unwrap().len(), 1);
    }

    #[test]
    fn quiz_mean_confidence_survives_round_trip() {
        let (_dir, storage) = test_storage();
        // Mean unit confidences of 1-5 ratings, e.g. 0.20833333333333334.
        let confidences = [5.0 / 24.0, 11.0 / 28.0, 27.0 / 28.0];

        let mut state = StudentLearningState::new("ada", "owasp", at(1_000_000_000));
        for (i, confidence) in confidences.into_iter().enumerate() {
            let topic = format!("bac-{i}");
            state = record_attempt(&state, &topic, confidence, 0.5, at(1_000_000_100));
        }
        storage.create_state(&state).unwrap();

        let loaded = storage.load_state("ada", "owasp").unwrap().state;
        for (i, confidence) in confidences.into_iter().enumerate() {
            let topic = format!("bac-{i}");
            assert_eq!(loaded.topic_confidence[&topic].to_bits(), confidence.to_bits());
            assert_eq!(loaded.confidence(&topic), Some(loaded.attempt_history[i].confidence));
        }
        assert_eq!(loaded, state);
    }

    #[test]
    fn save_without_create_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.save_state(&sample_state(), 1).unwrap_err();

        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn records_are_keyed_by_student_and_course() {
        let (_dir, storage) = test_storage();
        let state = sample_state();
        storage.create_state(&state).unwrap();

        let mut other = StudentLearningState::new("ada", "crypto", at(1_000_000_000));
        other = record_attempt(&other, "crypto-1", 0.5, 0.5, at(1_000_000_500));
        storage.create_state(&other).unwrap();

        assert_eq!(storage.load_attempts("ada", "owasp").unwrap().len(), 1);
        assert_eq!(storage.load_attempts("ada", "crypto").unwrap().len(), 1);
        assert!(storage.load_attempts("grace", "owasp").unwrap().is_empty());
    }
}
