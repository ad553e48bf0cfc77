//! Attempt recording: the mastery update after each scored interaction.

use jiff::Timestamp;
use tracing::debug;

use crate::model::{Attempt, StudentLearningState};

use super::Engine;

impl Engine {
    /// Returns a new state reflecting one attempt on `topic_id`.
    ///
    /// The topic's confidence is overwritten with `confidence`. Mastery is
    /// re-evaluated from this attempt alone, so a weak attempt on a mastered
    /// topic demotes it. The attempt is appended to the history whether it
    /// passed or not. Nothing else in the state changes.
    ///
    /// The topic id is not checked against any course and the values are
    /// not clamped; callers own range enforcement.
    #[must_use]
    pub fn record_attempt(
        &self,
        state: &StudentLearningState,
        topic_id: &str,
        confidence: f64,
        score: f64,
        at: Timestamp,
    ) -> StudentLearningState {
        let mastered = self.thresholds.is_mastery(score, confidence);

        let mut next = state.clone();
        next.topic_confidence.insert(topic_id.to_string(), confidence);
        next.topic_mastery.insert(topic_id.to_string(), mastered);
        next.attempt_history.push(Attempt {
            topic_id: topic_id.to_string(),
            timestamp: at,
            score,
            confidence,
        });

        debug!(
            student = %state.student_id,
            topic = topic_id,
            score,
            confidence,
            mastered,
            "recorded attempt"
        );

        next
    }
}
