//! The adaptive progression engine.
//!
//! Two operations over a course and a learning state:
//!
//! - [`Engine::select_next_topic`]: what to present next.
//! - [`Engine::record_attempt`]: the state after a scored attempt.
//!
//! The engine holds only its thresholds. It does no I/O, keeps no state
//! between calls, and never mutates the state it is given.

mod attempt;
mod select;
mod thresholds;

use jiff::Timestamp;

use crate::model::{Course, StudentLearningState};

pub use select::{NextTopic, Reason};
pub use thresholds::{ADVANCE, BACKTRACK, ConfidenceTier, MASTERY_SCORE, REINFORCE, Thresholds};

/// Decision policy parameterised by its thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Engine {
    thresholds: Thresholds,
}

impl Engine {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}

/// [`Engine::select_next_topic`] with the default thresholds.
#[must_use]
pub fn select_next_topic<'c>(
    state: &StudentLearningState,
    course: &'c Course,
) -> Option<NextTopic<'c>> {
    Engine::default().select_next_topic(state, course)
}

/// [`Engine::record_attempt`] with the default thresholds.
#[must_use]
pub fn record_attempt(
    state: &StudentLearningState,
    topic_id: &str,
    confidence: f64,
    score: f64,
    at: Timestamp,
) -> StudentLearningState {
    Engine::default().record_attempt(state, topic_id, confidence, score, at)
}
