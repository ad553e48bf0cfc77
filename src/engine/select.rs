//! Topic selection: which topic the student should attempt next.

use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{Course, StudentLearningState, Topic};

use super::Engine;

/// The topic to present next and why it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTopic<'c> {
    pub topic: Cow<'c, Topic>,

    pub reason: Reason,

    /// The topic's last recorded confidence is below the backtrack
    /// threshold. Presentation should switch to remedial content; the
    /// choice of topic is unaffected.
    pub remedial: bool,
}

/// Why a topic was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reason {
    /// Every prerequisite is mastered.
    Eligible,

    /// First unmet prerequisite of an earlier-ordered topic.
    Prerequisite {
        /// The topic that was blocked.
        of: String,
    },

    /// No candidate resolved; first unmastered topic.
    Fallback,
}

impl Engine {
    /// Picks the next topic for the student, or `None` once every topic in
    /// the course is mastered.
    ///
    /// Walks unmastered topics in course order and returns the first whose
    /// prerequisites are all mastered. A blocked topic redirects to its first
    /// unmastered prerequisite instead; a prerequisite id that names no topic
    /// is skipped. If nothing resolves, the first unmastered topic is
    /// returned so the student can always make progress.
    ///
    /// Never fails and never reads the clock: the same state and course
    /// always produce the same answer.
    pub fn select_next_topic<'c>(
        &self,
        state: &StudentLearningState,
        course: &'c Course,
    ) -> Option<NextTopic<'c>> {
        let mut topics = course.topics();

        let unmastered: Vec<usize> = topics
            .iter()
            .enumerate()
            .filter(|(_, t)| !state.is_mastered(&t.id))
            .map(|(i, _)| i)
            .collect();

        let Some(&first) = unmastered.first() else {
            debug!(course = %course.id, student = %state.student_id, "course complete");
            return None;
        };

        let (index, reason) =
            first_actionable(state, &topics, &unmastered).unwrap_or((first, Reason::Fallback));

        let topic = topics.swap_remove(index);
        let remedial = state
            .confidence(&topic.id)
            .is_some_and(|c| self.thresholds.needs_remedial(c));

        debug!(
            course = %course.id,
            student = %state.student_id,
            topic = %topic.id,
            ?reason,
            remedial,
            "selected next topic"
        );

        Some(NextTopic {
            topic,
            reason,
            remedial,
        })
    }
}

/// Index and reason for the first candidate that resolves to a topic.
fn first_actionable(
    state: &StudentLearningState,
    topics: &[Cow<'_, Topic>],
    unmastered: &[usize],
) -> Option<(usize, Reason)> {
    for &i in unmastered {
        let candidate = &topics[i];
        let Some(unmet) = candidate
            .prerequisites
            .iter()
            .find(|p| !state.is_mastered(p))
        else {
            return Some((i, Reason::Eligible));
        };

        if let Some(j) = topics.iter().position(|t| &t.id == unmet) {
            return Some((
                j,
                Reason::Prerequisite {
                    of: candidate.id.clone(),
                },
            ));
        }

        warn!(
            topic = %candidate.id,
            prerequisite = %unmet,
            "prerequisite does not name a topic in this course"
        );
    }
    None
}
