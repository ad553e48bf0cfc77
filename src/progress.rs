//! Progress reporting: where a student stands in a course.
//!
//! Read-only over the learning state; this is the consumer of the
//! reinforce threshold, which the engine itself never enforces.

use serde::Serialize;

use crate::engine::{ConfidenceTier, Engine, NextTopic};
use crate::model::{Course, StudentLearningState};

/// How many recent confidences make up a topic's trend.
pub const TREND_WINDOW: usize = 3;

/// Snapshot of one student's progression through one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport<'c> {
    pub student_id: String,
    pub course_id: String,
    pub total_topics: usize,
    pub mastered_topics: usize,
    /// Whole-number completion percentage, 0 to 100.
    pub percent: u8,
    pub topics: Vec<TopicProgress>,
    pub next: Option<NextTopic<'c>>,
}

/// One row of a progress report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic_id: String,
    pub title: String,
    /// `None` until the topic is attempted.
    pub mastered: Option<bool>,
    pub confidence: Option<f64>,
    pub tier: Option<ConfidenceTier>,
    pub attempts: usize,
    /// Most recent confidences, oldest first.
    pub trend: Vec<f64>,
}

impl<'c> ProgressReport<'c> {
    #[must_use]
    pub fn build(engine: &Engine, state: &StudentLearningState, course: &'c Course) -> Self {
        let topics: Vec<TopicProgress> = course
            .topics()
            .iter()
            .map(|topic| {
                let confidences: Vec<f64> =
                    state.attempts_on(&topic.id).map(|a| a.confidence).collect();
                let confidence = state.confidence(&topic.id);
                TopicProgress {
                    topic_id: topic.id.clone(),
                    title: topic.title.clone(),
                    mastered: state.topic_mastery.get(&topic.id).copied(),
                    confidence,
                    tier: confidence.map(|c| engine.thresholds().tier(c)),
                    attempts: confidences.len(),
                    trend: confidences[confidences.len().saturating_sub(TREND_WINDOW)..].to_vec(),
                }
            })
            .collect();

        let total_topics = topics.len();
        let mastered_topics = topics.iter().filter(|t| t.mastered == Some(true)).count();

        Self {
            student_id: state.student_id.clone(),
            course_id: course.id.clone(),
            total_topics,
            mastered_topics,
            percent: percent(mastered_topics, total_topics),
            topics,
            next: engine.select_next_topic(state, course),
        }
    }

    /// Topics whose last confidence sits below the reinforce threshold.
    pub fn needs_practice(&self) -> impl Iterator<Item = &TopicProgress> {
        self.topics.iter().filter(|t| {
            matches!(
                t.tier,
                Some(ConfidenceTier::Reinforce | ConfidenceTier::Backtrack)
            )
        })
    }
}

/// Rounded share of `part` in `whole`, capped at 100.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part * 100 + whole / 2) / whole;
    u8::try_from(rounded.min(100)).unwrap_or(100)
}
