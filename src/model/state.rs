//! Learning state: one student's progression through one course.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The per-student, per-course progression record.
///
/// `student_id` and `course_id` together identify exactly one record.
/// Map keys are topic ids; a missing key means "no data yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLearningState {
    pub student_id: String,

    pub course_id: String,

    /// Most recent self-reported confidence per topic, in `[0, 1]`.
    #[serde(default)]
    pub topic_confidence: BTreeMap<String, f64>,

    /// Mastered flag per topic. Absent means never attempted.
    #[serde(default)]
    pub topic_mastery: BTreeMap<String, bool>,

    /// Every attempt ever made, oldest first. Never pruned.
    #[serde(default)]
    pub attempt_history: Vec<Attempt>,

    /// Lab progression, maintained by the lab collaborator.
    #[serde(default)]
    pub lab_status: BTreeMap<String, LabStatus>,

    pub last_active: Timestamp,

    /// Advisory upcoming sequence of topic ids.
    #[serde(default)]
    pub current_path: Vec<String>,
}

impl StudentLearningState {
    /// A fresh record with no attempts.
    pub fn new(
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            course_id: course_id.into(),
            topic_confidence: BTreeMap::new(),
            topic_mastery: BTreeMap::new(),
            attempt_history: Vec::new(),
            lab_status: BTreeMap::new(),
            last_active: now,
            current_path: Vec::new(),
        }
    }

    /// Whether the topic is currently marked mastered.
    #[must_use]
    pub fn is_mastered(&self, topic_id: &str) -> bool {
        self.topic_mastery.get(topic_id).copied().unwrap_or(false)
    }

    /// Last recorded confidence for the topic, if any.
    #[must_use]
    pub fn confidence(&self, topic_id: &str) -> Option<f64> {
        self.topic_confidence.get(topic_id).copied()
    }

    /// Attempts on a single topic, oldest first.
    pub fn attempts_on<'a>(&'a self, topic_id: &'a str) -> impl Iterator<Item = &'a Attempt> {
        self.attempt_history
            .iter()
            .filter(move |a| a.topic_id == topic_id)
    }
}

/// One scored interaction with a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub topic_id: String,

    pub timestamp: Timestamp,

    /// Fraction correct, in `[0, 1]`.
    pub score: f64,

    /// Reported confidence, in `[0, 1]`.
    pub confidence: f64,
}

/// Where a lab stands for the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    Locked,
    Available,
    InProgress,
    Completed,
    Failed,
}
