//! Assessment questions attached to modules.

use serde::{Deserialize, Serialize};

/// A multiple-choice question from a module's pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,

    /// The prompt shown to the student.
    pub question: String,

    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_index: usize,

    pub difficulty: Difficulty,

    #[serde(default)]
    pub explanation: String,

    /// Topic this question probes. Set on pre-test questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

impl Question {
    /// Whether the chosen option is the correct one.
    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

/// Difficulty tier of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}
