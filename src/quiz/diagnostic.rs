//! Pre-test diagnostics: crossing correctness with confidence.
//!
//! | correct | confident (rating ≥ 4) | tag           | roadmap    |
//! |---------|------------------------|---------------|------------|
//! | yes     | yes                    | Master        | FastTrack  |
//! | yes     | no                     | Guess         | Reinforce  |
//! | no      | yes                    | Misconception | DeepDive   |
//! | no      | no                     | Unknown       | Standard   |

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ConfidenceRating, Question};

use super::Response;

/// What a single pre-test answer says about the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticTag {
    Master,
    Guess,
    Misconception,
    Unknown,
}

impl DiagnosticTag {
    #[must_use]
    pub fn classify(correct: bool, rating: ConfidenceRating) -> Self {
        match (correct, rating.is_confident()) {
            (true, true) => Self::Master,
            (true, false) => Self::Guess,
            (false, true) => Self::Misconception,
            (false, false) => Self::Unknown,
        }
    }
}

/// How the course should treat a topic after the pre-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoadmapAction {
    /// Accelerate through the content.
    FastTrack,
    /// Unlearn a confident wrong belief first.
    DeepDive,
    /// Extra examples on shaky ground.
    Reinforce,
    Standard,
}

/// One pre-test answer, classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Topic the question probes; the question id when it names none.
    pub topic_id: String,
    pub tag: DiagnosticTag,
    pub correct: bool,
    pub rating: ConfidenceRating,
}

/// A roadmap entry derived from a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub topic_id: String,
    pub action: RoadmapAction,
    pub reason: String,
}

impl Diagnosis {
    #[must_use]
    pub fn roadmap_step(&self) -> RoadmapStep {
        let topic = &self.topic_id;
        let (action, reason) = match self.tag {
            DiagnosticTag::Master => (
                RoadmapAction::FastTrack,
                format!("High mastery detected in {topic}. Content will be accelerated."),
            ),
            DiagnosticTag::Misconception => (
                RoadmapAction::DeepDive,
                format!("Critical misconception in {topic}. Unlearning module required."),
            ),
            DiagnosticTag::Guess => (
                RoadmapAction::Reinforce,
                format!("Foundational knowledge in {topic} is shaky. Extra examples provided."),
            ),
            DiagnosticTag::Unknown => (RoadmapAction::Standard, String::new()),
        };
        RoadmapStep {
            topic_id: self.topic_id.clone(),
            action,
            reason,
        }
    }
}

/// Classifies pre-test answers. Answers to unknown questions are skipped.
#[must_use]
pub fn diagnose(questions: &[Question], answers: &[Response]) -> Vec<Diagnosis> {
    answers
        .iter()
        .filter_map(|answer| {
            let Some(question) = questions.iter().find(|q| q.id == answer.question_id) else {
                warn!(question = %answer.question_id, "pre-test answer to unknown question skipped");
                return None;
            };
            let correct = question.is_correct(answer.selected);
            Some(Diagnosis {
                topic_id: question
                    .topic_id
                    .clone()
                    .unwrap_or_else(|| question.id.clone()),
                tag: DiagnosticTag::classify(correct, answer.rating),
                correct,
                rating: answer.rating,
            })
        })
        .collect()
}

/// The roadmap for a set of diagnoses, in the same order.
#[must_use]
pub fn roadmap(diagnoses: &[Diagnosis]) -> Vec<RoadmapStep> {
    diagnoses.iter().map(Diagnosis::roadmap_step).collect()
}
