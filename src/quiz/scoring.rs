//! Turning quiz responses into the score and confidence an attempt records.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{ConfidenceRating, Question};

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: String,

    /// Index of the chosen option.
    pub selected: usize,

    pub rating: ConfidenceRating,
}

/// Aggregate result of a quiz, on the engine's `[0, 1]` scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    /// Fraction of scored responses that were correct.
    pub score: f64,

    /// Mean confidence of scored responses.
    pub confidence: f64,

    /// Number of responses that counted.
    pub answered: u32,
}

/// Scores responses against a question pool.
///
/// Responses naming a question outside the pool are skipped. Returns
/// `None` when nothing could be scored.
#[must_use]
pub fn score(questions: &[Question], responses: &[Response]) -> Option<QuizOutcome> {
    let mut correct = 0_u32;
    let mut confidence_sum = 0.0;
    let mut answered = 0_u32;

    for response in responses {
        let Some(question) = questions.iter().find(|q| q.id == response.question_id) else {
            warn!(question = %response.question_id, "response to unknown question skipped");
            continue;
        };
        answered += 1;
        if question.is_correct(response.selected) {
            correct += 1;
        }
        confidence_sum += response.rating.to_unit();
    }

    if answered == 0 {
        return None;
    }

    Some(QuizOutcome {
        score: f64::from(correct) / f64::from(answered),
        confidence: confidence_sum / f64::from(answered),
        answered,
    })
}
