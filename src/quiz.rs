//! Assessment around the engine: quizzes, pre-tests, and question drafts.
//!
//! Responses carry a 1–5 [`ConfidenceRating`](crate::model::ConfidenceRating);
//! everything handed back to the engine is on the `[0, 1]` scale.

mod diagnostic;
mod draft;
mod scoring;

pub use diagnostic::{
    Diagnosis, DiagnosticTag, RoadmapAction, RoadmapStep, diagnose, roadmap,
};
pub use draft::{Mix, draft};
pub use scoring::{QuizOutcome, Response, score};
