//! Core data model for Pathway.
//!
//! Two shapes flow through the engine: the course graph, which is
//! immutable, and the learning state, which is the only thing the engine
//! changes.

mod confidence;
mod course;
mod question;
mod state;

pub use confidence::{CONFIDENT_RATING, ConfidenceRating, RatingError};
pub use course::{Course, Module, Topic};
pub use question::{Difficulty, Question};
pub use state::{Attempt, LabStatus, StudentLearningState};
