//! Pathway: adaptive progression over a course's prerequisite graph.
//!
//! The [`engine`] picks a student's next topic and folds scored attempts
//! into their learning state. Around it sit course loading
//! ([`curriculum`]), assessment ([`quiz`]), reporting ([`progress`]), and
//! persistence ([`storage`]).

pub mod config;
pub mod curriculum;
pub mod engine;
pub mod identity;
pub mod logging;
pub mod model;
pub mod progress;
pub mod quiz;
pub mod storage;

pub use engine::{Engine, NextTopic, Reason, Thresholds, record_attempt, select_next_topic};
pub use model::{Course, StudentLearningState, Topic};
