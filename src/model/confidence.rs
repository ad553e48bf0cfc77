//! Confidence scales.
//!
//! The engine works on a real `[0, 1]` scale. Quiz sliders and pre-tests
//! collect an integer rating from 1 ("guessing") to 5 ("certain"); ratings
//! are converted here, at the boundary, and never reach the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rating at or above which a pre-test answer counts as confident.
pub const CONFIDENT_RATING: u8 = 4;

/// A 1–5 self-reported confidence rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ConfidenceRating(u8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("confidence rating must be between 1 and 5, got {0}")]
pub struct RatingError(pub u8);

impl ConfidenceRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError(value))
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Maps the rating linearly onto `[0, 1]`: 1 → 0.0, 3 → 0.5, 5 → 1.0.
    #[must_use]
    pub fn to_unit(self) -> f64 {
        f64::from(self.0 - Self::MIN) / f64::from(Self::MAX - Self::MIN)
    }

    #[must_use]
    pub fn is_confident(self) -> bool {
        self.0 >= CONFIDENT_RATING
    }
}

impl TryFrom<u8> for ConfidenceRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceRating> for u8 {
    fn from(rating: ConfidenceRating) -> Self {
        rating.0
    }
}

impl fmt::Display for ConfidenceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_endpoints_and_midpoint() {
        assert!((ConfidenceRating::new(1).unwrap().to_unit() - 0.0).abs() < f64::EPSILON);
        assert!((ConfidenceRating::new(3).unwrap().to_unit() - 0.5).abs() < f64::EPSILON);
        assert!((ConfidenceRating::new(5).unwrap().to_unit() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(ConfidenceRating::new(0), Err(RatingError(0)));
        assert_eq!(ConfidenceRating::new(6), Err(RatingError(6)));
    }

    #[test]
    fn confident_from_four() {
        assert!(!ConfidenceRating::new(3).unwrap().is_confident());
        assert!(ConfidenceRating::new(4).unwrap().is_confident());
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: ConfidenceRating = serde_json::from_str("2").unwrap();
        assert_eq!(ok.get(), 2);
        assert!(serde_json::from_str::<ConfidenceRating>("9").is_err());
    }
}
