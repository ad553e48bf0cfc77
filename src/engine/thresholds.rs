//! Confidence cut-points that drive mastery and remedial signalling.

use serde::{Deserialize, Serialize};

/// Confidence floor that, together with [`MASTERY_SCORE`], flags mastery.
pub const ADVANCE: f64 = 0.85;

/// Below this a topic needs more practice. Read by reporting only.
pub const REINFORCE: f64 = 0.60;

/// Below this the selected topic is flagged for remedial content.
pub const BACKTRACK: f64 = 0.40;

/// Score floor for mastery.
pub const MASTERY_SCORE: f64 = 0.80;

/// The full set of cut-points used by an [`Engine`](super::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Thresholds {
    pub advance: f64,
    pub reinforce: f64,
    pub backtrack: f64,
    pub mastery_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            advance: ADVANCE,
            reinforce: REINFORCE,
            backtrack: BACKTRACK,
            mastery_score: MASTERY_SCORE,
        }
    }
}

/// Where a confidence value sits relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfidenceTier {
    /// At or above `advance`.
    Advance,
    /// At or above `reinforce`.
    OnTrack,
    /// At or above `backtrack`: needs more practice.
    Reinforce,
    /// Below `backtrack`: remedial content.
    Backtrack,
}

impl Thresholds {
    /// Whether an attempt with this score and confidence demonstrates mastery.
    #[must_use]
    pub fn is_mastery(&self, score: f64, confidence: f64) -> bool {
        score >= self.mastery_score && confidence >= self.advance
    }

    /// Whether a recorded confidence calls for remedial content.
    #[must_use]
    pub fn needs_remedial(&self, confidence: f64) -> bool {
        confidence < self.backtrack
    }

    #[must_use]
    pub fn tier(&self, confidence: f64) -> ConfidenceTier {
        if confidence >= self.advance {
            ConfidenceTier::Advance
        } else if confidence >= self.reinforce {
            ConfidenceTier::OnTrack
        } else if confidence >= self.backtrack {
            ConfidenceTier::Reinforce
        } else {
            ConfidenceTier::Backtrack
        }
    }

    /// Checks the cut-points are ordered and within `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if ![self.advance, self.reinforce, self.backtrack, self.mastery_score]
            .into_iter()
            .all(in_unit)
        {
            return Err("thresholds must be between 0 and 1".to_string());
        }
        if !(self.backtrack <= self.reinforce && self.reinforce <= self.advance) {
            return Err(format!(
                "thresholds must satisfy backtrack <= reinforce <= advance, got {} / {} / {}",
                self.backtrack, self.reinforce, self.advance
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_table() {
        let t = Thresholds::default();
        assert!((t.advance - 0.85).abs() < f64::EPSILON);
        assert!((t.reinforce - 0.60).abs() < f64::EPSILON);
        assert!((t.backtrack - 0.40).abs() < f64::EPSILON);
        assert!((t.mastery_score - 0.80).abs() < f64::EPSILON);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn mastery_needs_both_floors() {
        let t = Thresholds::default();
        assert!(t.is_mastery(0.8, 0.85));
        assert!(!t.is_mastery(0.79, 0.95));
        assert!(!t.is_mastery(0.95, 0.84));
    }

    #[test]
    fn tiers_are_inclusive_at_the_lower_bound() {
        let t = Thresholds::default();
        assert_eq!(t.tier(0.85), ConfidenceTier::Advance);
        assert_eq!(t.tier(0.6), ConfidenceTier::OnTrack);
        assert_eq!(t.tier(0.4), ConfidenceTier::Reinforce);
        assert_eq!(t.tier(0.39), ConfidenceTier::Backtrack);
    }

    #[test]
    fn rejects_unordered_cut_points() {
        let t = Thresholds {
            backtrack: 0.7,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());

        let t = Thresholds {
            mastery_score: 1.5,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }
}
