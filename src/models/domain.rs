use serde::Serialize;
use std::collections::BTreeSet;

/// Attributes shared by mentees and mentors
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    /// Trimmed and lower-cased at load time
    pub gender: String,
    pub contact_email: String,
    pub locations: BTreeSet<String>,
    pub intro: String,
    pub state_of_origin: String,
    pub country_of_origin: String,
    /// Prefers to be matched with someone of their own gender
    pub prefers_own_gender: bool,
}

/// A person looking for a mentor
#[derive(Debug, Clone, PartialEq)]
pub struct Mentee {
    pub person: Person,
    pub looking_for: String,
    pub prefers_same_origin: bool,
}

/// A person offering mentorship to up to `capacity` mentees
#[derive(Debug, Clone, PartialEq)]
pub struct Mentor {
    pub person: Person,
    pub capacity: u32,
}

/// One unit of mentor capacity.
///
/// Slots of the same mentor are interchangeable and only live for the
/// duration of a single matching run.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub mentor: &'a Mentor,
    /// Position of the owning mentor in the input
    pub mentor_index: usize,
}

/// Itemized compatibility score for one (mentee, slot) pair
///
/// Penalties are stored signed (zero or negative), bonuses zero or positive.
/// `total` is always the sum of the six components.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub gender_mismatch_penalty: f64,
    pub origin_mismatch_penalty: f64,
    pub location_score: f64,
    pub state_match_score: f64,
    pub country_match_score: f64,
    pub text_similarity_score: f64,
}

impl ScoreBreakdown {
    pub fn new(
        gender_mismatch_penalty: f64,
        origin_mismatch_penalty: f64,
        location_score: f64,
        state_match_score: f64,
        country_match_score: f64,
        text_similarity_score: f64,
    ) -> Self {
        Self {
            total: gender_mismatch_penalty
                + origin_mismatch_penalty
                + location_score
                + state_match_score
                + country_match_score
                + text_similarity_score,
            gender_mismatch_penalty,
            origin_mismatch_penalty,
            location_score,
            state_match_score,
            country_match_score,
            text_similarity_score,
        }
    }
}

/// A committed mentee → mentor pairing
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub mentee_id: String,
    pub mentor_id: String,
    /// Positions in the mentee and mentor inputs
    pub mentee_index: usize,
    pub mentor_index: usize,
    pub score: ScoreBreakdown,
}

/// Scoring weights
///
/// Penalties are magnitudes; the scoring engine applies the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub gender_mismatch_penalty: f64,
    pub origin_mismatch_penalty: f64,
    pub location: f64,
    pub state_match: f64,
    pub country_match: f64,
    pub text_similarity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gender_mismatch_penalty: 20.0,
            origin_mismatch_penalty: 5.0,
            location: 3.0,
            state_match: 2.0,
            country_match: 1.0,
            text_similarity: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total_is_sum_of_components() {
        let breakdown = ScoreBreakdown::new(-20.0, -5.0, 6.0, 2.0, 1.0, 2.5);
        assert_eq!(breakdown.total, -13.5);
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.gender_mismatch_penalty, 20.0);
        assert_eq!(weights.origin_mismatch_penalty, 5.0);
        assert_eq!(weights.location, 3.0);
        assert_eq!(weights.state_match, 2.0);
        assert_eq!(weights.country_match, 1.0);
        assert_eq!(weights.text_similarity, 5.0);
    }
}
