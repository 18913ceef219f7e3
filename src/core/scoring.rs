use crate::core::filters::{
    gender_preference_violations, same_country, same_state, shared_locations,
    violates_origin_preference,
};
use crate::models::{Mentee, Mentor, ScoreBreakdown, ScoringWeights, Slot};

/// Calculate the compatibility score of a mentee with a mentor
///
/// Scoring formula (all additive, no normalization):
/// score = (
///     - gender_penalty * violations   # each side's own-gender preference, 0..=2
///     - origin_penalty                # mentee wants same origin, state or country differs
///     + location * |shared tags|      # uncapped
///     + state_match                   # same state of origin
///     + country_match                 # same country of origin
///     + text_similarity * cosine      # looking_for vs intro, cosine in [-1, 1]
/// )
pub fn calculate_compatibility(
    mentee: &Mentee,
    mentor: &Mentor,
    text_similarity: f64,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let gender_mismatch_penalty = calculate_gender_penalty(mentee, mentor, weights);

    let origin_mismatch_penalty = if violates_origin_preference(mentee, mentor) {
        -weights.origin_mismatch_penalty
    } else {
        0.0
    };

    let location_score = shared_locations(mentee, mentor).count() as f64 * weights.location;

    let state_match_score = if same_state(mentee, mentor) { weights.state_match } else { 0.0 };
    let country_match_score = if same_country(mentee, mentor) { weights.country_match } else { 0.0 };

    let text_similarity_score = text_similarity * weights.text_similarity;

    ScoreBreakdown::new(
        gender_mismatch_penalty,
        origin_mismatch_penalty,
        location_score,
        state_match_score,
        country_match_score,
        text_similarity_score,
    )
}

/// Score a mentee against one slot; identical for every slot of a mentor
#[inline]
pub fn score_slot(
    mentee: &Mentee,
    slot: &Slot<'_>,
    text_similarity: f64,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    calculate_compatibility(mentee, slot.mentor, text_similarity, weights)
}

/// Gender penalty (0 or negative)
///
/// Both sides' preferences apply independently, so a pair where both prefer
/// their own gender and genders differ pays the penalty twice.
#[inline]
fn calculate_gender_penalty(mentee: &Mentee, mentor: &Mentor, weights: &ScoringWeights) -> f64 {
    match gender_preference_violations(mentee, mentor) {
        0 => 0.0,
        violations => -(violations as f64) * weights.gender_mismatch_penalty,
    }
}
