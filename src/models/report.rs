use serde::{Deserialize, Serialize};

use crate::models::domain::{Match, Mentee, Mentor, ScoringWeights};

/// One exported row per committed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub mentee_id: String,
    pub mentor_id: String,
    pub mentee_name: String,
    pub mentor_name: String,
    pub mentee_email: String,
    pub mentor_email: String,
    pub mentee_intro: String,
    pub mentor_intro: String,
    pub compatibility_score: f64,
    pub gender_mismatch_penalty: f64,
    pub origin_mismatch_penalty: f64,
    pub location_score: f64,
    pub state_match_score: f64,
    pub country_match_score: f64,
    pub text_similarity_score: f64,
}

impl MatchRow {
    pub fn new(matched: &Match, mentee: &Mentee, mentor: &Mentor) -> Self {
        let score = &matched.score;
        Self {
            mentee_id: mentee.person.id.clone(),
            mentor_id: mentor.person.id.clone(),
            mentee_name: mentee.person.name.clone(),
            mentor_name: mentor.person.name.clone(),
            mentee_email: mentee.person.contact_email.clone(),
            mentor_email: mentor.person.contact_email.clone(),
            mentee_intro: mentee.person.intro.clone(),
            mentor_intro: mentor.person.intro.clone(),
            compatibility_score: score.total,
            gender_mismatch_penalty: score.gender_mismatch_penalty,
            origin_mismatch_penalty: score.origin_mismatch_penalty,
            location_score: score.location_score,
            state_match_score: score.state_match_score,
            country_match_score: score.country_match_score,
            text_similarity_score: score.text_similarity_score,
        }
    }
}

/// A mentee that could not be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedRow {
    pub mentee_id: String,
    pub mentee_name: String,
    pub mentee_email: String,
}

impl From<&Mentee> for UnmatchedRow {
    fn from(mentee: &Mentee) -> Self {
        Self {
            mentee_id: mentee.person.id.clone(),
            mentee_name: mentee.person.name.clone(),
            mentee_email: mentee.person.contact_email.clone(),
        }
    }
}

/// Run summary written next to the match report
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: uuid::Uuid,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub embedder: String,
    pub total_mentees: usize,
    pub total_mentors: usize,
    pub total_slots: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub capacity_rejections: usize,
    pub total_score: f64,
    pub weights: ScoringWeights,
}
