use thiserror::Error;

use crate::core::{
    assignment::{solve, ScoreTable, SolverError, DEFAULT_SENTINEL_COST},
    capacity::{expand, CapacityPlan},
    reconcile::reconcile,
    scoring::score_slot,
    similarity::SimilarityMatrix,
};
use crate::models::{Match, MatchRow, Mentee, Mentor, ScoringWeights, UnmatchedRow};
use crate::services::embedding::{encode_batch, EmbeddingError, EmbeddingProvider};

/// A failed matching run, tagged with the stage that failed
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("embedding stage failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring stage failed: similarity matrix is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}")]
    SimilarityShape {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("solving stage failed: {0}")]
    Solver(#[from] SolverError),
}

impl MatchError {
    pub fn stage(&self) -> &'static str {
        match self {
            MatchError::Embedding(_) => "embedding",
            MatchError::SimilarityShape { .. } => "scoring",
            MatchError::Solver(_) => "solving",
        }
    }
}

/// Result of the matching process
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matches: Vec<Match>,
    /// Indices of unplaced mentees, in input order
    pub unmatched: Vec<usize>,
    /// Solver pairings rejected during reconciliation; always 0 unless
    /// slot construction is broken
    pub rejected: usize,
    pub total_mentees: usize,
    pub total_slots: usize,
}

impl MatchResult {
    pub fn total_score(&self) -> f64 {
        self.matches.iter().map(|m| m.score.total).sum()
    }

    /// Report rows, one per match, in mentee order
    pub fn match_rows(&self, mentees: &[Mentee], mentors: &[Mentor]) -> Vec<MatchRow> {
        self.matches
            .iter()
            .filter_map(|m| {
                let mentee = mentees.get(m.mentee_index)?;
                let mentor = mentors.get(m.mentor_index)?;
                Some(MatchRow::new(m, mentee, mentor))
            })
            .collect()
    }

    pub fn unmatched_rows(&self, mentees: &[Mentee]) -> Vec<UnmatchedRow> {
        self.unmatched
            .iter()
            .filter_map(|&i| mentees.get(i))
            .map(UnmatchedRow::from)
            .collect()
    }

    /// Matches committed to a given mentor
    pub fn matches_for_mentor<'a>(&'a self, mentor_id: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |m| m.mentor_id == mentor_id)
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Embed mentee `looking_for` and mentor `intro` texts (one batch per side)
/// 2. Expand mentors into capacity slots
/// 3. Score every (mentee, slot) pair into a score table
/// 4. Solve the optimal assignment over the negated scores
/// 5. Reconcile slots back to mentors under capacity
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    sentinel_cost: f64,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            sentinel_cost: DEFAULT_SENTINEL_COST,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Override the cost used for pairs without a usable score
    pub fn with_sentinel_cost(mut self, sentinel_cost: f64) -> Self {
        self.sentinel_cost = sentinel_cost;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Match mentees to mentors, embedding free text with `embedder`
    pub fn find_matches(
        &self,
        mentees: &[Mentee],
        mentors: &[Mentor],
        embedder: &dyn EmbeddingProvider,
    ) -> Result<MatchResult, MatchError> {
        let looking_for: Vec<&str> = mentees.iter().map(|m| m.looking_for.as_str()).collect();
        let intros: Vec<&str> = mentors.iter().map(|m| m.person.intro.as_str()).collect();

        let mentee_vectors = encode_batch(embedder, &looking_for)?;
        let mentor_vectors = encode_batch(embedder, &intros)?;
        tracing::debug!(
            embedder = embedder.name(),
            dimension = embedder.dimension(),
            mentees = mentee_vectors.len(),
            mentors = mentor_vectors.len(),
            "computed embeddings"
        );

        let similarities = SimilarityMatrix::compute(&mentee_vectors, &mentor_vectors);
        self.find_matches_with_similarities(mentees, mentors, &similarities)
    }

    /// Match mentees to mentors using precomputed mentee × mentor text similarities
    pub fn find_matches_with_similarities(
        &self,
        mentees: &[Mentee],
        mentors: &[Mentor],
        similarities: &SimilarityMatrix,
    ) -> Result<MatchResult, MatchError> {
        if similarities.rows() != mentees.len() || similarities.cols() != mentors.len() {
            return Err(MatchError::SimilarityShape {
                expected_rows: mentees.len(),
                expected_cols: mentors.len(),
                actual_rows: similarities.rows(),
                actual_cols: similarities.cols(),
            });
        }

        let plan = expand(mentors);
        tracing::info!(
            mentees = mentees.len(),
            mentors = mentors.len(),
            slots = plan.len(),
            "expanded mentor capacity"
        );

        let scores = self.score_all(mentees, &plan, similarities);
        let costs = scores.to_cost_matrix(self.sentinel_cost)?;
        let pairing = solve(&costs)?;
        tracing::info!(pairs = pairing.len(), total_cost = costs.total_cost(&pairing), "solved assignment");

        let reconciled = reconcile(&pairing, &plan, mentors, mentees, &scores);
        if reconciled.rejected > 0 {
            tracing::error!(rejected = reconciled.rejected, "reconciliation rejected solver pairings");
        }

        Ok(MatchResult {
            matches: reconciled.matches,
            unmatched: reconciled.unmatched,
            rejected: reconciled.rejected,
            total_mentees: mentees.len(),
            total_slots: plan.len(),
        })
    }

    /// Score every mentee against every slot
    pub fn score_all(
        &self,
        mentees: &[Mentee],
        plan: &CapacityPlan<'_>,
        similarities: &SimilarityMatrix,
    ) -> ScoreTable {
        let mut table = ScoreTable::new(mentees.len(), plan.len());

        for (mentee_index, mentee) in mentees.iter().enumerate() {
            for (slot_index, slot) in plan.slots().iter().enumerate() {
                let text_similarity = similarities.get(mentee_index, slot.mentor_index);
                table.insert(
                    mentee_index,
                    slot_index,
                    score_slot(mentee, slot, text_similarity, &self.weights),
                );
            }
        }

        table
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;
    use crate::services::embedding::HashEmbedder;

    fn create_person(id: &str, gender: &str) -> Person {
        Person {
            id: id.to_string(),
            name: format!("Person {}", id),
            gender: gender.to_string(),
            contact_email: format!("{}@example.com", id),
            locations: Default::default(),
            intro: "Not provided".to_string(),
            state_of_origin: "VIC".to_string(),
            country_of_origin: "AU".to_string(),
            prefers_own_gender: false,
        }
    }

    fn create_mentee(id: &str, gender: &str) -> Mentee {
        Mentee {
            person: create_person(id, gender),
            looking_for: "Not provided".to_string(),
            prefers_same_origin: true,
        }
    }

    fn create_mentor(id: &str, gender: &str, capacity: u32) -> Mentor {
        Mentor {
            person: create_person(id, gender),
            capacity,
        }
    }

    #[test]
    fn test_gender_preference_steers_assignment() {
        let mut mentee_f = create_mentee("f", "female");
        mentee_f.person.prefers_own_gender = true;
        let mut mentee_m = create_mentee("m", "male");
        mentee_m.person.prefers_own_gender = true;
        let mentees = vec![mentee_f, mentee_m];
        let mentors = vec![create_mentor("M", "male", 1), create_mentor("F", "female", 1)];

        let result = Matcher::default()
            .find_matches(&mentees, &mentors, &HashEmbedder::default())
            .unwrap();

        assert_eq!(result.matches.len(), 2);
        let pairs: Vec<(&str, &str)> = result
            .matches
            .iter()
            .map(|m| (m.mentee_id.as_str(), m.mentor_id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("f", "F"), ("m", "M")]);
    }

    #[test]
    fn test_no_mentors_leaves_everyone_unmatched() {
        let mentees = vec![create_mentee("a", "female"), create_mentee("b", "male")];

        let result = Matcher::default()
            .find_matches(&mentees, &[], &HashEmbedder::default())
            .unwrap();

        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched, vec![0, 1]);
        assert_eq!(result.total_slots, 0);
    }

    #[test]
    fn test_no_mentees() {
        let mentors = vec![create_mentor("a", "female", 2)];

        let result = Matcher::default()
            .find_matches(&[], &mentors, &HashEmbedder::default())
            .unwrap();

        assert!(result.matches.is_empty());
        assert!(result.unmatched.is_empty());
        assert_eq!(result.total_slots, 2);
    }

    #[test]
    fn test_similarity_shape_checked() {
        let mentees = vec![create_mentee("a", "female")];
        let mentors = vec![create_mentor("b", "female", 1)];
        let similarities = SimilarityMatrix::from_values(2, 1, vec![0.0, 0.0]).unwrap();

        let err = Matcher::default()
            .find_matches_with_similarities(&mentees, &mentors, &similarities)
            .unwrap_err();

        assert_eq!(err.stage(), "scoring");
    }

    #[test]
    fn test_score_table_covers_every_slot() {
        let mentees = vec![create_mentee("a", "female"), create_mentee("b", "male")];
        let mentors = vec![create_mentor("x", "female", 2), create_mentor("y", "male", 1)];
        let plan = expand(&mentors);
        let similarities = SimilarityMatrix::from_values(2, 2, vec![0.5, 0.0, 0.0, 0.5]).unwrap();

        let table = Matcher::default().score_all(&mentees, &plan, &similarities);

        assert_eq!(table.len(), 6);
        assert_eq!(table.get(0, 0), table.get(0, 1));
        assert_eq!(table.get(0, 0).map(|s| s.text_similarity_score), Some(2.5));
        assert_eq!(table.get(1, 2).map(|s| s.text_similarity_score), Some(2.5));
    }

    #[test]
    fn test_infinite_sentinel_fails_in_solving_stage() {
        let mentees = vec![create_mentee("a", "female")];
        let mentors = vec![create_mentor("b", "female", 1)];

        let err = Matcher::default()
            .with_sentinel_cost(f64::INFINITY)
            .find_matches(&mentees, &mentors, &HashEmbedder::default())
            .unwrap_err();

        assert_eq!(err.stage(), "solving");
        assert!(matches!(err, MatchError::Solver(SolverError::NonFiniteSentinel(_))));
    }
}
