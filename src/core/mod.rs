// Core algorithm exports
pub mod assignment;
pub mod capacity;
pub mod filters;
pub mod matcher;
pub mod reconcile;
pub mod scoring;
pub mod similarity;

pub use assignment::{solve, Assignment, CostMatrix, ScoreTable, SolverError, DEFAULT_SENTINEL_COST};
pub use capacity::{expand, CapacityPlan};
pub use filters::{gender_preference_violations, shared_locations, violates_origin_preference};
pub use matcher::{MatchError, MatchResult, Matcher};
pub use reconcile::{reconcile, Reconciliation};
pub use scoring::{calculate_compatibility, score_slot};
pub use similarity::{cosine_similarity, SimilarityMatrix};
