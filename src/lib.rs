//! Mentor Match - capacity-aware optimal mentor/mentee matching
//!
//! Every mentee is scored against every unit of mentor capacity, and the
//! globally best one-to-one assignment is computed with the Hungarian
//! algorithm before being reconciled back to mentors under their capacity.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, MatchResult, calculate_compatibility, solve, CostMatrix};
pub use models::{Mentee, Mentor, Match, ScoreBreakdown, ScoringWeights, MatchRow, UnmatchedRow, RunSummary};
pub use services::{EmbeddingProvider, HashEmbedder};
