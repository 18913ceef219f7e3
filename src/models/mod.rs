// Model exports
pub mod domain;
pub mod records;
pub mod report;

pub use domain::{Person, Mentee, Mentor, Slot, ScoreBreakdown, Match, ScoringWeights};
pub use records::{MenteeRecord, MentorRecord, RecordError};
pub use report::{MatchRow, UnmatchedRow, RunSummary};
