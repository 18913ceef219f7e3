use crate::core::assignment::{Assignment, ScoreTable};
use crate::core::capacity::CapacityPlan;
use crate::models::{Match, Mentee, Mentor};

/// Outcome of turning slot assignments back into mentor matches
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub matches: Vec<Match>,
    /// Indices of unplaced mentees, in input order
    pub unmatched: Vec<usize>,
    /// Pairings the solver produced that could not be committed
    pub rejected: usize,
}

impl Reconciliation {
    pub fn unmatched_mentees<'a>(&'a self, mentees: &'a [Mentee]) -> impl Iterator<Item = &'a Mentee> + 'a {
        self.unmatched.iter().filter_map(move |&i| mentees.get(i))
    }
}

/// Commit solver pairings as mentor-level matches, enforcing capacity
///
/// Each mentor has exactly `capacity` slots, so the counter should never
/// trip; if it does, the pairing is rejected and logged rather than
/// overcommitting the mentor.
pub fn reconcile(
    pairing: &[Assignment],
    plan: &CapacityPlan<'_>,
    mentors: &[Mentor],
    mentees: &[Mentee],
    scores: &ScoreTable,
) -> Reconciliation {
    let mut assigned_counts = vec![0u32; mentors.len()];
    let mut placed = vec![false; mentees.len()];
    let mut matches = Vec::with_capacity(pairing.len());
    let mut rejected = 0usize;

    for assignment in pairing {
        let Some(slot) = plan.slot(assignment.slot) else {
            tracing::error!(slot = assignment.slot, mentee = assignment.mentee, "solver returned an unknown slot");
            rejected += 1;
            continue;
        };

        let (Some(mentee), Some(mentor)) = (mentees.get(assignment.mentee), mentors.get(slot.mentor_index)) else {
            tracing::error!(
                mentee = assignment.mentee,
                mentor = slot.mentor_index,
                "pairing references a record outside the input"
            );
            rejected += 1;
            continue;
        };

        if placed[assignment.mentee] {
            tracing::error!(mentee_id = %mentee.person.id, "mentee was paired more than once; keeping the first pairing");
            rejected += 1;
            continue;
        }

        let count = &mut assigned_counts[slot.mentor_index];
        if *count >= mentor.capacity {
            tracing::error!(
                mentor_id = %mentor.person.id,
                capacity = mentor.capacity,
                mentee_id = %mentee.person.id,
                "mentor capacity reached; rejecting pairing"
            );
            rejected += 1;
            continue;
        }

        let Some(score) = scores.get(assignment.mentee, assignment.slot) else {
            tracing::error!(
                mentee_id = %mentee.person.id,
                mentor_id = %mentor.person.id,
                "no score breakdown for pairing; rejecting"
            );
            rejected += 1;
            continue;
        };

        // Sentinel-cost pairing: the solver had to fill the slot, but there is no real score
        if !score.total.is_finite() {
            tracing::warn!(
                mentee_id = %mentee.person.id,
                mentor_id = %mentor.person.id,
                "pairing has no finite score; leaving mentee unmatched"
            );
            continue;
        }

        *count += 1;
        placed[assignment.mentee] = true;
        matches.push(Match {
            mentee_id: mentee.person.id.clone(),
            mentor_id: mentor.person.id.clone(),
            mentee_index: assignment.mentee,
            mentor_index: slot.mentor_index,
            score: *score,
        });
    }

    let unmatched = placed
        .iter()
        .enumerate()
        .filter_map(|(index, &is_placed)| (!is_placed).then_some(index))
        .collect();

    Reconciliation {
        matches,
        unmatched,
        rejected,
    }
}
