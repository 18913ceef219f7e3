use std::collections::HashMap;

use crate::models::{Mentor, Slot};

/// Mentors expanded into one assignable slot per unit of capacity
///
/// This turns the many-to-one capacitated problem into a one-to-one
/// assignment problem.
#[derive(Debug, Clone)]
pub struct CapacityPlan<'a> {
    slots: Vec<Slot<'a>>,
    slots_by_mentor: HashMap<String, Vec<usize>>,
}

impl<'a> CapacityPlan<'a> {
    pub fn slots(&self) -> &[Slot<'a>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot<'a>> {
        self.slots.get(index)
    }

    /// Slot positions owned by a mentor; empty for zero-capacity mentors
    pub fn slots_for(&self, mentor_id: &str) -> &[usize] {
        self.slots_by_mentor
            .get(mentor_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn slots_by_mentor(&self) -> &HashMap<String, Vec<usize>> {
        &self.slots_by_mentor
    }
}

/// Expand mentors into capacity slots, preserving mentor order
///
/// A mentor with capacity 0 gets no slots and can never be assigned.
pub fn expand(mentors: &[Mentor]) -> CapacityPlan<'_> {
    let total: usize = mentors.iter().map(|m| m.capacity as usize).sum();
    let mut slots = Vec::with_capacity(total);
    let mut slots_by_mentor: HashMap<String, Vec<usize>> = HashMap::with_capacity(mentors.len());

    for (mentor_index, mentor) in mentors.iter().enumerate() {
        let owned = slots_by_mentor.entry(mentor.person.id.clone()).or_default();
        for _ in 0..mentor.capacity {
            owned.push(slots.len());
            slots.push(Slot { mentor, mentor_index });
        }

        if mentor.capacity == 0 {
            tracing::debug!(mentor_id = %mentor.person.id, "mentor has zero capacity; no slots created");
        }
    }

    CapacityPlan {
        slots,
        slots_by_mentor,
    }
}
