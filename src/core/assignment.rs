use std::collections::HashMap;
use thiserror::Error;

use crate::models::ScoreBreakdown;

/// Cost used for pairs without a usable score.
///
/// Large but finite so the solver stays well-defined.
pub const DEFAULT_SENTINEL_COST: f64 = 1e6;

/// Errors from the assignment solver
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("Cost matrix shape {rows}x{cols} does not match {len} values")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("Non-finite cost {value} at ({row}, {col})")]
    NonFiniteCost { row: usize, col: usize, value: f64 },

    #[error("Sentinel cost must be finite, got {0}")]
    NonFiniteSentinel(f64),

    #[error("No augmenting path found for row {row}")]
    NoAugmentingPath { row: usize },
}

/// Score breakdowns keyed by (mentee index, slot index)
///
/// Keeps the itemized scores around after the solver has only seen the
/// negated totals, so the report can be rebuilt from solver output.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    num_mentees: usize,
    num_slots: usize,
    entries: HashMap<(usize, usize), ScoreBreakdown>,
}

impl ScoreTable {
    pub fn new(num_mentees: usize, num_slots: usize) -> Self {
        Self {
            num_mentees,
            num_slots,
            entries: HashMap::with_capacity(num_mentees * num_slots),
        }
    }

    pub fn insert(&mut self, mentee: usize, slot: usize, breakdown: ScoreBreakdown) {
        self.entries.insert((mentee, slot), breakdown);
    }

    pub fn get(&self, mentee: usize, slot: usize) -> Option<&ScoreBreakdown> {
        self.entries.get(&(mentee, slot))
    }

    pub fn num_mentees(&self) -> usize {
        self.num_mentees
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the mentee × slot cost matrix (cost = -score)
    ///
    /// Missing pairs and non-finite scores get `sentinel_cost`, which must
    /// itself be finite.
    pub fn to_cost_matrix(&self, sentinel_cost: f64) -> Result<CostMatrix, SolverError> {
        if !sentinel_cost.is_finite() {
            return Err(SolverError::NonFiniteSentinel(sentinel_cost));
        }

        let mut data = Vec::with_capacity(self.num_mentees * self.num_slots);
        let mut substituted = 0usize;

        for mentee in 0..self.num_mentees {
            for slot in 0..self.num_slots {
                match self.get(mentee, slot) {
                    Some(breakdown) if breakdown.total.is_finite() => data.push(-breakdown.total),
                    _ => {
                        substituted += 1;
                        data.push(sentinel_cost);
                    }
                }
            }
        }

        if substituted > 0 {
            tracing::warn!(substituted, sentinel_cost, "pairs without a usable score were given the sentinel cost");
        }

        CostMatrix::new(self.num_mentees, self.num_slots, data)
    }
}

/// Dense row-major cost matrix (rows = mentees, cols = slots)
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build a matrix from row-major values, rejecting infinities and NaN
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, SolverError> {
        if data.len() != rows * cols {
            return Err(SolverError::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }

        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(SolverError::NonFiniteCost {
                row: pos / cols,
                col: pos % cols,
                value: data[pos],
            });
        }

        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SolverError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(SolverError::ShapeMismatch {
                rows: rows.len(),
                cols,
                len: bad.len(),
            });
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sum of costs for a set of assignments
    pub fn total_cost(&self, pairs: &[Assignment]) -> f64 {
        pairs.iter().map(|a| self.get(a.mentee, a.slot)).sum()
    }

    fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.get(row, col));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

/// One mentee placed in one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub mentee: usize,
    pub slot: usize,
}

/// Compute a minimum-cost one-to-one assignment of rows to columns
///
/// Returns exactly `min(rows, cols)` pairs sorted by mentee index.
/// An empty matrix (no mentees or no slots) yields no pairs.
///
/// This is the Hungarian (Kuhn–Munkres) algorithm in its shortest
/// augmenting path form with row/column potentials, O(n²m) for n ≤ m.
/// The result is deterministic for a given matrix.
pub fn solve(costs: &CostMatrix) -> Result<Vec<Assignment>, SolverError> {
    if costs.rows == 0 || costs.cols == 0 {
        return Ok(Vec::new());
    }

    let mut pairs = if costs.rows <= costs.cols {
        hungarian(costs)?
            .into_iter()
            .map(|(row, col)| Assignment { mentee: row, slot: col })
            .collect::<Vec<_>>()
    } else {
        // More mentees than slots: assign every slot a mentee instead
        hungarian(&costs.transposed())?
            .into_iter()
            .map(|(row, col)| Assignment { mentee: col, slot: row })
            .collect::<Vec<_>>()
    };

    pairs.sort_by_key(|a| a.mentee);
    Ok(pairs)
}

/// Hungarian algorithm for rows <= cols; returns (row, col) pairs for every row
fn hungarian(costs: &CostMatrix) -> Result<Vec<(usize, usize)>, SolverError> {
    let n = costs.rows;
    let m = costs.cols;
    debug_assert!(n <= m);

    // 1-based potentials; index 0 is the virtual root column
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    // owner[j] = row matched to column j (0 = free)
    let mut owner = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0usize;
        let mut min_slack = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let slack = costs.get(i0 - 1, j - 1) - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }

            if j1 == 0 {
                return Err(SolverError::NoAugmentingPath { row: row - 1 });
            }

            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the root
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    Ok((1..=m)
        .filter(|&j| owner[j] != 0)
        .map(|j| (owner[j] - 1, j - 1))
        .collect())
}
