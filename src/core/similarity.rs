/// Cosine similarity between two embedding vectors, in [-1, 1]
///
/// Zero-length or zero-norm vectors have no direction and score 0.
/// Mismatched dimensions also score 0; callers are expected to validate
/// dimensions up front.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Rounding can push identical vectors a hair past 1.0
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Dense mentee × mentor table of text similarities
///
/// Computed per mentor rather than per slot: every slot of a mentor shares
/// the same intro and therefore the same similarity.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn compute(mentee_vectors: &[Vec<f32>], mentor_vectors: &[Vec<f32>]) -> Self {
        let rows = mentee_vectors.len();
        let cols = mentor_vectors.len();
        let mut values = Vec::with_capacity(rows * cols);

        for mentee in mentee_vectors {
            for mentor in mentor_vectors {
                values.push(cosine_similarity(mentee, mentor));
            }
        }

        Self { rows, cols, values }
    }

    /// Build from precomputed row-major values
    ///
    /// Returns `None` if the length does not match the shape or any value
    /// is NaN or infinite.
    pub fn from_values(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != rows * cols || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self { rows, cols, values })
    }

    #[inline]
    pub fn get(&self, mentee: usize, mentor: usize) -> f64 {
        self.values[mentee * self.cols + mentor]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}
