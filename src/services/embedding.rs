use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised while embedding free text
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Unknown embedding provider: {0}")]
    UnknownProvider(String),

    #[error("Provider returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch { index: usize, expected: usize, actual: usize },

    #[error("Vector {index} contains a NaN or infinite component")]
    NonFinite { index: usize },

    #[error("Embedding provider failed: {0}")]
    Provider(String),
}

/// Maps text to fixed-length vectors
///
/// `encode` must return one vector per input text, in input order, each of
/// length `dimension()`. Results must depend only on the input strings.
pub trait EmbeddingProvider {
    /// Provider name, recorded in the run summary
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Encode a batch and check the provider kept its contract
pub fn encode_batch(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = provider.encode(texts)?;

    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let expected = provider.dimension();
    if let Some((index, vector)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
        return Err(EmbeddingError::DimensionMismatch {
            index,
            expected,
            actual: vector.len(),
        });
    }

    if let Some(index) = vectors.iter().position(|v| v.iter().any(|x| !x.is_finite())) {
        return Err(EmbeddingError::NonFinite { index });
    }

    Ok(vectors)
}

/// Fixed seed so embeddings are stable across runs and Rust versions.
/// Changing it changes every vector; bump `HashEmbedder::VERSION` if you do.
const HASH_SEED_K0: u64 = 0x6d65_6e74_6f72_0001;
const HASH_SEED_K1: u64 = 0x6d61_7463_6800_0002;

/// Weight of adjacent word pairs relative to single words
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic bag-of-words embedder using signed feature hashing
///
/// No model to load: each unigram and bigram is hashed to a dimension
/// (SipHash-1-3 with a fixed seed) with a hashed sign, and the result is
/// L2-normalized. Texts sharing vocabulary get high cosine similarity.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const VERSION: &'static str = "hash-v1";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(&self, token: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        salt.hash(&mut hasher);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let index = (self.hash(feature, 0) % self.dimension as u64) as usize;
        let sign = if self.hash(feature, 1) % 2 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let words = tokenize(text);

        for word in &words {
            self.add_feature(&mut vector, word, 1.0);
        }
        for pair in words.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        Self::VERSION
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }
}

/// Lower-cased alphanumeric words
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Build the embedder named in configuration
pub fn create_embedder(name: &str, dimension: usize) -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    match name {
        "hash" => Ok(Box::new(HashEmbedder::new(dimension))),
        other => Err(EmbeddingError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::similarity::cosine_similarity;

    struct BrokenProvider {
        vectors: Vec<Vec<f32>>,
    }

    impl EmbeddingProvider for BrokenProvider {
        fn name(&self) -> &str {
            "broken"
        }

        fn dimension(&self) -> usize {
            2
        }

        fn encode(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(self.vectors.clone())
        }
    }

    #[test]
    fn test_hash_embedder_normalized() {
        let embedder = HashEmbedder::new(64);
        let vector = embedder.embed("Looking for guidance on a career in software");

        assert_eq!(vector.len(), 64);
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hash_embedder_deterministic() {
        let embedder = HashEmbedder::default();
        assert_eq!(embedder.embed("data science"), embedder.embed("data science"));
        assert_eq!(embedder.embed("Data, Science!"), embedder.embed("data science"));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.embed("  ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("help breaking into data science and machine learning");
        let close = embedder.embed("I work in data science and machine learning");
        let far = embedder.embed("retired carpenter who enjoys woodworking");

        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_encode_batch_preserves_order() {
        let embedder = HashEmbedder::new(32);
        let vectors = encode_batch(&embedder, &["alpha", "beta"]).unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], embedder.embed("alpha"));
        assert_eq!(vectors[1], embedder.embed("beta"));
    }

    #[test]
    fn test_encode_batch_checks_count() {
        let provider = BrokenProvider { vectors: vec![vec![1.0, 0.0]] };
        let result = encode_batch(&provider, &["a", "b"]);
        assert!(matches!(result, Err(EmbeddingError::CountMismatch { expected: 2, actual: 1 })));
    }

    #[test]
    fn test_encode_batch_checks_dimension() {
        let provider = BrokenProvider { vectors: vec![vec![1.0, 0.0], vec![1.0]] };
        let result = encode_batch(&provider, &["a", "b"]);
        assert!(matches!(result, Err(EmbeddingError::DimensionMismatch { index: 1, .. })));
    }

    #[test]
    fn test_encode_batch_rejects_non_finite_components() {
        let provider = BrokenProvider { vectors: vec![vec![1.0, 0.0], vec![f32::NAN, 1.0]] };
        let result = encode_batch(&provider, &["a", "b"]);
        assert!(matches!(result, Err(EmbeddingError::NonFinite { index: 1 })));

        let provider = BrokenProvider { vectors: vec![vec![f32::INFINITY, 0.0]] };
        let result = encode_batch(&provider, &["a"]);
        assert!(matches!(result, Err(EmbeddingError::NonFinite { index: 0 })));
    }

    #[test]
    fn test_create_embedder() {
        assert_eq!(create_embedder("hash", 128).unwrap().dimension(), 128);
        assert!(matches!(create_embedder("onnx", 128), Err(EmbeddingError::UnknownProvider(_))));
    }
}
