// Service exports
pub mod embedding;
pub mod export;
pub mod loader;

pub use embedding::{create_embedder, encode_batch, EmbeddingError, EmbeddingProvider, HashEmbedder};
pub use export::{write_matches, write_summary, write_unmatched, ExportError, OutputBatch};
pub use loader::{load_mentees, load_mentors, read_mentees, read_mentors, LoadError};
