//! An in-memory approximate-nearest-neighbor vector index built on a
//! Hierarchical Navigable Small World (HNSW) graph, with an exact
//! brute-force fallback and a binary topology serializer.
//!
//! The crate consumes a read-only [`VectorStore`]: vector storage,
//! embedding computation, and the vectors' own lifetime are the
//! caller's concern. What lives here is the graph itself: construction,
//! the greedy/beam-search descent, bidirectional-edge bookkeeping, and
//! topology serialization.
//!
//! # Example
//!
//! ```
//! use hnsw_core::{HnswConfig, Index, OwnedVectorStore};
//!
//! # fn main() -> hnsw_core::Result<()> {
//! let vectors = OwnedVectorStore::new(vec![
//!     vec![0.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//! ]).unwrap();
//!
//! let index = Index::create_hnsw_index(&vectors, HnswConfig::balanced())?;
//! let results = index.approximate_search(&[0.1, 0.0], 2)?;
//! assert_eq!(results[0].id, 1);
//! # Ok(())
//! # }
//! ```

mod brute_force;
mod config;
mod distance;
mod graph;
mod heap;
mod index;
mod node;
mod sampler;
mod serialize;
mod types;

pub use brute_force::{brute_force_knn, cosine_threshold_search};
pub use config::{HnswConfig, SearchConfig};
pub use distance::{cosine, euclidean, magnitude};
pub use graph::Graph;
pub use index::Index;
pub use node::Node;
pub use sampler::{sample_layer, LayerSampler};
pub use serialize::{deserialize, serialize};
pub use types::{NodeId, OwnedVectorStore, SearchCandidate, SearchResult, VectorId, VectorStore};

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("no graph has been built for this index")]
    NotIndexed,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("allocation failed: {0}")]
    OutOfMemory(String),

    #[error("corrupt serialized stream: {0}")]
    CorruptStream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
