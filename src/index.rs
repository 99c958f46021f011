//! The public index surface: build, dispatch between HNSW and
//! brute-force search, and serialize/deserialize (spec.md §3 `Index`,
//! §4.G, §4.H).

use crate::brute_force::{brute_force_knn, cosine_threshold_search};
use crate::config::{HnswConfig, SearchConfig};
use crate::graph::Graph;
use crate::serialize::{deserialize, serialize};
use crate::types::{SearchResult, VectorStore};
use crate::{Error, Result};

/// A vector index: a read-only view of a [`VectorStore`], optionally
/// paired with a built [`Graph`].
///
/// Holding `vectors` by reference (rather than owning it) mirrors
/// spec.md §3's `Index` fields directly: the vector store outlives the
/// index, the index never copies it.
pub struct Index<'a> {
    vectors: &'a dyn VectorStore,
    graph: Option<Graph>,
    use_hnsw: bool,
}

impl<'a> Index<'a> {
    /// Build a brute-force-only index (spec.md's `create_index`):
    /// no graph, every query is an exact scan.
    pub fn create_index(vectors: &'a dyn VectorStore) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::InvalidArgument(
                "vector store must contain at least one vector".to_string(),
            ));
        }
        Ok(Self {
            vectors,
            graph: None,
            use_hnsw: false,
        })
    }

    /// Build an HNSW-backed index (spec.md's `create_hnsw_index`).
    pub fn create_hnsw_index(vectors: &'a dyn VectorStore, config: HnswConfig) -> Result<Self> {
        let graph = Graph::build(vectors, config)?;
        Ok(Self {
            vectors,
            graph: Some(graph),
            use_hnsw: true,
        })
    }

    /// Number of vectors backing this index.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Whether this index will dispatch queries to the HNSW graph.
    pub fn use_hnsw(&self) -> bool {
        self.use_hnsw && self.graph.is_some()
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        if query.len() != self.vectors.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.vectors.dim(),
                actual: query.len(),
            });
        }
        Ok(())
    }

    /// Dispatch to HNSW search when a graph is present and `use_hnsw` is
    /// set, otherwise fall back to an exact brute-force scan (spec.md
    /// §4.G/§4.H's `knn_search` dispatch).
    pub fn knn_search(&self, query: &[f32], k: usize, cfg: SearchConfig) -> Result<Vec<SearchResult>> {
        self.check_query(query)?;
        if self.use_hnsw() {
            self.hnsw_knn_search(query, k, cfg.search_width)
        } else {
            Ok(brute_force_knn(self.vectors, query, k))
        }
    }

    /// HNSW KNN search with an explicit `ef` (spec.md §4.G). Fails with
    /// [`Error::NotIndexed`] if no graph was built.
    pub fn hnsw_knn_search(&self, query: &[f32], k: usize, search_width: usize) -> Result<Vec<SearchResult>> {
        self.check_query(query)?;
        let graph = self.graph.as_ref().ok_or(Error::NotIndexed)?;
        Ok(graph.knn(self.vectors, query, k, search_width))
    }

    /// `approximate_search`: the looser of the two convenience presets,
    /// `ef = 2k` (spec.md §4.G's `SearchConfig.use_approximate_search`).
    pub fn approximate_search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.hnsw_knn_search(query, k, k.saturating_mul(2).max(1))
    }

    /// `beam_search`: the wider of the two convenience presets, `ef = 4k`.
    pub fn beam_search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.hnsw_knn_search(query, k, k.saturating_mul(4).max(1))
    }

    /// Exact Euclidean brute-force KNN, bypassing any graph entirely.
    ///
    /// A query of the wrong dimension is not rejected here: it flows
    /// through to [`crate::euclidean`], which degrades every such
    /// comparison to the `f32::MAX` sentinel distance (spec.md §4.A), so
    /// the search still returns `k` ids rather than erroring (spec.md §8
    /// scenario 6).
    pub fn brute_force_search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        Ok(brute_force_knn(self.vectors, query, k))
    }

    /// Cosine-similarity threshold search (spec.md §4.H). Returns the
    /// truncated-to-`k` matches and the total match count before
    /// truncation.
    pub fn cosine_threshold_search(
        &self,
        query: &[f32],
        threshold: f32,
        k: usize,
    ) -> Result<(Vec<SearchResult>, usize)> {
        self.check_query(query)?;
        Ok(cosine_threshold_search(self.vectors, query, threshold, k))
    }

    /// Serialize the graph's topology (spec.md §4.I). Fails with
    /// [`Error::NotIndexed`] if no graph was built.
    pub fn serialize_graph(&self) -> Result<Vec<u8>> {
        let graph = self.graph.as_ref().ok_or(Error::NotIndexed)?;
        Ok(serialize(graph.nodes()))
    }

    /// Rebuild an index's graph from a previously serialized topology
    /// and the same `config` it was built with. Per spec.md §4.I,
    /// `entry_point`/`max_layer` are recomputed, not persisted.
    pub fn with_deserialized_graph(
        vectors: &'a dyn VectorStore,
        bytes: &[u8],
        config: HnswConfig,
    ) -> Result<Self> {
        let nodes = deserialize(bytes)?;
        if nodes.len() != vectors.len() {
            return Err(Error::InvalidArgument(format!(
                "deserialized node count {} does not match vector store length {}",
                nodes.len(),
                vectors.len()
            )));
        }
        let graph = Graph::from_nodes(nodes, config)?;
        Ok(Self {
            vectors,
            graph: Some(graph),
            use_hnsw: true,
        })
    }
}
