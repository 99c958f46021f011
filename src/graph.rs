//! The HNSW graph: construction (spec.md §4.E), per-layer beam search
//! (§4.F), and the KNN descent (§4.G).

use crate::config::HnswConfig;
use crate::distance::euclidean;
use crate::heap::{BoundedHeap, HeapMode};
use crate::node::Node;
use crate::sampler::LayerSampler;
use crate::types::{NodeId, SearchCandidate, SearchResult, VectorStore};
use crate::Error;

/// A built, read-only (post-construction) multi-layer proximity graph.
///
/// Vector data is never stored here; every method that needs distances
/// takes the [`VectorStore`] as an explicit argument, since the graph
/// only ever borrows it (spec.md §3: "vectors: non-owning view of the
/// vector store").
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    pub entry_point: NodeId,
    pub max_layer: usize,
    pub config: HnswConfig,
}

impl Graph {
    /// Number of nodes in the graph (equal to the vector store's `len`
    /// at build time).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Access a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// All nodes, for invariant-checking and serialization.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Build a graph from `vectors`, seeding the layer sampler from OS
    /// entropy (spec.md §4.D's default, nondeterministic contract).
    pub fn build(vectors: &dyn VectorStore, config: HnswConfig) -> Result<Self, Error> {
        let mut sampler = LayerSampler::new();
        Self::build_with_sampler(vectors, config, &mut sampler)
    }

    /// Build a graph using a caller-supplied sampler, for reproducible
    /// builds in tests (spec.md §4.D's seed-override hook).
    pub fn build_with_sampler(
        vectors: &dyn VectorStore,
        config: HnswConfig,
        sampler: &mut LayerSampler,
    ) -> Result<Self, Error> {
        let n = vectors.len();
        if n == 0 {
            return Err(Error::InvalidArgument(
                "vector store must contain at least one vector".to_string(),
            ));
        }
        if config.max_connections == 0 || config.max_connections_layer0 == 0 {
            return Err(Error::InvalidArgument(
                "max_connections and max_connections_layer0 must be positive".to_string(),
            ));
        }
        if config.ef_construction == 0 {
            return Err(Error::InvalidArgument(
                "ef_construction must be positive".to_string(),
            ));
        }

        // Phase 1: allocate every node and sample its top layer before
        // any edges exist. Node 0 is the initial entry point; the
        // running max is updated only on a strict improvement, so the
        // first node to reach it stays the entry point (spec.md §4.E).
        let mut nodes = Vec::with_capacity(n);
        let mut entry_point = 0;
        let mut max_layer = 0;
        for id in 0..n {
            let top_layer = sampler.sample(config.level_factor);
            nodes.push(Node::new(id, top_layer));
            if id == 0 {
                max_layer = top_layer;
                entry_point = 0;
            } else if top_layer > max_layer {
                max_layer = top_layer;
                entry_point = id;
            }
        }

        let mut graph = Self {
            nodes,
            entry_point,
            max_layer,
            config,
        };

        tracing::debug!(
            node_count = n,
            max_layer,
            entry_point,
            "hnsw graph allocated"
        );

        // Phase 2: insert every node 1..N-1 (not just node 1; see
        // spec.md §9 Open Question #1).
        for q in 1..n {
            graph.insert_node(vectors, q);
        }

        tracing::debug!(node_count = n, "hnsw graph build complete");

        Ok(graph)
    }

    /// Wrap a previously deserialized node list back into a `Graph`,
    /// recomputing `entry_point`/`max_layer` from the restored topology
    /// (spec.md §4.I: these fields are not persisted).
    pub fn from_nodes(nodes: Vec<Node>, config: HnswConfig) -> Result<Self, Error> {
        if nodes.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot restore a graph with zero nodes".to_string(),
            ));
        }
        let mut entry_point = 0;
        let mut max_layer = nodes[0].top_layer;
        for (id, node) in nodes.iter().enumerate().skip(1) {
            if node.top_layer > max_layer {
                max_layer = node.top_layer;
                entry_point = id;
            }
        }
        Ok(Self {
            nodes,
            entry_point,
            max_layer,
            config,
        })
    }

    /// Insert node `q` (already allocated by phase 1) into the graph.
    fn insert_node(&mut self, vectors: &dyn VectorStore, q: NodeId) {
        let l_q = self.nodes[q].top_layer;
        let query: Vec<f32> = vectors.vector(self.nodes[q].vector_id).to_vec();

        let mut current = if l_q + 1 <= self.max_layer {
            self.zoom_in(vectors, &query, self.max_layer, l_q + 1)
        } else {
            self.entry_point
        };

        for layer in (0..=l_q).rev() {
            let m_layer = if layer == 0 {
                self.config.max_connections_layer0
            } else {
                self.config.max_connections
            };

            let selected = self.beam_search_and_select(
                vectors,
                &query,
                current,
                layer,
                self.config.ef_construction,
                m_layer,
            );

            for &r in &selected {
                self.nodes[q].add_neighbor(layer, r);
                self.nodes[r].add_neighbor(layer, q);
            }

            if let Some(&best) = selected.first() {
                current = best;
            }
        }

        tracing::trace!(node = q, top_layer = l_q, "inserted node into hnsw graph");
    }

    /// Greedy 1-best descent from `self.entry_point`, one pass per layer
    /// from `start_layer` down to `end_layer_inclusive` (spec.md §4.E
    /// step 1; single pass per spec.md §9 Open Question #3, a node's
    /// neighbor list is scanned once, not re-scanned after an
    /// improvement).
    fn zoom_in(
        &self,
        vectors: &dyn VectorStore,
        query: &[f32],
        start_layer: usize,
        end_layer_inclusive: usize,
    ) -> NodeId {
        let mut current = self.entry_point;
        for layer in (end_layer_inclusive..=start_layer).rev() {
            let mut best = current;
            let mut best_dist = euclidean(query, vectors.vector(self.nodes[current].vector_id));
            for &neighbor in self.nodes[current].neighbors(layer) {
                let d = euclidean(query, vectors.vector(self.nodes[neighbor].vector_id));
                if d < best_dist {
                    best_dist = d;
                    best = neighbor;
                }
            }
            current = best;
        }
        current
    }

    /// Beam search a single layer during construction and select up to
    /// `m_layer` closest distinct neighbors for bidirectional linking
    /// (spec.md §4.E step 2).
    ///
    /// Unlike [`Graph::search_layer`], this has no bitset: nodes may be
    /// revisited, bounded only by the two heaps' capacity. The final
    /// dedup-by-id step exists precisely because of that.
    fn beam_search_and_select(
        &self,
        vectors: &dyn VectorStore,
        query: &[f32],
        entry: NodeId,
        layer: usize,
        ef_construction: usize,
        m_layer: usize,
    ) -> Vec<NodeId> {
        let mut frontier = BoundedHeap::new(ef_construction, HeapMode::Min);
        let mut visited = BoundedHeap::new(ef_construction, HeapMode::Max);

        let entry_dist = euclidean(query, vectors.vector(self.nodes[entry].vector_id));
        frontier.insert(SearchCandidate::new(entry, entry_dist));
        visited.insert(SearchCandidate::new(entry, entry_dist));

        while let Some(c) = frontier.pop() {
            if visited.len() >= ef_construction {
                if let Some(worst) = visited.peek() {
                    if c.distance > worst.distance {
                        break;
                    }
                }
            }

            for &neighbor in self.nodes[c.node_id].neighbors(layer) {
                let d = euclidean(query, vectors.vector(self.nodes[neighbor].vector_id));
                let dominated = visited.len() >= ef_construction
                    && visited.peek().is_some_and(|worst| d >= worst.distance);
                if !dominated {
                    frontier.insert(SearchCandidate::new(neighbor, d));
                    visited.insert(SearchCandidate::new(neighbor, d));
                }
            }
        }

        let mut selected = Vec::with_capacity(m_layer);
        for candidate in visited.drain_sorted() {
            if selected.len() >= m_layer {
                break;
            }
            if !selected.contains(&candidate.node_id) {
                selected.push(candidate.node_id);
            }
        }
        selected
    }

    /// Beam search at a single layer from `entry_id` (spec.md §4.F).
    /// Returns up to `ef` node ids, closest first.
    pub fn search_layer(
        &self,
        vectors: &dyn VectorStore,
        query: &[f32],
        entry_id: NodeId,
        layer: usize,
        ef: usize,
    ) -> Vec<NodeId> {
        let mut frontier = BoundedHeap::new(ef, HeapMode::Min);
        let mut top = BoundedHeap::new(ef * 2, HeapMode::Max);
        let mut visited = vec![false; self.nodes.len()];

        let entry_dist = euclidean(query, vectors.vector(self.nodes[entry_id].vector_id));
        frontier.insert(SearchCandidate::new(entry_id, entry_dist));
        top.insert(SearchCandidate::new(entry_id, entry_dist));
        visited[entry_id] = true;

        while let Some(c) = frontier.pop() {
            if top.len() >= ef {
                if let Some(worst) = top.peek() {
                    if c.distance > worst.distance {
                        break;
                    }
                }
            }

            for &n in self.nodes[c.node_id].neighbors(layer) {
                if visited[n] {
                    continue;
                }
                visited[n] = true;
                let d = euclidean(query, vectors.vector(self.nodes[n].vector_id));
                let worst = top.peek().map(|c| c.distance).unwrap_or(f32::MAX);
                if top.len() < ef || d < worst {
                    frontier.insert(SearchCandidate::new(n, d));
                    top.insert(SearchCandidate::new(n, d));
                }
            }
        }

        let mut sorted = top.drain_sorted();
        sorted.truncate(ef);
        sorted.into_iter().map(|c| c.node_id).collect()
    }

    /// KNN query (spec.md §4.G): zoom in to layer 0 with `ef = 1`, then
    /// a full-width search at layer 0, truncated to `k`.
    pub fn knn(
        &self,
        vectors: &dyn VectorStore,
        query: &[f32],
        k: usize,
        search_width: usize,
    ) -> Vec<SearchResult> {
        let mut current = self.entry_point;
        for layer in (1..=self.max_layer).rev() {
            if let Some(&id) = self.search_layer(vectors, query, current, layer, 1).first() {
                current = id;
            }
        }

        let candidates = self.search_layer(vectors, query, current, 0, search_width);
        let take = k.min(candidates.len());
        candidates
            .into_iter()
            .take(take)
            .map(|id| {
                let distance = euclidean(query, vectors.vector(self.nodes[id].vector_id));
                SearchResult::new(id, distance)
            })
            .collect()
    }
}
