//! Graph node storage (spec.md §4.C): per-layer neighbor lists with
//! dedup-on-insert.

use crate::types::{NodeId, VectorId};

const LAYER0_INITIAL_CAPACITY: usize = 32;
const UPPER_LAYER_INITIAL_CAPACITY: usize = 16;

/// A single node in the HNSW graph.
///
/// `neighbors[layer]` holds `layer`'s adjacency list in insertion order,
/// **not** sorted by distance. Insertion order is what the builder's
/// zoom-in phase and deterministic traversal rely on.
#[derive(Debug, Clone)]
pub struct Node {
    pub vector_id: VectorId,
    pub top_layer: usize,
    neighbors: Vec<Vec<NodeId>>,
}

impl Node {
    /// Create a node with empty neighbor lists for every layer in
    /// `0..=top_layer`, pre-sized per spec.md §4.C (32 at layer 0, 16
    /// above; `Vec`'s own amortized-doubling growth handles the rest).
    pub fn new(vector_id: VectorId, top_layer: usize) -> Self {
        let neighbors = (0..=top_layer)
            .map(|layer| {
                let cap = if layer == 0 {
                    LAYER0_INITIAL_CAPACITY
                } else {
                    UPPER_LAYER_INITIAL_CAPACITY
                };
                Vec::with_capacity(cap)
            })
            .collect();
        Self {
            vector_id,
            top_layer,
            neighbors,
        }
    }

    /// This node's neighbor list at `layer`, or an empty slice if `layer`
    /// exceeds `top_layer`.
    pub fn neighbors(&self, layer: usize) -> &[NodeId] {
        self.neighbors.get(layer).map_or(&[], |v| v.as_slice())
    }

    /// Add `id` as a layer-`layer` neighbor of this node.
    ///
    /// A no-op if `layer` exceeds this node's `top_layer`, or if `id` is
    /// already present (linear-scan dedup; neighbor lists are small,
    /// O(M), so this is cheaper in practice than a hash set).
    pub fn add_neighbor(&mut self, layer: usize, id: NodeId) {
        let Some(list) = self.neighbors.get_mut(layer) else {
            return;
        };
        if list.contains(&id) {
            return;
        }
        list.push(id);
    }
}
