//! Build-time and query-time configuration (spec.md §6, §9).

use serde::{Deserialize, Serialize};

/// Hyperparameters for [`crate::graph::Graph::build`].
///
/// Field names follow the glossary: `M` is `max_connections`, `M₀` is
/// `max_connections_layer0`, `mL` is `level_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Target maximum neighbors per node above layer 0 (`M`).
    pub max_connections: usize,
    /// Target maximum neighbors per node at layer 0 (`M₀`, typically `2M`).
    pub max_connections_layer0: usize,
    /// Beam width during construction (`efConstruction`).
    pub ef_construction: usize,
    /// Level factor controlling the geometric layer distribution (`mL`).
    pub level_factor: f64,
}

impl HnswConfig {
    /// Build a config from `M` alone, deriving the rest per spec.md §6's
    /// defaults: `M₀ = 2M`, `mL = 1 / ln(M)`, `efConstruction = 2M`.
    pub fn with_m(m: usize) -> Self {
        Self {
            max_connections: m,
            max_connections_layer0: m * 2,
            ef_construction: m * 2,
            level_factor: 1.0 / (m as f64).ln(),
        }
    }

    /// Smaller `M`, faster builds and searches, lower recall.
    pub fn fast() -> Self {
        Self::with_m(8)
    }

    /// The spec's default hyperparameters (`M = 16`).
    pub fn balanced() -> Self {
        Self::with_m(16)
    }

    /// Larger `M`, slower builds and searches, higher recall.
    pub fn high_quality() -> Self {
        Self::with_m(32)
    }
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Query-time options (spec.md §4.G).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// `ef` at layer 0.
    pub search_width: usize,
    /// Advisory cap on distance computations; the reference algorithm
    /// does not enforce early termination from this (spec.md §4.G).
    pub max_distance_computations: Option<usize>,
    /// Advisory recall target; unused by the reference algorithm.
    pub accuracy_threshold: Option<f32>,
    /// Selects between the `approximate_search` and `beam_search` presets
    /// in the library surface; has no effect when `hnsw_knn_search` is
    /// called directly with an explicit `search_width`.
    pub use_approximate_search: bool,
}

impl SearchConfig {
    /// A config with the given layer-0 beam width and no advisory limits.
    pub fn with_width(search_width: usize) -> Self {
        Self {
            search_width,
            max_distance_computations: None,
            accuracy_threshold: None,
            use_approximate_search: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        // 2k at the conventional k=10 is the spec's baseline example; a
        // caller doing real work should pass an explicit width sized to
        // its own k.
        Self::with_width(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hnsw_config_matches_spec_defaults() {
        let config = HnswConfig::default();
        assert_eq!(config.max_connections, 16);
        assert_eq!(config.max_connections_layer0, 32);
        assert_eq!(config.ef_construction, 32);
        assert!((config.level_factor - 1.0 / 16f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn presets_scale_with_m() {
        assert_eq!(HnswConfig::fast().max_connections, 8);
        assert_eq!(HnswConfig::high_quality().max_connections, 32);
    }
}
