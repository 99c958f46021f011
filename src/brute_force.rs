//! Exact brute-force search (spec.md §4.H), used when no graph has been
//! built and as a correctness oracle in tests.

use crate::distance::{cosine, euclidean};
use crate::types::{SearchResult, VectorStore};

/// Exact k-nearest-neighbors by Euclidean distance, scanning every
/// vector in `store`. Ties break by the lower id (spec.md §4.H).
///
/// The per-candidate scan runs with [`rayon`]'s data-parallel iterators:
/// this is the one place in the crate where parallelism pays for itself,
/// since a brute-force scan is O(N) independent distance computations
/// with no shared mutable state, unlike graph construction or search,
/// which are single logical traversals (spec.md §9).
pub fn brute_force_knn(store: &dyn VectorStore, query: &[f32], k: usize) -> Vec<SearchResult> {
    use rayon::prelude::*;

    let mut distances: Vec<SearchResult> = (0..store.len())
        .into_par_iter()
        .map(|id| SearchResult::new(id, euclidean(query, store.vector(id))))
        .collect();

    distances.sort_unstable_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    distances.truncate(k);
    distances
}

/// Cosine-similarity threshold search (spec.md §4.H): every vector whose
/// similarity to `query` is at least `threshold`, sorted by descending
/// similarity, truncated to `k`. Zero-norm vectors have no defined
/// cosine similarity and are skipped.
///
/// Returns `(results, matched)` where `matched` is the number of
/// candidates that passed the threshold before truncation, so the caller
/// can tell a "no vector is similar enough" 0 apart from a "there were
/// more matches than k" truncated 0-length slice.
pub fn cosine_threshold_search(
    store: &dyn VectorStore,
    query: &[f32],
    threshold: f32,
    k: usize,
) -> (Vec<SearchResult>, usize) {
    use rayon::prelude::*;

    let mut matches: Vec<SearchResult> = (0..store.len())
        .into_par_iter()
        .filter_map(|id| {
            let similarity = cosine(query, store.vector(id))?;
            (similarity >= threshold).then(|| SearchResult::new(id, similarity))
        })
        .collect();

    matches.sort_unstable_by(|a, b| {
        b.distance
            .partial_cmp(&a.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    let matched = matches.len();
    matches.truncate(k);
    (matches, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OwnedVectorStore;

    fn store() -> OwnedVectorStore {
        OwnedVectorStore::new(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
        ])
        .unwrap()
    }

    #[test]
    fn brute_force_returns_k_closest_sorted_by_distance() {
        let store = store();
        let results = brute_force_knn(&store, &[0.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 0);
        assert_eq!(results[1].distance, 1.0);
    }

    #[test]
    fn brute_force_ties_break_by_lower_id() {
        let store = store();
        let results = brute_force_knn(&store, &[0.5, 0.0], 4);
        // ids 1 and 2 are equidistant from (0.5, 0.0); 1 must come first.
        assert!(results.iter().position(|r| r.id == 1).unwrap() < results.iter().position(|r| r.id == 2).unwrap());
    }

    #[test]
    fn brute_force_k_larger_than_store_returns_all() {
        let store = store();
        let results = brute_force_knn(&store, &[0.0, 0.0], 100);
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn cosine_threshold_search_filters_and_sorts_descending() {
        let store = store();
        let (results, matched) = cosine_threshold_search(&store, &[1.0, 0.0], 0.5, 10);
        assert_eq!(matched, 2); // ids 1 (cos=1.0) and 3 (cos~0.707)
        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 3);
    }

    #[test]
    fn cosine_threshold_search_skips_zero_vector() {
        let store = OwnedVectorStore::new(vec![vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let (results, matched) = cosine_threshold_search(&store, &[1.0, 0.0], -1.0, 10);
        assert_eq!(matched, 1);
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn cosine_threshold_search_reports_truncated_match_count() {
        let store = store();
        let (results, matched) = cosine_threshold_search(&store, &[1.0, 1.0], -1.0, 1);
        assert_eq!(matched, 4);
        assert_eq!(results.len(), 1);
    }
}
