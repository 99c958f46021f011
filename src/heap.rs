//! Fixed-capacity binary heap used for both search frontiers and
//! best-so-far retention (spec.md §4.B).

use crate::types::SearchCandidate;

/// Whether a [`BoundedHeap`]'s root holds the smallest or the largest
/// distance currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapMode {
    /// Root is the smallest distance, a best-first frontier.
    Min,
    /// Root is the largest distance, worst-of-top-K retention.
    Max,
}

/// A capacity-bounded binary heap over [`SearchCandidate`], keyed by
/// distance. Sifting is iterative, not recursive, so heap depth never
/// threatens the stack regardless of `ef`.
///
/// The heap never deduplicates by `node_id`; callers that need that
/// (layer search, beam search) pair it with a visited set.
#[derive(Debug, Clone)]
pub struct BoundedHeap {
    mode: HeapMode,
    capacity: usize,
    items: Vec<SearchCandidate>,
}

impl BoundedHeap {
    pub fn new(capacity: usize, mode: HeapMode) -> Self {
        let capacity = capacity.max(1);
        Self {
            mode,
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The root candidate, if any.
    pub fn peek(&self) -> Option<SearchCandidate> {
        self.items.first().copied()
    }

    /// Whether a distance of `a` belongs closer to the root than `b`
    /// under this heap's mode.
    fn closer_to_root(&self, a: f32, b: f32) -> bool {
        match self.mode {
            HeapMode::Min => a < b,
            HeapMode::Max => a > b,
        }
    }

    /// Insert a candidate following the retention rule in spec.md §4.B:
    /// append while under capacity; once full, a `Max` heap keeps the
    /// `capacity` smallest distances seen (replace the root, the
    /// current worst, when something better arrives), and a `Min` heap
    /// symmetrically keeps the `capacity` largest. Anything that doesn't
    /// qualify is silently discarded.
    pub fn insert(&mut self, candidate: SearchCandidate) {
        if self.items.len() < self.capacity {
            self.items.push(candidate);
            self.sift_up(self.items.len() - 1);
            return;
        }
        let Some(root) = self.items.first().copied() else {
            return;
        };
        let replace = match self.mode {
            HeapMode::Max => candidate.distance < root.distance,
            HeapMode::Min => candidate.distance > root.distance,
        };
        if replace {
            self.items[0] = candidate;
            self.sift_down(0);
        }
    }

    /// Pop the root, moving the last element up and sifting down.
    /// Returns `None` on an empty heap.
    pub fn pop(&mut self) -> Option<SearchCandidate> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let root = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        root
    }

    /// Drain every element into a `Vec` sorted ascending by distance,
    /// regardless of the heap's mode.
    pub fn drain_sorted(mut self) -> Vec<SearchCandidate> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Some(c) = self.pop() {
            out.push(c);
        }
        if self.mode == HeapMode::Max {
            out.reverse();
        }
        out
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.closer_to_root(self.items[idx].distance, self.items[parent].distance) {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut best = idx;
            if left < len && self.closer_to_root(self.items[left].distance, self.items[best].distance)
            {
                best = left;
            }
            if right < len
                && self.closer_to_root(self.items[right].distance, self.items[best].distance)
            {
                best = right;
            }
            if best == idx {
                break;
            }
            self.items.swap(idx, best);
            idx = best;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(id: usize, d: f32) -> SearchCandidate {
        SearchCandidate::new(id, d)
    }

    #[test]
    fn min_heap_pops_ascending() {
        let mut heap = BoundedHeap::new(10, HeapMode::Min);
        for (id, d) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 2.0)] {
            heap.insert(cand(id, d));
        }
        let mut popped = Vec::new();
        while let Some(c) = heap.pop() {
            popped.push(c.distance);
        }
        assert_eq!(popped, vec![1.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn max_heap_pops_descending() {
        let mut heap = BoundedHeap::new(10, HeapMode::Max);
        for (id, d) in [(0, 5.0), (1, 1.0), (2, 3.0), (3, 2.0)] {
            heap.insert(cand(id, d));
        }
        let mut popped = Vec::new();
        while let Some(c) = heap.pop() {
            popped.push(c.distance);
        }
        assert_eq!(popped, vec![5.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn max_heap_retains_k_smallest_when_full() {
        let mut heap = BoundedHeap::new(3, HeapMode::Max);
        for (id, d) in [(0, 5.0), (1, 4.0), (2, 3.0)] {
            heap.insert(cand(id, d));
        }
        // Full at capacity 3 holding {5,4,3}. A smaller candidate should
        // bump the current worst (5.0).
        heap.insert(cand(3, 1.0));
        let sorted = heap.drain_sorted();
        let distances: Vec<f32> = sorted.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn max_heap_discards_worse_than_current_worst() {
        let mut heap = BoundedHeap::new(2, HeapMode::Max);
        heap.insert(cand(0, 1.0));
        heap.insert(cand(1, 2.0));
        heap.insert(cand(2, 5.0)); // worse than root (2.0), discarded
        let sorted = heap.drain_sorted();
        let distances: Vec<f32> = sorted.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![1.0, 2.0]);
    }

    #[test]
    fn min_heap_retains_k_largest_when_full() {
        let mut heap = BoundedHeap::new(3, HeapMode::Min);
        for (id, d) in [(0, 1.0), (1, 2.0), (2, 3.0)] {
            heap.insert(cand(id, d));
        }
        // Full at capacity 3 holding {1,2,3}. A larger candidate should
        // bump the current smallest (1.0), per the symmetric rule.
        heap.insert(cand(3, 10.0));
        let sorted = heap.drain_sorted();
        let distances: Vec<f32> = sorted.iter().map(|c| c.distance).collect();
        assert_eq!(distances, vec![2.0, 3.0, 10.0]);
    }

    #[test]
    fn drain_sorted_is_ascending_for_both_modes() {
        let mut min_heap = BoundedHeap::new(5, HeapMode::Min);
        let mut max_heap = BoundedHeap::new(5, HeapMode::Max);
        for (id, d) in [(0, 3.0), (1, 1.0), (2, 2.0)] {
            min_heap.insert(cand(id, d));
            max_heap.insert(cand(id, d));
        }
        let min_sorted: Vec<f32> = min_heap.drain_sorted().iter().map(|c| c.distance).collect();
        let max_sorted: Vec<f32> = max_heap.drain_sorted().iter().map(|c| c.distance).collect();
        assert_eq!(min_sorted, vec![1.0, 2.0, 3.0]);
        assert_eq!(max_sorted, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut heap = BoundedHeap::new(3, HeapMode::Min);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut heap = BoundedHeap::new(3, HeapMode::Min);
        heap.insert(cand(0, 1.0));
        assert_eq!(heap.peek().unwrap().distance, 1.0);
        assert_eq!(heap.len(), 1);
    }
}
