//! Max-heap of search candidates, ordered by distance to the query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::vptree::Scalar;

/// A candidate item paired with its distance to the search target.
pub struct HeapElem<'a, F: Scalar, T: 'a> {
    pub dist: F,
    pub item: &'a T
}

impl<'a, F: Scalar, T: 'a> HeapElem<'a, F, T> {
    pub fn new(d: F, i: &'a T) -> Self {
        HeapElem { dist: d, item: i }
    }
}

impl<'a, F: Scalar, T: 'a> PartialOrd for HeapElem<'a, F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, F: Scalar, T: 'a> PartialEq for HeapElem<'a, F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a, F: Scalar, T: 'a> Eq for HeapElem<'a, F, T> {
}

// Incomparable distances (NaN) compare equal so the heap never panics.
impl<'a, F: Scalar, T: 'a> Ord for HeapElem<'a, F, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.partial_cmp(&other.dist).unwrap_or(Ordering::Equal)
    }
}

/// Binary max-heap keyed on distance, largest on top.
///
/// The heap itself is unbounded; callers keep it at `k` entries by
/// popping before they push.
pub struct CandidateHeap<'a, F: Scalar, T: 'a> {
    inner: BinaryHeap<HeapElem<'a, F, T>>
}

impl<'a, F: Scalar, T: 'a> CandidateHeap<'a, F, T> {
    pub fn with_capacity(k: usize) -> Self {
        CandidateHeap { inner: BinaryHeap::with_capacity(k) }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn push(&mut self, dist: F, item: &'a T) {
        self.inner.push(HeapElem::new(dist, item));
    }

    /// The worst (largest-distance) retained candidate.
    pub fn peek_max(&self) -> Option<&HeapElem<'a, F, T>> {
        self.inner.peek()
    }

    pub fn pop_max(&mut self) -> Option<HeapElem<'a, F, T>> {
        self.inner.pop()
    }

    /// Drain worst-to-best, then reverse into ascending distance order.
    pub fn into_ascending(mut self) -> Vec<HeapElem<'a, F, T>> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(e) = self.pop_max() {
            out.push(e);
        }
        out.reverse();
        out
    }
}
