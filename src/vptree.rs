//! Vantage-Point Trees are a data structure for fast
//! k-nearest-neighbor searches in arbitrary metric spaces.
//!
//! A tree is built once from a batch of items and is immutable
//! afterwards, so a single `VPTree` can be shared between threads (for
//! example behind an `Arc`) and searched concurrently without locking.
//! Every search allocates its own candidate heap.

use std::fmt::{self, Debug, Display, Write};

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use num::Float;

use crate::heap::CandidateHeap;
use crate::partition::{partition_by, split_at_reference};

pub trait Scalar : Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

/// Items that can be indexed by a `VPTree`.
///
/// `distance` must be a metric: non-negative, zero only between equal
/// items, symmetric, and obeying the triangle inequality. The tree never
/// checks this, but pruning is only exact when it holds.
pub trait MetricItem<F: Scalar> {
    fn distance(&self, other: &Self) -> F;
}

/// One node of the tree: a pivot item and the items split around it.
///
/// Items at distance zero from the pivot are kept with it in
/// `duplicates`. Of the rest, items in `near` are within `threshold` of
/// the pivot (inclusive) and items in `far` are strictly farther. A node
/// with nothing left to split has no threshold and no children.
///
/// Build, search, drop and (de)serialization all walk the tree with an
/// explicit stack, so depth is bounded by memory rather than by the
/// thread's stack.
pub struct VPNode<F, T> {
    item: T,
    duplicates: Vec<T>,
    threshold: Option<F>,
    near: Option<Box<VPNode<F, T>>>,
    far: Option<Box<VPNode<F, T>>>
}

impl<F: Copy, T> VPNode<F, T> {
    /// The pivot stored at this node.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Items at distance zero from the pivot.
    pub fn duplicates(&self) -> &[T] {
        &self.duplicates
    }

    pub fn threshold(&self) -> Option<F> {
        self.threshold
    }

    pub fn near(&self) -> Option<&VPNode<F, T>> {
        self.near.as_deref()
    }

    pub fn far(&self) -> Option<&VPNode<F, T>> {
        self.far.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.near.is_none() && self.far.is_none()
    }

    fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.near().map(|n| (n, level + 1)));
            stack.extend(node.far().map(|n| (n, level + 1)));
        }
        deepest
    }
}

impl<F, T> Drop for VPNode<F, T> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<VPNode<F, T>>> = Vec::new();
        stack.extend(self.near.take());
        stack.extend(self.far.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.near.take());
            stack.extend(node.far.take());
        }
    }
}

impl<F: Debug, T: Debug> Debug for VPNode<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VPNode")
            .field("item", &self.item)
            .field("duplicates", &self.duplicates.len())
            .field("threshold", &self.threshold)
            .field("near", &self.near.is_some())
            .field("far", &self.far.is_some())
            .finish()
    }
}

/// A search result: an indexed item and its distance to the query.
#[derive(Debug)]
pub struct Neighbor<'a, F, T> {
    pub item: &'a T,
    pub distance: F
}

/// Counters collected during a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose pivot was compared against the query.
    pub nodes_visited: usize,
    /// Calls made to `MetricItem::distance`, pivots and duplicates alike.
    pub distance_evaluations: usize,
    /// Child subtrees skipped because they could not beat tau.
    pub subtrees_pruned: usize
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Near,
    Far
}

/// A child subtree waiting to be searched, with the parent's distance to
/// the target and split threshold so reachability is re-tested when the
/// subtree comes off the stack.
struct Pending<'a, F, T> {
    node: &'a VPNode<F, T>,
    side: Side,
    dist: F,
    mu: F
}

struct SearchState<'a, 'q, F: Scalar, T> {
    target: &'q T,
    k: usize,
    tau: F,
    heap: CandidateHeap<'a, F, T>,
    stats: SearchStats
}

impl<'a, 'q, F: Scalar, T: MetricItem<F>> SearchState<'a, 'q, F, T> {
    fn measure(&mut self, item: &T) -> F {
        self.stats.distance_evaluations += 1;
        self.target.distance(item)
    }

    /// Keep `item` if it beats tau, evicting the worst candidate when the
    /// heap is already full.
    fn offer(&mut self, dist: F, item: &'a T) {
        if dist < self.tau {
            if self.heap.len() == self.k {
                self.heap.pop_max();
            }
            self.heap.push(dist, item);
            if self.heap.len() == self.k {
                if let Some(worst) = self.heap.peek_max() {
                    self.tau = worst.dist;
                }
            }
        }
    }

    fn run(&mut self, root: &'a VPNode<F, T>) {
        let mut pending = Vec::new();
        self.visit(root, &mut pending);

        while let Some(p) = pending.pop() {
            // tau may have shrunk since the subtree was queued
            let reachable = match p.side {
                Side::Near => p.dist - self.tau <= p.mu,
                Side::Far => p.dist + self.tau >= p.mu
            };
            if reachable {
                self.visit(p.node, &mut pending);
            } else {
                self.stats.subtrees_pruned += 1;
            }
        }
    }

    fn visit(&mut self, node: &'a VPNode<F, T>, pending: &mut Vec<Pending<'a, F, T>>) {
        self.stats.nodes_visited += 1;
        let dist = self.measure(&node.item);
        self.offer(dist, &node.item);

        // Duplicates are as far from the target as the pivot is, so once
        // the heap is full and the pivot did not beat tau, none of them can.
        for dup in &node.duplicates {
            if self.heap.len() == self.k && !(dist < self.tau) {
                break;
            }
            let d = self.measure(dup);
            self.offer(d, dup);
        }

        let mu = match node.threshold {
            Some(mu) if !node.is_leaf() => mu,
            _ => return
        };

        // The side the target falls on is pushed last so it is searched
        // first, giving tau a chance to shrink before the other side.
        let (first, second) = if dist < mu {
            (Side::Near, Side::Far)
        } else {
            (Side::Far, Side::Near)
        };
        for side in [second, first] {
            let child = match side {
                Side::Near => node.near(),
                Side::Far => node.far()
            };
            if let Some(child) = child {
                pending.push(Pending { node: child, side: side, dist: dist, mu: mu });
            }
        }
    }
}

/// A node in the flat, index-linked form used while building and in
/// serialized trees. Children always sit at higher indices than their
/// parent.
#[derive(Serialize, Deserialize)]
struct FlatNode<F, T> {
    item: T,
    duplicates: Vec<T>,
    threshold: Option<F>,
    near: Option<usize>,
    far: Option<usize>
}

/// Borrowed counterpart of `FlatNode`, encoded identically.
#[derive(Serialize)]
struct FlatRef<'a, F, T> {
    item: &'a T,
    duplicates: &'a [T],
    threshold: Option<F>,
    near: Option<usize>,
    far: Option<usize>
}

#[derive(Serialize, Deserialize)]
struct TreeRepr<N> {
    len: usize,
    nodes: Vec<N>
}

/// Turn a flat node table into boxed nodes, children first.
///
/// Links must already be valid; a dangling link is dropped.
fn assemble<F, T>(mut nodes: Vec<FlatNode<F, T>>) -> Option<Box<VPNode<F, T>>> {
    let mut built: Vec<Option<Box<VPNode<F, T>>>> = Vec::new();
    built.resize_with(nodes.len(), || None);

    while let Some(node) = nodes.pop() {
        let i = nodes.len();
        let near = node.near.and_then(|j| built.get_mut(j).and_then(Option::take));
        let far = node.far.and_then(|j| built.get_mut(j).and_then(Option::take));
        built[i] = Some(Box::new(VPNode {
            item: node.item,
            duplicates: node.duplicates,
            threshold: node.threshold,
            near: near,
            far: far
        }));
    }
    built.into_iter().next().flatten()
}

/// Check that a decoded node table forms a single tree rooted at index 0
/// holding exactly `len` items.
fn check_links<F, T>(nodes: &[FlatNode<F, T>], len: usize) -> Result<(), String> {
    let mut linked = vec![false; nodes.len()];
    let mut items = 0usize;
    for (i, node) in nodes.iter().enumerate() {
        items += 1 + node.duplicates.len();
        for j in node.near.into_iter().chain(node.far) {
            if j <= i || j >= nodes.len() {
                return Err(format!("node {} links to invalid node {}", i, j));
            }
            if linked[j] {
                return Err(format!("node {} is linked twice", j));
            }
            linked[j] = true;
        }
    }
    if let Some(j) = linked.iter().skip(1).position(|l| !l) {
        return Err(format!("node {} is unreachable", j + 1));
    }
    if items != len {
        return Err(format!("tree claims {} items but holds {}", len, items));
    }
    Ok(())
}

impl<F: Scalar, T: MetricItem<F>> VPNode<F, T> {
    /// Build a tree from `items`, which are consumed and reordered.
    fn build<R: Rng + ?Sized>(items: Vec<T>, rng: &mut R) -> Option<Box<VPNode<F, T>>> {
        let mut flat: Vec<FlatNode<F, T>> = Vec::new();
        let mut work: Vec<(Vec<T>, Option<(usize, Side)>)> = vec![(items, None)];

        while let Some((mut items, parent)) = work.pop() {
            if items.is_empty() {
                continue;
            }

            // Random pivot, swapped to the end and taken out.
            let vp = items.swap_remove(rng.gen_range(0..items.len()));

            // Each remaining item is measured against the pivot once.
            let mut scored: Vec<(F, T)> = items.into_iter()
                .map(|x| (x.distance(&vp), x))
                .collect();
            let same = partition_by(&mut scored, |&(d, _)| d == F::zero());
            let mut rest = scored.split_off(same);
            let duplicates: Vec<T> = scored.into_iter().map(|(_, x)| x).collect();

            let index = flat.len();
            let threshold = if rest.is_empty() {
                None
            } else {
                // Split around the distance from the pivot to the middle
                // item. Ties, and the middle item itself, stay near.
                let mid = rest.len() / 2;
                let mu = rest[mid].0;
                let split = split_at_reference(&mut rest, mid, |&(d, _)| d <= mu);
                let far_items: Vec<T> = rest.split_off(split).into_iter().map(|(_, x)| x).collect();
                let near_items: Vec<T> = rest.into_iter().map(|(_, x)| x).collect();

                // near is popped first, keeping the pre-order layout
                work.push((far_items, Some((index, Side::Far))));
                work.push((near_items, Some((index, Side::Near))));
                Some(mu)
            };

            flat.push(FlatNode { item: vp, duplicates: duplicates, threshold: threshold,
                                 near: None, far: None });
            match parent {
                Some((p, Side::Near)) => flat[p].near = Some(index),
                Some((p, Side::Far)) => flat[p].far = Some(index),
                None => {}
            }
        }

        assemble(flat)
    }
}

/// A vantage point tree over items of type `T` with distances of type `F`.
pub struct VPTree<F, T> {
    root: Option<Box<VPNode<F, T>>>,
    len: usize
}

impl<F: Scalar, T: MetricItem<F>> VPTree<F, T> {
    /// Construct a new vantage point tree from a set of elements, using
    /// the thread-local generator for pivot selection.
    pub fn new(items: Vec<T>) -> VPTree<F, T> {
        VPTree::with_rng(items, &mut thread_rng())
    }

    /// Construct a tree whose shape is reproducible from `seed`.
    pub fn with_seed(items: Vec<T>, seed: u64) -> VPTree<F, T> {
        VPTree::with_rng(items, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(items: Vec<T>, rng: &mut R) -> VPTree<F, T> {
        let len = items.len();
        let tree = VPTree { root: VPNode::build(items, rng), len: len };
        tracing::debug!(items = len, depth = tree.depth(), "built vantage point tree");
        tree
    }

    /// Find the `k` nearest neighbors of `target`, closest first.
    ///
    /// Returns `min(k, self.len())` results; `k == 0` returns nothing
    /// without touching the tree.
    pub fn search<'a>(&'a self, target: &T, k: usize) -> Vec<Neighbor<'a, F, T>> {
        self.search_with_stats(target, k).0
    }

    /// Like `search`, also reporting how much of the tree was traversed.
    pub fn search_with_stats<'a>(&'a self, target: &T, k: usize)
                                 -> (Vec<Neighbor<'a, F, T>>, SearchStats) {
        let root = match self.root {
            Some(ref root) if k > 0 => root,
            _ => return (Vec::new(), SearchStats::default())
        };

        let mut st = SearchState {
            target: target,
            k: k,
            tau: F::infinity(),
            heap: CandidateHeap::with_capacity(k.min(self.len)),
            stats: SearchStats::default()
        };
        st.run(root);

        let found = st.heap.into_ascending().into_iter()
            .map(|e| Neighbor { item: e.item, distance: e.dist })
            .collect();
        (found, st.stats)
    }

    /// find the nearest neighbor
    pub fn nearest_neighbor(&self, target: &T) -> Option<&T> {
        self.search(target, 1).pop().map(|n| n.item)
    }
}

impl<F: Copy, T> VPTree<F, T> {
    /// Number of items stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Option<&VPNode<F, T>> {
        self.root.as_deref()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root().map_or(0, |r| r.depth())
    }

    /// Iterate over every stored item in pre-order (pivot and its
    /// duplicates, near, far).
    pub fn iter(&self) -> Iter<'_, F, T> {
        Iter { stack: self.root().into_iter().collect(), dups: <&[T]>::default().iter() }
    }

    /// Render the tree structure, one node per line, for debugging.
    pub fn dump(&self) -> String where F: Display, T: Debug {
        let mut out = String::new();
        let mut stack: Vec<(&VPNode<F, T>, usize, &str)> =
            self.root().into_iter().map(|r| (r, 0, "root")).collect();
        while let Some((node, level, side)) = stack.pop() {
            let _ = write!(out, "{:indent$}{} {:?}", "", side, node.item, indent = level * 2);
            if !node.duplicates.is_empty() {
                let _ = write!(out, " x{}", node.duplicates.len() + 1);
            }
            let _ = match node.threshold {
                Some(mu) => writeln!(out, " mu={}", mu),
                None => writeln!(out)
            };
            if let Some(far) = node.far() {
                stack.push((far, level + 1, "far"));
            }
            if let Some(near) = node.near() {
                stack.push((near, level + 1, "near"));
            }
        }
        out
    }

    /// The node table written by `Serialize`, in breadth-first order.
    fn flatten(&self) -> Vec<FlatRef<'_, F, T>> {
        let mut order: Vec<&VPNode<F, T>> = self.root().into_iter().collect();
        let mut nodes = Vec::new();
        let mut i = 0;
        while i < order.len() {
            let node = order[i];
            let near = node.near().map(|c| { order.push(c); order.len() - 1 });
            let far = node.far().map(|c| { order.push(c); order.len() - 1 });
            nodes.push(FlatRef {
                item: &node.item,
                duplicates: &node.duplicates,
                threshold: node.threshold,
                near: near,
                far: far
            });
            i += 1;
        }
        nodes
    }
}

impl<F: Debug, T: Debug> Debug for VPTree<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VPTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl<F: Copy + Serialize, T: Serialize> Serialize for VPTree<F, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TreeRepr { len: self.len, nodes: self.flatten() }.serialize(serializer)
    }
}

impl<'de, F: Deserialize<'de>, T: Deserialize<'de>> Deserialize<'de> for VPTree<F, T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TreeRepr::<FlatNode<F, T>>::deserialize(deserializer)?;
        check_links(&repr.nodes, repr.len).map_err(D::Error::custom)?;
        Ok(VPTree { root: assemble(repr.nodes), len: repr.len })
    }
}

/// Pre-order iterator over the items of a `VPTree`.
pub struct Iter<'a, F, T> {
    stack: Vec<&'a VPNode<F, T>>,
    dups: std::slice::Iter<'a, T>
}

impl<'a, F: Copy, T> Iterator for Iter<'a, F, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if let Some(dup) = self.dups.next() {
            return Some(dup);
        }
        let node = self.stack.pop()?;
        if let Some(far) = node.far() {
            self.stack.push(far);
        }
        if let Some(near) = node.near() {
            self.stack.push(near);
        }
        self.dups = node.duplicates.iter();
        Some(&node.item)
    }
}


#[cfg(test)]
mod tests
{
    use serde::{Deserialize, Serialize};

    use super::{MetricItem, VPNode, VPTree};

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    struct P(f64);

    impl MetricItem<f64> for P {
        fn distance(&self, other: &Self) -> f64 {
            (self.0 - other.0).abs()
        }
    }

    /// Distinct labels are all at distance 1 from each other.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Label(u32);

    impl MetricItem<f64> for Label {
        fn distance(&self, other: &Self) -> f64 {
            if self.0 == other.0 { 0.0 } else { 1.0 }
        }
    }

    fn check_node(node: &VPNode<f64, P>) {
        for d in node.duplicates() {
            assert_eq!(d.distance(node.item()), 0.0);
        }
        if let Some(mu) = node.threshold() {
            let mut near = Vec::new();
            let mut far = Vec::new();
            collect(node.near(), &mut near);
            collect(node.far(), &mut far);
            for p in &near {
                assert!(p.distance(node.item()) <= mu);
            }
            for p in &far {
                assert!(p.distance(node.item()) > mu);
            }
            // The split reference lives on the near side.
            assert!(near.iter().any(|p| p.distance(node.item()) == mu));
        } else {
            assert!(node.is_leaf());
        }
        if let Some(near) = node.near() {
            check_node(near);
        }
        if let Some(far) = node.far() {
            check_node(far);
        }
    }

    fn collect(node: Option<&VPNode<f64, P>>, out: &mut Vec<P>) {
        if let Some(n) = node {
            out.push(*n.item());
            out.extend_from_slice(n.duplicates());
            collect(n.near(), out);
            collect(n.far(), out);
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree: VPTree<f64, P> = VPTree::new(vec![]);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.depth(), 0);
        assert!(tree.search(&P(1.0), 3).is_empty());
        assert!(tree.nearest_neighbor(&P(1.0)).is_none());
    }

    #[test]
    fn test_single_item_is_leaf() {
        let tree = VPTree::new(vec![P(3.0)]);
        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert!(root.threshold().is_none());
        assert!(root.duplicates().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_partition_invariants() {
        for seed in 0..20 {
            let items: Vec<P> = (0..200).map(|i| P(((i * 37) % 101) as f64)).collect();
            let tree = VPTree::with_seed(items, seed);
            check_node(tree.root().unwrap());
        }
    }

    #[test]
    fn test_every_item_stored_once() {
        let items: Vec<P> = (0..500).map(|i| P(i as f64)).collect();
        let tree = VPTree::with_seed(items, 7);
        assert_eq!(tree.len(), 500);
        let mut seen: Vec<i64> = tree.iter().map(|p| p.0 as i64).collect();
        seen.sort();
        assert_eq!(seen, (0..500).collect::<Vec<i64>>());
    }

    #[test]
    fn test_same_seed_same_shape() {
        let items: Vec<P> = (0..64).map(|i| P((i * i) as f64)).collect();
        let a = VPTree::with_seed(items.clone(), 42);
        let b = VPTree::with_seed(items, 42);
        assert_eq!(a.dump(), b.dump());
    }

    #[test]
    fn test_identical_items_share_a_node() {
        let tree = VPTree::with_seed(vec![P(1.0); 10], 3);
        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert!(root.threshold().is_none());
        assert_eq!(root.duplicates().len(), 9);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.iter().count(), 10);
    }

    #[test]
    fn test_duplicates_kept_beside_other_items() {
        let mut items = vec![P(4.0); 50];
        items.extend((0..20).map(|i| P(i as f64 * 10.0)));
        for seed in 0..10 {
            let tree = VPTree::with_seed(items.clone(), seed);
            check_node(tree.root().unwrap());
            assert_eq!(tree.iter().filter(|p| p.0 == 4.0).count(), 50);
            assert_eq!(tree.iter().count(), 70);
        }
    }

    #[test]
    fn test_equidistant_ties_go_near() {
        let items: Vec<Label> = (0..10).map(Label).collect();
        let tree = VPTree::with_seed(items, 3);
        // every distinct pair is at distance 1, so nothing is ever sent far
        let mut node = tree.root();
        while let Some(n) = node {
            assert!(n.far().is_none());
            assert!(n.duplicates().is_empty());
            node = n.near();
        }
        assert_eq!(tree.depth(), 10);
    }

    #[test]
    fn test_stats_count_visits() {
        let items: Vec<P> = (0..100).map(|i| P(i as f64)).collect();
        let tree = VPTree::with_seed(items, 1);
        let (found, stats) = tree.search_with_stats(&P(50.2), 3);
        assert_eq!(found.len(), 3);
        assert!(stats.nodes_visited >= 3);
        // every node is either visited or inside a pruned subtree
        assert!(stats.nodes_visited + stats.subtrees_pruned <= 100);
        assert_eq!(stats.nodes_visited, stats.distance_evaluations);

        // asking for everything never prunes
        let (found, stats) = tree.search_with_stats(&P(50.2), 100);
        assert_eq!(found.len(), 100);
        assert_eq!(stats.nodes_visited, 100);
        assert_eq!(stats.subtrees_pruned, 0);
    }

    #[test]
    fn test_stats_count_duplicates() {
        let mut items = vec![P(1.0); 5];
        items.push(P(9.0));
        let tree = VPTree::with_seed(items, 2);
        let (found, stats) = tree.search_with_stats(&P(1.0), 6);
        assert_eq!(found.len(), 6);
        assert_eq!(stats.distance_evaluations, 6);
        assert!(stats.nodes_visited < stats.distance_evaluations);
    }

    #[test]
    fn test_full_heap_stops_at_duplicates() {
        let tree = VPTree::with_seed(vec![P(2.0); 1000], 5);
        let (found, stats) = tree.search_with_stats(&P(0.0), 3);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|n| n.distance == 2.0));
        assert_eq!(stats.distance_evaluations, 3);
    }

    #[test]
    fn test_zero_k_skips_traversal() {
        let tree = VPTree::new(vec![P(0.0), P(1.0)]);
        let (found, stats) = tree.search_with_stats(&P(0.0), 0);
        assert!(found.is_empty());
        assert_eq!(stats.nodes_visited, 0);
        assert_eq!(stats.distance_evaluations, 0);
    }

    #[test]
    fn test_corrupt_links_rejected() {
        let tree = VPTree::with_seed((0..20).map(|i| P(i as f64)).collect(), 9);
        let mut raw = serde_json::to_value(&tree).unwrap();
        raw["nodes"][0]["near"] = serde_json::json!(0);
        assert!(serde_json::from_value::<VPTree<f64, P>>(raw).is_err());

        let mut raw = serde_json::to_value(&tree).unwrap();
        raw["len"] = serde_json::json!(21);
        assert!(serde_json::from_value::<VPTree<f64, P>>(raw).is_err());
    }
}
