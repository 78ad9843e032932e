extern crate hashvp;

use hashvp::store::{load_tree, save_tree};
use hashvp::{MetricItem, VPTree};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct P(f64);

impl MetricItem<f64> for P {
    fn distance(&self, other: &Self) -> f64 {
        (self.0 - other.0).abs()
    }
}

/// Discrete metric: distinct labels are all at distance 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Label(u32);

impl MetricItem<f64> for Label {
    fn distance(&self, other: &Self) -> f64 {
        if self.0 == other.0 { 0.0 } else { 1.0 }
    }
}

#[test]
fn many_copies_of_one_item() {
    let n = 100_000;
    let tree = VPTree::with_seed(vec![P(1.0); n], 1);
    assert_eq!(tree.len(), n);
    assert_eq!(tree.depth(), 1);

    let found = tree.search(&P(1.0), 3);
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|n| n.distance == 0.0));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copies.hvp");
    save_tree(&tree, &path).unwrap();
    let loaded: VPTree<f64, P> = load_tree(&path).unwrap();
    assert_eq!(loaded.len(), n);
    assert_eq!(loaded.iter().count(), n);
    assert_eq!(loaded.search(&P(3.0), 5).len(), 5);
}

#[test]
fn copies_mixed_with_distinct_items() {
    let mut items: Vec<P> = (0..2000).map(|i| P(i as f64)).collect();
    items.extend(vec![P(500.0); 20_000]);
    let tree = VPTree::with_seed(items, 8);
    assert_eq!(tree.len(), 22_000);
    assert!(tree.depth() < 200, "depth {}", tree.depth());

    let found = tree.search(&P(500.4), 4);
    assert_eq!(found.len(), 4);
    assert!(found.iter().all(|n| n.item.0 == 500.0));
}

#[test]
fn deep_chain_of_equidistant_items() {
    // Every split sends all remaining items near, so the tree is a chain
    // as deep as the input is long.
    let n = 10_000;
    let tree = VPTree::with_seed((0..n).map(Label).collect(), 3);
    assert_eq!(tree.depth(), n as usize);

    let found = tree.search(&Label(42), 3);
    assert_eq!(found.len(), 3);
    assert_eq!(*found[0].item, Label(42));
    assert_eq!(found[0].distance, 0.0);
    assert!(found[1..].iter().all(|n| n.distance == 1.0));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.hvp");
    save_tree(&tree, &path).unwrap();
    let loaded: VPTree<f64, Label> = load_tree(&path).unwrap();
    assert_eq!(loaded.depth(), n as usize);
    assert_eq!(loaded.dump(), tree.dump());
    assert_eq!(loaded.nearest_neighbor(&Label(7)), Some(&Label(7)));
}

#[test]
fn deep_tree_searched_on_small_stack() {
    let tree = VPTree::with_seed((0..5000).map(Label).collect::<Vec<_>>(), 4);
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024)
        .spawn(move || {
            let found = tree.search(&Label(4999), 2);
            (found.len(), found[0].item.0, tree.depth())
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), (2, 4999, 5000));
}
