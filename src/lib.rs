//! Nearest-neighbor search over TLSH fuzzy hashes, backed by a vantage
//! point tree.
//!
//! The tree itself (`VPTree`) is generic over any `MetricItem`; the other
//! modules load abuse.ch malware exports, persist built trees and expose
//! queries to the command line and over HTTP.

pub mod config;
pub mod error;
pub mod heap;
pub mod ingest;
pub mod output;
pub mod partition;
pub mod sample;
pub mod server;
pub mod store;
pub mod tlsh;
pub mod vptree;

pub use error::{Error, Result};
pub use partition::partition_by;
pub use sample::{Sample, SampleRecord};
pub use tlsh::{clean_hash, TlshDigest};
pub use vptree::{MetricItem, Neighbor, Scalar, SearchStats, VPNode, VPTree};

/// The index type persisted and served by the `hashvp` binary.
pub type SampleTree = VPTree<f64, Sample>;
