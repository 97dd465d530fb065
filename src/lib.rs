#![warn(missing_docs)]
//! # Orthtree
//!
//! Orthtree partitions a point cloud into a hierarchical spatial index (a
//! quadtree in 2D, an octree in 3D, and their generalisation in any small
//! dimension) by recursive geometric subdivision, so that nearest-neighbour
//! queries, clustering, compression or rendering can work on spatially
//! coherent groups of points instead of the flat set.
//!
//! The tree never stores coordinates. It reads them through the
//! [`PointCloud`] trait and stores, in each leaf, the indices of the points
//! that fell into that leaf's cell, so the same cloud can back any number of
//! trees.
//!
//! ## Building a tree
//!
//! Every cell of a tree covers a cubic region described by a center and a
//! radius. Building starts from the smallest cube containing the whole cloud
//! and recursively splits cells into their `2^D` octants until a stopping
//! criterion of [`BuildParams`] holds (a cell is small enough, or holds few
//! enough points), at which point the cell becomes a leaf owning its point
//! indices.
//!
//! ```
//! use orthtree::prelude::*;
//!
//! let points = vec![
//!     [-1.0f32, -1.0, -1.0],
//!     [1.0, 1.0, 1.0],
//!     [1.0, -1.0, 1.0],
//!     [0.9, -0.9, 0.9],
//! ];
//!
//! let mut tree = Octree::new();
//! let subdivided = tree.build(points.as_slice(), &BuildParams::default())?;
//! assert!(subdivided);
//!
//! // Every original index ends up in exactly one leaf.
//! let mut seen = Vec::new();
//! tree.visit(|node| {
//!     if let Some(indices) = node.points() {
//!         seen.extend_from_slice(indices);
//!     }
//!     true
//! });
//! seen.sort();
//! assert_eq!(seen, vec![0, 1, 2, 3]);
//! # Ok::<(), orthtree::Error>(())
//! ```
//!
//! ## Traversing
//!
//! [`Orthtree::visit`] walks the tree in pre-order and hands each node to a
//! callback; returning `false` stops the whole walk immediately. The same
//! traversal is available as the lazy [`Orthtree::iter`] iterator for
//! `for`-loop consumption.
//!
//! ## Parallel construction
//!
//! With the `parallel` feature, [`Orthtree::par_build`] fans each of the
//! first `levels` recursion levels out to [rayon] tasks, one per octant.
//! Buckets are split before the fan-out and every task writes only its own
//! subtree, so the result is identical to the sequential build.
//!
//! [rayon]: https://github.com/rayon-rs/rayon
//!
//! ## Ownership
//!
//! Trees deep-copy with [`Clone`] (and any subtree with
//! [`Orthtree::clone_subtree`]), while [`Orthtree::take`] transfers the whole
//! tree out of its root and leaves an empty root leaf behind; moving any
//! other node is refused. Dropping a tree releases the flat node arena at
//! once, with no recursive teardown.

/// Read-only point cloud views the tree is built over.
pub mod cloud;
/// Bounding boxes, octant arithmetic and scalar abstractions.
pub mod partition;
/// The tree type, its construction and its traversal.
pub mod tree;

pub use cloud::{Interleaved, PointCloud, PointIndex};
pub use partition::{octant_offset, Aabb, BoundingBox, Scalar};
pub use tree::{BuildParams, NodeId, NodeRef, Octree, Orthtree, PreOrder, Quadtree};

/// Errors reported by fallible tree operations.
///
/// Violated preconditions are never recovered from silently: the offending
/// operation is refused outright and the tree is left as it was. A failed
/// build constructs aside and never replaces the previous contents.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A tree cannot be built over an empty point cloud.
    #[error("cannot build a tree over an empty point cloud")]
    EmptyPointCloud,

    /// Only the root may be moved out of a tree.
    #[error("node {0} is not the root of its tree and cannot be moved out")]
    NotRoot(NodeId),

    /// A child was requested beyond the node's octant range.
    #[error("octant {octant} is out of range for a node with {cells} cells")]
    OctantOutOfRange {
        /// The requested octant.
        octant: usize,
        /// The number of cells of the node, `2^D`.
        cells: usize,
    },

    /// A node id beyond the tree's arena was used.
    #[error("no node with id {0} exists in this tree")]
    NodeOutOfRange(NodeId),

    /// Point indices were requested from an internal node.
    #[error("node {0} is not a leaf and holds no point indices")]
    NotALeaf(NodeId),

    /// Subdivision did not terminate within the configured depth bound.
    #[error("subdivision exceeded the maximum depth of {0}")]
    DepthLimit(u32),
}

/// Commonly used types, re-exported.
pub mod prelude {
    pub use crate::cloud::{Interleaved, PointCloud, PointIndex};
    pub use crate::partition::{Aabb, BoundingBox, Scalar};
    pub use crate::tree::{BuildParams, NodeRef, Octree, Orthtree, Quadtree};
    pub use crate::Error;
}
