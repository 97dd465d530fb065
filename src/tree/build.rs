use crate::{
    cloud::{PointCloud, PointIndex},
    partition::{BoundingBox, Const, Scalar, SubDivide},
    tree::{Cells, Node, NodeId, Orthtree},
    Error,
};

use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Stopping parameters of a tree construction.
///
/// A cell becomes a leaf as soon as either criterion holds: its bounding box
/// diameter is at most [`max_leaf_extent`](Self::max_leaf_extent), or it was
/// assigned at most [`max_points_per_leaf`](Self::max_points_per_leaf)
/// points. Subdivision alone cannot separate coincident points, so a cloud
/// with duplicates and both criteria at zero would otherwise subdivide
/// endlessly; [`max_depth`](Self::max_depth) bounds that recursion and fails
/// the build with [`Error::DepthLimit`] instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildParams<S> {
    /// A cell assigned at most this many points becomes a leaf.
    pub max_points_per_leaf: usize,
    /// A cell whose bounding box diameter is at most this becomes a leaf.
    pub max_leaf_extent: S,
    /// Maximum subdivision depth before the build fails.
    pub max_depth: u32,
}

impl<S: Scalar> Default for BuildParams<S> {
    #[inline]
    fn default() -> Self {
        Self {
            max_points_per_leaf: 1,
            max_leaf_extent: S::ZERO,
            max_depth: 64,
        }
    }
}

impl<S: Scalar> BuildParams<S> {
    /// Returns `true` if a cell with the given bounding box and point count
    /// must become a leaf.
    #[inline]
    pub fn stops<const D: usize>(&self, bbox: &BoundingBox<D, S>, points: usize) -> bool {
        bbox.diameter() <= self.max_leaf_extent || points <= self.max_points_per_leaf
    }
}

impl<const X: usize, const D: usize, S> Orthtree<X, D, S>
where
    Const<D>: SubDivide<Division = Const<X>>,
    S: Scalar,
{
    /// Builds the tree over the given point cloud, replacing any previous
    /// contents.
    ///
    /// The root bounding box is the smallest cube containing the cloud, sized
    /// by its largest axis extent; every point index of `[0, len)` then sinks
    /// recursively into the octant it falls in until a criterion of `params`
    /// stops the subdivision.
    ///
    /// Returns `Ok(true)` iff the root ended up subdivided. Fails with
    /// [`Error::EmptyPointCloud`] on an empty cloud and with
    /// [`Error::DepthLimit`] on runaway subdivision; on failure the tree is
    /// left untouched.
    pub fn build<P>(&mut self, points: &P, params: &BuildParams<S>) -> Result<bool, Error>
    where
        P: PointCloud<D, Scalar = S> + ?Sized,
    {
        let (mut tree, indices) = Self::root_for(points)?;
        tree.build_node(Self::ROOT, points, indices, params)?;

        *self = tree;
        Ok(!self.root().is_leaf())
    }

    /// Builds the tree like [`build`](Self::build), fanning the first `levels`
    /// recursion levels out to parallel tasks.
    ///
    /// At each parallelised level the `X` child subtrees are built
    /// concurrently from their pre-split index buckets and joined before the
    /// parent returns, so the resulting tree is identical to the sequential
    /// one and a failing child build fails the whole call. `levels = 0` is
    /// exactly [`build`](Self::build); levels below the given one are built
    /// sequentially within their task.
    #[cfg(feature = "parallel")]
    pub fn par_build<P>(
        &mut self,
        points: &P,
        params: &BuildParams<S>,
        levels: u32,
    ) -> Result<bool, Error>
    where
        P: PointCloud<D, Scalar = S> + Sync + ?Sized,
        S: Send + Sync,
    {
        let (mut tree, indices) = Self::root_for(points)?;
        tree.par_build_node(Self::ROOT, points, indices, params, levels)?;

        *self = tree;
        Ok(!self.root().is_leaf())
    }

    /// Computes the root bounding box and the full index range of a cloud.
    fn root_for<P>(points: &P) -> Result<(Self, Vec<PointIndex>), Error>
    where
        P: PointCloud<D, Scalar = S> + ?Sized,
    {
        if points.is_empty() {
            return Err(Error::EmptyPointCloud);
        }

        let count = points.len();
        let bbox = BoundingBox::square_with((0..count).map(|i| points.position(i)));
        debug!(points = count, bbox = ?bbox, "building tree");

        Ok((Self::with_root(bbox), (0..count).collect()))
    }

    /// Stores `indices` in the node if a stopping criterion holds, otherwise
    /// returns the pre-split octant buckets and child boxes of the node.
    fn split_or_store<P>(
        &mut self,
        id: NodeId,
        points: &P,
        indices: Vec<PointIndex>,
        params: &BuildParams<S>,
    ) -> Result<Option<([Vec<PointIndex>; X], [BoundingBox<D, S>; X])>, Error>
    where
        P: PointCloud<D, Scalar = S> + ?Sized,
    {
        let node = self.get(id)?;
        let bbox = node.bbox;
        let depth = node.depth;

        if params.stops(&bbox, indices.len()) {
            trace!(id, depth, points = indices.len(), "leaf");
            self.get_mut(id).cells = Cells::Leaf(indices);
            return Ok(None);
        }

        if depth >= params.max_depth {
            return Err(Error::DepthLimit(params.max_depth));
        }

        let mut buckets: [Vec<PointIndex>; X] = std::array::from_fn(|_| Vec::new());
        for index in indices {
            buckets[bbox.octant_index(&points.position(index))].push(index);
        }

        trace!(id, depth, "split");
        Ok(Some((buckets, bbox.subdivide())))
    }

    /// Recursive sequential worker: children are created and built one octant
    /// at a time, in ascending octant order.
    fn build_node<P>(
        &mut self,
        id: NodeId,
        points: &P,
        indices: Vec<PointIndex>,
        params: &BuildParams<S>,
    ) -> Result<(), Error>
    where
        P: PointCloud<D, Scalar = S> + ?Sized,
    {
        let Some((buckets, boxes)) = self.split_or_store(id, points, indices, params)? else {
            return Ok(());
        };

        let depth = self.get(id)?.depth + 1;
        let mut children = [0 as NodeId; X];
        for (octant, (bucket, bbox)) in buckets.into_iter().zip(boxes).enumerate() {
            let child = self.push(Node::leaf(bbox, Some(id), depth));
            children[octant] = child;
            self.build_node(child, points, bucket, params)?;
        }

        self.get_mut(id).cells = Cells::Internal(children);
        Ok(())
    }

    /// Recursive parallel worker: while `levels > 0`, the `X` children are
    /// built as independent subtrees over their disjoint buckets, joined, and
    /// grafted under the node in octant order.
    #[cfg(feature = "parallel")]
    fn par_build_node<P>(
        &mut self,
        id: NodeId,
        points: &P,
        indices: Vec<PointIndex>,
        params: &BuildParams<S>,
        levels: u32,
    ) -> Result<(), Error>
    where
        P: PointCloud<D, Scalar = S> + Sync + ?Sized,
        S: Send + Sync,
    {
        if levels == 0 {
            return self.build_node(id, points, indices, params);
        }

        let Some((buckets, boxes)) = self.split_or_store(id, points, indices, params)? else {
            return Ok(());
        };

        debug!(id, levels, "parallel fan-out");
        let subtrees = buckets
            .into_iter()
            .zip(boxes)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(bucket, bbox)| {
                let mut subtree = Self::with_root(bbox);
                subtree.par_build_node(Self::ROOT, points, bucket, params, levels - 1)?;
                Ok(subtree)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut children = [0 as NodeId; X];
        for (octant, subtree) in subtrees.into_iter().enumerate() {
            children[octant] = self.graft(id, subtree);
        }

        self.get_mut(id).cells = Cells::Internal(children);
        Ok(())
    }

    /// Appends a standalone subtree under `parent`, remapping its node ids,
    /// parent links and depths, and returns the id of its root.
    #[cfg(feature = "parallel")]
    fn graft(&mut self, parent: NodeId, subtree: Self) -> NodeId {
        let offset = self.node_count() as NodeId;
        let base_depth = self.get_mut(parent).depth + 1;

        for mut node in subtree.nodes {
            node.depth += base_depth;
            node.parent = Some(match node.parent {
                Some(p) => p + offset,
                None => parent,
            });
            if let Cells::Internal(children) = &mut node.cells {
                for child in children {
                    *child += offset;
                }
            }
            self.push(node);
        }

        offset
    }
}
