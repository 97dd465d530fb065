use crate::{
    partition::Scalar,
    tree::{Cells, NodeId, NodeRef, Orthtree},
};

impl<const X: usize, const D: usize, S: Scalar> Orthtree<X, D, S> {
    /// Walks the tree in pre-order, calling `callback` on every node.
    ///
    /// The callback is invoked on a node before any of its children, and
    /// children are visited in ascending octant order. Returning `false` from
    /// the callback stops the whole walk: no further node anywhere in the
    /// tree is visited and `visit` returns `false`. A completed walk returns
    /// `true`.
    ///
    /// The callback may carry external state but borrows the tree immutably,
    /// so the structure cannot change mid-walk.
    #[inline]
    pub fn visit<F>(&self, mut callback: F) -> bool
    where
        F: FnMut(NodeRef<'_, X, D, S>) -> bool,
    {
        self.visit_from(Self::ROOT, &mut callback)
    }

    fn visit_from<F>(&self, id: NodeId, callback: &mut F) -> bool
    where
        F: FnMut(NodeRef<'_, X, D, S>) -> bool,
    {
        if !callback(self.node_ref(id)) {
            return false;
        }

        if let Cells::Internal(children) = &self.nodes[id as usize].cells {
            for &child in children {
                if !self.visit_from(child, callback) {
                    return false;
                }
            }
        }

        true
    }

    /// Returns a lazy iterator over the nodes of the tree in pre-order.
    ///
    /// Equivalent to [`visit`](Orthtree::visit) with a callback that never
    /// stops, except that the caller decides at each step whether to keep
    /// consuming.
    #[inline]
    pub fn iter(&self) -> PreOrder<'_, X, D, S> {
        PreOrder {
            tree: self,
            stack: vec![Self::ROOT],
        }
    }
}

/// Lazy pre-order iterator over the nodes of an [`Orthtree`].
///
/// Returned by [`Orthtree::iter`].
#[derive(Clone, Debug)]
pub struct PreOrder<'t, const X: usize, const D: usize, S> {
    tree: &'t Orthtree<X, D, S>,
    stack: Vec<NodeId>,
}

impl<'t, const X: usize, const D: usize, S: Scalar> Iterator for PreOrder<'t, X, D, S> {
    type Item = NodeRef<'t, X, D, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        if let Cells::Internal(children) = &self.tree.nodes[id as usize].cells {
            // Pushed in reverse so the octant 0 child pops first.
            self.stack.extend(children.iter().rev());
        }

        Some(self.tree.node_ref(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{build::BuildParams, Octree};

    fn sample_tree() -> Octree<f32> {
        let points: Vec<[f32; 3]> = (0..8)
            .flat_map(|k| {
                let corner: [f32; 3] =
                    std::array::from_fn(|i| if k & (1 << i) == 0 { -1.0 } else { 1.0 });
                [corner, corner.map(|c| c * 0.75)]
            })
            .collect();

        let mut tree = Octree::new();
        tree.build(points.as_slice(), &BuildParams::default())
            .unwrap();
        tree
    }

    #[test]
    fn visit_reaches_every_node_in_preorder() {
        let tree = sample_tree();

        let mut visited = Vec::new();
        assert!(tree.visit(|node| {
            visited.push(node.id());
            true
        }));

        assert_eq!(visited.len(), tree.node_count());
        assert_eq!(visited[0], Octree::<f32>::ROOT);

        // A node's parent always precedes it.
        for (rank, &id) in visited.iter().enumerate() {
            if let Some(parent) = tree.node(id).unwrap().parent() {
                let parent_rank = visited.iter().position(|&v| v == parent.id()).unwrap();
                assert!(parent_rank < rank);
            }
        }
    }

    #[test]
    fn iter_matches_visit() {
        let tree = sample_tree();

        let mut visited = Vec::new();
        tree.visit(|node| {
            visited.push(node.id());
            true
        });

        let iterated: Vec<_> = tree.iter().map(|node| node.id()).collect();
        assert_eq!(iterated, visited);
    }

    #[test]
    fn children_come_in_ascending_octant_order() {
        let tree = sample_tree();
        let order: Vec<_> = tree.iter().map(|node| node.id()).collect();

        let root = tree.root();
        let mut previous = None;
        for octant in 0..8 {
            let child = root.child(octant).unwrap().unwrap().id();
            let rank = order.iter().position(|&id| id == child).unwrap();
            if let Some(previous) = previous {
                assert!(rank > previous);
            }
            previous = Some(rank);
        }
    }

    #[test]
    fn a_false_callback_stops_the_whole_walk() {
        let tree = sample_tree();

        let preorder: Vec<_> = tree.iter().map(|node| node.id()).collect();

        for (rank, &stop_at) in preorder.iter().enumerate() {
            let mut visited = Vec::new();
            let completed = tree.visit(|node| {
                visited.push(node.id());
                node.id() != stop_at
            });

            assert!(!completed);
            assert_eq!(visited.len(), rank + 1);
            assert_eq!(visited, preorder[..=rank]);
        }
    }

    #[test]
    fn iteration_can_stop_early() {
        let tree = sample_tree();
        assert_eq!(tree.iter().take(3).count(), 3);
        assert_eq!(tree.iter().count(), tree.node_count());
    }
}
