//! Support for cycle detection in DFS graph traversals.

use core::ops::{Deref, DerefMut};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DecyclerError {
    DepthLimitExceeded,
    CycleDetected,
}

/// Cycle detector for DFS traversal of a graph.
///
/// The graph is expected to have unique node identifiers of type `T`
/// and traversal depth is limited to the constant `D`.
///
/// The identifiers of every node on the current path are kept in a fixed
/// size array, indexed by depth, which also imposes the depth limit. Entering
/// a node that is already on the path is a cycle.
///
/// Nodes that are reachable along several paths (shared subtrees) are not
/// cycles and may be entered any number of times.
pub(crate) struct Decycler<T, const D: usize> {
    node_ids: [T; D],
    depth: usize,
}

impl<T, const D: usize> Decycler<T, D>
where
    T: Copy + PartialEq + Default,
{
    pub fn new() -> Self {
        Self {
            node_ids: [T::default(); D],
            depth: 0,
        }
    }

    /// Enters a new graph node with the given value that uniquely
    /// identifies the current node.
    ///
    /// Returns an error when a cycle is detected or the max depth of the
    /// traversal is exceeded. Otherwise, increases the current depth and
    /// returns a guard object that will decrease the depth when dropped.
    ///
    /// The guard object derefs to the decycler, so it can be passed to
    /// a recursive traversal function to check for cycles in descendent
    /// nodes in a graph.
    pub fn enter(&mut self, node_id: T) -> Result<DecyclerGuard<'_, T, D>, DecyclerError> {
        if self.node_ids[..self.depth].contains(&node_id) {
            return Err(DecyclerError::CycleDetected);
        }
        if self.depth >= D {
            return Err(DecyclerError::DepthLimitExceeded);
        }
        self.node_ids[self.depth] = node_id;
        self.depth += 1;
        Ok(DecyclerGuard { decycler: self })
    }

    /// The number of nodes on the current path.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<T, const D: usize> Default for Decycler<T, D>
where
    T: Copy + PartialEq + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct DecyclerGuard<'a, T, const D: usize> {
    decycler: &'a mut Decycler<T, D>,
}

impl<T, const D: usize> Deref for DecyclerGuard<'_, T, D> {
    type Target = Decycler<T, D>;

    fn deref(&self) -> &Self::Target {
        self.decycler
    }
}

impl<T, const D: usize> DerefMut for DecyclerGuard<'_, T, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.decycler
    }
}

impl<T, const D: usize> Drop for DecyclerGuard<'_, T, D> {
    fn drop(&mut self) {
        self.decycler.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DEPTH: usize = 8;
    type TestDecycler = Decycler<u32, MAX_DEPTH>;

    /// Adjacency lists, indexed by node id.
    struct Graph(Vec<Vec<u32>>);

    impl Graph {
        /// A chain of `len` nodes, each pointing at the next.
        fn chain(len: u32) -> Self {
            Self(
                (0..len)
                    .map(|id| if id + 1 < len { vec![id + 1] } else { vec![] })
                    .collect(),
            )
        }

        /// Visits every path from node 0, returning the visit order.
        fn walk(&self, decycler: &mut TestDecycler) -> Result<Vec<u32>, DecyclerError> {
            let mut order = Vec::new();
            self.visit(decycler, 0, &mut order)?;
            Ok(order)
        }

        fn visit(
            &self,
            decycler: &mut TestDecycler,
            node: u32,
            order: &mut Vec<u32>,
        ) -> Result<(), DecyclerError> {
            let mut guard = decycler.enter(node)?;
            order.push(node);
            for child in &self.0[node as usize] {
                self.visit(&mut guard, *child, order)?;
            }
            Ok(())
        }
    }

    #[test]
    fn self_reference() {
        let graph = Graph(vec![vec![0]]);
        assert_eq!(
            graph.walk(&mut TestDecycler::new()),
            Err(DecyclerError::CycleDetected)
        );
    }

    #[test]
    fn back_edge_deep_in_the_path() {
        // 0 -> 1 -> 2 -> 3 -> 1
        let graph = Graph(vec![vec![1], vec![2], vec![3], vec![1]]);
        assert_eq!(
            graph.walk(&mut TestDecycler::new()),
            Err(DecyclerError::CycleDetected)
        );
    }

    #[test]
    fn shared_subtree_is_not_a_cycle() {
        // 0 -> {1, 2}, both of which reference 3
        let graph = Graph(vec![vec![1, 2], vec![3], vec![3], vec![]]);
        let mut decycler = TestDecycler::new();
        assert_eq!(graph.walk(&mut decycler), Ok(vec![0, 1, 3, 2, 3]));
        assert_eq!(decycler.depth(), 0);
    }

    #[test]
    fn depth_limit() {
        assert_eq!(
            Graph::chain(MAX_DEPTH as u32).walk(&mut TestDecycler::new()),
            Ok((0..MAX_DEPTH as u32).collect())
        );
        assert_eq!(
            Graph::chain(MAX_DEPTH as u32 + 1).walk(&mut TestDecycler::new()),
            Err(DecyclerError::DepthLimitExceeded)
        );
    }

    #[test]
    fn depth_is_restored_after_errors() {
        let graph = Graph(vec![vec![1], vec![0]]);
        let mut decycler = TestDecycler::new();
        assert!(graph.walk(&mut decycler).is_err());
        assert_eq!(decycler.depth(), 0);
        assert!(Graph::chain(3).walk(&mut decycler).is_ok());
    }
}
