//! Cluster value type.

use pyo3::prelude::*;
use rustc_hash::FxHashSet;

use crate::graph::{NodeId, OrderedGraph};

/// A group of nodes rooted at one node.
///
/// `members[0]` is always the root; `input_set` holds the predecessors of
/// members that are not members themselves.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    /// Topological id of the root node.
    #[pyo3(get)]
    pub id: NodeId,
    #[pyo3(get)]
    pub members: Vec<NodeId>,
    #[pyo3(get)]
    pub input_set: Vec<NodeId>,
}

impl Cluster {
    /// Build a cluster rooted at `root`; `others` must not contain `root`.
    pub fn new(graph: &OrderedGraph, root: NodeId, others: impl IntoIterator<Item = NodeId>) -> Self {
        let mut members = vec![root];
        members.extend(others);
        let input_set = input_set(graph, &members);
        Self {
            id: root,
            members,
            input_set,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }
}

#[pymethods]
impl Cluster {
    fn __len__(&self) -> usize {
        self.members.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Cluster(id={}, members={:?}, inputs={:?})",
            self.id, self.members, self.input_set
        )
    }
}

/// Predecessors of `members` outside `members`, in member then fan-in order.
fn input_set(graph: &OrderedGraph, members: &[NodeId]) -> Vec<NodeId> {
    let inside: FxHashSet<NodeId> = members.iter().copied().collect();
    let mut seen: FxHashSet<NodeId> = FxHashSet::default();
    let mut result = Vec::new();
    for &m in members {
        for &p in &graph.node(m).prev {
            if !inside.contains(&p) && seen.insert(p) {
                result.push(p);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures;
    use crate::topo::topological_order;

    #[test]
    fn test_input_set_excludes_members() {
        let graph = topological_order(&fixtures::lecture_example());
        // a, b, g1, c, g2, y
        let cluster = Cluster::new(&graph, 5, [2, 4]);

        assert_eq!(cluster.id, 5);
        assert_eq!(cluster.members, vec![5, 2, 4]);
        // g1's inputs first, then g2's; b is listed once
        assert_eq!(cluster.input_set, vec![0, 1, 3]);
        assert!(cluster.contains(2));
        assert!(!cluster.contains(0));
        assert_eq!(cluster.len(), 3);
    }

    #[test]
    fn test_full_cluster_has_no_inputs() {
        let graph = topological_order(&fixtures::lecture_example());
        let cluster = Cluster::new(&graph, 5, [4, 2, 3, 1, 0]);
        assert!(cluster.input_set.is_empty());
    }

    #[test]
    fn test_singleton_cluster() {
        let graph = topological_order(&fixtures::lecture_example());
        let cluster = Cluster::new(&graph, 2, []);
        assert_eq!(cluster.members, vec![2]);
        assert_eq!(cluster.input_set, vec![0, 1]);
    }
}
