//! Lawler labeling and clustering.
//!
//! Labels are levels: a node stays on the highest level among its
//! predecessors until that level already holds `max_cluster_size` of them.
//! Each connected same-level predecessor closure becomes one cluster.

use rustc_hash::FxHashSet;

use crate::cluster::Cluster;
use crate::config::ClusteringConfig;
use crate::delay::LongestPathOracle;
use crate::graph::{NodeId, OrderedGraph};
use crate::log_debug;

/// Labels produced by [`label_lawler`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LawlerLabeling {
    /// Level per node, indexed by topological id.
    pub labels: Vec<u32>,
    /// Largest delay from any node to any of its descendants, as seen during
    /// labeling.
    pub max_path_delay: u32,
}

/// Assign Lawler levels in topological order.
pub fn label_lawler(
    graph: &OrderedGraph,
    oracle: &LongestPathOracle<'_>,
    config: &ClusteringConfig,
) -> LawlerLabeling {
    let mut labels = vec![0u32; graph.len()];
    let mut max_path_delay = 0;

    for v in 0..graph.len() as NodeId {
        let node = graph.node(v);
        if node.is_pi {
            continue;
        }
        let pre = graph.ancestors(v);
        let top = pre.iter().map(|&x| labels[x as usize]).max().unwrap_or(0);
        let count = pre.iter().filter(|&&x| labels[x as usize] == top).count();
        for &x in &pre {
            max_path_delay = max_path_delay.max(oracle.max_delay(x, v));
        }

        labels[v as usize] = if count < config.max_cluster_size as usize {
            top
        } else {
            top + 1
        };
        log_debug!(
            config.verbosity,
            "  {} ({}): level {} ({} predecessors at {})",
            node.name,
            v,
            labels[v as usize],
            count,
            top
        );
    }

    LawlerLabeling {
        labels,
        max_path_delay,
    }
}

/// Form one cluster per level boundary.
///
/// Walks depth-first from every primary output through predecessor links,
/// visiting each node once. A node none of whose successors shares its label
/// roots a cluster made of every node reachable from it through
/// same-label predecessors. Clusters are returned in formation order.
pub fn cluster_lawler(graph: &OrderedGraph, labels: &[u32]) -> Vec<Cluster> {
    let mut walked = vec![false; graph.len()];
    let mut clusters = Vec::new();

    for &po in graph.outputs() {
        let mut stack = vec![po];
        while let Some(n) = stack.pop() {
            if walked[n as usize] {
                continue;
            }
            walked[n as usize] = true;

            let label = labels[n as usize];
            let node = graph.node(n);
            if node.next.iter().all(|&s| labels[s as usize] != label) {
                clusters.push(collect_level(graph, labels, n));
            }
            stack.extend(node.prev.iter().rev().copied());
        }
    }
    clusters
}

/// Cluster rooted at `root`: predecessors sharing its label, in post-order.
fn collect_level(graph: &OrderedGraph, labels: &[u32], root: NodeId) -> Cluster {
    let level = labels[root as usize];
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    let mut members = Vec::new();
    // (node, index of the next predecessor to visit)
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    visited.insert(root);

    while let Some(frame) = stack.last_mut() {
        let (n, cursor) = *frame;
        let prev = &graph.node(n).prev;
        if cursor < prev.len() {
            frame.1 += 1;
            let p = prev[cursor];
            if labels[p as usize] == level && visited.insert(p) {
                stack.push((p, 0));
            }
        } else {
            if n != root {
                members.push(n);
            }
            stack.pop();
        }
    }
    Cluster::new(graph, root, members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures;
    use crate::topo::topological_order;

    fn run(graph: &OrderedGraph, max_cluster_size: u32) -> (LawlerLabeling, Vec<Cluster>) {
        let config = ClusteringConfig {
            max_cluster_size,
            use_lawler_labeling: true,
            ..Default::default()
        };
        let labeling = label_lawler(graph, &LongestPathOracle::new(graph), &config);
        let clusters = cluster_lawler(graph, &labeling.labels);
        (labeling, clusters)
    }

    #[test]
    fn test_lecture_example_single_level() {
        let graph = topological_order(&fixtures::lecture_example());
        let (labeling, clusters) = run(&graph, 8);

        assert!(labeling.labels.iter().all(|&l| l == 0));
        assert_eq!(labeling.max_path_delay, 2);
        assert_eq!(clusters.len(), 1);
        // a, b, g1, c, g2, y: root first, then post-order
        assert_eq!(clusters[0].members, vec![5, 0, 1, 2, 3, 4]);
        assert!(clusters[0].input_set.is_empty());
    }

    #[test]
    fn test_chain_levels_split_by_cluster_size() {
        let graph = topological_order(&fixtures::chain(4));
        // in, n0, n1, n2, n3, out
        let (labeling, clusters) = run(&graph, 2);

        assert_eq!(labeling.labels, vec![0, 0, 1, 1, 2, 2]);
        let roots: Vec<NodeId> = clusters.iter().map(|c| c.id).collect();
        assert_eq!(roots, vec![5, 3, 1]);
        assert_eq!(clusters[0].members, vec![5, 4]);
        assert_eq!(clusters[0].input_set, vec![3]);
        assert_eq!(clusters[2].members, vec![1, 0]);
    }

    #[test]
    fn test_primary_inputs_stay_at_zero() {
        let graph = topological_order(&fixtures::sequential_circuit());
        for size in [1, 2, 3, 8] {
            let (labeling, _) = run(&graph, size);
            for (id, node) in graph.nodes().iter().enumerate() {
                if node.is_pi {
                    assert_eq!(labeling.labels[id], 0);
                }
            }
        }
    }

    #[test]
    fn test_every_node_clustered_once_per_root() {
        let graph = topological_order(&fixtures::sequential_circuit());
        let (labeling, clusters) = run(&graph, 2);

        let mut covered = vec![false; graph.len()];
        let mut roots = FxHashSet::default();
        for cluster in &clusters {
            assert!(roots.insert(cluster.id));
            assert_eq!(cluster.members[0], cluster.id);
            let level = labeling.labels[cluster.id as usize];
            for &m in &cluster.members {
                assert_eq!(labeling.labels[m as usize], level);
                covered[m as usize] = true;
            }
            for input in &cluster.input_set {
                assert!(!cluster.contains(*input));
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_labels_non_decreasing_along_edges() {
        let graph = topological_order(&fixtures::sequential_circuit());
        let (labeling, _) = run(&graph, 3);
        for (id, node) in graph.nodes().iter().enumerate() {
            for &p in &node.prev {
                assert!(labeling.labels[p as usize] <= labeling.labels[id]);
            }
        }
    }
}
