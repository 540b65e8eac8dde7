//! Rajaraman-Wong labeling and clustering.
//!
//! Labeling builds one candidate cluster per node; a final sweep picks the
//! subset of candidates that covers the circuit from the primary outputs.

use std::collections::VecDeque;

use crate::cluster::Cluster;
use crate::config::ClusteringConfig;
use crate::delay::PathDelays;
use crate::graph::{NodeId, OrderedGraph};
use crate::{log_clusters, log_debug};

/// Labels and candidate clusters produced by [`label_rw`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RwLabeling {
    /// Final label per node, indexed by topological id.
    pub labels: Vec<u32>,
    /// Candidate cluster rooted at each node, indexed by topological id.
    pub clusters: Vec<Cluster>,
}

/// How the final clusters are picked from the candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepPolicy {
    /// Frontier expansion from the outputs through cluster input sets.
    Frontier,
    /// Experimental: frontier expansion that skips nodes whose whole candidate
    /// cluster is already covered.
    NonOverlap,
    /// Experimental: reverse topological cover, no frontier.
    ReverseTopological,
}

/// Output of [`select_clusters`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Root ids of the selected clusters, in selection order.
    pub selected: Vec<NodeId>,
    /// Queue snapshots, initial state first; empty unless recording.
    pub frontier_history: Vec<Vec<NodeId>>,
}

/// Compute RW labels and the candidate cluster of every node.
///
/// For each `v` in topological order, its transitive predecessors `S` are
/// ranked by `label_v(x) = label(x) + delay(x, v)` (descending, ties by
/// descending id) and the top `max_cluster_size - 1` join `v`'s cluster.
/// `label(v)` is the larger of the best primary input inside the cluster and
/// the best node left outside plus the inter-cluster delay.
pub fn label_rw(
    graph: &OrderedGraph,
    delays: &PathDelays<'_>,
    config: &ClusteringConfig,
) -> RwLabeling {
    let verbosity = config.verbosity;
    let n = graph.len();
    let mut labels: Vec<u32> = graph
        .nodes()
        .iter()
        .map(|node| if node.is_pi { node.delay } else { 0 })
        .collect();
    let mut clusters = Vec::with_capacity(n);
    let take = config.max_cluster_size.saturating_sub(1) as usize;

    for v in 0..n as NodeId {
        let node = graph.node(v);

        let mut ranked: Vec<(NodeId, u32)> = graph
            .ancestors(v)
            .into_iter()
            .map(|x| (x, labels[x as usize] + delays.delay(x, v)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let taken = take.min(ranked.len());
        let inside = &ranked[..taken];

        if !node.prev.is_empty() {
            let l1 = inside
                .iter()
                .filter(|(x, _)| graph.node(*x).is_pi)
                .map(|&(_, label_v)| label_v)
                .max()
                .unwrap_or(0);
            let l2 = ranked
                .get(taken)
                .map(|&(_, label_v)| label_v + config.inter_cluster_delay)
                .unwrap_or(0);
            labels[v as usize] = l1.max(l2);
            log_debug!(
                verbosity,
                "  {} ({}): L1={} L2={} label={}",
                node.name,
                v,
                l1,
                l2,
                labels[v as usize]
            );
        }

        clusters.push(Cluster::new(graph, v, inside.iter().map(|&(x, _)| x)));
    }

    RwLabeling { labels, clusters }
}

/// Pick the final clusters from the per-node candidates.
///
/// `clusters[i]` must be the candidate rooted at node `i`.
pub fn select_clusters(
    graph: &OrderedGraph,
    clusters: &[Cluster],
    policy: SweepPolicy,
    config: &ClusteringConfig,
) -> Selection {
    match policy {
        SweepPolicy::ReverseTopological => reverse_cover(clusters, config.verbosity),
        SweepPolicy::Frontier | SweepPolicy::NonOverlap => frontier_sweep(
            graph,
            clusters,
            policy == SweepPolicy::NonOverlap,
            config,
        ),
    }
}

fn frontier_sweep(
    graph: &OrderedGraph,
    clusters: &[Cluster],
    non_overlap: bool,
    config: &ClusteringConfig,
) -> Selection {
    let verbosity = config.verbosity;
    let n = graph.len();
    // Ever queued; a popped node is also selected.
    let mut queued = vec![false; n];
    let mut selected_flag = vec![false; n];
    let mut covered = vec![false; n];

    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for &po in graph.outputs() {
        if !queued[po as usize] {
            queued[po as usize] = true;
            queue.push_back(po);
        }
    }

    let mut selection = Selection::default();
    if config.record_frontier {
        selection.frontier_history.push(queue.iter().copied().collect());
    }

    while let Some(root) = queue.pop_front() {
        let cluster = &clusters[root as usize];
        selected_flag[root as usize] = true;
        selection.selected.push(root);
        log_clusters!(
            verbosity,
            "Selected cluster {} ({} members, {} inputs)",
            graph.node(root).name,
            cluster.len(),
            cluster.input_set.len()
        );

        for &input in &cluster.input_set {
            let idx = input as usize;
            if queued[idx] {
                continue;
            }
            if non_overlap {
                let candidate = &clusters[idx];
                if candidate.members.iter().all(|&m| covered[m as usize]) {
                    log_clusters!(verbosity, "  Skipping {}: already covered", graph.node(input).name);
                    continue;
                }
                for &m in &candidate.members {
                    covered[m as usize] = true;
                }
            } else if selected_flag[idx] {
                continue;
            }
            queued[idx] = true;
            queue.push_back(input);
            log_clusters!(verbosity, "  Queued {}", graph.node(input).name);
        }

        if config.record_frontier {
            selection.frontier_history.push(queue.iter().copied().collect());
        }
    }

    selection
}

fn reverse_cover(clusters: &[Cluster], verbosity: u8) -> Selection {
    let mut covered = vec![false; clusters.len()];
    let mut selection = Selection::default();
    for root in (0..clusters.len()).rev() {
        if covered[root] {
            continue;
        }
        let cluster = &clusters[root];
        for &m in &cluster.members {
            covered[m as usize] = true;
        }
        selection.selected.push(root as NodeId);
        log_clusters!(verbosity, "Selected cluster {} ({} members)", root, cluster.len());
    }
    selection
}
