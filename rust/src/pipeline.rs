//! End-to-end clustering run: order, delays, labeling, selection, statistics.

use std::time::Instant;

use thiserror::Error;

use crate::cluster::Cluster;
use crate::config::{ClusteringConfig, ConfigError, LabelingAlgorithm};
use crate::delay::{DelayStoreError, LongestPathOracle, PathDelays};
use crate::graph::{GraphError, Netlist, NodeId, OrderedGraph};
use crate::lawler::{cluster_lawler, label_lawler};
use crate::log_phases;
use crate::models::{ClusteringStats, PhaseTiming};
use crate::rw::{label_rw, select_clusters};
use crate::topo::topological_order;

/// Errors that abort a clustering run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusteringError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid netlist: {0}")]
    Graph(#[from] GraphError),
    #[error("Delay store error: {0}")]
    DelayStore(#[from] DelayStoreError),
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct ClusteringResult {
    /// The netlist restricted to nodes reachable from an output, in
    /// topological order. All ids below refer to it.
    pub graph: OrderedGraph,
    pub labels: Vec<u32>,
    /// RW: one candidate per node, indexed by id. Lawler: clusters in
    /// formation order.
    pub candidates: Vec<Cluster>,
    /// Indices into `candidates`, in selection order.
    pub selected: Vec<usize>,
    pub frontier_history: Vec<Vec<NodeId>>,
    pub stats: ClusteringStats,
}

impl ClusteringResult {
    /// The selected clusters, in selection order.
    pub fn final_clusters(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.selected.iter().map(|&i| &self.candidates[i])
    }

    /// Label of the node named `name`, if it survived ordering.
    pub fn label_of(&self, name: &str) -> Option<u32> {
        self.graph
            .nodes()
            .iter()
            .position(|n| n.name == name)
            .map(|i| self.labels[i])
    }
}

/// Records the wall-clock duration of each phase.
struct PhaseClock {
    verbosity: u8,
    timings: Vec<PhaseTiming>,
}

impl PhaseClock {
    fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            timings: Vec::new(),
        }
    }

    fn run<T>(&mut self, phase: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let micros = start.elapsed().as_micros() as u64;
        log_phases!(self.verbosity, "Phase '{}' done in {}us", phase, micros);
        self.timings.push(PhaseTiming {
            phase: phase.to_string(),
            micros,
        });
        out
    }
}

/// Per-algorithm output before statistics are assembled.
struct Outcome {
    labels: Vec<u32>,
    candidates: Vec<Cluster>,
    selected: Vec<usize>,
    frontier_history: Vec<Vec<NodeId>>,
    max_io_delay: u32,
    max_io_delay_general: u32,
}

/// Cluster `netlist` with the algorithm and options chosen in `config`.
pub fn run_clustering(
    netlist: &Netlist,
    config: &ClusteringConfig,
) -> Result<ClusteringResult, ClusteringError> {
    config.validate()?;
    let mut clock = PhaseClock::new(config.verbosity);

    let graph = clock.run("order", || topological_order(netlist));
    graph.check_topological()?;
    log_phases!(
        config.verbosity,
        "Ordered {} of {} nodes ({} outputs)",
        graph.len(),
        netlist.len(),
        graph.outputs().len()
    );

    let outcome = match config.labeling() {
        LabelingAlgorithm::RajaramanWong => run_rw(&graph, config, &mut clock)?,
        LabelingAlgorithm::Lawler => run_lawler(&graph, config, &mut clock),
    };

    let clustered_area: usize = outcome
        .selected
        .iter()
        .map(|&i| outcome.candidates[i].len())
        .sum();
    let area_factor = if graph.is_empty() {
        0.0
    } else {
        clustered_area as f64 / graph.len() as f64
    };
    let stats = ClusteringStats {
        node_count: graph.len(),
        cluster_count: outcome.selected.len(),
        max_label: outcome.labels.iter().copied().max().unwrap_or(0),
        max_io_delay: outcome.max_io_delay,
        max_io_delay_general: outcome.max_io_delay_general,
        clustered_area,
        area_factor,
        phase_timings: clock.timings,
    };
    log_phases!(
        config.verbosity,
        "Clustering done: {} clusters, max label {}, area factor {:.3}",
        stats.cluster_count,
        stats.max_label,
        stats.area_factor
    );

    Ok(ClusteringResult {
        graph,
        labels: outcome.labels,
        candidates: outcome.candidates,
        selected: outcome.selected,
        frontier_history: outcome.frontier_history,
        stats,
    })
}

fn run_rw(
    graph: &OrderedGraph,
    config: &ClusteringConfig,
    clock: &mut PhaseClock,
) -> Result<Outcome, ClusteringError> {
    let delays = clock.run("delays", || PathDelays::build(graph, config.delay_mode()))?;
    let labeling = clock.run("label", || label_rw(graph, &delays, config));
    let selection = clock.run("select", || {
        select_clusters(graph, &labeling.clusters, config.sweep_policy(), config)
    });

    let max_label = labeling.labels.iter().copied().max().unwrap_or(0);
    Ok(Outcome {
        labels: labeling.labels,
        candidates: labeling.clusters,
        selected: selection.selected.iter().map(|&id| id as usize).collect(),
        frontier_history: selection.frontier_history,
        max_io_delay: max_label,
        max_io_delay_general: max_label,
    })
}

fn run_lawler(graph: &OrderedGraph, config: &ClusteringConfig, clock: &mut PhaseClock) -> Outcome {
    let oracle = LongestPathOracle::new(graph);
    let labeling = clock.run("label", || label_lawler(graph, &oracle, config));
    let clusters = clock.run("cluster", || cluster_lawler(graph, &labeling.labels));

    let max_label = labeling.labels.iter().copied().max().unwrap_or(0);
    let max_io_delay = labeling.max_path_delay + max_label;
    Outcome {
        selected: (0..clusters.len()).collect(),
        candidates: clusters,
        labels: labeling.labels,
        frontier_history: Vec::new(),
        max_io_delay,
        max_io_delay_general: max_io_delay + max_label * config.inter_cluster_delay,
    }
}
