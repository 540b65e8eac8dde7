//! Input and result types shared by the pipeline and the Python module.

use pyo3::prelude::*;

use crate::cluster::Cluster;
use crate::graph::{GraphError, NetlistBuilder, NodeId};
use crate::pipeline::ClusteringResult;

/// One netlist node as described by a caller.
#[pyclass]
#[derive(Clone, Debug)]
pub struct NodeSpec {
    #[pyo3(get, set)]
    pub name: String,
    /// Names of the driving signals
    #[pyo3(get, set)]
    pub fanin: Vec<String>,
    #[pyo3(get, set)]
    pub is_pi: bool,
    #[pyo3(get, set)]
    pub is_po: bool,
    /// Explicit delay; the configured PI/PO/node delay when unset
    #[pyo3(get, set)]
    pub delay: Option<u32>,
}

impl NodeSpec {
    /// Declare this node on `builder`.
    pub fn add_to(&self, builder: &mut NetlistBuilder) -> Result<NodeId, GraphError> {
        let fanin: Vec<&str> = self.fanin.iter().map(String::as_str).collect();
        let delay = self
            .delay
            .unwrap_or_else(|| builder.default_delay(self.is_pi, self.is_po));
        builder.add_node(&self.name, delay, self.is_pi, self.is_po, &fanin)
    }
}

#[pymethods]
impl NodeSpec {
    #[new]
    #[pyo3(signature = (name, fanin=Vec::new(), is_pi=false, is_po=false, delay=None))]
    fn new(
        name: String,
        fanin: Vec<String>,
        is_pi: bool,
        is_po: bool,
        delay: Option<u32>,
    ) -> Self {
        Self {
            name,
            fanin,
            is_pi,
            is_po,
            delay,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "NodeSpec(name={:?}, fanin={}, pi={}, po={}, delay={:?})",
            self.name,
            self.fanin.len(),
            self.is_pi,
            self.is_po,
            self.delay
        )
    }
}

/// Wall-clock time spent in one pipeline phase.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseTiming {
    #[pyo3(get)]
    pub phase: String,
    #[pyo3(get)]
    pub micros: u64,
}

/// Summary figures of a clustering run.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusteringStats {
    #[pyo3(get)]
    pub node_count: usize,
    #[pyo3(get)]
    pub cluster_count: usize,
    #[pyo3(get)]
    pub max_label: u32,
    /// RW: the max label. Lawler: max path delay plus max level (unit delay model).
    #[pyo3(get)]
    pub max_io_delay: u32,
    /// Lawler: `max_io_delay` plus the inter-cluster delay for every level.
    /// RW: same as `max_io_delay`.
    #[pyo3(get)]
    pub max_io_delay_general: u32,
    /// Sum of the selected cluster sizes (unit area per node).
    #[pyo3(get)]
    pub clustered_area: usize,
    /// `clustered_area / node_count`
    #[pyo3(get)]
    pub area_factor: f64,
    #[pyo3(get)]
    pub phase_timings: Vec<PhaseTiming>,
}

#[pymethods]
impl ClusteringStats {
    fn __repr__(&self) -> String {
        format!(
            "ClusteringStats(nodes={}, clusters={}, max_label={}, max_io_delay={}, area_factor={:.3})",
            self.node_count, self.cluster_count, self.max_label, self.max_io_delay, self.area_factor
        )
    }
}

/// Python-facing copy of a [`ClusteringResult`].
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct ClusteringReport {
    /// Node names in topological order (index = node id)
    #[pyo3(get)]
    pub node_names: Vec<String>,
    #[pyo3(get)]
    pub labels: Vec<u32>,
    #[pyo3(get)]
    pub candidates: Vec<Cluster>,
    #[pyo3(get)]
    pub final_clusters: Vec<Cluster>,
    #[pyo3(get)]
    pub frontier_history: Vec<Vec<NodeId>>,
    #[pyo3(get)]
    pub stats: ClusteringStats,
}

impl From<&ClusteringResult> for ClusteringReport {
    fn from(result: &ClusteringResult) -> Self {
        Self {
            node_names: result.graph.nodes().iter().map(|n| n.name.clone()).collect(),
            labels: result.labels.clone(),
            candidates: result.candidates.clone(),
            final_clusters: result.final_clusters().cloned().collect(),
            frontier_history: result.frontier_history.clone(),
            stats: result.stats.clone(),
        }
    }
}

#[pymethods]
impl ClusteringReport {
    fn __repr__(&self) -> String {
        format!(
            "ClusteringReport(nodes={}, final_clusters={}, max_label={})",
            self.node_names.len(),
            self.final_clusters.len(),
            self.stats.max_label
        )
    }
}
