//! Delay-optimal clustering of combinational netlists.
//!
//! Implements Rajaraman-Wong labeling with frontier cluster selection and
//! Lawler level clustering, together with the supporting graph ordering and
//! pairwise path-delay stores.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod cluster;
mod config;
pub mod delay;
pub mod graph;
mod interner;
pub mod lawler;
pub mod logging;
mod models;
pub mod pipeline;
pub mod rw;
pub mod topo;

pub use cluster::Cluster;
pub use config::{ClusteringConfig, ConfigError, LabelingAlgorithm};
pub use delay::{
    DelayMode, DelayStore, DelayStoreError, DenseDelayMatrix, LongestPathOracle, PathDelays,
    SparseDelayMatrix,
};
pub use graph::{GraphError, Netlist, NetlistBuilder, Node, NodeId, OrderedGraph};
pub use lawler::{cluster_lawler, label_lawler, LawlerLabeling};
pub use models::{ClusteringReport, ClusteringStats, NodeSpec, PhaseTiming};
pub use pipeline::{run_clustering, ClusteringError, ClusteringResult};
pub use rw::{label_rw, select_clusters, RwLabeling, Selection, SweepPolicy};
pub use topo::topological_order;

/// Cluster a netlist described node by node.
///
/// # Arguments
/// * `nodes` - Node descriptions; fan-in names may refer to nodes listed later
/// * `config` - Clustering options (defaults if omitted)
///
/// # Returns
/// * ClusteringReport with labels, candidate and final clusters, and statistics
///
/// # Raises
/// * ValueError on duplicate or unknown signals, cycles, or invalid options
#[pyfunction]
#[pyo3(signature = (nodes, config=None))]
fn cluster_netlist(
    nodes: Vec<NodeSpec>,
    config: Option<ClusteringConfig>,
) -> PyResult<ClusteringReport> {
    let config = config.unwrap_or_default();
    let to_py_err = |e: ClusteringError| pyo3::exceptions::PyValueError::new_err(e.to_string());

    let mut builder = NetlistBuilder::from_config(&config);
    for spec in &nodes {
        spec.add_to(&mut builder)
            .map_err(|e| to_py_err(ClusteringError::from(e)))?;
    }
    let netlist = builder
        .build()
        .map_err(|e| to_py_err(ClusteringError::from(e)))?;

    match run_clustering(&netlist, &config) {
        Ok(result) => Ok(ClusteringReport::from(&result)),
        Err(e) => Err(to_py_err(e)),
    }
}

/// The rwcluster.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input and result types
    m.add_class::<NodeSpec>()?;
    m.add_class::<Cluster>()?;
    m.add_class::<PhaseTiming>()?;
    m.add_class::<ClusteringStats>()?;
    m.add_class::<ClusteringReport>()?;

    // Config types
    m.add_class::<ClusteringConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(cluster_netlist, m)?)?;

    Ok(())
}
