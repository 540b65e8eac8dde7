//! Configuration types for the clustering pipeline.

use pyo3::prelude::*;
use thiserror::Error;

use crate::delay::DelayMode;
use crate::rw::SweepPolicy;

/// Errors raised by [`ClusteringConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_cluster_size must be at least 1")]
    ZeroClusterSize,
    #[error("use_non_overlap and use_reverse_sweep are mutually exclusive")]
    ConflictingSweepPolicies,
}

/// Which labeling algorithm a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelingAlgorithm {
    RajaramanWong,
    Lawler,
}

/// Options for a clustering run.
///
/// The PI/PO/node delays are consumed by the netlist builder; everything else
/// by the pipeline.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ClusteringConfig {
    /// Maximum number of nodes per cluster, root included
    #[pyo3(get, set)]
    pub max_cluster_size: u32,
    /// Penalty charged when a path crosses a cluster boundary
    #[pyo3(get, set)]
    pub inter_cluster_delay: u32,
    /// Delay given to primary inputs (and latch outputs)
    #[pyo3(get, set)]
    pub pi_delay: u32,
    /// Delay given to primary outputs (and latch inputs)
    #[pyo3(get, set)]
    pub po_delay: u32,
    /// Delay given to every other gate
    #[pyo3(get, set)]
    pub node_delay: u32,
    /// Use Lawler labeling instead of Rajaraman-Wong
    #[pyo3(get, set)]
    pub use_lawler_labeling: bool,
    /// Precompute the all-pairs delay matrix (otherwise query the oracle per pair)
    #[pyo3(get, set)]
    pub use_delay_matrix: bool,
    /// Store the delay matrix sparsely (ignored without a delay matrix)
    #[pyo3(get, set)]
    pub use_sparse: bool,
    /// Experimental: skip frontier nodes whose cluster is already covered
    #[pyo3(get, set)]
    pub use_non_overlap: bool,
    /// Experimental: reverse-topological cover instead of frontier expansion
    #[pyo3(get, set)]
    pub use_reverse_sweep: bool,
    /// Keep a snapshot of the frontier queue after every selection
    #[pyo3(get, set)]
    pub record_frontier: bool,
    /// Verbosity level: 0=silent, 1=phases, 2=clusters, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_cluster_size: 8,
            inter_cluster_delay: 3,
            pi_delay: 0,
            po_delay: 1,
            node_delay: 1,
            use_lawler_labeling: false,
            use_delay_matrix: true,
            use_sparse: true,
            use_non_overlap: false,
            use_reverse_sweep: false,
            record_frontier: false,
            verbosity: 0,
        }
    }
}

impl ClusteringConfig {
    /// Reject option combinations the algorithms are undefined for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cluster_size == 0 {
            return Err(ConfigError::ZeroClusterSize);
        }
        if self.use_non_overlap && self.use_reverse_sweep {
            return Err(ConfigError::ConflictingSweepPolicies);
        }
        Ok(())
    }

    pub fn labeling(&self) -> LabelingAlgorithm {
        if self.use_lawler_labeling {
            LabelingAlgorithm::Lawler
        } else {
            LabelingAlgorithm::RajaramanWong
        }
    }

    /// Delay source for RW labeling. Lawler runs always use the oracle.
    pub fn delay_mode(&self) -> DelayMode {
        match (self.use_delay_matrix, self.use_sparse) {
            (false, _) => DelayMode::OnDemand,
            (true, true) => DelayMode::Sparse,
            (true, false) => DelayMode::Dense,
        }
    }

    pub fn sweep_policy(&self) -> SweepPolicy {
        if self.use_reverse_sweep {
            SweepPolicy::ReverseTopological
        } else if self.use_non_overlap {
            SweepPolicy::NonOverlap
        } else {
            SweepPolicy::Frontier
        }
    }
}

#[pymethods]
impl ClusteringConfig {
    #[new]
    #[pyo3(signature = (
        max_cluster_size=None,
        inter_cluster_delay=None,
        pi_delay=None,
        po_delay=None,
        node_delay=None,
        use_lawler_labeling=false,
        use_delay_matrix=true,
        use_sparse=true,
        use_non_overlap=false,
        use_reverse_sweep=false,
        record_frontier=false,
        verbosity=0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        max_cluster_size: Option<u32>,
        inter_cluster_delay: Option<u32>,
        pi_delay: Option<u32>,
        po_delay: Option<u32>,
        node_delay: Option<u32>,
        use_lawler_labeling: bool,
        use_delay_matrix: bool,
        use_sparse: bool,
        use_non_overlap: bool,
        use_reverse_sweep: bool,
        record_frontier: bool,
        verbosity: u8,
    ) -> Self {
        let defaults = Self::default();
        Self {
            max_cluster_size: max_cluster_size.unwrap_or(defaults.max_cluster_size),
            inter_cluster_delay: inter_cluster_delay.unwrap_or(defaults.inter_cluster_delay),
            pi_delay: pi_delay.unwrap_or(defaults.pi_delay),
            po_delay: po_delay.unwrap_or(defaults.po_delay),
            node_delay: node_delay.unwrap_or(defaults.node_delay),
            use_lawler_labeling,
            use_delay_matrix,
            use_sparse,
            use_non_overlap,
            use_reverse_sweep,
            record_frontier,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ClusteringConfig(max_cluster_size={}, inter_cluster_delay={}, lawler={}, delay_mode={:?}, sweep={:?})",
            self.max_cluster_size,
            self.inter_cluster_delay,
            self.use_lawler_labeling,
            self.delay_mode(),
            self.sweep_policy()
        )
    }
}
