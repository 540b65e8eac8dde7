//! Pairwise longest-path delays.
//!
//! A [`DelayStore`] holds `delay(row, col)`, the maximum path delay from node
//! `row` to node `col` (sum of node delays after `row`, up to and including
//! `col`). Two stores exist: a dense N×N table and a sparse table that only
//! accepts in-order column insertion per row. Without a store, the
//! [`LongestPathOracle`] answers each query on demand.

mod dense;
mod oracle;
mod sparse;

use thiserror::Error;

use crate::graph::{NodeId, OrderedGraph};

pub use dense::DenseDelayMatrix;
pub use oracle::LongestPathOracle;
pub use sparse::SparseDelayMatrix;

/// Errors reported by delay stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelayStoreError {
    #[error("Column {column} inserted out of order in row {row} (next free column is {next_free})")]
    OutOfOrderInsert {
        row: NodeId,
        column: NodeId,
        next_free: NodeId,
    },
    #[error("Entry ({row}, {column}) is outside a {size}x{size} store")]
    OutOfBounds {
        row: NodeId,
        column: NodeId,
        size: usize,
    },
}

/// How pairwise delays are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayMode {
    Dense,
    Sparse,
    OnDemand,
}

/// Storage for max path delays between node pairs. Unset pairs read as 0.
pub trait DelayStore {
    fn get(&self, row: NodeId, column: NodeId) -> u32;
    fn set(&mut self, row: NodeId, column: NodeId, value: u32) -> Result<(), DelayStoreError>;
}

/// Allocate an empty store for `n` nodes, or `None` for [`DelayMode::OnDemand`].
pub fn new_delay_store(mode: DelayMode, n: usize) -> Option<Box<dyn DelayStore>> {
    match mode {
        DelayMode::Dense => Some(Box::new(DenseDelayMatrix::new(n))),
        DelayMode::Sparse => Some(Box::new(SparseDelayMatrix::new(n))),
        DelayMode::OnDemand => None,
    }
}

/// Fill `store` with the max delay between every ordered pair of nodes.
///
/// Forward dynamic program over topological ids: for `c > r`,
/// `delay(r, c) = c.delay + max(delay(r, p) for p in c.prev)` when that max is
/// nonzero, `c.delay` when `r` directly drives `c`, and 0 otherwise. Columns
/// are visited in increasing order within each row.
pub fn populate_delay_store(
    graph: &OrderedGraph,
    store: &mut dyn DelayStore,
) -> Result<(), DelayStoreError> {
    let n = graph.len() as NodeId;
    for r in 0..n {
        for c in (r + 1)..n {
            let node = graph.node(c);
            let max = node.prev.iter().map(|&p| store.get(r, p)).max().unwrap_or(0);
            if max > 0 {
                store.set(r, c, node.delay + max)?;
            } else if node.prev.contains(&r) {
                store.set(r, c, node.delay)?;
            }
        }
    }
    Ok(())
}

/// Pairwise delays from either a populated store or the on-demand oracle.
pub enum PathDelays<'g> {
    Stored(Box<dyn DelayStore>),
    OnDemand(LongestPathOracle<'g>),
}

impl<'g> PathDelays<'g> {
    /// Build the delay source for `mode`, populating a store if one is used.
    pub fn build(graph: &'g OrderedGraph, mode: DelayMode) -> Result<Self, DelayStoreError> {
        match new_delay_store(mode, graph.len()) {
            Some(mut store) => {
                populate_delay_store(graph, store.as_mut())?;
                Ok(PathDelays::Stored(store))
            }
            None => Ok(PathDelays::OnDemand(LongestPathOracle::new(graph))),
        }
    }

    #[inline]
    pub fn delay(&self, from: NodeId, to: NodeId) -> u32 {
        match self {
            PathDelays::Stored(store) => store.get(from, to),
            PathDelays::OnDemand(oracle) => oracle.max_delay(from, to),
        }
    }
}
