//! Restricted-insertion sparse delay table.
//!
//! Each row keeps a single contiguous run of columns starting at the first
//! nonzero entry. Rows only grow to the right, so columns must be written in
//! non-decreasing order per row (which is how [`super::populate_delay_store`]
//! fills it). Memory is proportional to the spans actually produced by the
//! circuit rather than N².

use crate::graph::NodeId;

use super::{DelayStore, DelayStoreError};

#[derive(Clone, Debug, Default)]
struct Run {
    offset: usize,
    values: Vec<u32>,
}

impl Run {
    fn end(&self) -> usize {
        self.offset + self.values.len()
    }
}

#[derive(Clone, Debug)]
pub struct SparseDelayMatrix {
    size: usize,
    rows: Vec<Run>,
}

impl SparseDelayMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            rows: vec![Run::default(); size],
        }
    }

    /// Number of stored cells across all rows.
    pub fn stored_cells(&self) -> usize {
        self.rows.iter().map(|run| run.values.len()).sum()
    }
}

impl DelayStore for SparseDelayMatrix {
    #[inline]
    fn get(&self, row: NodeId, column: NodeId) -> u32 {
        let Some(run) = self.rows.get(row as usize) else {
            return 0;
        };
        let column = column as usize;
        if column < run.offset {
            return 0;
        }
        run.values.get(column - run.offset).copied().unwrap_or(0)
    }

    fn set(&mut self, row: NodeId, column: NodeId, value: u32) -> Result<(), DelayStoreError> {
        let (r, c) = (row as usize, column as usize);
        if r >= self.size || c >= self.size {
            return Err(DelayStoreError::OutOfBounds {
                row,
                column,
                size: self.size,
            });
        }
        let run = &mut self.rows[r];
        if run.values.is_empty() {
            // Leading zeros are never stored.
            if value != 0 {
                run.offset = c;
                run.values.push(value);
            }
            return Ok(());
        }
        if c < run.end() {
            return Err(DelayStoreError::OutOfOrderInsert {
                row,
                column,
                next_free: run.end() as NodeId,
            });
        }
        run.values.resize(c - run.offset, 0);
        run.values.push(value);
        Ok(())
    }
}
