//! Dense N×N delay table.

use crate::graph::NodeId;

use super::{DelayStore, DelayStoreError};

/// Full square table, O(N²) memory, any insertion order.
#[derive(Clone, Debug)]
pub struct DenseDelayMatrix {
    size: usize,
    data: Vec<u32>,
}

impl DenseDelayMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl DelayStore for DenseDelayMatrix {
    #[inline]
    fn get(&self, row: NodeId, column: NodeId) -> u32 {
        let (r, c) = (row as usize, column as usize);
        if r >= self.size || c >= self.size {
            return 0;
        }
        self.data[r * self.size + c]
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
        self.data[r * self.size + c] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_order_insertion() {
        let mut m = DenseDelayMatrix::new(4);
        m.set(1, 3, 7).unwrap();
        m.set(1, 0, 2).unwrap();
        m.set(1, 3, 9).unwrap();

        assert_eq!(m.get(1, 3), 9);
        assert_eq!(m.get(1, 0), 2);
        assert_eq!(m.get(2, 2), 0);
        assert_eq!(m.size(), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut m = DenseDelayMatrix::new(2);
        assert_eq!(m.get(5, 0), 0);
        assert_eq!(
            m.set(0, 2, 1),
            Err(DelayStoreError::OutOfBounds {
                row: 0,
                column: 2,
                size: 2
            })
        );
    }
}
