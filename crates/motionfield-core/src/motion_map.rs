//! Coarse binary label grid marking cells that hold a moving agent.

use serde::{Deserialize, Serialize};

/// A `rows × cols` grid of `0`/`1` cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionMap {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl MotionMap {
    /// An all-zero grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Set a cell to 1. Marking twice is the same as marking once.
    ///
    /// Out-of-range cells are ignored.
    pub fn mark(&mut self, row: usize, col: usize) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = 1;
        }
    }

    /// Number of cells set to 1.
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.marked_count() == 0
    }

    /// Row-major cell values.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_is_idempotent_and_row_major() {
        let mut map = MotionMap::zeros(2, 3);
        map.mark(1, 2);
        map.mark(1, 2);
        assert_eq!(map.marked_count(), 1);
        assert_eq!(map.as_slice(), &[0, 0, 0, 0, 0, 1]);
        assert_eq!(map.get(1, 2), Some(1));
        assert_eq!(map.get(2, 0), None);
    }

    #[test]
    fn out_of_range_mark_is_ignored() {
        let mut map = MotionMap::zeros(2, 2);
        map.mark(2, 0);
        map.mark(0, 5);
        assert!(map.is_empty());
    }
}
