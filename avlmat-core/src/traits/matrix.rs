//! Core matrix abstraction traits
//!
//! These traits are the contract the benchmark harness programs against, so
//! the AVL engine and the hash and dense baselines can be driven by the same
//! code.

use alloc::vec::Vec;

use crate::Result;

/// Core sparse matrix trait for format-agnostic access
///
/// Absent cells read as `0.0`. Every index is validated against the current
/// dimensions, which swap on transpose.
pub trait SparseMatrix {
    /// Get the value at the specified position
    fn get(&self, row: usize, col: usize) -> Result<f32>;

    /// Store `value` at the specified position
    fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of non-zero elements stored
    fn nnz(&self) -> usize;

    /// Transpose the matrix in place
    fn transpose(&mut self);

    fn rows(&self) -> usize {
        self.dimensions().0
    }

    fn cols(&self) -> usize {
        self.dimensions().1
    }
}

/// Extension trait for row/column operations
pub trait MatrixOperations: SparseMatrix {
    /// Get all stored elements in a row
    ///
    /// Returns `(col, value)` pairs in column order.
    fn get_row(&self, row_index: usize) -> Result<Vec<(usize, f32)>>;

    /// Get all stored elements in a column
    ///
    /// Returns `(row, value)` pairs in row order.
    fn get_col(&self, col_index: usize) -> Result<Vec<(usize, f32)>>;
}
