//! Dual-tree sparse matrix facade
//!
//! An [`AvlMatrix`] keeps two independently balanced structural trees: `main`
//! (row -> column -> value) and `transposed` (column -> row -> value). Every
//! point mutation is applied to both, so a cell `(i, j, v)` is reachable from
//! `main` exactly when `(j, i, v)` is reachable from `transposed`. Transposing
//! swaps the two roots and the dimensions without visiting a node.

use alloc::vec::Vec;
use core::mem;

use crate::tree::{ScalarTree, StructuralTree};
use crate::validation::{validate_axis, validate_dimensions, validate_index};
use crate::{MatrixError, MatrixOperations, Result, SparseMatrix, Triplets};

/// Sparse `f32` matrix stored as two mirrored AVL trees
#[derive(Debug, Clone, Default)]
pub struct AvlMatrix {
    main: StructuralTree,
    transposed: StructuralTree,
    nnz: usize,
    rows: usize,
    cols: usize,
}

/// Node counts of both trees of an [`AvlMatrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Footprint {
    /// Structural (row or column) nodes across both trees
    pub outer_nodes: usize,
    /// Scalar (value) nodes across both trees
    pub inner_nodes: usize,
}

impl Footprint {
    /// Size in bytes of one structural node
    pub const OUTER_NODE_BYTES: usize = mem::size_of::<crate::tree::avl::Node<ScalarTree>>();

    /// Size in bytes of one scalar node
    pub const INNER_NODE_BYTES: usize = mem::size_of::<crate::tree::avl::Node<f32>>();

    /// Bytes held by the matrix header and every node of both trees
    pub fn bytes(&self) -> usize {
        mem::size_of::<AvlMatrix>()
            + self.outer_nodes * Self::OUTER_NODE_BYTES
            + self.inner_nodes * Self::INNER_NODE_BYTES
    }
}

impl AvlMatrix {
    /// Create an empty `rows x cols` matrix
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            main: StructuralTree::new(),
            transposed: StructuralTree::new(),
            nnz: 0,
            rows,
            cols,
        }
    }

    /// Create an empty matrix from signed dimensions
    ///
    /// Negative dimensions fail with [`MatrixError::InvalidArgument`].
    pub fn try_new(rows: isize, cols: isize) -> Result<Self> {
        let (rows, cols) = validate_dimensions(rows, cols)?;
        Ok(Self::new(rows, cols))
    }

    /// Build a matrix by inserting every `(row, col, value)` in order
    ///
    /// Later entries for the same cell overwrite earlier ones.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, f32)],
    ) -> Result<Self> {
        let mut matrix = Self::new(rows, cols);
        for &(row, col, value) in entries {
            matrix.insert(value, row, col)?;
        }
        Ok(matrix)
    }

    /// Number of stored cells
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Matrix dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `true` when no cell is stored
    pub fn is_empty(&self) -> bool {
        self.nnz == 0
    }

    /// Value at `(row, col)`
    ///
    /// A missing row or a missing column within the row both read as `0.0`.
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        validate_index(row, col, self.rows, self.cols)?;
        Ok(self.main.cell(row, col).unwrap_or(0.0))
    }

    /// Insert or overwrite the value at `(row, col)` in both trees
    ///
    /// An explicit `0.0` is stored like any other value.
    pub fn insert(&mut self, value: f32, row: usize, col: usize) -> Result<()> {
        validate_index(row, col, self.rows, self.cols)?;

        let existed = self.main.insert_cell(row, col, value);
        if !existed {
            self.nnz += 1;
        }

        let mirrored = self.transposed.insert_cell(col, row, value);
        debug_assert_eq!(existed, mirrored);
        Ok(())
    }

    /// Remove the value at `(row, col)` from both trees
    ///
    /// Fails with [`MatrixError::NotFound`] when the cell is not stored, and
    /// with [`MatrixError::InvalidArgument`] when it is stored in `main` but
    /// missing from `transposed`.
    pub fn delete(&mut self, row: usize, col: usize) -> Result<()> {
        validate_index(row, col, self.rows, self.cols)?;

        self.main
            .remove_cell(row, col)
            .ok_or(MatrixError::NotFound)?;
        self.nnz -= 1;

        self.transposed
            .remove_cell(col, row)
            .ok_or(MatrixError::InvalidArgument)?;
        Ok(())
    }

    /// Swap the row-major and column-major trees along with the dimensions
    pub fn transpose(&mut self) {
        mem::swap(&mut self.main, &mut self.transposed);
        mem::swap(&mut self.rows, &mut self.cols);
    }

    /// Drop every stored cell, keeping the dimensions
    pub fn clear(&mut self) {
        self.main.clear();
        self.transposed.clear();
        self.nnz = 0;
    }

    /// Row-major `(row, col, value)` iterator over stored cells
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.main.cells()
    }

    /// Flatten the stored cells into parallel arrays, row-major
    pub fn flatten(&self) -> Triplets {
        let mut triplets = Triplets::with_capacity(self.nnz);
        for (row, col, value) in self.main.cells() {
            triplets.push(row, col, value);
        }
        triplets
    }

    /// Scalar tree of one row, if the row stores anything
    pub fn row_tree(&self, row: usize) -> Option<&ScalarTree> {
        self.main.get(row)
    }

    /// Scalar tree of one column, if the column stores anything
    pub fn col_tree(&self, col: usize) -> Option<&ScalarTree> {
        self.transposed.get(col)
    }

    /// Multiply every stored value by `factor` in both trees
    pub(crate) fn scale_values(&mut self, factor: f32) {
        self.main.scale(factor);
        self.transposed.scale(factor);
    }

    /// Node counts of both trees
    pub fn footprint(&self) -> Footprint {
        Footprint {
            outer_nodes: self.main.len() + self.transposed.len(),
            inner_nodes: self.main.leaf_count() + self.transposed.leaf_count(),
        }
    }

    /// Walk both trees and verify every structural invariant
    ///
    /// Checks AVL balance and heights in every tree, that no empty scalar
    /// tree is attached, that the stored count matches each tree, that every
    /// cell is inside the dimensions and that both trees mirror each other.
    pub fn check_invariants(&self) -> Result<()> {
        self.main.validate_nested()?;
        self.transposed.validate_nested()?;

        if self.main.leaf_count() != self.nnz || self.transposed.leaf_count() != self.nnz {
            return Err(MatrixError::InvalidArgument);
        }

        for (row, col, value) in self.main.cells() {
            if row >= self.rows || col >= self.cols {
                return Err(MatrixError::InvalidArgument);
            }
            match self.transposed.cell(col, row) {
                Some(mirrored) if mirrored.to_bits() == value.to_bits() => {}
                _ => return Err(MatrixError::InvalidArgument),
            }
        }
        Ok(())
    }
}

impl SparseMatrix for AvlMatrix {
    fn get(&self, row: usize, col: usize) -> Result<f32> {
        AvlMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        self.insert(value, row, col)
    }

    fn dimensions(&self) -> (usize, usize) {
        AvlMatrix::dimensions(self)
    }

    fn nnz(&self) -> usize {
        AvlMatrix::nnz(self)
    }

    fn transpose(&mut self) {
        AvlMatrix::transpose(self)
    }
}

impl MatrixOperations for AvlMatrix {
    fn get_row(&self, row_index: usize) -> Result<Vec<(usize, f32)>> {
        validate_axis(row_index, self.rows)?;
        Ok(self
            .row_tree(row_index)
            .map(|line| line.iter().map(|(col, value)| (col, *value)).collect())
            .unwrap_or_default())
    }

    fn get_col(&self, col_index: usize) -> Result<Vec<(usize, f32)>> {
        validate_axis(col_index, self.cols)?;
        Ok(self
            .col_tree(col_index)
            .map(|line| line.iter().map(|(row, value)| (row, *value)).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_insert_get_delete_scenario() {
        let mut matrix = AvlMatrix::new(3, 3);
        matrix.insert(2.0, 0, 0).unwrap();
        matrix.insert(3.0, 1, 2).unwrap();

        assert_eq!(matrix.get(0, 0), Ok(2.0));
        assert_eq!(matrix.get(2, 2), Ok(0.0));
        assert_eq!(matrix.nnz(), 2);

        assert_eq!(matrix.delete(1, 2), Ok(()));
        assert_eq!(matrix.get(1, 2), Ok(0.0));
        assert_eq!(matrix.delete(1, 2), Err(MatrixError::NotFound));
        assert_eq!(matrix.nnz(), 1);
        matrix.check_invariants().unwrap();
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = AvlMatrix::new(2, 4);
        assert_eq!(matrix.get(2, 0), Err(MatrixError::OutOfBounds));
        assert_eq!(matrix.get(0, 4), Err(MatrixError::OutOfBounds));
        assert_eq!(matrix.insert(1.0, 2, 0), Err(MatrixError::OutOfBounds));
        assert_eq!(matrix.delete(0, 9), Err(MatrixError::OutOfBounds));
        assert_eq!(matrix.nnz(), 0);

        let empty = AvlMatrix::new(0, 0);
        assert_eq!(empty.get(0, 0), Err(MatrixError::OutOfBounds));
    }

    #[test]
    fn test_try_new_rejects_negative_dimensions() {
        assert_eq!(
            AvlMatrix::try_new(-1, 3).map(|m| m.dimensions()),
            Err(MatrixError::InvalidArgument)
        );
        assert_eq!(AvlMatrix::try_new(2, 5).map(|m| m.dimensions()), Ok((2, 5)));
    }

    #[test]
    fn test_overwrite_keeps_count_and_mirror() {
        let mut matrix = AvlMatrix::new(4, 4);
        matrix.insert(1.0, 2, 3).unwrap();
        matrix.insert(7.5, 2, 3).unwrap();

        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.get(2, 3), Ok(7.5));
        assert_eq!(matrix.get_col(3), Ok(vec![(2, 7.5)]));
        matrix.check_invariants().unwrap();
    }

    #[test]
    fn test_explicit_zero_is_stored() {
        let mut matrix = AvlMatrix::new(2, 2);
        matrix.insert(0.0, 1, 1).unwrap();

        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.get(1, 1), Ok(0.0));
        assert_eq!(matrix.delete(1, 1), Ok(()));
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_insert_then_delete_restores_count() {
        let mut matrix = AvlMatrix::new(5, 5);
        matrix.insert(1.0, 0, 0).unwrap();
        let before = matrix.nnz();

        matrix.insert(4.0, 3, 1).unwrap();
        matrix.delete(3, 1).unwrap();

        assert_eq!(matrix.nnz(), before);
        assert_eq!(matrix.get(3, 1), Ok(0.0));
        assert!(matrix.row_tree(3).is_none());
        assert!(matrix.col_tree(1).is_none());
        matrix.check_invariants().unwrap();
    }

    #[test]
    fn test_transpose_scenario() {
        let mut matrix = AvlMatrix::new(3, 3);
        matrix.insert(5.0, 0, 1).unwrap();
        matrix.transpose();

        assert_eq!(matrix.get(1, 0), Ok(5.0));
        assert_eq!(matrix.get(0, 1), Ok(0.0));
        matrix.check_invariants().unwrap();
    }

    #[test]
    fn test_transpose_swaps_dimensions() {
        let mut matrix = AvlMatrix::from_triplets(2, 5, &[(1, 4, 2.0), (0, 0, 1.0)]).unwrap();
        matrix.transpose();

        assert_eq!(matrix.dimensions(), (5, 2));
        assert_eq!(matrix.get(4, 1), Ok(2.0));
        assert_eq!(matrix.get(1, 4), Err(MatrixError::OutOfBounds));

        // Inserting after transpose lands in the right place once transposed back
        matrix.insert(3.0, 3, 0).unwrap();
        matrix.transpose();
        assert_eq!(matrix.get(0, 3), Ok(3.0));
        matrix.check_invariants().unwrap();
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let entries = [(0, 0, 1.0), (1, 2, 2.0), (3, 1, -4.0)];
        let mut matrix = AvlMatrix::from_triplets(4, 3, &entries).unwrap();
        let before = matrix.flatten();

        matrix.transpose();
        matrix.transpose();

        assert_eq!(matrix.dimensions(), (4, 3));
        assert_eq!(matrix.flatten(), before);
        for row in 0..4 {
            for col in 0..3 {
                let expected = entries
                    .iter()
                    .find(|&&(i, j, _)| i == row && j == col)
                    .map_or(0.0, |&(_, _, v)| v);
                assert_eq!(matrix.get(row, col), Ok(expected));
            }
        }
    }

    #[test]
    fn test_row_and_col_traversal() {
        let matrix =
            AvlMatrix::from_triplets(3, 4, &[(1, 3, 1.0), (1, 0, 2.0), (2, 0, 3.0)]).unwrap();

        assert_eq!(matrix.get_row(1), Ok(vec![(0, 2.0), (3, 1.0)]));
        assert_eq!(matrix.get_row(0), Ok(vec![]));
        assert_eq!(matrix.get_col(0), Ok(vec![(1, 2.0), (2, 3.0)]));
        assert_eq!(matrix.get_row(3), Err(MatrixError::OutOfBounds));
        assert_eq!(matrix.get_col(4), Err(MatrixError::OutOfBounds));
    }

    #[test]
    fn test_flatten_is_row_major() {
        let matrix =
            AvlMatrix::from_triplets(3, 3, &[(2, 1, 1.0), (0, 2, 2.0), (0, 1, 3.0)]).unwrap();
        let flat = matrix.flatten();

        assert_eq!(flat.rows, [0, 0, 2]);
        assert_eq!(flat.cols, [1, 2, 1]);
        assert_eq!(flat.values, [3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_broken_mirror_is_reported() {
        let mut matrix = AvlMatrix::new(2, 2);
        matrix.insert(1.0, 0, 1).unwrap();
        matrix.transposed.remove_cell(1, 0);

        assert_eq!(matrix.check_invariants(), Err(MatrixError::InvalidArgument));
        assert_eq!(matrix.delete(0, 1), Err(MatrixError::InvalidArgument));
    }

    #[test]
    fn test_footprint_counts_both_trees() {
        let matrix =
            AvlMatrix::from_triplets(4, 4, &[(0, 0, 1.0), (0, 1, 1.0), (2, 1, 1.0)]).unwrap();
        let footprint = matrix.footprint();

        // Rows {0, 2} plus columns {0, 1}
        assert_eq!(footprint.outer_nodes, 4);
        assert_eq!(footprint.inner_nodes, 6);
        assert!(footprint.bytes() > mem::size_of::<AvlMatrix>());
    }

    #[test]
    fn test_randomized_against_model() {
        let mut rng = StdRng::seed_from_u64(42);
        let (rows, cols) = (40, 25);
        let mut matrix = AvlMatrix::new(rows, cols);
        let mut model = BTreeMap::new();

        for step in 0..4_000 {
            let (i, j) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            match rng.gen_range(0..3) {
                0 => {
                    let expected = model.remove(&(i, j)).map(|_| ()).ok_or(MatrixError::NotFound);
                    assert_eq!(matrix.delete(i, j), expected);
                }
                1 if step % 50 == 0 => {
                    matrix.transpose();
                    matrix.transpose();
                }
                _ => {
                    let value = rng.gen_range(-10.0f32..10.0);
                    matrix.insert(value, i, j).unwrap();
                    model.insert((i, j), value);
                }
            }
            assert_eq!(matrix.nnz(), model.len());
        }

        matrix.check_invariants().unwrap();
        assert!(matrix
            .iter()
            .eq(model.iter().map(|(&(i, j), &v)| (i, j, v))));
        for i in 0..rows {
            for j in 0..cols {
                let expected = model.get(&(i, j)).copied().unwrap_or(0.0);
                assert_eq!(matrix.get(i, j), Ok(expected));
            }
        }
    }
}
