//! Row-major dense matrix used as a comparison baseline

use avlmat_core::validation::{validate_index, validate_product_shape, validate_same_shape};
use avlmat_core::{Result, SparseMatrix};

/// Dense `rows x cols` matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    /// Create a zero-filled matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Raw row-major storage
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        validate_index(row, col, self.rows, self.cols)?;
        Ok(self.data[self.offset(row, col)])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        validate_index(row, col, self.rows, self.cols)?;
        let offset = self.offset(row, col);
        self.data[offset] = value;
        Ok(())
    }

    /// Number of cells holding a non-zero value
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|value| **value != 0.0).count()
    }

    /// `out := self^T`; `out` must be `cols x rows`
    pub fn transpose_into(&self, out: &mut DenseMatrix) -> Result<()> {
        validate_same_shape(&[(self.cols, self.rows), out.dimensions()])?;

        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Ok(())
    }

    /// `out := factor * self`
    pub fn scalar_mul_into(&self, out: &mut DenseMatrix, factor: f32) -> Result<()> {
        validate_same_shape(&[self.dimensions(), out.dimensions()])?;

        for (dst, src) in out.data.iter_mut().zip(&self.data) {
            *dst = src * factor;
        }
        Ok(())
    }

    /// `out := self + rhs`
    pub fn sum_into(&self, rhs: &DenseMatrix, out: &mut DenseMatrix) -> Result<()> {
        validate_same_shape(&[self.dimensions(), rhs.dimensions(), out.dimensions()])?;

        for ((dst, a), b) in out.data.iter_mut().zip(&self.data).zip(&rhs.data) {
            *dst = a + b;
        }
        Ok(())
    }

    /// `out := self * rhs`
    pub fn mul_into(&self, rhs: &DenseMatrix, out: &mut DenseMatrix) -> Result<()> {
        validate_product_shape(self.dimensions(), rhs.dimensions(), out.dimensions())?;

        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut acc = 0.0f32;
                for p in 0..self.cols {
                    acc += self.data[i * self.cols + p] * rhs.data[p * rhs.cols + j];
                }
                out.data[i * rhs.cols + j] = acc;
            }
        }
        Ok(())
    }
}

impl SparseMatrix for DenseMatrix {
    fn get(&self, row: usize, col: usize) -> Result<f32> {
        DenseMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        DenseMatrix::set(self, row, col, value)
    }

    fn dimensions(&self) -> (usize, usize) {
        DenseMatrix::dimensions(self)
    }

    fn nnz(&self) -> usize {
        DenseMatrix::nnz(self)
    }

    fn transpose(&mut self) {
        let mut out = DenseMatrix::new(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        *self = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avlmat_core::MatrixError;

    fn filled(rows: usize, cols: usize, values: &[f32]) -> DenseMatrix {
        let mut matrix = DenseMatrix::new(rows, cols);
        for (idx, value) in values.iter().enumerate() {
            matrix.set(idx / cols, idx % cols, *value).unwrap();
        }
        matrix
    }

    #[test]
    fn test_get_set() {
        let mut matrix = DenseMatrix::new(2, 3);
        matrix.set(1, 2, 4.0).unwrap();
        assert_eq!(matrix.get(1, 2), Ok(4.0));
        assert_eq!(matrix.get(0, 0), Ok(0.0));
        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.get(2, 0), Err(MatrixError::OutOfBounds));
    }

    #[test]
    fn test_transpose() {
        let matrix = filled(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut out = DenseMatrix::new(3, 2);
        matrix.transpose_into(&mut out).unwrap();
        assert_eq!(out.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let mut wrong = DenseMatrix::new(2, 3);
        assert_eq!(matrix.transpose_into(&mut wrong), Err(MatrixError::DimensionMismatch));

        let mut in_place = matrix.clone();
        SparseMatrix::transpose(&mut in_place);
        assert_eq!(in_place, out);
    }

    #[test]
    fn test_arithmetic() {
        let a = filled(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = filled(2, 2, &[0.0, 1.0, 1.0, 0.0]);

        let mut out = DenseMatrix::new(2, 2);
        a.scalar_mul_into(&mut out, 0.5).unwrap();
        assert_eq!(out.as_slice(), &[0.5, 1.0, 1.5, 2.0]);

        a.sum_into(&b, &mut out).unwrap();
        assert_eq!(out.as_slice(), &[1.0, 3.0, 4.0, 4.0]);

        a.mul_into(&b, &mut out).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn test_mul_dimension_mismatch() {
        let a = DenseMatrix::new(2, 3);
        let b = DenseMatrix::new(2, 3);
        let mut out = DenseMatrix::new(2, 3);
        assert_eq!(a.mul_into(&b, &mut out), Err(MatrixError::DimensionMismatch));
    }
}
