//! Hash-table sparse matrix used as a comparison baseline
//!
//! Cells live in a single `(row, col) -> value` map. Transposition is a flag
//! that swaps coordinates on every access instead of maintaining a mirror, so
//! row- and column-wise traversal always means scanning the whole table.

use avlmat_core::validation::validate_index;
use avlmat_core::{MatrixError, Result, SparseMatrix};
use hashbrown::HashMap;

/// Capacity policy for [`HashMatrix`]
#[derive(Debug, Clone, PartialEq)]
pub struct HashConfig {
    /// Logical capacity of a fresh matrix, and the floor for shrinking
    pub initial_capacity: usize,
    /// Grow (double) when `(count + 1) / capacity` exceeds this
    pub load_factor_upper: f32,
    /// Shrink (halve) when `count / capacity` drops below this
    pub load_factor_lower: f32,
}

impl HashConfig {
    /// Set the initial capacity
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity.max(1);
        self
    }

    /// Set both load factor thresholds
    ///
    /// `lower` is clamped to `[0, upper / 3]`, so a single insert and remove
    /// never resize back and forth.
    pub fn with_load_factors(mut self, lower: f32, upper: f32) -> Self {
        self.load_factor_lower = lower.clamp(0.0, (upper / 3.0).max(0.0));
        self.load_factor_upper = upper;
        self
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            load_factor_upper: 0.75,
            load_factor_lower: 0.25,
        }
    }
}

/// Sparse matrix backed by a hash map keyed on `(row, col)`
#[derive(Debug, Clone)]
pub struct HashMatrix {
    cells: HashMap<(usize, usize), f32>,
    capacity: usize,
    rows: usize,
    cols: usize,
    is_transposed: bool,
    config: HashConfig,
}

impl HashMatrix {
    /// Create an empty `rows x cols` matrix with the default capacity policy
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, HashConfig::default())
    }

    /// Create an empty matrix with a custom capacity policy
    pub fn with_config(rows: usize, cols: usize, config: HashConfig) -> Self {
        let capacity = config.initial_capacity.max(1);
        Self {
            cells: HashMap::with_capacity(capacity),
            capacity,
            rows,
            cols,
            is_transposed: false,
            config,
        }
    }

    /// Dimensions as seen through the transposition flag
    pub fn dimensions(&self) -> (usize, usize) {
        if self.is_transposed {
            (self.cols, self.rows)
        } else {
            (self.rows, self.cols)
        }
    }

    pub fn nnz(&self) -> usize {
        self.cells.len()
    }

    /// Logical bucket capacity driven by the load factors
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_transposed(&self) -> bool {
        self.is_transposed
    }

    fn storage_key(&self, row: usize, col: usize) -> (usize, usize) {
        if self.is_transposed {
            (col, row)
        } else {
            (row, col)
        }
    }

    fn logical_coords(&self, key: (usize, usize)) -> (usize, usize) {
        if self.is_transposed {
            (key.1, key.0)
        } else {
            key
        }
    }

    /// Value at `(row, col)`, `0.0` when absent
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        let (rows, cols) = self.dimensions();
        validate_index(row, col, rows, cols)?;
        Ok(self
            .cells
            .get(&self.storage_key(row, col))
            .copied()
            .unwrap_or(0.0))
    }

    /// Store `value` at `(row, col)`; storing `0.0` removes the cell
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        let (rows, cols) = self.dimensions();
        validate_index(row, col, rows, cols)?;
        let key = self.storage_key(row, col);

        if value == 0.0 {
            if self.cells.remove(&key).is_some() {
                self.maybe_shrink();
            }
            return Ok(());
        }

        if !self.cells.contains_key(&key) {
            self.maybe_grow();
        }
        self.cells.insert(key, value);
        Ok(())
    }

    fn maybe_grow(&mut self) {
        let load = (self.cells.len() + 1) as f32 / self.capacity as f32;
        if load > self.config.load_factor_upper {
            self.resize(self.capacity * 2);
        }
    }

    fn maybe_shrink(&mut self) {
        let load = self.cells.len() as f32 / self.capacity as f32;
        if load < self.config.load_factor_lower && self.capacity > self.config.initial_capacity {
            self.resize((self.capacity / 2).max(self.config.initial_capacity));
        }
    }

    fn resize(&mut self, new_capacity: usize) {
        tracing::debug!(
            from = self.capacity,
            to = new_capacity,
            count = self.cells.len(),
            "Resizing hash matrix"
        );
        if new_capacity > self.capacity {
            self.cells.reserve(new_capacity - self.cells.len());
        } else {
            self.cells.shrink_to(new_capacity);
        }
        self.capacity = new_capacity;
    }

    /// Flip the transposition flag
    pub fn transpose(&mut self) {
        self.is_transposed = !self.is_transposed;
    }

    /// Stored cells as logical `(row, col, value)`, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.cells.iter().map(move |(&key, &value)| {
            let (row, col) = self.logical_coords(key);
            (row, col, value)
        })
    }

    /// Check that `out` is empty and has the expected dimensions
    fn verify_output(out: &HashMatrix, rows: usize, cols: usize) -> Result<()> {
        if out.dimensions() != (rows, cols) || out.nnz() != 0 {
            return Err(MatrixError::InvalidArgument);
        }
        Ok(())
    }

    /// `out := factor * self`; `out` must be empty and the same shape
    pub fn scalar_mul_into(&self, out: &mut HashMatrix, factor: f32) -> Result<()> {
        let (rows, cols) = self.dimensions();
        Self::verify_output(out, rows, cols)?;

        for (row, col, value) in self.entries() {
            out.set(row, col, value * factor)?;
        }
        Ok(())
    }

    /// `out := self + rhs`; `out` must be empty and the same shape
    pub fn sum_into(&self, rhs: &HashMatrix, out: &mut HashMatrix) -> Result<()> {
        if self.dimensions() != rhs.dimensions() {
            return Err(MatrixError::DimensionMismatch);
        }
        let (rows, cols) = self.dimensions();
        Self::verify_output(out, rows, cols)?;

        for (row, col, value) in self.entries().chain(rhs.entries()) {
            let current = out.get(row, col)?;
            out.set(row, col, current + value)?;
        }
        Ok(())
    }

    /// `out := self * rhs`; `out` must be empty and `self.rows x rhs.cols`
    ///
    /// Every stored cell of `self` is paired with every stored cell of `rhs`.
    pub fn mul_into(&self, rhs: &HashMatrix, out: &mut HashMatrix) -> Result<()> {
        let (lhs_rows, lhs_cols) = self.dimensions();
        let (rhs_rows, rhs_cols) = rhs.dimensions();
        if lhs_cols != rhs_rows {
            return Err(MatrixError::DimensionMismatch);
        }
        Self::verify_output(out, lhs_rows, rhs_cols)?;

        for (row, shared, lhs_value) in self.entries() {
            for (rhs_row, col, rhs_value) in rhs.entries() {
                if shared == rhs_row {
                    let current = out.get(row, col)?;
                    out.set(row, col, current + lhs_value * rhs_value)?;
                }
            }
        }
        Ok(())
    }
}

impl SparseMatrix for HashMatrix {
    fn get(&self, row: usize, col: usize) -> Result<f32> {
        HashMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        HashMatrix::set(self, row, col, value)
    }

    fn dimensions(&self) -> (usize, usize) {
        HashMatrix::dimensions(self)
    }

    fn nnz(&self) -> usize {
        HashMatrix::nnz(self)
    }

    fn transpose(&mut self) {
        HashMatrix::transpose(self)
    }
}
