//! Flattened coordinate/value sequences
//!
//! The bulk arithmetic layer walks a matrix once into parallel arrays and
//! then replays them through the point-mutation primitives.

use alloc::vec::Vec;

/// Parallel row/column/value arrays of the stored cells of a matrix
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triplets {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<f32>,
}

impl Triplets {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: usize, col: usize, value: f32) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(row, col, value)` in stored order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&row, &col), &value)| (row, col, value))
    }
}

impl FromIterator<(usize, usize, f32)> for Triplets {
    fn from_iter<I: IntoIterator<Item = (usize, usize, f32)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut triplets = Self::with_capacity(iter.size_hint().0);
        for (row, col, value) in iter {
            triplets.push(row, col, value);
        }
        triplets
    }
}
