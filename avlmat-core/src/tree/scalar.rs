//! Scalar index tree: one row (or column) of stored values
//!
//! Keyed by the column index within a row, or the row index within a
//! column. Each key maps to a single `f32`.

use super::avl::AvlTree;

/// Balanced map from an index to a stored value
pub type ScalarTree = AvlTree<f32>;

impl AvlTree<f32> {
    /// Stored value under `key`, if any
    pub fn find(&self, key: usize) -> Option<f32> {
        self.get(key).copied()
    }

    /// Insert or replace the value under `key`
    ///
    /// Returns `true` when the key already existed.
    pub fn insert_value(&mut self, key: usize, value: f32) -> bool {
        self.insert(key, value).is_some()
    }

    /// Multiply every stored value by `factor`
    pub fn scale(&mut self, factor: f32) {
        self.for_each_value_mut(|value| *value *= factor);
    }
}
