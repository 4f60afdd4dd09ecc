//! Structural index tree: rows (or columns) that hold at least one value
//!
//! Each node owns one [`ScalarTree`]. A structural node is only ever kept
//! while its scalar tree is non-empty; callers remove the node as soon as the
//! last value under it is deleted.

use super::avl::AvlTree;
use super::scalar::ScalarTree;
use crate::MatrixError;

/// Balanced map from an outer index to the scalar tree of that line
pub type StructuralTree = AvlTree<ScalarTree>;

impl AvlTree<ScalarTree> {
    /// Attach `subtree` under `key`, replacing (and dropping) any previous one
    pub fn attach(&mut self, key: usize, subtree: ScalarTree) {
        self.insert(key, subtree);
    }

    /// Stored value at `(outer, inner)`
    pub fn cell(&self, outer: usize, inner: usize) -> Option<f32> {
        self.get(outer)?.find(inner)
    }

    /// Insert or replace the value at `(outer, inner)`
    ///
    /// Creates the line's scalar tree when `outer` has no node yet. Returns
    /// `true` when the cell already existed.
    pub fn insert_cell(&mut self, outer: usize, inner: usize, value: f32) -> bool {
        if let Some(line) = self.get_mut(outer) {
            return line.insert_value(inner, value);
        }

        let mut line = ScalarTree::new();
        line.insert_value(inner, value);
        self.attach(outer, line);
        false
    }

    /// Remove the value at `(outer, inner)`
    ///
    /// Detaches the structural node when its scalar tree becomes empty.
    /// Returns the removed value.
    pub fn remove_cell(&mut self, outer: usize, inner: usize) -> Option<f32> {
        let line = self.get_mut(outer)?;
        let removed = line.remove(inner)?;
        if line.is_empty() {
            self.remove(outer);
        }
        Some(removed)
    }

    /// Total number of values stored across every scalar tree
    pub fn leaf_count(&self) -> usize {
        self.iter().map(|(_, line)| line.len()).sum()
    }

    /// Multiply every stored value by `factor`
    pub fn scale(&mut self, factor: f32) {
        self.for_each_value_mut(|line| line.scale(factor));
    }

    /// Row-major `(outer, inner, value)` iterator
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.iter().flat_map(|(outer, line)| {
            line.iter().map(move |(inner, value)| (outer, inner, *value))
        })
    }

    /// Validate this tree and every scalar tree it owns
    ///
    /// Empty scalar trees are rejected: they may exist only transiently
    /// inside a single mutation.
    pub fn validate_nested(&self) -> Result<(), MatrixError> {
        self.validate()?;
        for (_, line) in self.iter() {
            if line.is_empty() {
                return Err(MatrixError::InvalidArgument);
            }
            line.validate()?;
        }
        Ok(())
    }
}
