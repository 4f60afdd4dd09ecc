//! Handle-addressed matrix storage
//!
//! Callers that hold matrices by identifier rather than by reference (foreign
//! bindings, scripting layers) go through a [`MatrixArena`]. Here a
//! stale or unknown [`MatrixId`] is the "null matrix", and an operation's
//! output may name the same matrix as one of its inputs, which the borrow
//! based API in [`crate::arithmetic`] rules out statically.

use alloc::vec::Vec;
use core::mem;

use crate::{arithmetic, AvlMatrix, MatrixError, Result};

/// Identifier of a matrix inside a [`MatrixArena`]
///
/// Freeing a matrix bumps its slot generation, so an old id fails with
/// [`MatrixError::NullMatrix`] once the slot is reused. The generation wraps
/// after 2^32 frees of the same slot, at which point an id can come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatrixId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    matrix: Option<AvlMatrix>,
}

/// Owner of a set of independent matrices
#[derive(Debug, Default)]
pub struct MatrixArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl MatrixArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live matrices
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Create an empty `rows x cols` matrix
    ///
    /// Negative dimensions fail with [`MatrixError::InvalidArgument`].
    pub fn create(&mut self, rows: isize, cols: isize) -> Result<MatrixId> {
        let matrix = AvlMatrix::try_new(rows, cols)?;
        self.adopt(matrix)
    }

    /// Move an existing matrix into the arena
    ///
    /// Fails with [`MatrixError::InvalidArgument`] once `u32::MAX` slots exist.
    pub fn adopt(&mut self, matrix: AvlMatrix) -> Result<MatrixId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.matrix = Some(matrix);
            self.live += 1;
            return Ok(MatrixId {
                index,
                generation: slot.generation,
            });
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| MatrixError::InvalidArgument)?;
        self.slots.push(Slot {
            generation: 0,
            matrix: Some(matrix),
        });
        self.live += 1;
        Ok(MatrixId {
            index,
            generation: 0,
        })
    }

    /// Release a matrix and both of its trees
    pub fn free(&mut self, id: MatrixId) -> Result<AvlMatrix> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or(MatrixError::NullMatrix)?;
        let matrix = slot.matrix.take().ok_or(MatrixError::NullMatrix)?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Ok(matrix)
    }

    pub fn contains(&self, id: MatrixId) -> bool {
        self.matrix(id).is_ok()
    }

    /// Borrow a live matrix
    pub fn matrix(&self, id: MatrixId) -> Result<&AvlMatrix> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.matrix.as_ref())
            .ok_or(MatrixError::NullMatrix)
    }

    /// Mutably borrow a live matrix
    pub fn matrix_mut(&mut self, id: MatrixId) -> Result<&mut AvlMatrix> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.matrix.as_mut())
            .ok_or(MatrixError::NullMatrix)
    }

    /// Number of stored cells of a live matrix
    pub fn nnz(&self, id: MatrixId) -> Result<usize> {
        Ok(self.matrix(id)?.nnz())
    }

    pub fn dimensions(&self, id: MatrixId) -> Result<(usize, usize)> {
        Ok(self.matrix(id)?.dimensions())
    }

    pub fn get(&self, id: MatrixId, row: usize, col: usize) -> Result<f32> {
        self.matrix(id)?.get(row, col)
    }

    pub fn insert(&mut self, id: MatrixId, value: f32, row: usize, col: usize) -> Result<()> {
        self.matrix_mut(id)?.insert(value, row, col)
    }

    pub fn delete(&mut self, id: MatrixId, row: usize, col: usize) -> Result<()> {
        self.matrix_mut(id)?.delete(row, col)
    }

    pub fn transpose(&mut self, id: MatrixId) -> Result<()> {
        self.matrix_mut(id)?.transpose();
        Ok(())
    }

    /// `dest := factor * source`; `dest` may be `source`
    pub fn scalar_mul(&mut self, source: MatrixId, dest: MatrixId, factor: f32) -> Result<()> {
        self.matrix(source)?;
        if source == dest {
            arithmetic::scale_in_place(self.matrix_mut(dest)?, factor);
            return Ok(());
        }
        self.with_output(dest, |arena, out| {
            arithmetic::scalar_mul(arena.matrix(source)?, out, factor)
        })
    }

    /// `out := lhs + rhs`; `out` may be either operand
    pub fn sum(&mut self, lhs: MatrixId, rhs: MatrixId, out: MatrixId) -> Result<()> {
        let shapes = [
            self.matrix(lhs)?.dimensions(),
            self.matrix(rhs)?.dimensions(),
            self.matrix(out)?.dimensions(),
        ];
        crate::validation::validate_same_shape(&shapes)?;

        match (out == lhs, out == rhs) {
            (true, true) => {
                let other = self.matrix(lhs)?.clone();
                arithmetic::sum_assign(self.matrix_mut(out)?, &other)
            }
            (false, true) => self.with_output(out, |arena, acc| {
                arithmetic::sum_assign(acc, arena.matrix(lhs)?)
            }),
            (true, false) => self.with_output(out, |arena, acc| {
                arithmetic::sum_assign(acc, arena.matrix(rhs)?)
            }),
            (false, false) => self.with_output(out, |arena, acc| {
                arithmetic::sum(arena.matrix(lhs)?, arena.matrix(rhs)?, acc)
            }),
        }
    }

    /// `out := lhs * rhs`
    ///
    /// An `out` that aliases either operand fails with
    /// [`MatrixError::NotImplemented`].
    pub fn matrix_mul(&mut self, lhs: MatrixId, rhs: MatrixId, out: MatrixId) -> Result<()> {
        self.matrix(lhs)?;
        self.matrix(rhs)?;
        self.matrix(out)?;
        if out == lhs || out == rhs {
            return Err(MatrixError::NotImplemented);
        }
        self.with_output(out, |arena, product| {
            arithmetic::matrix_mul(arena.matrix(lhs)?, arena.matrix(rhs)?, product)
        })
    }

    /// Run `f` with `out` detached from its slot so the arena can still be
    /// borrowed for the inputs
    fn with_output<F>(&mut self, out: MatrixId, f: F) -> Result<()>
    where
        F: FnOnce(&Self, &mut AvlMatrix) -> Result<()>,
    {
        let mut output = mem::take(self.matrix_mut(out)?);
        let result = f(self, &mut output);
        if let Ok(slot) = self.matrix_mut(out) {
            *slot = output;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(
        arena: &mut MatrixArena,
        rows: isize,
        cols: isize,
        cells: &[(usize, usize, f32)],
    ) -> MatrixId {
        let id = arena.create(rows, cols).unwrap();
        for &(i, j, v) in cells {
            arena.insert(id, v, i, j).unwrap();
        }
        id
    }

    #[test]
    fn test_create_and_free() {
        let mut arena = MatrixArena::new();
        assert_eq!(arena.create(-1, 2), Err(MatrixError::InvalidArgument));

        let id = arena.create(3, 3).unwrap();
        assert_eq!(arena.len(), 1);
        arena.insert(id, 2.0, 0, 0).unwrap();
        assert_eq!(arena.get(id, 0, 0), Ok(2.0));
        assert_eq!(arena.nnz(id), Ok(1));
        arena.transpose(id).unwrap();
        assert_eq!(arena.dimensions(id), Ok((3, 3)));

        let freed = arena.free(id).unwrap();
        assert_eq!(freed.nnz(), 1);
        assert!(arena.is_empty());
        assert_eq!(arena.get(id, 0, 0), Err(MatrixError::NullMatrix));
        assert_eq!(arena.transpose(id), Err(MatrixError::NullMatrix));
        assert_eq!(arena.free(id).map(|_| ()), Err(MatrixError::NullMatrix));

        // The slot is reused under a fresh identifier
        let reused = arena.create(1, 1).unwrap();
        assert_ne!(reused, id);
        assert!(arena.contains(reused));
        assert!(!arena.contains(id));
    }

    #[test]
    fn test_freed_slot_reused_with_next_generation() {
        let mut arena = MatrixArena::new();
        let first = arena.adopt(AvlMatrix::new(2, 2)).unwrap();
        let other = arena.create(1, 1).unwrap();
        assert_eq!((first.index, first.generation), (0, 0));
        assert_eq!((other.index, other.generation), (1, 0));

        arena.free(first).unwrap();
        let second = arena.create(2, 2).unwrap();
        assert_eq!((second.index, second.generation), (0, 1));
        arena.free(second).unwrap();
        let third = arena.create(2, 2).unwrap();
        assert_eq!((third.index, third.generation), (0, 2));

        assert_eq!(arena.nnz(first), Err(MatrixError::NullMatrix));
        assert_eq!(arena.nnz(second), Err(MatrixError::NullMatrix));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_scalar_mul_in_place_and_distinct() {
        let mut arena = MatrixArena::new();
        let a = filled(&mut arena, 2, 2, &[(0, 1, 2.0), (1, 0, 3.0)]);
        let b = filled(&mut arena, 2, 2, &[(1, 1, 5.0)]);

        arena.scalar_mul(a, b, 1.0).unwrap();
        assert_eq!(arena.get(b, 0, 1), Ok(2.0));
        assert_eq!(arena.get(b, 1, 1), Ok(0.0));

        // Mutating the copy leaves the source alone
        arena.insert(b, 9.0, 0, 1).unwrap();
        assert_eq!(arena.get(a, 0, 1), Ok(2.0));

        arena.scalar_mul(a, a, 2.0).unwrap();
        assert_eq!(arena.get(a, 1, 0), Ok(6.0));
        arena.matrix(a).unwrap().check_invariants().unwrap();

        arena.scalar_mul(a, a, 0.0).unwrap();
        assert_eq!(arena.matrix(a).unwrap().nnz(), 0);
    }

    #[test]
    fn test_scalar_mul_with_null_operand() {
        let mut arena = MatrixArena::new();
        let a = arena.create(2, 2).unwrap();
        let b = arena.create(2, 2).unwrap();
        arena.free(b).unwrap();

        assert_eq!(arena.scalar_mul(a, b, 2.0), Err(MatrixError::NullMatrix));
        assert_eq!(arena.scalar_mul(b, a, 2.0), Err(MatrixError::NullMatrix));
    }

    #[test]
    fn test_sum_with_aliasing_output() {
        let mut arena = MatrixArena::new();
        let a = filled(&mut arena, 2, 2, &[(0, 0, 1.0), (1, 1, 2.0)]);
        let b = filled(&mut arena, 2, 2, &[(0, 0, 10.0), (0, 1, 20.0)]);

        arena.sum(a, b, b).unwrap();
        assert_eq!(arena.get(b, 0, 0), Ok(11.0));
        assert_eq!(arena.get(b, 1, 1), Ok(2.0));
        assert_eq!(arena.get(a, 0, 0), Ok(1.0));

        arena.sum(a, b, a).unwrap();
        assert_eq!(arena.get(a, 0, 0), Ok(12.0));
        assert_eq!(arena.get(a, 0, 1), Ok(20.0));

        arena.sum(a, a, a).unwrap();
        assert_eq!(arena.get(a, 0, 0), Ok(24.0));
        assert_eq!(arena.get(a, 1, 1), Ok(8.0));
        arena.matrix(a).unwrap().check_invariants().unwrap();
    }

    #[test]
    fn test_sum_dimension_mismatch() {
        let mut arena = MatrixArena::new();
        let a = arena.create(2, 2).unwrap();
        let b = arena.create(2, 3).unwrap();
        let c = arena.create(2, 2).unwrap();

        assert_eq!(arena.sum(a, b, c), Err(MatrixError::DimensionMismatch));
    }

    #[test]
    fn test_matrix_mul_rejects_aliasing() {
        let mut arena = MatrixArena::new();
        let a = filled(&mut arena, 2, 2, &[(0, 0, 1.0), (1, 1, 1.0)]);
        let b = filled(&mut arena, 2, 2, &[(0, 1, 4.0), (1, 0, 5.0)]);
        let c = arena.create(2, 2).unwrap();

        assert_eq!(arena.matrix_mul(a, b, a), Err(MatrixError::NotImplemented));
        assert_eq!(arena.matrix_mul(a, b, b), Err(MatrixError::NotImplemented));

        arena.matrix_mul(a, b, c).unwrap();
        assert_eq!(arena.get(c, 0, 1), Ok(4.0));
        assert_eq!(arena.get(c, 1, 0), Ok(5.0));

        // A * A is fine as long as the output is a third matrix
        arena.matrix_mul(b, b, c).unwrap();
        assert_eq!(arena.get(c, 0, 0), Ok(20.0));
        assert_eq!(arena.get(c, 1, 1), Ok(20.0));
    }

    #[test]
    fn test_matrix_mul_mismatch_keeps_output() {
        let mut arena = MatrixArena::new();
        let a = arena.create(2, 3).unwrap();
        let b = arena.create(2, 2).unwrap();
        let c = filled(&mut arena, 2, 2, &[(0, 0, 1.0)]);

        assert_eq!(arena.matrix_mul(a, b, c), Err(MatrixError::DimensionMismatch));
        assert_eq!(arena.get(c, 0, 0), Ok(1.0));
    }
}
