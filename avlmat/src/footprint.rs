//! Memory footprint model for the three matrix representations
//!
//! Sizes are estimated from node and struct layouts rather than measured from
//! the allocator, so numbers are comparable across runs and platforms of the
//! same pointer width.

use crate::hash_backend::HashMatrix;
use avlmat_core::AvlMatrix;
use std::mem::size_of;

/// Bytes held by an [`AvlMatrix`] across both of its trees
pub fn avl_bytes(matrix: &AvlMatrix) -> usize {
    matrix.footprint().bytes()
}

/// Bytes held by a [`HashMatrix`]: one slot per bucket plus one entry per cell
pub fn hash_bytes(matrix: &HashMatrix) -> usize {
    let slot = size_of::<usize>();
    let entry = size_of::<((usize, usize), f32)>() + size_of::<usize>();
    size_of::<HashMatrix>() + matrix.capacity() * slot + matrix.nnz() * entry
}

/// Bytes held by a dense `rows x cols` matrix of `f32`
pub fn dense_bytes(rows: usize, cols: usize) -> usize {
    rows * cols * size_of::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use avlmat_core::Footprint;

    #[test]
    fn test_empty_matrices() {
        assert_eq!(avl_bytes(&AvlMatrix::new(100, 100)), size_of::<AvlMatrix>());
        assert_eq!(dense_bytes(10, 20), 800);
        let empty_hash = size_of::<HashMatrix>() + 16 * size_of::<usize>();
        assert!(hash_bytes(&HashMatrix::new(10, 10)) >= empty_hash);
    }

    #[test]
    fn test_avl_bytes_counts_both_trees() {
        let matrix =
            AvlMatrix::from_triplets(4, 4, &[(0, 0, 1.0), (0, 1, 2.0), (3, 1, 3.0)]).unwrap();
        let (outer, inner) = (Footprint::OUTER_NODE_BYTES, Footprint::INNER_NODE_BYTES);
        // rows {0, 3} and cols {0, 1} give four structural nodes, six leaves
        assert_eq!(avl_bytes(&matrix), size_of::<AvlMatrix>() + 4 * outer + 6 * inner);
    }

    #[test]
    fn test_hash_bytes_grow_with_entries() {
        let mut matrix = HashMatrix::new(50, 50);
        let before = hash_bytes(&matrix);
        for i in 0..40 {
            matrix.set(i, i, 1.0).unwrap();
        }
        assert!(hash_bytes(&matrix) > before);
    }
}
