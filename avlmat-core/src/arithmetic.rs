//! Whole-matrix arithmetic over sparse traversal
//!
//! Built only from the facade primitives: deep clone, flatten and
//! get-then-insert. Sums and products therefore cost `O(k log k)` rather than
//! a linear merge, but every write goes through the mirrored insert path.

use crate::validation::{validate_product_shape, validate_same_shape};
use crate::{AvlMatrix, Result};

/// `dest := factor * source`
///
/// `dest` must have the same dimensions as `source`; its previous contents
/// are discarded. A zero factor leaves `dest` empty.
pub fn scalar_mul(source: &AvlMatrix, dest: &mut AvlMatrix, factor: f32) -> Result<()> {
    validate_same_shape(&[source.dimensions(), dest.dimensions()])?;

    if factor == 0.0 {
        dest.clear();
        return Ok(());
    }

    dest.clone_from(source);
    dest.scale_values(factor);
    Ok(())
}

/// `matrix := factor * matrix`
///
/// Both trees are scaled independently. A zero factor frees both trees.
pub fn scale_in_place(matrix: &mut AvlMatrix, factor: f32) {
    if factor == 0.0 {
        matrix.clear();
    } else {
        matrix.scale_values(factor);
    }
}

/// `out := lhs + rhs`
///
/// All three matrices must share dimensions. `out` starts as a copy of `rhs`
/// and every stored cell of `lhs` is added through get-then-insert.
pub fn sum(lhs: &AvlMatrix, rhs: &AvlMatrix, out: &mut AvlMatrix) -> Result<()> {
    validate_same_shape(&[lhs.dimensions(), rhs.dimensions(), out.dimensions()])?;

    out.clone_from(rhs);
    sum_assign(out, lhs)
}

/// `acc := acc + other`
pub fn sum_assign(acc: &mut AvlMatrix, other: &AvlMatrix) -> Result<()> {
    validate_same_shape(&[acc.dimensions(), other.dimensions()])?;

    let cells = other.flatten();
    for (row, col, value) in cells.iter() {
        let current = acc.get(row, col)?;
        acc.insert(current + value, row, col)?;
    }
    Ok(())
}

/// `out := lhs * rhs`
///
/// `lhs` is `n x p`, `rhs` is `p x m` and `out` must already be `n x m`; on a
/// shape mismatch `out` is left untouched. For every stored `(i, j, v)` of
/// `lhs`, row `j` of `rhs` is walked and `v * rhs[j, c]` accumulated into
/// `out[i, c]`.
pub fn matrix_mul(lhs: &AvlMatrix, rhs: &AvlMatrix, out: &mut AvlMatrix) -> Result<()> {
    validate_product_shape(lhs.dimensions(), rhs.dimensions(), out.dimensions())?;

    out.clear();
    if lhs.is_empty() || rhs.is_empty() {
        return Ok(());
    }

    let cells = lhs.flatten();
    for (row, shared, value) in cells.iter() {
        let Some(rhs_row) = rhs.row_tree(shared) else {
            continue;
        };
        for (col, rhs_value) in rhs_row {
            let current = out.get(row, col)?;
            out.insert(current + value * rhs_value, row, col)?;
        }
    }
    Ok(())
}
