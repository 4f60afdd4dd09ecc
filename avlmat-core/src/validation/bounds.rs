//! Index and dimension validation for matrix operations
//!
//! Pure checks with no access to matrix storage; every facade and
//! arithmetic entry point funnels its argument checking through here.

use crate::MatrixError;

/// Validate that `(row, col)` lies inside a `rows x cols` matrix
pub const fn validate_index(
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> Result<(), MatrixError> {
    if row >= rows || col >= cols {
        return Err(MatrixError::OutOfBounds);
    }
    Ok(())
}

/// Validate that a single index lies inside `0..len`
pub const fn validate_axis(index: usize, len: usize) -> Result<(), MatrixError> {
    if index >= len {
        return Err(MatrixError::OutOfBounds);
    }
    Ok(())
}

/// Validate signed dimensions and convert them to `(rows, cols)`
pub fn validate_dimensions(rows: isize, cols: isize) -> Result<(usize, usize), MatrixError> {
    let rows = usize::try_from(rows).map_err(|_| MatrixError::InvalidArgument)?;
    let cols = usize::try_from(cols).map_err(|_| MatrixError::InvalidArgument)?;
    Ok((rows, cols))
}

/// Validate that every operand of an elementwise operation has the same shape
pub fn validate_same_shape(shapes: &[(usize, usize)]) -> Result<(), MatrixError> {
    match shapes.split_first() {
        Some((first, rest)) if rest.iter().any(|shape| shape != first) => {
            Err(MatrixError::DimensionMismatch)
        }
        _ => Ok(()),
    }
}

/// Validate the shapes of `C = A * B`
///
/// `A` must be `n x p`, `B` must be `p x m` and `C` must already be `n x m`.
pub const fn validate_product_shape(
    lhs: (usize, usize),
    rhs: (usize, usize),
    out: (usize, usize),
) -> Result<(), MatrixError> {
    if lhs.1 != rhs.0 || out.0 != lhs.0 || out.1 != rhs.1 {
        return Err(MatrixError::DimensionMismatch);
    }
    Ok(())
}
