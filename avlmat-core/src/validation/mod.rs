//! Argument validation utilities
//!
//! Pure functions over indices and shapes with no access to matrix storage.

pub mod bounds;

pub use bounds::{
    validate_axis, validate_dimensions, validate_index, validate_product_shape,
    validate_same_shape,
};
