//! Balanced index trees backing the sparse matrix
//!
//! The scalar tree maps one index to one value; the structural tree maps one
//! index to a whole scalar tree. Composed, they form a row -> column (or
//! column -> row) map.

pub mod avl;
pub mod scalar;
pub mod structural;

pub use avl::{AvlTree, Iter};
pub use scalar::ScalarTree;
pub use structural::StructuralTree;
