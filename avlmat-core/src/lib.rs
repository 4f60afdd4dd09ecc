#![no_std]

//! avlmat-core - Dual-AVL sparse matrix engine
//!
//! A sparse `f32` matrix stored twice: once as a balanced tree of rows, each
//! holding a balanced tree of columns, and once as the mirror image organised
//! column-first. Both trees are updated on every point mutation, which makes
//! transpose a constant-time root swap and keeps row- and column-wise
//! traversal available at all times.
//!
//! ```
//! use avlmat_core::{arithmetic, AvlMatrix, MatrixError};
//!
//! let mut a = AvlMatrix::new(3, 3);
//! a.insert(2.0, 0, 0)?;
//! a.insert(3.0, 1, 2)?;
//! assert_eq!(a.get(1, 2)?, 3.0);
//! assert_eq!(a.get(2, 2)?, 0.0);
//!
//! a.transpose();
//! assert_eq!(a.get(2, 1)?, 3.0);
//!
//! let mut doubled = AvlMatrix::new(3, 3);
//! arithmetic::scalar_mul(&a, &mut doubled, 2.0)?;
//! assert_eq!(doubled.get(0, 0)?, 4.0);
//! # Ok::<(), MatrixError>(())
//! ```

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod arena;
pub mod arithmetic;
pub mod error;
pub mod matrix;
pub mod traits;
pub mod tree;
pub mod triplets;
pub mod validation;

pub use arena::{MatrixArena, MatrixId};
pub use error::*;
pub use matrix::{AvlMatrix, Footprint};
pub use traits::*;
pub use triplets::Triplets;
