//! Abstract interfaces shared by every matrix representation

pub mod matrix;

pub use matrix::{MatrixOperations, SparseMatrix};
