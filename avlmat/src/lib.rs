//! avlmat - Dual-AVL sparse matrices with comparison baselines
//!
//! This library wraps the `avlmat-core` engine with the pieces needed to
//! evaluate it: a hash-table and a dense baseline, a memory footprint model,
//! and a seeded experiment harness that writes CSV or JSON reports.
//!
//! ## Architecture
//!
//! - **avlmat-core**: The mirrored-tree matrix, its arithmetic and the id arena (no_std)
//! - **avlmat**: Baselines, footprint estimation, experiments and reporting
//!
//! ## Quick Start
//!
//! ```rust
//! use avlmat::{run_size_experiments, ExperimentCase, ExperimentConfig};
//!
//! fn example() -> Result<(), avlmat::HarnessError> {
//!     let config = ExperimentConfig::default()
//!         .with_cases(vec![ExperimentCase::new(100, 0.01)])
//!         .with_seed(7);
//!
//!     for record in run_size_experiments(&config)? {
//!         println!("n={} avl={}B hash={}B", record.n, record.avl_bytes, record.hash_bytes);
//!     }
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Constant-time transpose**: Row- and column-major trees swapped in place
//! - **Baselines**: Hash-table and dense matrices behind the same `SparseMatrix` trait
//! - **Deterministic experiments**: Per-case seeded RNGs, size cases run with rayon

// Re-export the engine
pub use avlmat_core::{
    arithmetic, AvlMatrix, Footprint, MatrixArena, MatrixError, MatrixId, MatrixOperations, Result,
    SparseMatrix, Status, Triplets,
};

// Implementation modules
pub mod dense_backend;
pub mod error;
pub mod experiment;
pub mod footprint;
pub mod hash_backend;
pub mod report;

// Public exports
pub use dense_backend::DenseMatrix;
pub use error::{HarnessError, HarnessResult};
pub use experiment::{
    generate_triplets, run_size_experiments, run_time_experiments, ExperimentCase, ExperimentConfig,
    OperationTimes, SizeRecord, TimeRecord,
};
pub use footprint::{avl_bytes, dense_bytes, hash_bytes};
pub use hash_backend::{HashConfig, HashMatrix};
pub use report::{write_csv, write_json, CsvRecord};
