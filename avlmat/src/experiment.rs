//! Data generation and size/time comparison experiments
//!
//! Every case builds an `n x n` matrix with `k = ceil(n^2 * sparsity)` distinct
//! random cells and loads the same data into the AVL, hash and (for small
//! cases) dense representations.

use crate::dense_backend::DenseMatrix;
use crate::error::{HarnessError, HarnessResult};
use crate::footprint::{avl_bytes, dense_bytes, hash_bytes};
use crate::hash_backend::HashMatrix;
use avlmat_core::{arithmetic, AvlMatrix, MatrixError, Triplets};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::str::FromStr;
use std::time::Instant;

/// Value written by the timed point update
#[allow(clippy::approx_constant)]
const SET_VALUE: f32 = 3.14;

/// One `(n, sparsity)` experiment case
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperimentCase {
    /// Side length of the square matrix
    pub n: usize,
    /// Fraction of cells that hold a value
    pub sparsity: f64,
}

impl ExperimentCase {
    pub const fn new(n: usize, sparsity: f64) -> Self {
        Self { n, sparsity }
    }

    /// Number of stored cells, `ceil(n^2 * sparsity)`
    ///
    /// The product is pulled down by a few ulps before rounding up, so a
    /// product that should be an exact integer is not bumped by one.
    pub fn k(&self) -> usize {
        let cells = (self.n as f64) * (self.n as f64);
        let exact = cells * self.sparsity;
        (exact - exact * f64::EPSILON * 4.0).ceil() as usize
    }
}

impl FromStr for ExperimentCase {
    type Err = HarnessError;

    /// Parse `n:sparsity`, e.g. `1000:0.05`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, sparsity) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| HarnessError::Parse(format!("expected n:sparsity, got '{s}'")))?;

        let n = n
            .trim()
            .parse::<usize>()
            .map_err(|_| HarnessError::Parse(format!("invalid size '{n}'")))?;
        let sparsity = sparsity
            .trim()
            .parse::<f64>()
            .map_err(|_| HarnessError::Parse(format!("invalid sparsity '{sparsity}'")))?;

        if n == 0 {
            return Err(HarnessError::Parse("size must be positive".to_string()));
        }
        if !(sparsity > 0.0 && sparsity <= 1.0) {
            return Err(HarnessError::Parse(format!("sparsity {sparsity} outside (0, 1]")));
        }
        Ok(Self { n, sparsity })
    }
}

/// The default sweep: four small dense-comparable sizes, then very sparse large ones
pub const DEFAULT_CASES: [ExperimentCase; 17] = [
    ExperimentCase::new(100, 0.01),
    ExperimentCase::new(100, 0.05),
    ExperimentCase::new(100, 0.1),
    ExperimentCase::new(100, 0.2),
    ExperimentCase::new(1_000, 0.01),
    ExperimentCase::new(1_000, 0.05),
    ExperimentCase::new(1_000, 0.1),
    ExperimentCase::new(1_000, 0.2),
    ExperimentCase::new(10_000, 1e-8),
    ExperimentCase::new(10_000, 1e-7),
    ExperimentCase::new(10_000, 1e-6),
    ExperimentCase::new(100_000, 1e-9),
    ExperimentCase::new(100_000, 1e-8),
    ExperimentCase::new(100_000, 1e-7),
    ExperimentCase::new(1_000_000, 1e-10),
    ExperimentCase::new(1_000_000, 1e-9),
    ExperimentCase::new(1_000_000, 1e-8),
];

/// Experiment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Cases to run, in order
    pub cases: Vec<ExperimentCase>,
    /// Number of leading cases small enough to time the dense baseline
    pub dense_case_limit: usize,
    /// Base RNG seed; case `i` uses `seed + i`
    pub seed: u64,
    /// Factor used by the scalar multiplication timing
    pub scalar: f32,
}

impl ExperimentConfig {
    /// Replace the case list
    pub fn with_cases(mut self, cases: Vec<ExperimentCase>) -> Self {
        self.cases = cases;
        self
    }

    /// Set how many leading cases also time the dense baseline
    pub fn with_dense_case_limit(mut self, limit: usize) -> Self {
        self.dense_case_limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_scalar(mut self, scalar: f32) -> Self {
        self.scalar = scalar;
        self
    }

    fn case_rng(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(index as u64))
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            cases: DEFAULT_CASES.to_vec(),
            dense_case_limit: 8,
            seed: 42,
            scalar: 3.0,
        }
    }
}

/// Memory footprint of one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeRecord {
    pub n: usize,
    pub sparsity: f64,
    pub k: usize,
    pub dense_bytes: usize,
    pub avl_bytes: usize,
    pub hash_bytes: usize,
}

/// Wall-clock time in nanoseconds of each timed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OperationTimes {
    pub get_ns: u64,
    pub set_ns: u64,
    pub transpose_ns: u64,
    pub scalar_ns: u64,
    pub sum_ns: u64,
    pub mul_ns: u64,
}

/// Operation timings of one case; `dense` is `None` past the dense case limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRecord {
    pub n: usize,
    pub sparsity: f64,
    pub k: usize,
    pub dense: Option<OperationTimes>,
    pub avl: OperationTimes,
    pub hash: OperationTimes,
}

/// Draw `k` distinct uniformly random cells of a `rows x cols` matrix
///
/// Values are uniform in `[0, 1)`. Already drawn coordinates are tracked in an
/// [`AvlMatrix`] and redrawn on collision.
pub fn generate_triplets<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    k: usize,
    rng: &mut R,
) -> HarnessResult<Triplets> {
    let capacity = rows.checked_mul(cols).ok_or(MatrixError::InvalidArgument)?;
    if k > capacity {
        return Err(MatrixError::InvalidArgument.into());
    }

    let mut visited = AvlMatrix::new(rows, cols);
    let mut triplets = Triplets::with_capacity(k);
    while triplets.len() < k {
        let row = rng.gen_range(0..rows);
        let col = rng.gen_range(0..cols);
        if visited.get(row, col)? != 0.0 {
            continue;
        }
        visited.insert(1.0, row, col)?;
        triplets.push(row, col, rng.gen::<f32>());
    }
    Ok(triplets)
}

fn fill_avl(n: usize, triplets: &Triplets) -> HarnessResult<AvlMatrix> {
    let mut matrix = AvlMatrix::new(n, n);
    for (row, col, value) in triplets.iter() {
        matrix.insert(value, row, col)?;
    }
    Ok(matrix)
}

fn fill_hash(n: usize, triplets: &Triplets) -> HarnessResult<HashMatrix> {
    let mut matrix = HashMatrix::new(n, n);
    for (row, col, value) in triplets.iter() {
        matrix.set(row, col, value)?;
    }
    Ok(matrix)
}

fn fill_dense(n: usize, triplets: &Triplets) -> HarnessResult<DenseMatrix> {
    let mut matrix = DenseMatrix::new(n, n);
    for (row, col, value) in triplets.iter() {
        matrix.set(row, col, value)?;
    }
    Ok(matrix)
}

fn size_case(
    config: &ExperimentConfig,
    index: usize,
    case: ExperimentCase,
) -> HarnessResult<SizeRecord> {
    let k = case.k();
    let mut rng = config.case_rng(index);
    let triplets = generate_triplets(case.n, case.n, k, &mut rng)?;

    let avl = fill_avl(case.n, &triplets)?;
    let avl_size = avl_bytes(&avl);
    drop(avl);

    let hash = fill_hash(case.n, &triplets)?;
    let hash_size = hash_bytes(&hash);

    tracing::info!(n = case.n, sparsity = case.sparsity, k, "Measured size case");

    Ok(SizeRecord {
        n: case.n,
        sparsity: case.sparsity,
        k,
        dense_bytes: dense_bytes(case.n, case.n),
        avl_bytes: avl_size,
        hash_bytes: hash_size,
    })
}

/// Measure the memory footprint of every configured case
///
/// Cases run in parallel; each draws from its own seeded RNG so the output
/// does not depend on scheduling.
pub fn run_size_experiments(config: &ExperimentConfig) -> HarnessResult<Vec<SizeRecord>> {
    config
        .cases
        .par_iter()
        .enumerate()
        .map(|(index, case)| {
            size_case(config, index, *case).inspect_err(|err| {
                tracing::warn!(
                    n = case.n,
                    sparsity = case.sparsity,
                    error = %err,
                    "Size case failed"
                );
            })
        })
        .collect()
}

fn elapsed_ns(start: Instant) -> u64 {
    start.elapsed().as_nanos() as u64
}

fn time_avl(
    n: usize,
    triplets: &Triplets,
    (row, col): (usize, usize),
    scalar: f32,
) -> HarnessResult<OperationTimes> {
    let mut a = fill_avl(n, triplets)?;
    let b = fill_avl(n, triplets)?;
    let mut scalar_out = AvlMatrix::new(n, n);
    let mut sum_out = AvlMatrix::new(n, n);
    let mut mul_out = AvlMatrix::new(n, n);
    let mut times = OperationTimes::default();

    let start = Instant::now();
    let _value = a.get(row, col)?;
    times.get_ns = elapsed_ns(start);

    let start = Instant::now();
    a.insert(SET_VALUE, row, col)?;
    times.set_ns = elapsed_ns(start);

    let start = Instant::now();
    a.transpose();
    times.transpose_ns = elapsed_ns(start);
    a.transpose();

    let start = Instant::now();
    arithmetic::scalar_mul(&a, &mut scalar_out, scalar)?;
    times.scalar_ns = elapsed_ns(start);

    let start = Instant::now();
    arithmetic::sum(&a, &b, &mut sum_out)?;
    times.sum_ns = elapsed_ns(start);

    let start = Instant::now();
    arithmetic::matrix_mul(&a, &b, &mut mul_out)?;
    times.mul_ns = elapsed_ns(start);

    Ok(times)
}

fn time_hash(
    n: usize,
    triplets: &Triplets,
    (row, col): (usize, usize),
    scalar: f32,
) -> HarnessResult<OperationTimes> {
    let mut a = fill_hash(n, triplets)?;
    let b = fill_hash(n, triplets)?;
    let mut scalar_out = HashMatrix::new(n, n);
    let mut sum_out = HashMatrix::new(n, n);
    let mut mul_out = HashMatrix::new(n, n);
    let mut times = OperationTimes::default();

    let start = Instant::now();
    let _value = a.get(row, col)?;
    times.get_ns = elapsed_ns(start);

    let start = Instant::now();
    a.set(row, col, SET_VALUE)?;
    times.set_ns = elapsed_ns(start);

    let start = Instant::now();
    a.transpose();
    times.transpose_ns = elapsed_ns(start);
    a.transpose();

    let start = Instant::now();
    a.scalar_mul_into(&mut scalar_out, scalar)?;
    times.scalar_ns = elapsed_ns(start);

    let start = Instant::now();
    a.sum_into(&b, &mut sum_out)?;
    times.sum_ns = elapsed_ns(start);

    let start = Instant::now();
    a.mul_into(&b, &mut mul_out)?;
    times.mul_ns = elapsed_ns(start);

    Ok(times)
}

fn time_dense(
    n: usize,
    triplets: &Triplets,
    (row, col): (usize, usize),
    scalar: f32,
) -> HarnessResult<OperationTimes> {
    let mut a = fill_dense(n, triplets)?;
    let b = fill_dense(n, triplets)?;
    let mut out = DenseMatrix::new(n, n);
    let mut times = OperationTimes::default();

    let start = Instant::now();
    let _value = a.get(row, col)?;
    times.get_ns = elapsed_ns(start);

    let start = Instant::now();
    a.set(row, col, SET_VALUE)?;
    times.set_ns = elapsed_ns(start);

    let start = Instant::now();
    a.transpose_into(&mut out)?;
    times.transpose_ns = elapsed_ns(start);

    let start = Instant::now();
    a.scalar_mul_into(&mut out, scalar)?;
    times.scalar_ns = elapsed_ns(start);

    let start = Instant::now();
    a.sum_into(&b, &mut out)?;
    times.sum_ns = elapsed_ns(start);

    let start = Instant::now();
    a.mul_into(&b, &mut out)?;
    times.mul_ns = elapsed_ns(start);

    Ok(times)
}

fn time_case(
    config: &ExperimentConfig,
    index: usize,
    case: ExperimentCase,
) -> HarnessResult<TimeRecord> {
    let k = case.k();
    let mut rng = config.case_rng(index);
    let triplets = generate_triplets(case.n, case.n, k, &mut rng)?;

    // Look up a stored cell; an empty case looks up the origin
    let position = if triplets.is_empty() {
        (0, 0)
    } else {
        let pos = rng.gen_range(0..triplets.len());
        (triplets.rows[pos], triplets.cols[pos])
    };

    let dense = if index < config.dense_case_limit {
        tracing::info!(n = case.n, sparsity = case.sparsity, "Timing dense baseline");
        Some(time_dense(case.n, &triplets, position, config.scalar)?)
    } else {
        None
    };

    tracing::info!(n = case.n, sparsity = case.sparsity, "Timing AVL matrix");
    let avl = time_avl(case.n, &triplets, position, config.scalar)?;

    tracing::info!(n = case.n, sparsity = case.sparsity, "Timing hash matrix");
    let hash = time_hash(case.n, &triplets, position, config.scalar)?;

    Ok(TimeRecord {
        n: case.n,
        sparsity: case.sparsity,
        k,
        dense,
        avl,
        hash,
    })
}

/// Time every operation of every configured case, one case at a time
pub fn run_time_experiments(config: &ExperimentConfig) -> HarnessResult<Vec<TimeRecord>> {
    let mut records = Vec::with_capacity(config.cases.len());
    for (index, case) in config.cases.iter().enumerate() {
        let record = time_case(config, index, *case).inspect_err(|err| {
            tracing::warn!(
                n = case.n,
                sparsity = case.sparsity,
                error = %err,
                "Time case failed"
            );
        })?;
        records.push(record);
    }
    Ok(records)
}
