//! # Symmetric Eigendecomposition
//!
//! The compressors only need one numerical primitive: the eigenpairs of a real symmetric
//! (covariance) matrix. It sits behind [`SymmetricEigenSolver`] so the backend can be
//! swapped, the same way the SVD backends are pluggable elsewhere in the crate family.
//!
//! ## Contract
//! Every solver returns [`EigenPairs`] with eigenvalues in **ascending** order and the
//! matching orthonormal eigenvectors stored as matrix **columns**.
//!
//! ## Available Backends
//! - [`NalgebraEigen`]: pure Rust, always available
//! - `LapackEigen`: `dsyev` through `nalgebra-lapack` (feature `lapack`)

#[cfg(feature = "lapack")]
mod lapack;

#[cfg(feature = "lapack")]
pub use lapack::LapackEigen;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView2};

use crate::error::PcaError;
use crate::utils::argsort_ascending;

/// Eigenvalues (ascending) and eigenvectors (columns) of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct EigenPairs {
    pub values: Array1<f64>,
    pub vectors: Array2<f64>,
}

impl EigenPairs {
    /// Orders raw solver output ascending by eigenvalue, moving the vector columns along.
    pub(crate) fn sorted_ascending(values: &[f64], vectors: Array2<f64>) -> Self {
        let order = argsort_ascending(values);
        let sorted_values = Array1::from_iter(order.iter().map(|&i| values[i]));
        let sorted_vectors = vectors.select(ndarray::Axis(1), &order);
        EigenPairs {
            values: sorted_values,
            vectors: sorted_vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub trait SymmetricEigenSolver: Send + Sync {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<EigenPairs>;
}

/// Pure Rust symmetric eigensolver (implicit symmetric QR from `nalgebra`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NalgebraEigen {
    epsilon: f64,
    max_iterations: usize,
}

impl NalgebraEigen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Off-diagonal magnitude below which the iteration treats a block as decoupled.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Iteration cap; `0` means no cap. Hitting the cap is reported as
    /// [`PcaError::EigenNonConvergence`].
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for NalgebraEigen {
    fn default() -> Self {
        Self {
            epsilon: f64::EPSILON,
            max_iterations: 0,
        }
    }
}

impl SymmetricEigenSolver for NalgebraEigen {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<EigenPairs> {
        let dim = check_square(&matrix)?;

        let eigen = SymmetricEigen::try_new(to_dmatrix(&matrix), self.epsilon, self.max_iterations)
            .ok_or(PcaError::EigenNonConvergence { dim })?;

        let values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        let vectors = Array2::from_shape_fn((dim, dim), |(i, j)| eigen.eigenvectors[(i, j)]);

        Ok(EigenPairs::sorted_ascending(&values, vectors))
    }
}

pub(crate) fn check_square(matrix: &ArrayView2<f64>) -> anyhow::Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(PcaError::NonSquare { rows, cols }.into());
    }
    if rows == 0 {
        return Err(PcaError::EmptyChannel { rows, cols }.into());
    }
    Ok(rows)
}

pub(crate) fn to_dmatrix(matrix: &ArrayView2<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.dim();
    DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]])
}
