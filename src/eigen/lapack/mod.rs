use ndarray::{Array2, ArrayView2};

use super::{check_square, to_dmatrix, EigenPairs, SymmetricEigenSolver};
use crate::error::PcaError;

/// LAPACK `dsyev` backend. Needs a system OpenBLAS.
#[derive(Debug, Clone, Copy, Default)]
pub struct LapackEigen;

impl SymmetricEigenSolver for LapackEigen {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<EigenPairs> {
        let dim = check_square(&matrix)?;

        let eigen = nalgebra_lapack::SymmetricEigen::try_new(to_dmatrix(&matrix))
            .ok_or(PcaError::EigenNonConvergence { dim })?;

        let values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        let vectors = Array2::from_shape_fn((dim, dim), |(i, j)| eigen.eigenvectors[(i, j)]);

        Ok(EigenPairs::sorted_ascending(&values, vectors))
    }
}
