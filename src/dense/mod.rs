use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rayon::prelude::*;

use crate::error::PcaError;
use crate::utils::{ColumnCenter, Covariance};

impl<S> ColumnCenter for ArrayBase<S, Ix2>
where
    S: Data<Elem = f64>,
{
    fn center_columns(&self) -> anyhow::Result<(Array2<f64>, Array1<f64>)> {
        let (rows, cols) = self.dim();
        if rows == 0 || cols == 0 {
            return Err(PcaError::EmptyChannel { rows, cols }.into());
        }

        let mean = self
            .mean_axis(Axis(0))
            .ok_or(PcaError::EmptyChannel { rows, cols })?;

        let mut centered = self.to_owned();
        centered
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|mut row| {
                row -= &mean;
            });

        Ok((centered, mean))
    }
}

impl<S> Covariance for ArrayBase<S, Ix2>
where
    S: Data<Elem = f64>,
{
    fn column_covariance(&self) -> anyhow::Result<Array2<f64>> {
        let (rows, cols) = self.dim();
        if rows == 0 || cols == 0 {
            return Err(PcaError::EmptyChannel { rows, cols }.into());
        }

        // A single observation has zero spread; floor the divisor instead of dividing by 0.
        let denom = rows.saturating_sub(1).max(1) as f64;
        let mut cov = self.t().dot(self);
        cov.mapv_inplace(|v| v / denom);

        // Force exact symmetry so the eigensolver sees a clean input.
        for i in 0..cols {
            for j in (i + 1)..cols {
                let avg = 0.5 * (cov[[i, j]] + cov[[j, i]]);
                cov[[i, j]] = avg;
                cov[[j, i]] = avg;
            }
        }

        Ok(cov)
    }
}
