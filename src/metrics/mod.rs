//! Numeric fidelity measures between an original raster and its reconstruction.

use anyhow::{anyhow, bail};
use ndarray::{ArrayBase, Data, Dimension};
use num_traits::ToPrimitive;

/// Mean squared error between two equally-shaped arrays of any primitive numeric type.
pub fn mse<A, B, S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> anyhow::Result<f64>
where
    A: ToPrimitive + Copy,
    B: ToPrimitive + Copy,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
    D: Dimension,
{
    if a.shape() != b.shape() {
        bail!(
            "Shape of reconstruction {:?} does not match original {:?}",
            b.shape(),
            a.shape()
        );
    }
    if a.is_empty() {
        bail!("Cannot compute an error over empty arrays");
    }

    let mut sum = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = x.to_f64().ok_or_else(|| anyhow!("Numeric conversion failed"))?;
        let y = y.to_f64().ok_or_else(|| anyhow!("Numeric conversion failed"))?;
        sum += (x - y) * (x - y);
    }
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio in decibels; infinite for identical inputs.
pub fn psnr<A, B, S1, S2, D>(
    a: &ArrayBase<S1, D>,
    b: &ArrayBase<S2, D>,
    peak: f64,
) -> anyhow::Result<f64>
where
    A: ToPrimitive + Copy,
    B: ToPrimitive + Copy,
    S1: Data<Elem = A>,
    S2: Data<Elem = B>,
    D: Dimension,
{
    let error = mse(a, b)?;
    if error == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (peak * peak / error).log10())
}

/// Values in an (H × W) channel divided by the values needed to store its rank-`k` form:
/// `k` scores per row, `k` components of length W, and the W column means.
pub fn pca_storage_ratio(height: usize, width: usize, k: usize) -> f64 {
    let original = (height * width) as f64;
    let stored = (k * (height + width) + width) as f64;
    if stored == 0.0 {
        return 0.0;
    }
    original / stored
}
