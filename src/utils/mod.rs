use ndarray::{Array1, Array2};

/// Column-wise centering of an (observations × variables) matrix.
pub trait ColumnCenter {
    /// Returns the centered matrix together with the column means that were subtracted.
    fn center_columns(&self) -> anyhow::Result<(Array2<f64>, Array1<f64>)>;
}

/// Covariance of a matrix whose columns are the variables and rows the observations.
pub trait Covariance {
    /// `cov[i][j] = Σ_r x[r][i]·x[r][j] / max(n_rows - 1, 1)`.
    ///
    /// The input is expected to be centered already.
    fn column_covariance(&self) -> anyhow::Result<Array2<f64>>;
}

/// Clamps a caller-supplied component count into `[1, width]`.
///
/// `width` must be at least 1.
pub fn effective_components(requested: i64, width: usize) -> usize {
    let upper = i64::try_from(width).unwrap_or(i64::MAX);
    requested.clamp(1, upper.max(1)) as usize
}

/// Stable ascending argsort; NaNs order last via `total_cmp`.
pub fn argsort_ascending(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}
