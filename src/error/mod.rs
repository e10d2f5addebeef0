use thiserror::Error;

/// Failures surfaced by the compressors.
///
/// Every fallible operation in this crate returns `anyhow::Result`; these variants are
/// carried inside the `anyhow::Error` and can be recovered with `downcast_ref::<PcaError>()`.
/// An out-of-range component count is never an error, it is clamped instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PcaError {
    #[error("channel must have at least one row and one column, got {rows}x{cols}")]
    EmptyChannel { rows: usize, cols: usize },

    #[error("expected an RGB raster with 3 channels on the last axis, got {channels}")]
    NotRgb { channels: usize },

    #[error("eigendecomposition requires a square matrix, got {rows}x{cols}")]
    NonSquare { rows: usize, cols: usize },

    #[error("symmetric eigendecomposition of a {dim}x{dim} covariance matrix did not converge")]
    EigenNonConvergence { dim: usize },
}
