//! # Channel PCA
//!
//! Rank-k approximation of a single 8-bit intensity channel. Columns are the variables and
//! rows the observations: the channel is centered column-wise, the covariance of the
//! columns is eigendecomposed, and the data is projected onto (and back from) the `k`
//! leading eigenvectors.
//!
//! The requested component count is clamped into `[1, W]` and is never an error. The
//! structured results ([`ChannelCompression`], [`ChannelBasis`]) report the count that was
//! actually used.

use std::sync::Arc;

use ndarray::{s, Array1, Array2, ArrayView2, Axis};

use crate::eigen::{NalgebraEigen, SymmetricEigenSolver};
use crate::error::PcaError;
use crate::utils::{argsort_ascending, effective_components, ColumnCenter, Covariance};

mod analysis;
pub use analysis::ChannelAnalysis;

/// How a reconstructed value in `[0, 255]` becomes a `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantization {
    /// Drop the fractional part, like a plain float-to-integer cast.
    #[default]
    Truncate,
    /// Round half away from zero.
    Round,
}

impl Quantization {
    pub fn apply(self, value: f64) -> u8 {
        let clipped = value.clamp(0.0, 255.0);
        match self {
            Quantization::Truncate => clipped as u8,
            Quantization::Round => clipped.round() as u8,
        }
    }
}

pub struct ChannelCompressorBuilder<S: SymmetricEigenSolver> {
    solver: Arc<S>,
    quantization: Quantization,
}

impl<S: SymmetricEigenSolver> ChannelCompressorBuilder<S> {
    pub fn new(solver: S) -> Self {
        ChannelCompressorBuilder {
            solver: Arc::new(solver),
            quantization: Quantization::default(),
        }
    }

    pub fn quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    pub fn build(self) -> ChannelCompressor<S> {
        ChannelCompressor {
            solver: self.solver,
            quantization: self.quantization,
        }
    }
}

/// Compresses one channel at a time. Holds no per-call state, so a single instance can be
/// shared across threads.
pub struct ChannelCompressor<S: SymmetricEigenSolver> {
    solver: Arc<S>,
    quantization: Quantization,
}

impl<S: SymmetricEigenSolver> Clone for ChannelCompressor<S> {
    fn clone(&self) -> Self {
        ChannelCompressor {
            solver: Arc::clone(&self.solver),
            quantization: self.quantization,
        }
    }
}

impl Default for ChannelCompressor<NalgebraEigen> {
    fn default() -> Self {
        ChannelCompressorBuilder::new(NalgebraEigen::default()).build()
    }
}

/// Output of [`ChannelCompressor::compress`].
#[derive(Debug, Clone)]
pub struct ChannelCompression {
    pub reconstructed: Array2<u8>,
    pub effective_components: usize,
    /// Share of the channel's total variance carried by the kept components.
    pub retained_variance: f64,
}

impl<S: SymmetricEigenSolver> ChannelCompressor<S> {
    pub fn quantization(&self) -> Quantization {
        self.quantization
    }

    /// Centers the channel, decomposes its column covariance and orders the eigenpairs by
    /// descending eigenvalue.
    pub fn fit(&self, channel: ArrayView2<u8>) -> anyhow::Result<ChannelBasis> {
        self.fit_with_covariance(channel).map(|(basis, _)| basis)
    }

    pub fn compress(
        &self,
        channel: ArrayView2<u8>,
        requested_k: i64,
    ) -> anyhow::Result<ChannelCompression> {
        let basis = self.fit(channel)?;
        let k = basis.effective_components(requested_k);
        if k as i64 != requested_k {
            log::debug!(
                "channel {}x{}: requested {} components, using {}",
                basis.height(),
                basis.width(),
                requested_k,
                k
            );
        }

        let reconstructed = basis.quantize(&basis.reconstruct(requested_k));

        Ok(ChannelCompression {
            reconstructed,
            effective_components: k,
            retained_variance: basis.retained_variance(requested_k),
        })
    }

    /// Full decomposition of the channel, kept for inspection rather than reconstruction.
    pub fn analyze(&self, channel: ArrayView2<u8>) -> anyhow::Result<ChannelAnalysis> {
        let (basis, covariance) = self.fit_with_covariance(channel)?;
        Ok(ChannelAnalysis::new(
            covariance,
            basis.eigenvalues,
            basis.eigenvectors,
        ))
    }

    fn fit_with_covariance(
        &self,
        channel: ArrayView2<u8>,
    ) -> anyhow::Result<(ChannelBasis, Array2<f64>)> {
        let (rows, cols) = channel.dim();
        if rows == 0 || cols == 0 {
            return Err(PcaError::EmptyChannel { rows, cols }.into());
        }

        let data = channel.mapv(f64::from);
        let (centered, mean) = data.center_columns()?;
        let covariance = centered.column_covariance()?;

        let pairs = self.solver.decompose(covariance.view())?;
        if pairs.len() != cols || pairs.vectors.dim() != (cols, cols) {
            anyhow::bail!(
                "eigensolver returned {} pairs with vectors {:?} for a {}x{} covariance",
                pairs.len(),
                pairs.vectors.dim(),
                cols,
                cols
            );
        }

        // Ascending argsort reversed gives the descending order.
        let mut order = argsort_ascending(&pairs.values.to_vec());
        order.reverse();

        let eigenvalues = Array1::from_iter(order.iter().map(|&i| pairs.values[i]));
        let eigenvectors = pairs.vectors.select(Axis(1), &order);

        log::trace!(
            "channel {}x{} leading eigenvalues: {:?}",
            rows,
            cols,
            eigenvalues.slice(s![..cols.min(5)])
        );

        let basis = ChannelBasis {
            mean,
            centered,
            eigenvalues,
            eigenvectors,
            quantization: self.quantization,
        };
        Ok((basis, covariance))
    }
}

/// A fitted channel: column means, centered data and the eigenpairs sorted by descending
/// eigenvalue. Reconstructing at different `k` reuses the same decomposition.
#[derive(Debug, Clone)]
pub struct ChannelBasis {
    mean: Array1<f64>,
    centered: Array2<f64>,
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
    quantization: Quantization,
}

impl ChannelBasis {
    pub fn height(&self) -> usize {
        self.centered.nrows()
    }

    pub fn width(&self) -> usize {
        self.centered.ncols()
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    pub fn effective_components(&self, requested_k: i64) -> usize {
        effective_components(requested_k, self.width())
    }

    /// The leading `k_eff` eigenvectors as a (W × k_eff) matrix.
    pub fn projection(&self, requested_k: i64) -> ArrayView2<'_, f64> {
        let k = self.effective_components(requested_k);
        self.eigenvectors.slice(s![.., ..k])
    }

    /// Low-rank scores of the centered channel, shape (H × k_eff).
    pub fn project(&self, requested_k: i64) -> Array2<f64> {
        self.centered.dot(&self.projection(requested_k))
    }

    /// Unclipped reconstruction in channel space, shape (H × W).
    pub fn reconstruct(&self, requested_k: i64) -> Array2<f64> {
        let projection = self.projection(requested_k);
        let mut reconstructed = self.centered.dot(&projection).dot(&projection.t());
        reconstructed += &self.mean;
        reconstructed
    }

    /// Clips to `[0, 255]` and converts to `u8`.
    pub fn quantize(&self, reconstructed: &Array2<f64>) -> Array2<u8> {
        let quantization = self.quantization;
        reconstructed.mapv(|v| quantization.apply(v))
    }

    /// Fraction of total variance kept by `k_eff` components. A channel without variance
    /// loses nothing, so it reports 1.0.
    pub fn retained_variance(&self, requested_k: i64) -> f64 {
        let k = self.effective_components(requested_k);
        let total: f64 = self.eigenvalues.iter().map(|&v| v.max(0.0)).sum();
        if total <= 0.0 {
            return 1.0;
        }
        let kept: f64 = self.eigenvalues.iter().take(k).map(|&v| v.max(0.0)).sum();
        (kept / total).min(1.0)
    }
}

/// Reconstructs `channel` from its `requested_k` leading principal components.
///
/// `requested_k` is clamped into `[1, W]`. Fails on an empty channel or when the
/// eigendecomposition does not converge.
pub fn compress_channel(channel: ArrayView2<u8>, requested_k: i64) -> anyhow::Result<Array2<u8>> {
    let compressor: ChannelCompressor<NalgebraEigen> = ChannelCompressor::default();
    compressor
        .compress(channel, requested_k)
        .map(|compression| compression.reconstructed)
}
