use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

/// Full eigendecomposition of one channel's covariance, eigenpairs sorted by descending
/// eigenvalue.
#[derive(Debug, Clone)]
pub struct ChannelAnalysis {
    covariance: Array2<f64>,
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
}

impl ChannelAnalysis {
    pub(crate) fn new(
        covariance: Array2<f64>,
        eigenvalues: Array1<f64>,
        eigenvectors: Array2<f64>,
    ) -> Self {
        ChannelAnalysis {
            covariance,
            eigenvalues,
            eigenvectors,
        }
    }

    pub fn width(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in the same order as [`Self::eigenvalues`].
    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    /// Proportion of total variance per component. Tiny negative eigenvalues from rounding
    /// count as zero; a channel without variance yields all zeros.
    pub fn explained_variance_ratio(&self) -> Array1<f64> {
        let clipped = self.eigenvalues.mapv(|v| v.max(0.0));
        let total = clipped.sum();
        if total <= 0.0 {
            return Array1::zeros(clipped.len());
        }
        clipped.mapv(|v| v / total)
    }

    pub fn cumulative_explained_variance_ratio(&self) -> Array1<f64> {
        let ratios = self.explained_variance_ratio();
        let mut cumulative = Array1::zeros(ratios.len());
        let mut sum = 0.0;
        for (i, &ratio) in ratios.iter().enumerate() {
            sum += ratio;
            cumulative[i] = sum;
        }
        cumulative
    }

    /// Smallest component count whose cumulative explained variance reaches `fraction`,
    /// within `[1, W]`.
    pub fn components_for_variance(&self, fraction: f64) -> usize {
        let width = self.width();
        if self.eigenvalues.iter().all(|&v| v <= 0.0) {
            return 1;
        }
        self.cumulative_explained_variance_ratio()
            .iter()
            .position(|&c| c >= fraction - 1e-12)
            .map(|i| i + 1)
            .unwrap_or(width)
            .clamp(1, width.max(1))
    }

    pub fn leading_eigenvalues(&self, n: usize) -> ArrayView1<'_, f64> {
        self.eigenvalues.slice(s![..n.min(self.width())])
    }

    /// Top-left `n × n` block of the covariance matrix.
    pub fn covariance_corner(&self, n: usize) -> ArrayView2<'_, f64> {
        let n = n.min(self.width());
        self.covariance.slice(s![..n, ..n])
    }

    /// Top-left `n × n` block of the sorted eigenvector matrix.
    pub fn eigenvector_corner(&self, n: usize) -> ArrayView2<'_, f64> {
        let n = n.min(self.width());
        self.eigenvectors.slice(s![..n, ..n])
    }
}
