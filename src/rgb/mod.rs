//! # RGB Compression
//!
//! Splits an (H × W × 3) raster into its red, green and blue planes, compresses each plane
//! independently with a [`ChannelCompressor`], and stacks the results back along the
//! channel axis. The planes share no state, so they run as a rayon parallel map unless
//! parallelism is switched off.
//!
//! Inputs with an alpha plane or a single gray plane must be converted to RGB first; any
//! last-axis length other than 3 is rejected with [`PcaError::NotRgb`].

use std::fmt;
use std::time::{Duration, Instant};

use ndarray::{stack, Array2, Array3, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;

use crate::eigen::{NalgebraEigen, SymmetricEigenSolver};
use crate::error::PcaError;
use crate::metrics::pca_storage_ratio;
use crate::pca::{ChannelAnalysis, ChannelCompression, ChannelCompressor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position on the last axis of an RGB raster.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Borrowed red, green and blue planes of `image`, in that order.
pub fn split_channels(image: ArrayView3<'_, u8>) -> anyhow::Result<[ArrayView2<'_, u8>; 3]> {
    let (rows, cols, channels) = image.dim();
    if channels != 3 {
        return Err(PcaError::NotRgb { channels }.into());
    }
    if rows == 0 || cols == 0 {
        return Err(PcaError::EmptyChannel { rows, cols }.into());
    }

    Ok(Channel::ALL.map(|c| image.index_axis_move(Axis(2), c.index())))
}

/// Stacks three equally-shaped planes into an (H × W × 3) raster.
pub fn stack_channels<'a>(
    red: ArrayView2<'a, u8>,
    green: ArrayView2<'a, u8>,
    blue: ArrayView2<'a, u8>,
) -> anyhow::Result<Array3<u8>> {
    Ok(stack(Axis(2), &[red, green, blue])?)
}

/// Per-plane outcome of an image compression.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub channel: Channel,
    pub effective_components: usize,
    pub retained_variance: f64,
}

#[derive(Debug, Clone)]
pub struct ImageCompression {
    pub image: Array3<u8>,
    pub channels: [ChannelSummary; 3],
    pub elapsed: Duration,
}

impl ImageCompression {
    /// All planes share the same width, so they all use the same clamped count.
    pub fn effective_components(&self) -> usize {
        self.channels[0].effective_components
    }

    /// Raw values of the raster divided by the values kept in PCA form.
    pub fn storage_ratio(&self) -> f64 {
        let (rows, cols, _) = self.image.dim();
        pca_storage_ratio(rows, cols, self.effective_components())
    }
}

#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub red: ChannelAnalysis,
    pub green: ChannelAnalysis,
    pub blue: ChannelAnalysis,
}

impl ImageAnalysis {
    pub fn channel(&self, channel: Channel) -> &ChannelAnalysis {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }
}

pub struct ImageCompressorBuilder<S: SymmetricEigenSolver> {
    channels: ChannelCompressor<S>,
    parallel: bool,
}

impl<S: SymmetricEigenSolver> ImageCompressorBuilder<S> {
    pub fn new(channels: ChannelCompressor<S>) -> Self {
        ImageCompressorBuilder {
            channels,
            parallel: true,
        }
    }

    /// Run the three planes on the rayon pool (default) or one after another.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> ImageCompressor<S> {
        ImageCompressor {
            channels: self.channels,
            parallel: self.parallel,
        }
    }
}

pub struct ImageCompressor<S: SymmetricEigenSolver> {
    channels: ChannelCompressor<S>,
    parallel: bool,
}

impl Default for ImageCompressor<NalgebraEigen> {
    fn default() -> Self {
        ImageCompressorBuilder::new(ChannelCompressor::<NalgebraEigen>::default()).build()
    }
}

impl<S: SymmetricEigenSolver> ImageCompressor<S> {
    pub fn channel_compressor(&self) -> &ChannelCompressor<S> {
        &self.channels
    }

    pub fn compress(
        &self,
        image: ArrayView3<u8>,
        requested_k: i64,
    ) -> anyhow::Result<ImageCompression> {
        let start = Instant::now();
        let planes = split_channels(image)?;

        let [red, green, blue] =
            self.map_channels(&planes, |plane| self.channels.compress(plane, requested_k))?;

        let stacked = stack_channels(
            red.reconstructed.view(),
            green.reconstructed.view(),
            blue.reconstructed.view(),
        )?;
        let channels = [
            summary(Channel::Red, &red),
            summary(Channel::Green, &green),
            summary(Channel::Blue, &blue),
        ];
        let elapsed = start.elapsed();

        log::debug!(
            "compressed {}x{} image with {} components in {:?}",
            stacked.dim().0,
            stacked.dim().1,
            channels[0].effective_components,
            elapsed
        );

        Ok(ImageCompression {
            image: stacked,
            channels,
            elapsed,
        })
    }

    pub fn analyze(&self, image: ArrayView3<u8>) -> anyhow::Result<ImageAnalysis> {
        let planes = split_channels(image)?;
        let [red, green, blue] = self.map_channels(&planes, |plane| self.channels.analyze(plane))?;
        Ok(ImageAnalysis { red, green, blue })
    }

    fn map_channels<T, F>(&self, planes: &[ArrayView2<u8>; 3], op: F) -> anyhow::Result<[T; 3]>
    where
        T: Send,
        F: Fn(ArrayView2<u8>) -> anyhow::Result<T> + Sync,
    {
        let results: Vec<T> = if self.parallel {
            planes
                .par_iter()
                .map(|plane| op(plane.view()))
                .collect::<anyhow::Result<Vec<T>>>()?
        } else {
            planes
                .iter()
                .map(|plane| op(plane.view()))
                .collect::<anyhow::Result<Vec<T>>>()?
        };

        results
            .try_into()
            .map_err(|v: Vec<T>| anyhow::anyhow!("expected 3 channel results, got {}", v.len()))
    }
}

fn summary(channel: Channel, compression: &ChannelCompression) -> ChannelSummary {
    ChannelSummary {
        channel,
        effective_components: compression.effective_components,
        retained_variance: compression.retained_variance,
    }
}

/// Compresses each RGB plane of `image` to `requested_k` components (clamped into
/// `[1, W]`) and restacks the planes. The output has the same shape as the input.
pub fn compress_image(image: ArrayView3<u8>, requested_k: i64) -> anyhow::Result<Array3<u8>> {
    let compressor: ImageCompressor<NalgebraEigen> = ImageCompressor::default();
    compressor
        .compress(image, requested_k)
        .map(|compression| compression.image)
}

/// Copies the three planes of `image` into owned arrays.
pub fn to_channel_arrays(image: ArrayView3<u8>) -> anyhow::Result<[Array2<u8>; 3]> {
    Ok(split_channels(image)?.map(|plane| plane.to_owned()))
}
