pub mod eigen;
pub mod metrics;
pub mod pca;
pub mod rgb;
#[cfg(feature = "image")]
pub mod raster;
mod dense;
mod error;
mod utils;

pub use error::PcaError;
pub use pca::{compress_channel, ChannelCompressor, ChannelCompressorBuilder, Quantization};
pub use rgb::{compress_image, Channel, ImageCompressor, ImageCompressorBuilder};
pub use utils::effective_components;
