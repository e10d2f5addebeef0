use channel_pca::eigen::NalgebraEigen;
use channel_pca::{compress_channel, ChannelCompressor, ImageCompressor, ImageCompressorBuilder};
use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use ndarray::{Array2, Array3};
use rand::distr::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;

#[derive(Clone)]
pub struct CompressionConfig {
    seed: u64,
    image_sizes: Vec<(usize, usize)>,
    components: Vec<i64>,
    measurement_time: u64,
    sample_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            image_sizes: vec![(64, 64), (128, 128), (256, 192), (256, 256)],
            components: vec![1, 10, 50],
            measurement_time: 10,
            sample_size: 10,
        }
    }
}

fn create_test_channel(rows: usize, cols: usize, seed: u64) -> Array2<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Uniform::try_from(0.0..24.0).unwrap();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let base = 110.0 + 90.0 * ((r as f64 * 0.05).sin() * (c as f64 * 0.08).cos());
        (base + noise.sample(&mut rng)).clamp(0.0, 255.0) as u8
    })
}

fn create_test_image(rows: usize, cols: usize, seed: u64) -> Array3<u8> {
    let mut image = Array3::zeros((rows, cols, 3));
    for c in 0..3 {
        let plane = create_test_channel(rows, cols, seed + c as u64);
        image.index_axis_mut(ndarray::Axis(2), c).assign(&plane);
    }
    image
}

fn configure_group<'a, M: Measurement>(
    c: &'a mut Criterion<M>,
    name: &str,
    config: &CompressionConfig,
) -> BenchmarkGroup<'a, M> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(config.measurement_time));
    group.sample_size(config.sample_size);
    group
}

pub fn bench_channel_compression(c: &mut Criterion) {
    let config = CompressionConfig::default();
    let mut group = configure_group(c, "Channel_Compression", &config);

    for &(rows, cols) in config.image_sizes.iter() {
        let channel = create_test_channel(rows, cols, config.seed);
        for &k in config.components.iter() {
            group.bench_with_input(
                BenchmarkId::new("compress_channel", format!("{}x{}_k{}", rows, cols, k)),
                &k,
                |b, &k| {
                    b.iter(|| compress_channel(channel.view(), k).unwrap());
                },
            );
        }

        // One fit, reconstruction only.
        let compressor: ChannelCompressor<NalgebraEigen> = ChannelCompressor::default();
        let basis = compressor.fit(channel.view()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("reconstruct_fitted", format!("{}x{}_k10", rows, cols)),
            &10i64,
            |b, &k| {
                b.iter(|| basis.quantize(&basis.reconstruct(k)));
            },
        );
    }

    group.finish();
}

pub fn bench_image_compression(c: &mut Criterion) {
    let config = CompressionConfig::default();
    let mut group = configure_group(c, "Image_Compression", &config);

    let parallel: ImageCompressor<NalgebraEigen> = ImageCompressor::default();
    let sequential = ImageCompressorBuilder::new(ChannelCompressor::<NalgebraEigen>::default())
        .parallel(false)
        .build();

    for &(rows, cols) in config.image_sizes.iter() {
        let image = create_test_image(rows, cols, config.seed);
        let id = format!("{}x{}_k10", rows, cols);

        group.bench_with_input(BenchmarkId::new("parallel", &id), &image, |b, image| {
            b.iter(|| parallel.compress(image.view(), 10).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("sequential", &id), &image, |b, image| {
            b.iter(|| sequential.compress(image.view(), 10).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_channel_compression, bench_image_compression);
criterion_main!(benches);
