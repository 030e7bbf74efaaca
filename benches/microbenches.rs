//! Criterion microbenches for vocaug.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - VOC XML parsing (parse_voc_boxes)
//! - VOC XML writing with bounds validation (serialize_voc)
//! - One full default pipeline pass on a small image

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

use vocaug::ir::io_voc_xml::{parse_voc_boxes, serialize_voc};
use vocaug::ir::LabeledBox;
use vocaug::pipeline::{PipelineConfig, Sample, Transform};

const IMAGE_HEIGHT: u32 = 480;
const IMAGE_WIDTH: u32 = 640;

fn sample_boxes(count: usize) -> Vec<LabeledBox> {
    (0..count)
        .map(|i| {
            let offset = (i % 40) as f64 * 10.0;
            LabeledBox::from_xyxy(
                offset,
                offset * 0.5,
                offset + 120.5,
                offset * 0.5 + 80.25,
                format!("class_{}", i % 7),
            )
        })
        .collect()
}

/// Benchmark VOC XML parsing.
fn bench_voc_parse(c: &mut Criterion) {
    let xml = serialize_voc(&sample_boxes(50), IMAGE_HEIGHT, IMAGE_WIDTH, "bench.jpg");
    let mut group = c.benchmark_group("voc_parse");
    group.throughput(Throughput::Bytes(xml.len() as u64));

    group.bench_function("parse_voc_boxes", |b| {
        b.iter(|| black_box(parse_voc_boxes(black_box(&xml))))
    });

    group.finish();
}

/// Benchmark VOC XML writing, including per-box validation.
fn bench_voc_serialize(c: &mut Criterion) {
    let boxes = sample_boxes(50);
    let mut group = c.benchmark_group("voc_serialize");
    group.throughput(Throughput::Elements(boxes.len() as u64));

    group.bench_function("serialize_voc", |b| {
        b.iter(|| {
            black_box(serialize_voc(
                black_box(&boxes),
                IMAGE_HEIGHT,
                IMAGE_WIDTH,
                "bench.jpg",
            ))
        })
    });

    group.finish();
}

/// Benchmark one pass of the default pipeline with every step forced on.
fn bench_pipeline(c: &mut Criterion) {
    let mut config = PipelineConfig::default();
    for step in &mut config.steps {
        step.set_probability(1.0);
    }
    let pipeline = config
        .build(IMAGE_HEIGHT, IMAGE_WIDTH)
        .expect("default config builds");
    let image = RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, Rgb([90, 120, 150]));
    let boxes = sample_boxes(10);

    c.bench_function("pipeline_all_steps", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| {
            let sample = Sample::new(image.clone(), boxes.clone());
            black_box(pipeline.apply(sample, &mut rng))
        })
    });
}

criterion_group!(
    benches,
    bench_voc_parse,
    bench_voc_serialize,
    bench_pipeline
);
criterion_main!(benches);
