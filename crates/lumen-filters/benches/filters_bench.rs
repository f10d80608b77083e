//! Criterion benchmarks for the leaf filters and the Canny group.
//!
//! Each filter runs standalone on a synthetic gradient image so that the
//! numbers reflect pixel cost only. The Canny group runs through a
//! `FilterGraph` to include propagation.
//!
//! Run with: `cargo bench -p lumen-filters`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lumen_core::{
    Filter, FilterGraph, Frame, FrameBuffer, FrameDescriptor, FramePool, ProcessContext,
};
use lumen_filters::{
    DirectionalNonMaximumSuppression, DirectionalSobel, GaussianBlur, Grayscale,
    WeakPixelInclusion, canny_edge_detection,
};

const SIZES: [u32; 2] = [64, 256];

fn gradient(width: u32, height: u32) -> Frame {
    let mut buffer = FrameBuffer::new(FrameDescriptor::rgba(width, height));
    for y in 0..height as usize {
        for x in 0..width as usize {
            let v = ((x + y) % 64) as f32 / 63.0;
            buffer.set(x, y, 0, v);
            buffer.set(x, y, 1, 1.0 - v);
            buffer.set(x, y, 2, 0.5);
            buffer.set(x, y, 3, 1.0);
        }
    }
    Frame::new(buffer)
}

fn run<F: Filter>(filter: &mut F, input: &Frame, pool: &mut FramePool) {
    let mut ctx = ProcessContext::standalone(pool);
    if let Ok(Some(output)) = filter.apply(black_box(input), &mut ctx) {
        pool.recycle(black_box(output));
    }
}

// ---------------------------------------------------------------------------
// Leaf filters
// ---------------------------------------------------------------------------

fn bench_leaves(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters/leaf");

    for size in SIZES {
        let rgba = gradient(size, size);
        let mut pool = FramePool::default();
        let luma = match Grayscale::new().apply(&rgba, &mut ProcessContext::standalone(&mut pool)) {
            Ok(Some(frame)) => frame,
            _ => continue,
        };
        let gradients = match DirectionalSobel::new()
            .apply(&luma, &mut ProcessContext::standalone(&mut pool))
        {
            Ok(Some(frame)) => frame,
            _ => continue,
        };

        group.bench_with_input(BenchmarkId::new("grayscale", size), &rgba, |b, input| {
            let mut filter = Grayscale::new();
            b.iter(|| run(&mut filter, input, &mut pool));
        });
        group.bench_with_input(BenchmarkId::new("gaussian_blur", size), &luma, |b, input| {
            let mut filter = GaussianBlur::new();
            b.iter(|| run(&mut filter, input, &mut pool));
        });
        group.bench_with_input(BenchmarkId::new("sobel", size), &luma, |b, input| {
            let mut filter = DirectionalSobel::new();
            b.iter(|| run(&mut filter, input, &mut pool));
        });
        group.bench_with_input(BenchmarkId::new("nms", size), &gradients, |b, input| {
            let mut filter = DirectionalNonMaximumSuppression::new();
            b.iter(|| run(&mut filter, input, &mut pool));
        });
        group.bench_with_input(BenchmarkId::new("weak_pixel", size), &luma, |b, input| {
            let mut filter = WeakPixelInclusion::new();
            b.iter(|| run(&mut filter, input, &mut pool));
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Canny group through the graph
// ---------------------------------------------------------------------------

fn bench_canny(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters/canny");

    for size in SIZES {
        let mut graph = FilterGraph::new();
        let Ok(canny) = graph.build_group(canny_edge_detection()) else {
            continue;
        };
        let input = gradient(size, size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| {
                if let Ok(report) = graph.push_frame(canny, input.acquire()) {
                    black_box(report.outputs.len());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_leaves, bench_canny);
criterion_main!(benches);
