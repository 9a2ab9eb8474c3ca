use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{ImageBuffer, Rgba};
use mergemedian::prelude::*;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 64;

fn plates(count: usize) -> ImageInputs {
    let mut inputs = ImageInputs::new();
    for i in 0..count {
        let pixels = ImageBuffer::from_fn(WIDTH, HEIGHT, |x, y| {
            let v = ((x * 7 + y * 13 + i as u32 * 31) % 97) as f32 / 97.0;
            Rgba([v, 1.0 - v, v * 0.5, 1.0])
        });
        inputs.push(ImageSource::from_rgba32f(pixels, (0, 0), ChannelSet::rgba()));
    }
    inputs
}

fn median_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("MergeMedian row");
    group.throughput(Throughput::Elements(WIDTH as u64));

    for count in [3usize, 15, 100] {
        let inputs = plates(count);
        let operator = MergeMedian::new();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut row = Row::new(0, WIDTH as i32);
                operator
                    .engine(&inputs, 10, 0, WIDTH as i32, ChannelSet::rgb(), &mut row)
                    .unwrap();
                black_box(row)
            })
        });
    }
    group.finish();
}

fn median_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("MergeMedian region");
    group.sample_size(20);
    group.throughput(Throughput::Elements((WIDTH * HEIGHT) as u64));

    let inputs = plates(15);
    let operator = MergeMedian::new();
    for parallel in [false, true] {
        let engine = RenderEngine::with_options(RenderOptions::new().with_parallel(parallel));
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine.render(&operator, &inputs, None).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, median_row, median_region);
criterion_main!(benches);
