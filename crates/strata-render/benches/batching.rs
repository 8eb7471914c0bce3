//! Benchmarks for accumulation, mediation sorting and full frames

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use strata_core::math::Vec2;
use strata_render::batching::sort_render_items;
use strata_render::{
    Accumulator, Color, LayerStampComparer, Line, LineBatchItem, RectShape, RenderItem, Renderer,
    RendererConfig, ShapeBatchItem, Texture, TextureDraw, TracingGpuDevice,
};

fn bench_accumulator_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator_fill");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let accumulator = Accumulator::<LineBatchItem>::new(count + 1);
            b.iter(|| {
                for i in 0..count {
                    accumulator.add(RenderItem::new(LineBatchItem::default(), (i % 8) as i32));
                }
                black_box(accumulator.len());
                accumulator.empty();
            });
        });
    }

    group.finish();
}

fn bench_mediation_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("mediation_sort");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        let items: Vec<_> = (0..count)
            .map(|i| RenderItem::new(ShapeBatchItem::default(), ((i * 7919) % 32) as i32))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter(|| {
                let mut batch = items.clone();
                sort_render_items(&mut batch, &LayerStampComparer);
                black_box(batch)
            });
        });
    }

    group.finish();
}

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");
    let textures: Vec<_> = (1..=4)
        .map(|id| Texture::new(id, format!("sheet {id}"), 64, 64))
        .collect();

    for per_kind in [100, 1_000] {
        group.throughput(Throughput::Elements(per_kind as u64 * 3));

        group.bench_with_input(BenchmarkId::from_parameter(per_kind), &per_kind, |b, &per_kind| {
            let mut renderer =
                Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default()).unwrap();
            b.iter(|| {
                renderer.begin();
                for i in 0..per_kind {
                    let x = i as f32;
                    let texture = &textures[i % textures.len()];
                    renderer
                        .render_texture_with(texture, &TextureDraw::at(Vec2::new(x, x)).on_layer((i % 4) as i32))
                        .unwrap();
                    renderer
                        .render_rect(&RectShape::new(Vec2::new(x, 0.0), 8.0, 8.0), (i % 3) as i32)
                        .unwrap();
                    renderer
                        .render_line(&Line::new(Vec2::ZERO, Vec2::new(x, 10.0), Color::WHITE, 1.0), 0)
                        .unwrap();
                }
                renderer.end().unwrap();
                black_box(renderer.stats())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_accumulator_fill,
    bench_mediation_sort,
    bench_full_frame
);
criterion_main!(benches);
