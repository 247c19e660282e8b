// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for canvas picking and the lazy update pass.
//!
//! Trees are deterministic: nested groups with a fixed fan-out whose leaves
//! are small rects scattered over a 2000x2000 area.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use canopy_scene::{Canvas, ItemId, ItemKind, RectItem};
use kurbo::{Point, Rect};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn next_f64(&mut self, upper: f64) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX) * upper
    }
}

fn random_rect(rng: &mut Lcg) -> Rect {
    let x = rng.next_f64(2000.0);
    let y = rng.next_f64(2000.0);
    Rect::new(x, y, x + 4.0 + rng.next_f64(40.0), y + 4.0 + rng.next_f64(40.0))
}

fn build_tree(depth: u32, fanout: u32, seed: u64) -> (Canvas, Vec<ItemId>) {
    let mut canvas = Canvas::new();
    let mut rng = Lcg::new(seed);
    let mut leaves = Vec::new();
    let root = canvas.root();
    build_level(&mut canvas, &mut rng, &mut leaves, root, depth, fanout);
    canvas.update();
    (canvas, leaves)
}

fn build_level(
    canvas: &mut Canvas,
    rng: &mut Lcg,
    leaves: &mut Vec<ItemId>,
    parent: ItemId,
    depth: u32,
    fanout: u32,
) {
    for i in 0..fanout {
        if depth == 0 {
            let kind = ItemKind::Rect(RectItem::new(random_rect(rng)));
            leaves.push(canvas.add_item(parent, kind).unwrap());
        } else {
            let group = canvas.add_group(parent, &format!("level{depth}-{i}")).unwrap();
            build_level(canvas, rng, leaves, group, depth - 1, fanout);
        }
    }
}

fn bench_canvas(c: &mut Criterion) {
    let mut group = c.benchmark_group("canopy_scene");
    group.sample_size(50);

    for &(depth, fanout) in &[(2_u32, 8_u32), (3_u32, 8_u32), (6_u32, 3_u32)] {
        let (canvas, leaves) = build_tree(depth, fanout, 0xCA_0000_0001);
        let mut rng = Lcg::new(0xCA_0000_0002);
        let points: Vec<Point> = (0..256)
            .map(|_| Point::new(rng.next_f64(2000.0), rng.next_f64(2000.0)))
            .collect();

        group.bench_function(format!("pick(d={depth},f={fanout})"), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter(|&&pt| canvas.pick_item(pt).is_some())
                    .count();
                black_box(hits);
            });
        });

        group.bench_function(format!("update_one_leaf(d={depth},f={fanout})"), |b| {
            let mut rng = Lcg::new(0xCA_0000_0003);
            b.iter_batched(
                || {
                    let (mut canvas, _) = build_tree(depth, fanout, 0xCA_0000_0001);
                    let leaf = leaves[rng.next_u32() as usize % leaves.len()];
                    let rect = random_rect(&mut rng);
                    canvas.set_rect(leaf, rect).unwrap();
                    canvas
                },
                |mut canvas| {
                    canvas.update();
                    black_box(canvas.take_damage());
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("update_propagate(d={depth},f={fanout})"), |b| {
            b.iter_batched(
                || build_tree(depth, fanout, 0xCA_0000_0001).0,
                |mut canvas| {
                    canvas.update_with(true);
                    black_box(canvas.bounds(canvas.root()));
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_canvas);
criterion_main!(benches);
