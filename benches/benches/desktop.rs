// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use canopy_desktop::Desktop;
use canopy_scene::{Canvas, ItemKind, RectItem};
use kurbo::{Point, Rect, Size};

fn populated_desktop(items: u32) -> Desktop {
    let mut canvas = Canvas::new();
    let root = canvas.root();
    for i in 0..items {
        let x = f64::from(i % 64) * 30.0;
        let y = f64::from(i / 64) * 30.0;
        let kind = ItemKind::Rect(RectItem::new(Rect::new(x, y, x + 20.0, y + 20.0)));
        canvas.add_item(root, kind).unwrap();
    }
    canvas.update();
    Desktop::new(canvas, Size::new(1280.0, 800.0))
}

fn bench_desktop(c: &mut Criterion) {
    let mut group = c.benchmark_group("canopy_desktop");

    group.bench_function("zoom_keep_point", |b| {
        let mut desktop = populated_desktop(0);
        let mut zoom = 1.0;
        b.iter(|| {
            zoom = if zoom > 64.0 { 0.5 } else { zoom * 1.25 };
            desktop.zoom_absolute(Point::new(300.0, 200.0), zoom, true);
            black_box(desktop.current_center());
        });
    });

    for &items in &[256_u32, 4_096_u32] {
        group.bench_function(format!("zoom_and_update(n={items})"), |b| {
            b.iter_batched(
                || populated_desktop(items),
                |mut desktop| {
                    desktop.zoom_relative(Point::new(300.0, 200.0), 2.0, true);
                    desktop.canvas_mut().update();
                    black_box(desktop.canvas_mut().take_damage());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_desktop);
criterion_main!(benches);
