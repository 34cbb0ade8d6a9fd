// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use gleam_sheet::{GleamSheet, GleamSheetConfig, GleamState, compute_anchors};
use kurbo::Size;

const CONTAINER: Size = Size::new(400.0, 800.0);

fn shown_sheet() -> GleamSheet {
    let state = GleamState::builder().build().unwrap();
    let mut sheet = GleamSheet::new(state, GleamSheetConfig::default());
    sheet.layout(CONTAINER, 600.0);
    while sheet.advance(16.0) {}
    sheet
}

fn bench_anchors(c: &mut Criterion) {
    c.bench_function("compute_anchors/resize_sweep", |b| {
        b.iter(|| {
            let mut count = 0;
            for step in 0..256_u32 {
                let content = f64::from(step) * 4.0;
                let anchors = compute_anchors(black_box(800.0), content, false, false);
                count += anchors.len();
            }
            black_box(count)
        });
    });
}

fn bench_drag(c: &mut Criterion) {
    c.bench_function("sheet/drag_and_fling_to_rest", |b| {
        b.iter_batched(
            shown_sheet,
            |mut sheet| {
                sheet.drag_started();
                for _ in 0..20 {
                    sheet.drag_by(black_box(6.0));
                }
                let _ = sheet.drag_stopped(black_box(-900.0));
                while sheet.advance(16.0) {}
                black_box(sheet.state().current_value())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_frames(c: &mut Criterion) {
    c.bench_function("sheet/frame_during_show", |b| {
        b.iter_batched(
            || {
                let state = GleamState::builder().build().unwrap();
                let mut sheet = GleamSheet::new(state, GleamSheetConfig::default());
                sheet.layout(CONTAINER, 600.0);
                sheet
            },
            |mut sheet| {
                let mut alpha = 0.0_f32;
                while sheet.advance(16.0) {
                    if let Some(frame) = sheet.frame() {
                        alpha += frame.surface.scrim.components[3];
                    }
                }
                black_box(alpha)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_anchors, bench_drag, bench_frames);
criterion_main!(benches);
