//! Benchmarks for the display scroller.
//!
//! Run with: `cargo bench --bench scroller_bench`
//!
//! A refresh re-sets the visible frame and advances it by one tick, so both
//! paths matter: `set` with unchanged text should be close to free, `tick`
//! on long rows is the steady state while a track title scrolls.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mpd_lcd::scroller::TextScroller;
use std::hint::black_box;

fn frame(track_len: usize) -> String {
    let track: String = "Nina Simone - Sinnerman "
        .chars()
        .cycle()
        .take(track_len)
        .collect();
    format!("0.4 \x00 S 70\n{track}")
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroller_tick");
    for len in [16usize, 64, 256] {
        let text = frame(len);
        group.bench_with_input(BenchmarkId::new("16x2", len), &text, |b, text| {
            let mut scroller = TextScroller::new(16, 2);
            scroller.set(text, 0);
            b.iter(|| black_box(scroller.tick()));
        });
    }
    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroller_refresh");
    let text = frame(64);
    group.bench_function("same_text", |b| {
        let mut scroller = TextScroller::new(16, 2);
        b.iter(|| {
            scroller.set(black_box(&text), 0);
            black_box(scroller.tick())
        });
    });
    group.bench_function("new_text", |b| {
        let mut scroller = TextScroller::new(16, 2);
        let other = frame(65);
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            scroller.set(if flip { &text } else { &other }, 1);
            black_box(scroller.get())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_tick, bench_refresh);
criterion_main!(benches);
