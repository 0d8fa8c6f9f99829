//! Full-pass benchmarks.
//!
//! Run with: cargo bench --package bb_core

use std::collections::BTreeMap;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bb_core::geometry::Homography;
use bb_core::models::PlayerInput;
use bb_core::tactical::CourtLayout;
use bb_core::{AnalyticsConfig, BoundingBox, GameAnalyzer, GameInput, Point2};

fn to_pixels(p: Point2) -> Point2 {
    Point2::new(4.0 * p.x + 200.0, 4.0 * p.y + 150.0)
}

/// Ten players circling the court, the ball passed around every 40 frames.
fn synthetic_clip(num_frames: usize) -> GameInput {
    let layout = CourtLayout::default();
    let keypoints: Vec<Point2> = layout.points().iter().map(|p| to_pixels(*p)).collect();

    let foot = |id: u32, f: usize| {
        let t = f as f64 * 0.02 + id as f64;
        to_pixels(Point2::new(150.0 + 100.0 * t.cos(), 80.0 + 60.0 * t.sin()))
    };

    let players = (0..10u32)
        .map(|id| PlayerInput {
            id,
            boxes: (0..num_frames)
                .map(|f| {
                    let p = foot(id, f);
                    (f, BoundingBox::new(p.x - 20.0, p.y - 120.0, p.x + 20.0, p.y))
                })
                .collect(),
        })
        .collect();

    let ball = (0..num_frames)
        .map(|f| {
            let p = foot((f / 40) as u32 % 10, f);
            (f, BoundingBox::new(p.x - 5.0, p.y - 65.0, p.x + 5.0, p.y - 55.0))
        })
        .collect();

    GameInput {
        num_frames,
        players,
        ball,
        keypoints: vec![keypoints; num_frames],
        team_assignments: vec![(0..10u32).map(|id| (id, (id % 2) as u8 + 1)).collect::<BTreeMap<_, _>>(); num_frames],
        ..Default::default()
    }
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("Full Pass");
    group.measurement_time(Duration::from_secs(5));

    for &frames in &[240usize, 1200] {
        let input = synthetic_clip(frames);
        group.throughput(Throughput::Elements(frames as u64));

        for parallel in [false, true] {
            let mut config = AnalyticsConfig::default();
            config.parallel = parallel;
            let analyzer = GameAnalyzer::new(config);
            let label = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(label, frames), &input, |b, input| {
                b.iter(|| analyzer.analyze(black_box(input)).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_homography(c: &mut Criterion) {
    let layout = CourtLayout::default();
    let target: Vec<Point2> = layout.points().to_vec();
    let source: Vec<Point2> = target.iter().map(|p| to_pixels(*p)).collect();

    c.bench_function("homography_estimate_18", |b| {
        b.iter(|| Homography::estimate(black_box(&source), black_box(&target)).unwrap());
    });
}

criterion_group!(benches, bench_full_pass, bench_homography);
criterion_main!(benches);
