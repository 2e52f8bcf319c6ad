//! Performance benchmarks for track-records
//!
//! Run with: cargo bench

use chrono::DateTime;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use geo::Point;
use std::sync::Arc;
use track_records::{
    MemoryStorage, RecordLedger, Sample, Track, best_time_ms, find_records_in_track,
};

/// Generate a realistic running track with the specified number of one-second
/// samples, heading roughly north with a little lateral jitter.
fn generate_samples(num_points: usize) -> Vec<Sample> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = 51.5074 + t * 0.4 + (t * 50.0).sin() * 0.0001;
            let lon = -0.1278 + (t * 30.0).cos() * 0.0005;
            Sample {
                point: Point::new(lon, lat),
                elevation: 20.0 + (t * 40.0).sin() * 15.0,
                time: DateTime::from_timestamp(1_700_000_000 + i as i64, 0).unwrap(),
                heart_rate: Some(150),
            }
        })
        .collect()
}

fn generate_track(num_points: usize) -> Arc<Track> {
    Track::new("bench", "Benchmark run", generate_samples(num_points)).unwrap()
}

fn bench_best_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_segment");

    // 50k points covers well over marathon distance
    let track = generate_track(50_000);
    group.throughput(Throughput::Elements(50_000));

    group.bench_function("5km_50k_points", |b| {
        b.iter(|| best_time_ms(track.points(), 5.0));
    });

    group.bench_function("marathon_50k_points", |b| {
        b.iter(|| best_time_ms(track.points(), 42.195));
    });

    group.finish();
}

fn bench_track_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_scan");

    let track = generate_track(50_000);
    group.throughput(Throughput::Elements(50_000));

    group.bench_function("all_distances_50k_points", |b| {
        b.iter(|| find_records_in_track(&track));
    });

    group.finish();
}

fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");
    group.sample_size(20);

    let track = generate_track(50_000);

    group.bench_function("evaluate_50k_points", |b| {
        let ledger = RecordLedger::new(Box::new(MemoryStorage::new()));
        b.iter(|| ledger.evaluate(&track));
    });

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.sample_size(20);

    let samples = generate_samples(50_000);
    group.throughput(Throughput::Elements(50_000));

    group.bench_function("track_50k_points", |b| {
        b.iter(|| Track::new("bench", "Benchmark run", samples.clone()).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_best_segment,
    bench_track_scan,
    bench_ledger,
    bench_construction,
);

criterion_main!(benches);
