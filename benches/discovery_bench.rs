//! Benchmarks for field discovery and schema synthesis
//!
//! Run with: cargo bench --bench discovery_bench

use std::io::Cursor;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use event_schema_miner::discovery::{RecordScanner, discover_fields};
use event_schema_miner::{DiscoveryConfig, build_field_index, synthesize_all};
use serde_json::Value;

/// Generate capture lines shaped like a game state stream
fn generate_capture(count: usize) -> String {
    (0..count)
        .map(|i| {
            let event = match i % 3 {
                0 => "gameStateUpdate",
                1 => "standard/newTrade",
                _ => "newChatMessage",
            };
            format!(
                r#"{{"event": "{}", "ts": "2025-12-14T11:51:{:02}Z", "data": {{"gameId": "20251214-{}", "price": {}, "active": {}, "leaderboard": [{{"id": "p{}", "pnl": {}}}, {{"id": "p{}", "pnl": {}, "badge": "gold"}}], "partialPrices": {{"values": {{"1": 1.1, "2": 1.2, "3": 1.3}}}}}}}}"#,
                event,
                i % 60,
                i / 100,
                1.0 + (i as f64 * 0.01),
                i % 2 == 0,
                i,
                i as f64 * 0.1,
                i + 1,
                -(i as f64) * 0.05
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark walking a single record
fn bench_walk_record(c: &mut Criterion) {
    let config = DiscoveryConfig::default();
    let capture = generate_capture(1);
    let record: Value = serde_json::from_str(&capture).unwrap_or(Value::Null);

    c.bench_function("walk_record", |b| {
        b.iter(|| black_box(discover_fields(&record, &config)));
    });
}

/// Benchmark scanning captures with varying record counts
fn bench_scan_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_capture");
    let config = DiscoveryConfig::default();

    for count in [100, 1000, 5000].iter() {
        let capture = generate_capture(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("records", count), &capture, |b, capture| {
            b.iter(|| {
                let scanner = RecordScanner::new(&config);
                black_box(scanner.scan_reader(Cursor::new(capture.as_bytes()), Path::new("bench.jsonl")))
            });
        });
    }

    group.finish();
}

/// Benchmark schema synthesis and indexing of a scanned capture
fn bench_synthesis(c: &mut Criterion) {
    let config = DiscoveryConfig::default();
    let capture = generate_capture(1000);
    let result = RecordScanner::new(&config)
        .scan_reader(Cursor::new(capture.as_bytes()), Path::new("bench.jsonl"))
        .unwrap_or_default();

    c.bench_function("synthesize_all", |b| {
        b.iter(|| black_box(synthesize_all(&result)));
    });
    c.bench_function("build_field_index", |b| {
        b.iter(|| black_box(build_field_index(&result, config.max_samples)));
    });
}

criterion_group!(benches, bench_walk_record, bench_scan_capture, bench_synthesis);
criterion_main!(benches);
