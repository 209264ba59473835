//! Criterion benchmarks for logpipe

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logpipe::prelude::*;
use logpipe::{Encoder, LogEntry, LogSampler};
use std::io::{self, Write};

/// Writer that discards everything, so sink cost excludes real I/O
struct Discard;

impl Write for Discard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn discard_logger(config: LoggerConfig) -> Logger {
    Logger::build(
        LoggerConfig {
            output_paths: Vec::new(),
            ..config
        },
        "bench",
        Some(Box::new(Discard)),
    )
}

// ============================================================================
// Pipeline Construction Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("build_with_writer", |b| {
        b.iter(|| black_box(discard_logger(LoggerConfig::default())));
    });

    group.bench_function("nop", |b| {
        b.iter(|| black_box(Logger::nop()));
    });

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let plain = discard_logger(LoggerConfig {
        sampling: None,
        disable_caller: true,
        ..LoggerConfig::default()
    });
    group.bench_function("info_no_caller", |b| {
        b.iter(|| plain.info(black_box("benchmark message")));
    });

    let annotated = discard_logger(LoggerConfig {
        sampling: None,
        ..LoggerConfig::default()
    });
    group.bench_function("info_with_caller", |b| {
        b.iter(|| annotated.info(black_box("benchmark message")));
    });

    group.bench_function("filtered_debug", |b| {
        b.iter(|| annotated.debug(black_box("never written")));
    });

    let derived = annotated
        .with_field("request_id", "req-123")
        .with_field("user_id", 42);
    group.bench_function("info_with_bound_fields", |b| {
        b.iter(|| {
            derived.log_with_fields(
                LogLevel::Info,
                black_box("benchmark message"),
                Fields::new().with("status", 200).with("latency_ms", 1.5),
            )
        });
    });

    group.finish();
}

fn bench_sampled_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampled_emission");
    group.throughput(Throughput::Elements(1));

    let sampled = discard_logger(LoggerConfig {
        sampling: Some(SamplingPolicy::new(100, 100)),
        ..LoggerConfig::default()
    });
    group.bench_function("repeated_message", |b| {
        b.iter(|| sampled.info(black_box("hot loop message")));
    });

    let sampler = LogSampler::new(SamplingPolicy::new(100, 100));
    group.bench_function("sampler_decision", |b| {
        b.iter(|| black_box(sampler.should_sample(LogLevel::Info, black_box("hot loop message"))));
    });

    group.finish();
}

// ============================================================================
// Encoder Benchmarks
// ============================================================================

fn bench_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoders");

    for field_count in [0usize, 5, 20] {
        let fields: Fields = (0..field_count)
            .map(|i| Field::new(format!("field_{}", i), i))
            .collect();
        let entry = LogEntry::new(LogLevel::Info, "encode me").with_fields(fields);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("console", field_count), &entry, |b, entry| {
            let encoder = Encoder::console_plain();
            b.iter(|| black_box(encoder.encode(entry)))
        });
        group.bench_with_input(BenchmarkId::new("json", field_count), &entry, |b, entry| {
            let encoder = Encoder::json();
            b.iter(|| black_box(encoder.encode(entry)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_emission,
    bench_sampled_emission,
    bench_encoders
);
criterion_main!(benches);
