#![allow(missing_docs, unused_doc_comments, unused_attributes)]
//! Benchmarks for chunked MARC decoding.
//!
//! Compares one-shot decoding with push decoding at several chunk sizes, and
//! sequential with Rayon-parallel decoding of the same buffer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marc_stream::parallel::parse_parallel;
use marc_stream::{parse, MarcParser, ParserOptions};

/// Build `count` records, each with a handful of control and data fields.
fn synthetic_records(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..count {
        let fields: Vec<(String, Vec<u8>)> = vec![
            ("001".to_string(), format!("ocm{i:08}").into_bytes()),
            ("008".to_string(), b"040520s2004    nyu           000 1 eng  ".to_vec()),
            (
                "245".to_string(),
                format!("10\x1faBenchmark title {i} /\x1fcSome Author.").into_bytes(),
            ),
            (
                "650".to_string(),
                b" 0\x1faSubject heading\x1fxSubdivision\x1fvFiction.".to_vec(),
            ),
        ];

        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, value) in &fields {
            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{:04}", value.len() + 1).as_bytes());
            directory.extend_from_slice(format!("{:05}", data.len()).as_bytes());
            data.extend_from_slice(value);
            data.push(0x1E);
        }
        directory.push(0x1E);
        let base = 24 + directory.len();
        let length = base + data.len() + 1;

        out.extend_from_slice(format!("{length:05}nam a22{base:05} i 4500").as_bytes());
        out.extend_from_slice(&directory);
        out.extend_from_slice(&data);
        out.push(0x1D);
    }
    out
}

fn benchmark_parse_10k(c: &mut Criterion) {
    let data = synthetic_records(10_000);
    c.bench_function("parse_10k_records", |b| {
        b.iter(|| parse(black_box(&data)).map(|r| r.len()))
    });
}

fn benchmark_chunk_sizes(c: &mut Criterion) {
    let data = synthetic_records(10_000);
    let mut group = c.benchmark_group("push_10k_records");
    for size in [512usize, 4 * 1024, 64 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut parser = MarcParser::new();
                let mut count = 0;
                for chunk in data.chunks(size) {
                    count += parser.push(black_box(chunk)).len();
                }
                count
            });
        });
    }
    group.finish();
}

fn benchmark_parallel_10k(c: &mut Criterion) {
    let data = bytes::Bytes::from(synthetic_records(10_000));
    let options = ParserOptions::default();
    c.bench_function("parse_parallel_10k_records", |b| {
        b.iter(|| parse_parallel(black_box(data.clone()), &options).map(|r| r.len()))
    });
}

criterion_group!(
    benches,
    benchmark_parse_10k,
    benchmark_chunk_sizes,
    benchmark_parallel_10k
);
criterion_main!(benches);
