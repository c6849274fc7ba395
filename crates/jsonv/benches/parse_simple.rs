//! Benchmark – validating decode vs. `serde_json` on a small record
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonv::{
    ParserOptions, ValidatingParser, integer, object, prop, slice, string,
    validators::{max, max_len, min, min_len},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Basic {
    name: String,
    age: i64,
    friends: Vec<String>,
}

jsonv::target_struct!(Basic { name, age, friends });

/// Deterministic document with `friends` entries.
fn make_payload(friends: usize) -> String {
    let list: Vec<String> = (0..friends).map(|i| format!("\"friend-{i}\"")).collect();
    format!(
        r#"{{"name": "Ada Lovelace", "age": 36, "friends": [{}]}}"#,
        list.join(", ")
    )
}

fn parser(read_size: usize) -> ValidatingParser<Basic> {
    ValidatingParser::new(object([
        prop("name", string().validate(min_len(1)).validate(max_len(64))),
        prop("age", integer().validate(min(0)).validate(max(150))),
        prop("friends", slice(string().validate(min_len(1)))),
    ]))
    .with_options(ParserOptions {
        read_size,
        ..ParserOptions::default()
    })
}

fn bench_parse_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_simple");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3));

    for friends in [0, 10, 1_000] {
        let payload = make_payload(friends);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        let validating = parser(ParserOptions::default().read_size);
        group.bench_with_input(BenchmarkId::new("jsonv", friends), &payload, |b, p| {
            let mut out = Basic::default();
            b.iter(|| {
                validating.parse(black_box(p.as_bytes()), &mut out).unwrap();
                black_box(out.friends.len())
            });
        });

        let trickle = parser(16);
        group.bench_with_input(BenchmarkId::new("jsonv_read16", friends), &payload, |b, p| {
            let mut out = Basic::default();
            b.iter(|| {
                trickle.parse(black_box(p.as_bytes()), &mut out).unwrap();
                black_box(out.friends.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("serde_json", friends), &payload, |b, p| {
            b.iter(|| {
                let out: Basic = serde_json::from_str(black_box(p)).unwrap();
                black_box(out.friends.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_simple);
criterion_main!(benches);
