//! 输入处理基准测试
//!
//! 测试场景:
//! 1. 密文分类（纯正则匹配）
//! 2. 私钥派生地址
//! 3. 助记词派生地址（PBKDF2 2048 轮为主要开销）
//! 4. 大目录解析

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chainprobe::{
    domain::{classify, derive_from_mnemonic, derive_from_private_key},
    service::parse_catalog,
    utils::format_units,
};
use serde_json::{Map, Value};

const PRIVATE_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_classify(c: &mut Criterion) {
    let lines = [
        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        PRIVATE_KEY,
        MNEMONIC,
        "not a secret",
    ];

    c.bench_function("classify_mixed_lines", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classify(black_box(line)));
            }
        })
    });
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    group.bench_function("private_key", |b| {
        b.iter(|| derive_from_private_key(black_box(PRIVATE_KEY)))
    });
    group.sample_size(20);
    group.bench_function("mnemonic", |b| b.iter(|| derive_from_mnemonic(black_box(MNEMONIC))));
    group.finish();
}

fn bench_catalog_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_parse");
    for networks in [100usize, 1000] {
        let mut doc = Map::new();
        for id in 1..=networks {
            let urls = (0..5)
                .map(|i| Value::String(format!("https://rpc{}.chain{}.example.com", i, id)))
                .collect();
            doc.insert(id.to_string(), Value::Array(urls));
        }
        let doc = Value::Object(doc);

        group.throughput(Throughput::Elements(networks as u64));
        group.bench_with_input(BenchmarkId::from_parameter(networks), &doc, |b, doc| {
            b.iter(|| parse_catalog(black_box(doc), &[]))
        });
    }
    group.finish();
}

fn bench_format_units(c: &mut Criterion) {
    c.bench_function("format_units", |b| {
        b.iter(|| format_units(black_box(1_234_567_890_123_456_789_000), 18))
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_derivation,
    bench_catalog_parse,
    bench_format_units
);
criterion_main!(benches);
